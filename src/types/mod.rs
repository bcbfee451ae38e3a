// Type definitions shared by the editor, preparer and signer

pub mod field;
pub mod issue;

pub use field::*;
pub use issue::*;
