//! Shared utilities
//! Created: 2025-06-03

pub mod base64_bytes;
pub mod logger;

pub use logger::Logger;
