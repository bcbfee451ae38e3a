//! Field editor state
//! Created: 2025-06-12
//!
//! Toolkit-independent model of the placement surface: a session owns the
//! fields, the selection, the single active gesture and the per-page
//! geometry that the preparer reads at signing time.

pub mod geometry_cache;
pub mod gesture;
pub mod session;
pub mod validation;

pub use geometry_cache::GeometryCache;
pub use gesture::Gesture;
pub use session::{EditorSession, SessionStats};
pub use validation::{validate_positions, PositionReport, PositionViolation, ViolationKind};
