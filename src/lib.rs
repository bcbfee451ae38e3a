//! Main library file for signature field placement
//!
//! Fields are placed in a rendered page view, converted to PDF space,
//! stamped with a signature image and fingerprinted for later
//! verification.

// Configuration and shared types
pub mod config;
pub mod error;
pub mod types;

// Coordinate spaces and containment
pub mod geometry;

// Editing surface
pub mod editor;
pub mod preparer;

// Document transformation and integrity
pub mod hash;
pub mod placement;
pub mod signing;

// Shared utilities
pub mod utils;

// Re-exports for crate consumers
pub use config::{EditorConfig, SigningConfig, TextStyle};
pub use editor::EditorSession;
pub use error::{EditorError, Error, Result};
pub use geometry::{BrowserRect, PageGeometry, PdfDimensions, PdfRect, RenderedDimensions};
pub use hash::{IntegrityHasher, VerificationResponse};
pub use placement::{Placement, PlacementEngine, SignatureImage};
pub use preparer::{FieldPreparer, GeometryLookup, Preparation};
pub use signing::{
    AuditRecord, DocumentStatus, PreparationRequest, SigningRequest, SigningResponse,
    SigningService, VerificationRequest,
};
pub use types::{Field, FieldId, FieldIssue, FieldType, IssueKind, PreparedField};
pub use utils::Logger;
