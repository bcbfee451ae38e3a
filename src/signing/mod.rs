//! Signing service layer
//! Created: 2025-06-14
//!
//! Transport-agnostic request and response shapes around the placement
//! engine and the integrity hasher.

pub mod record;
pub mod service;

pub use record::{AuditRecord, DocumentStatus};
pub use service::{
    PreparationRequest, SigningRequest, SigningResponse, SigningService, VerificationRequest,
};
