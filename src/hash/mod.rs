//! Document integrity hashing
//! Created: 2025-06-03
//!
//! Tamper evidence only: SHA-256 over the raw document bytes, rendered as
//! lowercase hex.

pub mod handler;

pub use handler::{IntegrityHasher, VerificationResponse};
