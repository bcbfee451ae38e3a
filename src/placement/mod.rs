//! Signature placement
//! Created: 2025-06-13
//!
//! Decodes the signature image once and stamps it, aspect-preserved, into
//! every signature field of a prepared batch.

pub mod engine;
pub mod image;
mod resources;
mod text;

pub use engine::{Placement, PlacementEngine};
pub use image::{decode_base64_payload, ImageEncoding, SignatureImage};
