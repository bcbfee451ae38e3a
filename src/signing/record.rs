//! Audit record of one signing operation
//! Created: 2025-06-14

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::hash::{IntegrityHasher, VerificationResponse};
use crate::types::PreparedField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Created,
    Signed,
    Verified,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Created => f.write_str("created"),
            DocumentStatus::Signed => f.write_str("signed"),
            DocumentStatus::Verified => f.write_str("verified"),
        }
    }
}

/// What a store keeps about a signed document. Storage itself is up to
/// the caller; the record only needs to round-trip through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub original_file_name: String,
    pub original_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_digest: Option<String>,
    pub fields: Vec<PreparedField>,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        original_file_name: impl Into<String>,
        original_digest: impl Into<String>,
        fields: Vec<PreparedField>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_file_name: original_file_name.into(),
            original_digest: original_digest.into(),
            result_digest: None,
            fields,
            status: DocumentStatus::Created,
            signed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn mark_signed(&mut self, result_digest: impl Into<String>) {
        self.result_digest = Some(result_digest.into());
        self.status = DocumentStatus::Signed;
        self.signed_at = Some(Utc::now());
    }

    /// Checks `document` against the signed digest. A match moves the
    /// record to `verified`; a mismatch leaves it untouched. A record
    /// that was never signed never matches.
    pub fn verify(&mut self, hasher: &IntegrityHasher, document: &[u8]) -> VerificationResponse {
        let Some(reference) = self.result_digest.as_deref() else {
            return VerificationResponse {
                matches: false,
                computed_digest: hasher.digest(document),
            };
        };

        let response = hasher.verify(document, reference);
        if response.matches {
            self.status = DocumentStatus::Verified;
            info!("Record {} verified", self.id);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let hasher = IntegrityHasher::new();
        let mut record = AuditRecord::new("contract.pdf", hasher.digest(b"original"), Vec::new());
        assert_eq!(record.status, DocumentStatus::Created);
        assert!(!record.verify(&hasher, b"original").matches);

        record.mark_signed(hasher.digest(b"signed"));
        assert_eq!(record.status, DocumentStatus::Signed);
        assert!(record.signed_at.is_some());

        assert!(!record.verify(&hasher, b"tampered").matches);
        assert_eq!(record.status, DocumentStatus::Signed);

        assert!(record.verify(&hasher, b"signed").matches);
        assert_eq!(record.status, DocumentStatus::Verified);
    }

    #[test]
    fn test_serialized_shape() {
        let mut record = AuditRecord::new("a.pdf", "00", Vec::new());
        record.mark_signed("ff");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "signed");
        assert_eq!(json["originalFileName"], "a.pdf");
        assert_eq!(json["resultDigest"], "ff");
        assert!(json.get("signedAt").is_some());

        let back: AuditRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
