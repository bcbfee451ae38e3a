//! Sign, verify and prepare operations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::SigningConfig;
use crate::error::{Error, Result};
use crate::geometry::PageGeometry;
use crate::hash::{IntegrityHasher, VerificationResponse};
use crate::placement::{PlacementEngine, SignatureImage};
use crate::preparer::{FieldPreparer, Preparation};
use crate::types::{Field, FieldIssue, FieldId, PreparedField};

use super::record::AuditRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    #[serde(default, with = "crate::utils::base64_bytes")]
    pub document: Vec<u8>,
    #[serde(default, with = "crate::utils::base64_bytes")]
    pub signature_image: Vec<u8>,
    #[serde(default)]
    pub fields: Vec<PreparedField>,
    /// Recorded on the audit record; the configured default otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningResponse {
    pub original_digest: String,
    pub result_digest: String,
    #[serde(with = "crate::utils::base64_bytes")]
    pub document: Vec<u8>,
    /// Signature fields actually placed
    pub fields_processed: usize,
    /// Signature fields in the request
    pub fields_submitted: usize,
    pub placed: Vec<FieldId>,
    pub text_fields_rendered: usize,
    pub issues: Vec<FieldIssue>,
    pub record: AuditRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    #[serde(default)]
    pub reference_digest: String,
    #[serde(default, with = "crate::utils::base64_bytes")]
    pub document: Vec<u8>,
}

/// Editor fields plus the page geometry captured while they were placed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparationRequest {
    pub fields: Vec<Field>,
    #[serde(default)]
    pub pages: BTreeMap<u32, PageGeometry>,
}

#[derive(Debug, Clone)]
pub struct SigningService {
    config: SigningConfig,
    hasher: IntegrityHasher,
    engine: PlacementEngine,
}

impl SigningService {
    pub fn new(config: SigningConfig) -> Self {
        let engine = PlacementEngine::new(&config);
        Self {
            config,
            hasher: IntegrityHasher::new(),
            engine,
        }
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    pub fn hasher(&self) -> &IntegrityHasher {
        &self.hasher
    }

    /// Stamps the signature into every signature field.
    ///
    /// Input is checked before anything else runs, and the image is decoded
    /// before the document is touched, so either failure leaves no output.
    #[instrument(skip_all, fields(fields = request.fields.len()))]
    pub fn sign(&self, request: &SigningRequest) -> Result<SigningResponse> {
        if request.document.is_empty() {
            return Err(Error::input("document is missing"));
        }
        if request.signature_image.is_empty() {
            return Err(Error::input("signature image is missing"));
        }
        if request.fields.is_empty() {
            return Err(Error::input("no fields were submitted"));
        }

        let original_digest = self.hasher.digest(&request.document);
        let image = SignatureImage::decode(&request.signature_image)?;

        let fields_submitted = request
            .fields
            .iter()
            .filter(|f| f.field_type.is_signature())
            .count();
        if fields_submitted == 0 {
            warn!("Request has no signature fields; only text fields will be drawn");
        }

        let placement = self.engine.place(&request.document, &image, &request.fields)?;
        let result_digest = self.hasher.digest(&placement.document);

        let file_name = request
            .file_name
            .clone()
            .unwrap_or_else(|| self.config.default_file_name.clone());
        let mut record =
            AuditRecord::new(file_name, original_digest.clone(), request.fields.clone());
        record.mark_signed(result_digest.clone());

        info!(
            "Signed {}: {}/{} signature fields, digest {}",
            record.original_file_name,
            placement.fields_processed(),
            fields_submitted,
            result_digest
        );

        Ok(SigningResponse {
            original_digest,
            result_digest,
            fields_processed: placement.fields_processed(),
            fields_submitted,
            text_fields_rendered: placement.text_fields_rendered,
            placed: placement.placed,
            issues: placement.issues,
            document: placement.document,
            record,
        })
    }

    /// Compares a document against a reference digest. A mismatch is a
    /// normal answer, not an error.
    #[instrument(skip_all)]
    pub fn verify(&self, request: &VerificationRequest) -> Result<VerificationResponse> {
        if request.document.is_empty() {
            return Err(Error::input("document is missing"));
        }
        if request.reference_digest.trim().is_empty() {
            return Err(Error::input("reference digest is missing"));
        }

        let response = self.hasher.verify(&request.document, &request.reference_digest);
        if response.matches {
            info!("Document matches reference digest");
        } else {
            warn!("Document does not match reference digest");
        }
        Ok(response)
    }

    /// Converts editor fields to PDF space with the supplied geometry.
    pub fn prepare(&self, request: &PreparationRequest) -> Preparation {
        FieldPreparer::new(&request.pages).prepare(&request.fields)
    }
}

impl Default for SigningService {
    fn default() -> Self {
        Self::new(SigningConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BrowserRect, PdfDimensions, PdfRect, RenderedDimensions};
    use crate::types::FieldType;

    fn signature_field() -> PreparedField {
        PreparedField::new(
            FieldId::from("f1"),
            FieldType::Signature,
            1,
            PdfRect::new(0.0, 0.0, 100.0, 40.0),
        )
    }

    #[test]
    fn test_missing_inputs_are_rejected_in_order() {
        let service = SigningService::default();

        let err = service.sign(&SigningRequest::default()).unwrap_err();
        assert!(matches!(err, Error::InputError(ref m) if m.contains("document")));

        let request = SigningRequest {
            document: b"%PDF-1.5".to_vec(),
            ..Default::default()
        };
        let err = service.sign(&request).unwrap_err();
        assert!(matches!(err, Error::InputError(ref m) if m.contains("image")));

        let request = SigningRequest {
            document: b"%PDF-1.5".to_vec(),
            signature_image: vec![0x89],
            ..Default::default()
        };
        let err = service.sign(&request).unwrap_err();
        assert!(matches!(err, Error::InputError(ref m) if m.contains("fields")));
    }

    #[test]
    fn test_bad_image_fails_before_document_is_parsed() {
        let request = SigningRequest {
            document: b"not even a pdf".to_vec(),
            signature_image: b"GIF89a".to_vec(),
            fields: vec![signature_field()],
            file_name: None,
        };
        let err = SigningService::default().sign(&request).unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[test]
    fn test_verify_requires_both_inputs() {
        let service = SigningService::default();
        assert!(service.verify(&VerificationRequest::default()).is_err());

        let digest = service.hasher().digest(b"doc");
        let response = service
            .verify(&VerificationRequest {
                reference_digest: digest.clone(),
                document: b"doc".to_vec(),
            })
            .unwrap();
        assert!(response.matches);
        assert_eq!(response.computed_digest, digest);
    }

    #[test]
    fn test_preparation_request_from_json() {
        let json = r#"{
            "fields": [
                {"id": "field-a", "type": "signature", "pageNumber": 1,
                 "x": 0, "y": 0, "width": 100, "height": 50},
                {"id": "field-b", "type": "text", "pageNumber": 2,
                 "x": 0, "y": 0, "width": 100, "height": 50}
            ],
            "pages": {
                "1": {
                    "pdf": {"width": 600, "height": 800},
                    "rendered": {"width": 600, "height": 800}
                }
            }
        }"#;
        let request: PreparationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.fields[0].rect, BrowserRect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(
            request.pages[&1],
            PageGeometry::new(
                PdfDimensions::new(600.0, 800.0),
                RenderedDimensions::new(600.0, 800.0)
            )
        );

        let preparation = SigningService::default().prepare(&request);
        assert_eq!(preparation.fields.len(), 1);
        assert_eq!(preparation.fields[0].coordinates, PdfRect::new(0.0, 750.0, 100.0, 50.0));
        assert_eq!(preparation.skipped.len(), 1);
        assert_eq!(preparation.skipped[0].field_id, FieldId::from("field-b"));
    }
}
