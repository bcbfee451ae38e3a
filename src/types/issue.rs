//! Per-field diagnostics
//!
//! A field that cannot be prepared or placed does not fail its batch; it
//! is dropped and reported with one of these.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// The page's dimensions were never captured, or are stale.
    GeometryMissing,
    /// The document has no page with that number.
    PageOutOfRange,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::GeometryMissing => f.write_str("missing page geometry"),
            IssueKind::PageOutOfRange => f.write_str("page out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub field_id: FieldId,
    pub page_number: u32,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(field_id: FieldId, page_number: u32, kind: IssueKind) -> Self {
        Self { field_id, page_number, kind }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field {} (page {}): {}", self.field_id, self.page_number, self.kind)
    }
}
