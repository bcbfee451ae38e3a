//! Field preparation: UI-space fields to PDF-space descriptors
//! Created: 2025-06-12
//!
//! This is where transient viewport state is reconciled into the durable
//! PDF-space representation that goes to the signer.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::geometry::PageGeometry;
use crate::types::{Field, FieldIssue, IssueKind, PreparedField};

/// Anything that can answer "what is the current geometry of page N".
pub trait GeometryLookup {
    fn page_geometry(&self, page_number: u32) -> Option<PageGeometry>;
}

impl GeometryLookup for BTreeMap<u32, PageGeometry> {
    fn page_geometry(&self, page_number: u32) -> Option<PageGeometry> {
        self.get(&page_number).copied()
    }
}

impl GeometryLookup for HashMap<u32, PageGeometry> {
    fn page_geometry(&self, page_number: u32) -> Option<PageGeometry> {
        self.get(&page_number).copied()
    }
}

/// Output of one preparation pass, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preparation {
    pub fields: Vec<PreparedField>,
    pub skipped: Vec<FieldIssue>,
}

impl Preparation {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct FieldPreparer<'a, G: GeometryLookup + ?Sized> {
    geometry: &'a G,
}

impl<'a, G: GeometryLookup + ?Sized> FieldPreparer<'a, G> {
    pub fn new(geometry: &'a G) -> Self {
        Self { geometry }
    }

    /// Converts every field whose page geometry is known; the rest are
    /// reported as skipped without affecting the others.
    #[instrument(skip_all, fields(fields = fields.len()))]
    pub fn prepare(&self, fields: &[Field]) -> Preparation {
        let mut preparation = Preparation::default();

        for field in fields {
            match self.geometry.page_geometry(field.page_number).filter(PageGeometry::is_usable) {
                Some(geometry) => {
                    let coordinates = field.rect.to_pdf(&geometry);
                    debug!("Prepared {} on page {}: {}", field.id, field.page_number, coordinates);
                    preparation.fields.push(PreparedField {
                        id: field.id.clone(),
                        field_type: field.field_type,
                        page_number: field.page_number,
                        coordinates,
                        value: field.value.clone(),
                    });
                }
                None => {
                    let issue = FieldIssue::new(
                        field.id.clone(),
                        field.page_number,
                        IssueKind::GeometryMissing,
                    );
                    warn!("Skipping {}", issue);
                    preparation.skipped.push(issue);
                }
            }
        }

        preparation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BrowserRect, PdfDimensions, PdfRect, RenderedDimensions};
    use crate::types::{FieldId, FieldType};

    fn geometry() -> BTreeMap<u32, PageGeometry> {
        let mut pages = BTreeMap::new();
        pages.insert(
            1,
            PageGeometry::new(
                PdfDimensions::new(600.0, 800.0),
                RenderedDimensions::new(300.0, 400.0),
            ),
        );
        pages.insert(
            3,
            PageGeometry::new(
                PdfDimensions::new(612.0, 792.0),
                RenderedDimensions::new(612.0, 792.0),
            ),
        );
        pages
    }

    fn field(id: &str, page: u32) -> Field {
        Field::new(
            FieldId::new(id),
            FieldType::Signature,
            page,
            BrowserRect::new(0.0, 0.0, 100.0, 50.0),
        )
    }

    #[test]
    fn test_prepare_converts_with_page_geometry() {
        let pages = geometry();
        let preparation = FieldPreparer::new(&pages).prepare(&[field("a", 1)]);

        assert!(preparation.is_complete());
        assert_eq!(preparation.fields[0].coordinates, PdfRect::new(0.0, 700.0, 200.0, 100.0));
    }

    #[test]
    fn test_missing_geometry_is_skipped_not_fatal() {
        let pages = geometry();
        let fields = [field("a", 1), field("b", 2), field("c", 3)];
        let preparation = FieldPreparer::new(&pages).prepare(&fields);

        let ids: Vec<_> = preparation.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(
            preparation.skipped,
            vec![FieldIssue::new(FieldId::new("b"), 2, IssueKind::GeometryMissing)]
        );
    }

    #[test]
    fn test_value_and_type_carry_over() {
        let pages = geometry();
        let mut text = field("t", 3).with_value("Jane Doe");
        text.field_type = FieldType::Text;

        let prepared = FieldPreparer::new(&pages).prepare(&[text]).fields.remove(0);
        assert_eq!(prepared.field_type, FieldType::Text);
        assert_eq!(prepared.value.as_deref(), Some("Jane Doe"));
        assert_eq!(prepared.coordinates, PdfRect::new(0.0, 742.0, 100.0, 50.0));
    }

    #[test]
    fn test_collapsed_render_counts_as_missing() {
        let mut pages = geometry();
        pages.insert(
            2,
            PageGeometry::new(PdfDimensions::new(612.0, 792.0), RenderedDimensions::new(0.0, 0.0)),
        );

        let preparation = FieldPreparer::new(&pages).prepare(&[field("b", 2)]);
        assert!(preparation.fields.is_empty());
        assert_eq!(preparation.skipped.len(), 1);
    }
}
