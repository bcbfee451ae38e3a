//! Advisory on-page checks for placed fields
//!
//! Nothing here mutates fields. The report lists each violation and, where
//! geometry is known, the clamped rectangle that would fix it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp_pdf, PdfRect};
use crate::preparer::GeometryLookup;
use crate::types::{Field, FieldId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    DimensionsMissing,
    NegativeCoordinates,
    ExceedsPageWidth,
    ExceedsPageHeight,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ViolationKind::DimensionsMissing => "page dimensions missing",
            ViolationKind::NegativeCoordinates => "negative coordinates",
            ViolationKind::ExceedsPageWidth => "exceeds page width",
            ViolationKind::ExceedsPageHeight => "exceeds page height",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionViolation {
    pub field_id: FieldId,
    pub page_number: u32,
    pub kind: ViolationKind,
    /// Clamped PDF rectangle, when the page geometry is known.
    pub suggestion: Option<PdfRect>,
}

impl fmt::Display for PositionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field {}: {}", self.field_id, self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub violations: Vec<PositionViolation>,
}

impl PositionReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks every field's PDF-space rectangle against its page bounds.
pub fn validate_positions<G: GeometryLookup + ?Sized>(
    fields: &[Field],
    geometry: &G,
) -> PositionReport {
    let mut report = PositionReport::default();

    for field in fields {
        let mut push = |kind, suggestion| {
            report.violations.push(PositionViolation {
                field_id: field.id.clone(),
                page_number: field.page_number,
                kind,
                suggestion,
            })
        };

        let Some(page) = geometry.page_geometry(field.page_number).filter(|g| g.is_usable()) else {
            push(ViolationKind::DimensionsMissing, None);
            continue;
        };

        let rect = field.rect.to_pdf(&page);
        let clamped = clamp_pdf(&rect, page.pdf);

        if rect.x < 0.0 || rect.y < 0.0 {
            push(ViolationKind::NegativeCoordinates, Some(clamped));
        }
        if rect.right() > page.pdf.width {
            push(ViolationKind::ExceedsPageWidth, Some(clamped));
        }
        if rect.top() > page.pdf.height {
            push(ViolationKind::ExceedsPageHeight, Some(clamped));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::geometry::{BrowserRect, PageGeometry, PdfDimensions, RenderedDimensions};
    use crate::types::FieldType;

    fn pages() -> BTreeMap<u32, PageGeometry> {
        BTreeMap::from([(
            1,
            PageGeometry::new(
                PdfDimensions::new(600.0, 800.0),
                RenderedDimensions::new(600.0, 800.0),
            ),
        )])
    }

    fn field(page: u32, rect: BrowserRect) -> Field {
        Field::new(FieldId::new("f"), FieldType::Signature, page, rect)
    }

    #[test]
    fn test_on_page_field_is_valid() {
        let fields = [field(1, BrowserRect::new(10.0, 10.0, 150.0, 40.0))];
        let report = validate_positions(&fields, &pages());
        assert!(report.is_valid());
    }

    #[test]
    fn test_overhanging_field_reports_and_suggests() {
        let fields = [field(1, BrowserRect::new(500.0, 10.0, 150.0, 40.0))];
        let report = validate_positions(&fields, &pages());

        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.kind, ViolationKind::ExceedsPageWidth);
        assert_eq!(violation.suggestion, Some(PdfRect::new(450.0, 750.0, 150.0, 40.0)));
        assert_eq!(violation.to_string(), "Field f: exceeds page width");
    }

    #[test]
    fn test_field_below_page_bottom_is_negative() {
        let fields = [field(1, BrowserRect::new(0.0, 790.0, 150.0, 40.0))];
        let report = validate_positions(&fields, &pages());
        assert_eq!(report.violations[0].kind, ViolationKind::NegativeCoordinates);
    }

    #[test]
    fn test_field_above_page_top_exceeds_height() {
        // A negative browser y pushes the top edge past the PDF page height
        let fields = [field(1, BrowserRect::new(0.0, -20.0, 150.0, 40.0))];
        let report = validate_positions(&fields, &pages());
        assert_eq!(report.violations[0].kind, ViolationKind::ExceedsPageHeight);
    }

    #[test]
    fn test_unknown_page_reports_missing_dimensions() {
        let fields = [field(4, BrowserRect::new(0.0, 0.0, 150.0, 40.0))];
        let report = validate_positions(&fields, &pages());
        assert_eq!(report.violations[0].kind, ViolationKind::DimensionsMissing);
        assert!(report.violations[0].suggestion.is_none());
    }
}
