//! Placement engine: stamps prepared fields onto a PDF
//! Created: 2025-06-13
//!
//! Fields are processed in order. A field whose page does not exist is
//! skipped with a [`FieldIssue`]; anything wrong with the document or the
//! image aborts the whole placement and nothing is returned.

use std::collections::{HashMap, HashSet};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{SigningConfig, TextStyle};
use crate::error::Result;
use crate::geometry::{Containment, PdfRect};
use crate::types::{FieldId, FieldIssue, FieldType, IssueKind, PreparedField};

use super::image::SignatureImage;
use super::resources::{isolate_existing_content, register_resource};
use super::text::{font_dictionary, real, text_field_operations};

const IMAGE_RESOURCE_NAME: &str = "SigImg";
const FONT_RESOURCE_NAME: &str = "SigFont";

/// Output of one placement run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Serialized PDF with every placed field
    #[serde(skip)]
    pub document: Vec<u8>,
    /// Signature fields that were stamped, in request order
    pub placed: Vec<FieldId>,
    pub text_fields_rendered: usize,
    pub issues: Vec<FieldIssue>,
}

impl Placement {
    pub fn fields_processed(&self) -> usize {
        self.placed.len()
    }
}

#[derive(Debug, Clone)]
pub struct PlacementEngine {
    text: TextStyle,
    render_text_fields: bool,
}

/// Per-run state: the embedded objects and which pages were touched.
#[derive(Default)]
struct PlacementState {
    image: Option<ObjectId>,
    font: Option<ObjectId>,
    isolated: HashSet<ObjectId>,
    names: HashMap<(ObjectId, ObjectId), Vec<u8>>,
}

impl PlacementEngine {
    pub fn new(config: &SigningConfig) -> Self {
        Self {
            text: config.text.clone(),
            render_text_fields: config.render_text_fields,
        }
    }

    fn draws(&self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::Signature => true,
            FieldType::Text => self.render_text_fields,
            _ => false,
        }
    }

    #[instrument(skip_all, fields(fields = fields.len()))]
    pub fn place(
        &self,
        document: &[u8],
        image: &SignatureImage,
        fields: &[PreparedField],
    ) -> Result<Placement> {
        let mut doc = Document::load_mem(document)?;
        let pages: Vec<ObjectId> = doc.page_iter().collect();
        debug!("Loaded document with {} pages", pages.len());

        let mut state = PlacementState::default();
        let mut placement = Placement::default();

        for field in fields {
            if !self.draws(field.field_type) {
                debug!("Field {} ({}) has no appearance; skipped", field.id, field.field_type);
                continue;
            }

            let page_id = match (field.page_number as usize)
                .checked_sub(1)
                .and_then(|index| pages.get(index))
            {
                Some(&id) => id,
                None => {
                    let issue = FieldIssue::new(
                        field.id.clone(),
                        field.page_number,
                        IssueKind::PageOutOfRange,
                    );
                    warn!("Skipping {}; document has {} pages", issue, pages.len());
                    placement.issues.push(issue);
                    continue;
                }
            };

            if state.isolated.insert(page_id) {
                isolate_existing_content(&mut doc, page_id)?;
            }

            let operations = if field.field_type.is_signature() {
                let xobject = *state.image.get_or_insert_with(|| image.embed(&mut doc));
                let name = state.resource_name(
                    &mut doc,
                    page_id,
                    "XObject",
                    IMAGE_RESOURCE_NAME,
                    xobject,
                )?;
                image_operations(&name, image.width(), image.height(), &field.coordinates)
            } else {
                let font = *state
                    .font
                    .get_or_insert_with(|| doc.add_object(font_dictionary(&self.text.font)));
                let name =
                    state.resource_name(&mut doc, page_id, "Font", FONT_RESOURCE_NAME, font)?;
                text_field_operations(&field.coordinates, field.value.as_deref(), &name, &self.text)
            };

            let content = Content { operations }.encode()?;
            doc.add_page_contents(page_id, content)?;

            if field.field_type.is_signature() {
                info!(
                    "Placed signature {} on page {} at {}",
                    field.id, field.page_number, field.coordinates
                );
                placement.placed.push(field.id.clone());
            } else {
                placement.text_fields_rendered += 1;
            }
        }

        doc.save_to(&mut placement.document)?;
        info!(
            "Placement done: {} signatures, {} text fields, {} skipped",
            placement.placed.len(),
            placement.text_fields_rendered,
            placement.issues.len()
        );
        Ok(placement)
    }
}

impl PlacementState {
    fn resource_name(
        &mut self,
        doc: &mut Document,
        page_id: ObjectId,
        category: &str,
        base_name: &str,
        target: ObjectId,
    ) -> Result<Vec<u8>> {
        if let Some(name) = self.names.get(&(page_id, target)) {
            return Ok(name.clone());
        }
        let name = register_resource(doc, page_id, category, base_name, target)?;
        self.names.insert((page_id, target), name.clone());
        Ok(name)
    }
}

/// `q w 0 0 h x y cm /name Do Q` with the image contained in `field`.
fn image_operations(
    name: &[u8],
    image_width: u32,
    image_height: u32,
    field: &PdfRect,
) -> Vec<Operation> {
    let fit = Containment::fit(f64::from(image_width), f64::from(image_height), field);
    let (x, y) = fit.origin(field);

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                real(fit.draw_width),
                real(0.0),
                real(0.0),
                real(fit.draw_height),
                real(x),
                real(y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operand(op: &Operation, index: usize) -> f64 {
        match op.operands[index] {
            Object::Real(v) => f64::from(v),
            Object::Integer(v) => v as f64,
            ref other => panic!("not a number: {:?}", other),
        }
    }

    #[test]
    fn test_image_operations_are_self_contained() {
        let ops = image_operations(b"SigImg", 200, 100, &PdfRect::new(100.0, 500.0, 100.0, 100.0));

        let names: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(names, ["q", "cm", "Do", "Q"]);

        let cm = &ops[1];
        assert_eq!(operand(cm, 0), 100.0);
        assert_eq!(operand(cm, 3), 50.0);
        assert_eq!(operand(cm, 4), 100.0);
        assert_eq!(operand(cm, 5), 525.0);
    }

    #[test]
    fn test_only_signature_and_text_fields_draw() {
        let engine = PlacementEngine::new(&SigningConfig::default());
        assert!(engine.draws(FieldType::Signature));
        assert!(engine.draws(FieldType::Text));
        assert!(!engine.draws(FieldType::Date));

        let config = SigningConfig {
            render_text_fields: false,
            ..SigningConfig::default()
        };
        assert!(!PlacementEngine::new(&config).draws(FieldType::Text));
    }
}
