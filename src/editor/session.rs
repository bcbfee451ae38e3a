//! Editor session: fields, selection, gestures and page geometry
//! Created: 2025-06-12
//!
//! Everything the placement UI mutates lives on one session value, driven
//! by discrete events. Nothing is global, so sessions for different
//! documents never share geometry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::geometry::{BrowserRect, PdfDimensions, Point, RenderedDimensions, Size};
use crate::preparer::{FieldPreparer, Preparation};
use crate::types::{Field, FieldId, FieldType};

use super::geometry_cache::GeometryCache;
use super::gesture::Gesture;
use super::validation::{validate_positions, PositionReport};

/// Field counts shown next to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_fields: usize,
    pub fields_on_current_page: usize,
    pub signature_fields: usize,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    config: EditorConfig,
    page_count: Option<u32>,
    current_page: u32,
    zoom: f64,
    fields: Vec<Field>,
    selected: Option<FieldId>,
    gesture: Gesture,
    geometry: GeometryCache,
}

impl EditorSession {
    /// Fails with a config error when the bounds are unusable, e.g. an
    /// inverted or NaN zoom range.
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EditorConfig) -> Self {
        Self {
            config,
            page_count: None,
            current_page: 1,
            zoom: 1.0,
            fields: Vec::new(),
            selected: None,
            gesture: Gesture::Idle,
            geometry: GeometryCache::new(),
        }
    }

    /// Starts over on a new document: no fields, no geometry, first page.
    #[instrument(skip(self))]
    pub fn open_document(&mut self, page_count: u32) {
        info!("Opened document with {} pages", page_count);
        self.page_count = Some(page_count);
        self.current_page = 1;
        self.fields.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.geometry.clear();
    }

    // ---------------------------------------------------------------
    // Pages, zoom and geometry
    // ---------------------------------------------------------------

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn go_to_page(&mut self, page: u32) -> Result<()> {
        let page_count = self.page_count.ok_or(EditorError::NoDocument)?;
        if page == 0 || page > page_count {
            return Err(EditorError::PageOutOfRange { page, page_count }.into());
        }
        self.current_page = page;
        Ok(())
    }

    pub fn next_page(&mut self) -> Result<()> {
        let page_count = self.page_count.ok_or(EditorError::NoDocument)?;
        self.go_to_page((self.current_page + 1).min(page_count))
    }

    pub fn previous_page(&mut self) -> Result<()> {
        self.go_to_page(self.current_page.saturating_sub(1).max(1))
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level within the configured bounds. A change
    /// invalidates every rendered size until its page renders again.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.zoom;
        }
        // one decimal, like the zoom buttons
        let rounded = (zoom * 10.0).round() / 10.0;
        let clamped = rounded.clamp(self.config.min_zoom, self.config.max_zoom);
        if (clamped - self.zoom).abs() > f64::EPSILON {
            debug!("Zoom {} -> {}; rendered geometry is stale", self.zoom, clamped);
            self.zoom = clamped;
            self.geometry.invalidate_rendered();
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.config.zoom_step)
    }

    /// Page load callback: intrinsic size in points.
    pub fn record_page_loaded(&mut self, page: u32, dims: PdfDimensions) {
        self.geometry.record_pdf_dimensions(page, dims);
    }

    /// Render callback: on-screen size at the current zoom.
    pub fn record_page_rendered(&mut self, page: u32, dims: RenderedDimensions) {
        self.geometry.record_rendered(page, dims);
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    // ---------------------------------------------------------------
    // Field lifecycle
    // ---------------------------------------------------------------

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn fields_on_page(&self, page: u32) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.page_number == page)
    }

    pub fn selected(&self) -> Option<&FieldId> {
        self.selected.as_ref()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Drop handler: creates an unselected field on the current page,
    /// centered on `point`.
    pub fn drop_field(&mut self, field_type: FieldType, point: Point) -> Result<FieldId> {
        if self.page_count.is_none() {
            return Err(EditorError::NoDocument.into());
        }
        let size = self.config.default_field_size();
        let field = Field::dropped_at(field_type, self.current_page, point, size);
        let id = field.id.clone();
        debug!(
            "Dropped {} field {} on page {} at {}",
            field_type, id, field.page_number, field.rect
        );
        self.fields.push(field);
        Ok(id)
    }

    /// Adds an already-built field, e.g. one restored from storage.
    pub fn insert_field(&mut self, field: Field) -> Result<FieldId> {
        let page_count = self.page_count.ok_or(EditorError::NoDocument)?;
        if field.page_number == 0 || field.page_number > page_count {
            return Err(EditorError::PageOutOfRange { page: field.page_number, page_count }.into());
        }
        if self.field(&field.id).is_some() {
            return Err(EditorError::DuplicateField(field.id).into());
        }
        let id = field.id.clone();
        self.fields.push(field);
        Ok(id)
    }

    pub fn set_value(&mut self, id: &FieldId, value: Option<String>) -> Result<()> {
        self.field_mut(id)?.value = value;
        Ok(())
    }

    /// Click on a field: it becomes the only selected one. A gesture on
    /// any other field ends here.
    pub fn select(&mut self, id: &FieldId) -> Result<()> {
        self.field_mut(id)?;
        if self.gesture.field().is_some_and(|target| target != id) {
            debug!("Selection moved to {}; gesture cancelled", id);
            self.gesture = Gesture::Idle;
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Click on empty page area. Also ends any gesture.
    pub fn deselect_all(&mut self) {
        self.selected = None;
        self.gesture = Gesture::Idle;
    }

    pub fn delete(&mut self, id: &FieldId) -> Result<Field> {
        let index = self
            .fields
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| EditorError::UnknownField(id.clone()))?;

        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.gesture.field() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        Ok(self.fields.remove(index))
    }

    /// Bulk clear: every field, the selection and any gesture.
    pub fn clear(&mut self) -> usize {
        let removed = self.fields.len();
        self.fields.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        removed
    }

    // ---------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------

    pub fn begin_drag(&mut self, id: &FieldId, pointer: Point) -> Result<()> {
        let rect = self.gesture_target(id)?;
        self.gesture = Gesture::drag(id.clone(), pointer, &rect);
        Ok(())
    }

    pub fn begin_resize(&mut self, id: &FieldId, pointer: Point) -> Result<()> {
        let rect = self.gesture_target(id)?;
        self.gesture = Gesture::resize(id.clone(), pointer, &rect);
        Ok(())
    }

    /// Pointer move: updates the field under the active gesture, if any.
    pub fn pointer_moved(&mut self, pointer: Point) -> Option<&Field> {
        let id = self.gesture.field()?.clone();
        let min = Size::new(self.config.min_field_width, self.config.min_field_height);
        let gesture = self.gesture.clone();

        let field = self.fields.iter_mut().find(|f| f.id == id)?;
        gesture.apply(pointer, &mut field.rect, min);
        Some(&*field)
    }

    /// Pointer up: ends whatever gesture was running.
    pub fn pointer_released(&mut self) {
        self.gesture = Gesture::Idle;
    }

    fn gesture_target(&self, id: &FieldId) -> Result<BrowserRect> {
        if !self.gesture.is_idle() {
            return Err(EditorError::GestureInProgress.into());
        }
        let field = self.field(id).ok_or_else(|| EditorError::UnknownField(id.clone()))?;
        if self.selected.as_ref() != Some(id) {
            return Err(EditorError::NotSelected(id.clone()).into());
        }
        Ok(field.rect)
    }

    fn field_mut(&mut self, id: &FieldId) -> Result<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| EditorError::UnknownField(id.clone()).into())
    }

    // ---------------------------------------------------------------
    // Reporting and hand-off
    // ---------------------------------------------------------------

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_fields: self.fields.len(),
            fields_on_current_page: self.fields_on_page(self.current_page).count(),
            signature_fields: self.signature_field_count(),
        }
    }

    pub fn signature_field_count(&self) -> usize {
        self.fields.iter().filter(|f| f.field_type.is_signature()).count()
    }

    pub fn validate_positions(&self) -> PositionReport {
        validate_positions(&self.fields, &self.geometry)
    }

    /// Converts all fields into PDF space with the current geometry.
    pub fn prepare(&self) -> Preparation {
        FieldPreparer::new(&self.geometry).prepare(&self.fields)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_valid_config(EditorConfig::default())
    }
}
