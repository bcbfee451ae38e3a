//! Per-page geometry captured from page load and render callbacks

use std::collections::BTreeMap;

use tracing::trace;

use crate::geometry::{PageGeometry, PdfDimensions, RenderedDimensions};
use crate::preparer::GeometryLookup;

#[derive(Debug, Clone, Copy, Default)]
struct CachedPage {
    pdf: Option<PdfDimensions>,
    rendered: Option<RenderedDimensions>,
}

/// Geometry cache owned by one editor session.
///
/// PDF dimensions never change for a loaded document. Rendered dimensions
/// are tied to a zoom level and are dropped by [`GeometryCache::invalidate_rendered`]
/// until the page is rendered again.
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    pages: BTreeMap<u32, CachedPage>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pdf_dimensions(&mut self, page_number: u32, dims: PdfDimensions) {
        trace!("Page {} PDF size {}×{}", page_number, dims.width, dims.height);
        self.pages.entry(page_number).or_default().pdf = Some(dims);
    }

    pub fn record_rendered(&mut self, page_number: u32, dims: RenderedDimensions) {
        trace!("Page {} rendered at {}×{}", page_number, dims.width, dims.height);
        self.pages.entry(page_number).or_default().rendered = Some(dims);
    }

    /// Marks every rendered size stale, e.g. after a zoom change.
    pub fn invalidate_rendered(&mut self) {
        for page in self.pages.values_mut() {
            page.rendered = None;
        }
    }

    pub fn pdf_dimensions(&self, page_number: u32) -> Option<PdfDimensions> {
        self.pages.get(&page_number).and_then(|p| p.pdf)
    }

    pub fn rendered_dimensions(&self, page_number: u32) -> Option<RenderedDimensions> {
        self.pages.get(&page_number).and_then(|p| p.rendered)
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Snapshot of every page with complete geometry.
    pub fn snapshot(&self) -> BTreeMap<u32, PageGeometry> {
        self.pages
            .keys()
            .filter_map(|&page| self.page_geometry(page).map(|g| (page, g)))
            .collect()
    }
}

impl GeometryLookup for GeometryCache {
    fn page_geometry(&self, page_number: u32) -> Option<PageGeometry> {
        let page = self.pages.get(&page_number)?;
        Some(PageGeometry::new(page.pdf?, page.rendered?))
    }
}
