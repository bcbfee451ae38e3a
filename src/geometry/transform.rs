//! Browser ⇄ PDF coordinate transformation
//! Created: 2025-06-11
//!
//! Pure functions. Callers guarantee positive dimensions on both sides;
//! nothing here validates or divides defensively.

use super::{BrowserRect, PdfDimensions, PdfRect, RenderedDimensions};

/// Per-axis scale factor between the two spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportScale {
    pub x: f64,
    pub y: f64,
}

impl ViewportScale {
    /// How many PDF points one rendered pixel covers.
    pub fn points_per_pixel(pdf: PdfDimensions, rendered: RenderedDimensions) -> Self {
        Self {
            x: pdf.width / rendered.width,
            y: pdf.height / rendered.height,
        }
    }

    /// How many rendered pixels one PDF point covers.
    pub fn pixels_per_point(pdf: PdfDimensions, rendered: RenderedDimensions) -> Self {
        Self {
            x: rendered.width / pdf.width,
            y: rendered.height / pdf.height,
        }
    }
}

/// Maps a browser rectangle onto the page in PDF points.
///
/// The Y axis is flipped and the origin moves from the top edge to the
/// bottom edge, so the rectangle's bottom edge becomes its PDF `y`.
pub fn browser_to_pdf(
    rect: &BrowserRect,
    pdf: PdfDimensions,
    rendered: RenderedDimensions,
) -> PdfRect {
    let scale = ViewportScale::points_per_pixel(pdf, rendered);

    PdfRect {
        x: rect.x * scale.x,
        y: pdf.height - (rect.y + rect.height) * scale.y,
        width: rect.width * scale.x,
        height: rect.height * scale.y,
    }
}

/// Exact algebraic inverse of [`browser_to_pdf`].
pub fn pdf_to_browser(
    rect: &PdfRect,
    pdf: PdfDimensions,
    rendered: RenderedDimensions,
) -> BrowserRect {
    let scale = ViewportScale::pixels_per_point(pdf, rendered);

    BrowserRect {
        x: rect.x * scale.x,
        y: (pdf.height - rect.y - rect.height) * scale.y,
        width: rect.width * scale.x,
        height: rect.height * scale.y,
    }
}

fn clamp_axis(origin: f64, extent: f64, bound: f64) -> f64 {
    // max after min: an oversized rect still lands at 0
    origin.min(bound - extent).max(0.0)
}

/// Pulls a browser rectangle fully onto a rendered page.
pub fn clamp_browser(rect: &BrowserRect, bounds: RenderedDimensions) -> BrowserRect {
    BrowserRect {
        x: clamp_axis(rect.x, rect.width, bounds.width),
        y: clamp_axis(rect.y, rect.height, bounds.height),
        width: rect.width.min(bounds.width),
        height: rect.height.min(bounds.height),
    }
}

/// Pulls a PDF rectangle fully onto the page.
pub fn clamp_pdf(rect: &PdfRect, bounds: PdfDimensions) -> PdfRect {
    PdfRect {
        x: clamp_axis(rect.x, rect.width, bounds.width),
        y: clamp_axis(rect.y, rect.height, bounds.height),
        width: rect.width.min(bounds.width),
        height: rect.height.min(bounds.height),
    }
}
