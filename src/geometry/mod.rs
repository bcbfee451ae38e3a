//! Geometry primitives for field placement
//! Created: 2025-06-11
//!
//! Two coordinate spaces meet here. Browser space is measured in pixels
//! from the top-left corner of the rendered page raster, with Y growing
//! downward. PDF space is measured in points (1/72 inch) from the
//! bottom-left corner of the page, with Y growing upward.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod containment;
pub mod transform;

pub use containment::Containment;
pub use transform::{browser_to_pdf, clamp_browser, clamp_pdf, pdf_to_browser, ViewportScale};

/// Intrinsic page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfDimensions {
    pub width: f64,
    pub height: f64,
}

/// On-screen size of the page raster in pixels at the current zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedDimensions {
    pub width: f64,
    pub height: f64,
}

impl PdfDimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl RenderedDimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A pointer position in browser pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in browser pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Field rectangle in browser pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BrowserRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Field rectangle in PDF points, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BrowserRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Converts into PDF space for the given page geometry.
    pub fn to_pdf(&self, geometry: &PageGeometry) -> PdfRect {
        browser_to_pdf(self, geometry.pdf, geometry.rendered)
    }
}

impl PdfRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Converts back into browser space for the given page geometry.
    pub fn to_browser(&self, geometry: &PageGeometry) -> BrowserRect {
        pdf_to_browser(self, geometry.pdf, geometry.rendered)
    }
}

fn write_rect(f: &mut fmt::Formatter<'_>, x: f64, y: f64, w: f64, h: f64) -> fmt::Result {
    write!(f, "({:.2}, {:.2}) [{:.2} × {:.2}]", x, y, w, h)
}

impl fmt::Display for BrowserRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rect(f, self.x, self.y, self.width, self.height)
    }
}

impl fmt::Display for PdfRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rect(f, self.x, self.y, self.width, self.height)
    }
}

/// The (PDF size, rendered size) pair captured for one page.
///
/// Only valid for the zoom level it was captured at; a re-render at a
/// different scale must refresh `rendered` before any conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub pdf: PdfDimensions,
    pub rendered: RenderedDimensions,
}

impl PageGeometry {
    pub const fn new(pdf: PdfDimensions, rendered: RenderedDimensions) -> Self {
        Self { pdf, rendered }
    }

    pub fn is_usable(&self) -> bool {
        self.pdf.is_positive() && self.rendered.is_positive()
    }
}
