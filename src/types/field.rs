//! Field model: what the editor places and what the signer consumes
//! Created: 2025-06-11

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{BrowserRect, PdfRect, Point, Size};

/// Default size of a freshly dropped field, in pixels.
pub const DEFAULT_FIELD_SIZE: Size = Size::new(150.0, 40.0);

/// Resize floors, in pixels.
pub const MIN_FIELD_WIDTH: f64 = 50.0;
pub const MIN_FIELD_HEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Signature,
    Image,
    Date,
    Radio,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Text,
        FieldType::Signature,
        FieldType::Image,
        FieldType::Date,
        FieldType::Radio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Signature => "signature",
            FieldType::Image => "image",
            FieldType::Date => "date",
            FieldType::Radio => "radio",
        }
    }

    pub fn is_signature(&self) -> bool {
        matches!(self, FieldType::Signature)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field type: {}", s))
    }
}

/// Opaque, stable field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("field-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A field as the editor holds it, in browser pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 1-indexed
    pub page_number: u32,
    #[serde(flatten)]
    pub rect: BrowserRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Field {
    pub fn new(id: FieldId, field_type: FieldType, page_number: u32, rect: BrowserRect) -> Self {
        Self {
            id,
            field_type,
            page_number,
            rect,
            value: None,
        }
    }

    /// Creates a field of `size` centered on a drop point, kept off the
    /// negative side of the viewport.
    pub fn dropped_at(field_type: FieldType, page_number: u32, drop: Point, size: Size) -> Self {
        let rect = BrowserRect::new(
            (drop.x - size.width / 2.0).max(0.0),
            (drop.y - size.height / 2.0).max(0.0),
            size.width,
            size.height,
        );
        Self::new(FieldId::generate(), field_type, page_number, rect)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A field translated into PDF space, ready for placement.
///
/// This is the only field shape that crosses the signing boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedField {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub page_number: u32,
    pub coordinates: PdfRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl PreparedField {
    pub fn new(id: FieldId, field_type: FieldType, page_number: u32, coordinates: PdfRect) -> Self {
        Self {
            id,
            field_type,
            page_number,
            coordinates,
            value: None,
        }
    }
}
