//! Signature image decoding and embedding
//! Created: 2025-06-13
//!
//! The image is decoded exactly once per signing operation. Every signature
//! field then points at the same embedded XObject.

use std::fmt;
use std::io::Write;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use flate2::{write::ZlibEncoder, Compression};
use image::ImageFormat;
use lopdf::{dictionary, Document, ObjectId, Stream};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    /// Identifies the encoding from its magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(ImageEncoding::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(ImageEncoding::Jpeg)
        } else {
            None
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            ImageEncoding::Png => ImageFormat::Png,
            ImageEncoding::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageEncoding::Png => f.write_str("png"),
            ImageEncoding::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// A decoded signature, ready to be embedded as an image XObject.
#[derive(Clone)]
pub struct SignatureImage {
    encoding: ImageEncoding,
    width: u32,
    height: u32,
    /// Flate-compressed 8-bit RGB samples
    rgb: Vec<u8>,
    /// Flate-compressed 8-bit alpha, only when some pixel is not opaque
    alpha: Option<Vec<u8>>,
}

impl fmt::Debug for SignatureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureImage")
            .field("encoding", &self.encoding)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_alpha", &self.alpha.is_some())
            .finish()
    }
}

impl SignatureImage {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::decode("signature image is empty"));
        }
        let encoding = ImageEncoding::sniff(bytes)
            .ok_or_else(|| Error::decode("unsupported image encoding; use PNG or JPEG"))?;

        let rgba = image::load_from_memory_with_format(bytes, encoding.format())?.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::decode("signature image has no pixels"));
        }

        let pixels = (width * height) as usize;
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let translucent = alpha.iter().any(|&a| a != u8::MAX);

        debug!(
            "Decoded {} signature {}x{} (alpha: {})",
            encoding, width, height, translucent
        );

        Ok(Self {
            encoding,
            width,
            height,
            rgb: deflate(&rgb)?,
            alpha: if translucent { Some(deflate(&alpha)?) } else { None },
        })
    }

    /// Accepts plain base64 or a `data:image/...;base64,` URL.
    pub fn from_base64(data: &str) -> Result<Self> {
        Self::decode(&decode_base64_payload(data)?)
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Adds the image (and its soft mask) to `doc`, returning the image id.
    pub(crate) fn embed(&self, doc: &mut Document) -> ObjectId {
        let width = i64::from(self.width);
        let height = i64::from(self.height);

        let smask_id = self.alpha.as_ref().map(|alpha| {
            doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                alpha.clone(),
            ))
        });

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        if let Some(smask_id) = smask_id {
            dict.set("SMask", smask_id);
        }

        doc.add_object(Stream::new(dict, self.rgb.clone()))
    }
}

/// Strips an optional data-URL prefix and decodes the base64 body.
pub fn decode_base64_payload(data: &str) -> Result<Vec<u8>> {
    let data = data.trim();
    let body = match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, body)| body)
            .ok_or_else(|| Error::decode("data URL is not base64 encoded"))?,
        None => data,
    };
    B64.decode(body.as_bytes())
        .map_err(|e| Error::decode(format!("invalid base64 payload: {}", e)))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
