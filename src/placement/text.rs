//! Text field appearance: a bordered box with an optional one-line label

use lopdf::content::Operation;
use lopdf::{dictionary, Dictionary, Object, StringFormat};

use crate::config::TextStyle;
use crate::geometry::PdfRect;

/// Cap height of the standard sans fonts, in em.
const CAP_HEIGHT_EM: f64 = 0.718;

pub(crate) fn real(value: f64) -> Object {
    Object::Real((value as f32).into())
}

/// Type1 font dictionary for one of the standard 14 fonts.
pub(crate) fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// WinAnsi is a Latin-1 superset for printable text; anything outside
/// Latin-1 becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Black 1pt-style outline of `rect`, then `value` left-aligned at the
/// configured padding with its cap height centered in the box.
pub(crate) fn text_field_operations(
    rect: &PdfRect,
    value: Option<&str>,
    font_name: &[u8],
    style: &TextStyle,
) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new("RG", vec![real(0.0), real(0.0), real(0.0)]),
        Operation::new("w", vec![real(style.border_width)]),
        Operation::new(
            "re",
            vec![real(rect.x), real(rect.y), real(rect.width), real(rect.height)],
        ),
        Operation::new("S", vec![]),
    ];

    if let Some(text) = value.filter(|v| !v.is_empty()) {
        let baseline = rect.y + (rect.height - style.font_size * CAP_HEIGHT_EM) / 2.0;
        ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font_name.to_vec()), real(style.font_size)]),
            Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
            Operation::new("Td", vec![real(rect.x + style.padding), real(baseline)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    ops.push(Operation::new("Q", vec![]));
    ops
}
