//! Shared fixtures for integration tests: generated PDFs, signature
//! images and content-stream readers.

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;

pub struct TestFixtures;

impl TestFixtures {
    /// Letter-sized document with `count` pages. Resources are inherited
    /// from the page tree and each page prints its own number.
    pub fn pdf_with_pages(count: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for number in 1..=count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", number))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => i64::from(count),
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    pub fn png(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 128, alpha]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([20, 20, 20]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(90))
            .unwrap();
        buf
    }
}

pub fn load(pdf: &[u8]) -> Document {
    Document::load_mem(pdf).unwrap()
}

pub fn page_id(doc: &Document, page_number: u32) -> ObjectId {
    doc.get_pages()[&page_number]
}

pub fn page_operations(doc: &Document, page_number: u32) -> Vec<Operation> {
    let content = doc.get_page_content(page_id(doc, page_number)).unwrap();
    Content::decode(&content).unwrap().operations
}

pub fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(v) => *v as f64,
        Object::Real(v) => f64::from(*v),
        other => panic!("not a number: {:?}", other),
    }
}

/// `cm` matrices that are immediately followed by `Do`, in page order.
pub fn image_matrices(doc: &Document, page_number: u32) -> Vec<[f64; 6]> {
    page_operations(doc, page_number)
        .windows(2)
        .filter(|pair| pair[0].operator == "cm" && pair[1].operator == "Do")
        .map(|pair| {
            let values: Vec<f64> = pair[0].operands.iter().map(number).collect();
            [values[0], values[1], values[2], values[3], values[4], values[5]]
        })
        .collect()
}

/// Strings shown with `Tj` on a page.
pub fn shown_text(doc: &Document, page_number: u32) -> Vec<Vec<u8>> {
    page_operations(doc, page_number)
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}

pub fn image_xobject_count(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            let name = |key: &[u8]| stream.dict.get(key).and_then(Object::as_name).ok();
            name(b"Subtype") == Some(b"Image".as_slice())
                && name(b"ColorSpace") == Some(b"DeviceRGB".as_slice())
        })
        .count()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}
