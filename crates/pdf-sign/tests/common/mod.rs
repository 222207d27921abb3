#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;

pub fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    // Create pages array
    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // Create pages dict
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn write_test_pdf(num_pages: usize, path: &Path) {
    let mut doc = create_test_pdf(num_pages);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(path, writer).unwrap();
}

/// A 200×50 dark stroke on white paper
pub fn create_test_signature() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(200, 50, Rgba([250, 250, 245, 255]));
    for x in 20..180 {
        for y in 20..30 {
            image.put_pixel(x, y, Rgba([20, 20, 30, 255]));
        }
    }
    image
}

/// Concatenated, decompressed content of a page
pub fn page_content(doc: &Document, page_index: usize) -> String {
    let page_id = doc.get_pages()[&(page_index as u32 + 1)];
    let bytes = doc.get_page_content(page_id).unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
