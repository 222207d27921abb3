//! Image XObject creation and page attribute lookup
//!
//! The signature is embedded once per document as a DeviceRGB image with
//! a DeviceGray soft mask carrying its alpha channel, then referenced from
//! every page that carries a placement.

use crate::asset::SignatureAsset;
use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::{PageSize, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

/// Guard against cyclic `Parent` chains in malformed page trees
const MAX_TREE_DEPTH: usize = 64;

// =============================================================================
// Image XObject
// =============================================================================

/// Add the signature to `doc` as an Image XObject with an alpha soft mask.
pub fn embed_signature(doc: &mut Document, signature: &SignatureAsset) -> Result<ObjectId> {
    let image = signature.image();
    let (width, height) = image.dimensions();

    let pixel_count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let smask_dict = image_dict(width, height, "DeviceGray");
    let smask_id = doc.add_object(Stream::new(smask_dict, deflate(&alpha)?).with_compression(false));

    let mut dict = image_dict(width, height, "DeviceRGB");
    dict.set("SMask", Object::Reference(smask_id));
    Ok(doc.add_object(Stream::new(dict, deflate(&rgb)?).with_compression(false)))
}

fn image_dict(width: u32, height: u32, color_space: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, following `Parent` links for inheritable keys.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }

    None
}

/// Follow a single reference, if `obj` is one.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        _ => Ok(obj),
    }
}

/// Get a page's media box in points. Falls back to US Letter.
pub fn get_page_size(doc: &Document, page_id: ObjectId) -> Result<PageSize> {
    let media_box = match inherited_attribute(doc, page_id, b"MediaBox") {
        Some(obj) => resolve(doc, obj)?.as_array().ok(),
        None => None,
    };

    let corners = media_box
        .filter(|mb| mb.len() >= 4)
        .and_then(|mb| {
            Some((
                extract_number(resolve(doc, &mb[0]).ok()?)?,
                extract_number(resolve(doc, &mb[1]).ok()?)?,
                extract_number(resolve(doc, &mb[2]).ok()?)?,
                extract_number(resolve(doc, &mb[3]).ok()?)?,
            ))
        });

    Ok(match corners {
        Some((x0, y0, x1, y1)) => PageSize {
            origin_x: x0.min(x1),
            origin_y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        },
        None => PageSize::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1),
    })
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
