//! Overlay stamping for a single page
//!
//! The original content is wrapped in `q … Q` so any graphics state it
//! leaves behind cannot leak into the overlay, then one content stream
//! with every signature on the page is appended after it.

use crate::layout::{PointRect, RelativeRect};
use crate::types::{PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::{inherited_attribute, resolve};

/// Stamp `rects` (already in PDF points) onto a page using the image XObject `image_id`.
pub fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    image_id: ObjectId,
    rects: &[PointRect],
) -> Result<()> {
    let mut resources = page_resources(doc, page_id)?;
    let mut xobjects = match resources.get(b"XObject") {
        Ok(obj) => resolve(doc, obj)?.as_dict().cloned().unwrap_or_default(),
        Err(_) => Dictionary::new(),
    };

    let name = unique_name(&xobjects, "Sig");
    xobjects.set(name.as_bytes(), Object::Reference(image_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let overlay: String = rects
        .iter()
        .map(|rect| generate_placement_command(&name, rect))
        .collect();

    let original = page_content_refs(doc, page_id)?;
    let mut contents = Vec::with_capacity(original.len() + 2);
    if !original.is_empty() {
        let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(open_id));
        contents.extend(original);
        let close = format!("Q\n{}", overlay);
        let close_id = doc.add_object(Stream::new(Dictionary::new(), close.into_bytes()));
        contents.push(Object::Reference(close_id));
    } else {
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay.into_bytes()));
        contents.push(Object::Reference(overlay_id));
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));

    Ok(())
}

/// Convert every rect for a page to points in placement order.
pub fn page_rects<'a>(
    size: &PageSize,
    rects: impl IntoIterator<Item = &'a RelativeRect>,
) -> Vec<PointRect> {
    rects.into_iter().map(|r| r.to_points(size)).collect()
}

/// A page-local copy of the (possibly inherited or shared) resources.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    match inherited_attribute(doc, page_id, b"Resources") {
        Some(obj) => Ok(resolve(doc, obj)?.as_dict().cloned().unwrap_or_default()),
        None => Ok(Dictionary::new()),
    }
}

/// The page's content streams as a list of objects, in drawing order.
fn page_content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let contents = match page.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            // An indirect array of streams
            Object::Array(arr) => Ok(arr.clone()),
            _ => Ok(vec![Object::Reference(*id)]),
        },
        Object::Array(arr) => Ok(arr.clone()),
        _ => Ok(Vec::new()),
    }
}

/// Pick a resource name not already used in `dict`.
fn unique_name(dict: &Dictionary, prefix: &str) -> String {
    (0..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|name| !dict.has(name.as_bytes()))
        .unwrap_or_else(|| prefix.to_string())
}

/// Generate the PDF content stream command to draw the image in `rect`.
fn generate_placement_command(xobject_name: &str, rect: &PointRect) -> String {
    format!(
        "q {:.4} 0 0 {:.4} {:.4} {:.4} cm /{} Do Q\n",
        rect.width, rect.height, rect.x, rect.y, xobject_name
    )
}
