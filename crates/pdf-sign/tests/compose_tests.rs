mod common;

use common::{create_test_pdf, create_test_signature, page_content, write_test_pdf};
use lopdf::{Dictionary, Document, Object};
use pdf_sign::compose::get_page_size;
use pdf_sign::*;

fn signature() -> SignatureAsset {
    SignatureAsset::from_image(create_test_signature()).unwrap()
}

fn placement(page: usize, x: f64, y: f64) -> CommittedPlacement {
    CommittedPlacement {
        page,
        rect: RelativeRect::new(x, y, 0.2, 0.05),
    }
}

fn xobject_names(doc: &Document, page_index: usize) -> Vec<String> {
    let page_id = doc.get_pages()[&(page_index as u32 + 1)];
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    match resources.get(b"XObject") {
        Ok(obj) => obj
            .as_dict()
            .unwrap()
            .iter()
            .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn test_single_placement_on_letter_page() {
    let doc = create_test_pdf(1);
    let ledger: PlacementLedger = [placement(0, 0.1, 0.1)].into_iter().collect();

    let signed = sign_document(&doc, &signature(), &ledger).unwrap();
    let content = page_content(&signed, 0);

    assert!(
        content.contains("q 122.4000 0 0 39.6000 61.2000 673.2000 cm /Sig0 Do Q"),
        "unexpected content: {}",
        content
    );
    assert_eq!(xobject_names(&signed, 0), vec!["Sig0".to_string()]);
}

#[test]
fn test_original_content_is_preserved_and_wrapped() {
    let doc = create_test_pdf(1);
    let ledger: PlacementLedger = [placement(0, 0.5, 0.5)].into_iter().collect();

    let signed = sign_document(&doc, &signature(), &ledger).unwrap();
    let content = page_content(&signed, 0);

    let original = content.find("(Page 1) Tj").unwrap();
    let overlay = content.find("/Sig0 Do").unwrap();
    assert!(content.trim_start().starts_with('q'));
    assert!(original < overlay);
}

#[test]
fn test_only_touched_pages_change() {
    let doc = create_test_pdf(3);
    let ledger: PlacementLedger = [
        placement(0, 0.1, 0.1),
        placement(0, 0.5, 0.5),
        placement(2, 0.3, 0.7),
    ]
    .into_iter()
    .collect();

    let mut signed = doc.clone();
    let touched = sign_in_place(&mut signed, &signature(), &ledger).unwrap();
    assert_eq!(touched, vec![0, 2]);

    assert_eq!(page_content(&signed, 0).matches(" Do Q").count(), 2);
    assert_eq!(page_content(&signed, 2).matches(" Do Q").count(), 1);

    // Page 2 (index 1) still points at its original content stream
    let page_id = doc.get_pages()[&2];
    let contents = |d: &Document| {
        d.get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_reference()
            .unwrap()
    };
    assert_eq!(contents(&doc), contents(&signed));
    assert!(xobject_names(&signed, 1).is_empty());
    assert_eq!(page_content(&signed, 1), page_content(&doc, 1));
}

#[test]
fn test_signature_is_embedded_once_with_soft_mask() {
    let doc = create_test_pdf(2);
    let ledger: PlacementLedger = [placement(0, 0.1, 0.1), placement(1, 0.1, 0.1)]
        .into_iter()
        .collect();

    let signed = sign_document(&doc, &signature(), &ledger).unwrap();

    let images: Vec<&lopdf::Stream> = signed
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| s.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(&b"Image"[..]))
        .collect();

    // One RGB image plus its mask
    assert_eq!(images.len(), 2);
    let rgb = images
        .iter()
        .find(|s| s.dict.has(b"SMask"))
        .expect("image with soft mask");
    assert_eq!(rgb.dict.get(b"Width").unwrap().as_i64().unwrap(), 200);
    assert_eq!(rgb.dict.get(b"Height").unwrap().as_i64().unwrap(), 50);
}

#[test]
fn test_embedded_streams_match_image_size() {
    let mut doc = create_test_pdf(1);
    let image = image::RgbaImage::from_pixel(301, 7, image::Rgba([10, 20, 200, 128]));
    let asset = SignatureAsset::from_image(image).unwrap();

    let id = compose::embed_signature(&mut doc, &asset).unwrap();
    let rgb = doc.get_object(id).unwrap().as_stream().unwrap();
    let mask_id = rgb.dict.get(b"SMask").unwrap().as_reference().unwrap();
    let mask = doc.get_object(mask_id).unwrap().as_stream().unwrap();

    let rgb_bytes = rgb.decompressed_content().unwrap();
    let mask_bytes = mask.decompressed_content().unwrap();
    assert_eq!(rgb_bytes.len(), 301 * 7 * 3);
    assert_eq!(mask_bytes.len(), 301 * 7);
    assert_eq!(&rgb_bytes[..3], &[10, 20, 200]);
    assert!(mask_bytes.iter().all(|&a| a == 128));
}

#[test]
fn test_name_clash_with_existing_xobject() {
    let mut doc = create_test_pdf(1);
    let page_id = doc.get_pages()[&1];
    let existing = doc.add_object(Dictionary::new());
    let mut xobjects = Dictionary::new();
    xobjects.set("Sig0", Object::Reference(existing));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));
    doc.get_object_mut(page_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set("Resources", Object::Dictionary(resources));

    let ledger: PlacementLedger = [placement(0, 0.1, 0.1)].into_iter().collect();
    let signed = sign_document(&doc, &signature(), &ledger).unwrap();

    let mut names = xobject_names(&signed, 0);
    names.sort();
    assert_eq!(names, vec!["Sig0".to_string(), "Sig1".to_string()]);
    assert!(page_content(&signed, 0).contains("/Sig1 Do"));
}

#[test]
fn test_inherited_media_box() {
    let mut doc = create_test_pdf(1);
    let page_id = doc.get_pages()[&1];
    let pages_id = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Parent")
        .unwrap()
        .as_reference()
        .unwrap();

    doc.get_object_mut(page_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .remove(b"MediaBox");
    doc.get_object_mut(pages_id)
        .unwrap()
        .as_dict_mut()
        .unwrap()
        .set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        );

    let size = get_page_size(&doc, page_id).unwrap();
    assert_eq!((size.width, size.height), (595.0, 842.0));
}

#[test]
fn test_empty_ledger_is_rejected() {
    let doc = create_test_pdf(1);
    let result = sign_document(&doc, &signature(), &PlacementLedger::new());
    assert!(matches!(result, Err(SignError::EmptyLedger)));
}

#[test]
fn test_out_of_range_page_leaves_document_untouched() {
    let doc = create_test_pdf(2);
    let ledger: PlacementLedger = [placement(0, 0.1, 0.1), placement(5, 0.1, 0.1)]
        .into_iter()
        .collect();

    let mut signed = doc.clone();
    let result = sign_in_place(&mut signed, &signature(), &ledger);
    assert!(matches!(
        result,
        Err(SignError::PageOutOfRange { page: 5, count: 2 })
    ));
    assert_eq!(signed.objects.len(), doc.objects.len());
}

#[test]
fn test_write_pdf_atomic_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("signed.pdf");

    let doc = create_test_pdf(2);
    let ledger: PlacementLedger = [placement(1, 0.6, 0.8)].into_iter().collect();
    let mut signed = sign_document(&doc, &signature(), &ledger).unwrap();
    write_pdf_atomic(&mut signed, &output).unwrap();

    let reloaded = read_pdf(&output).unwrap();
    assert_eq!(reloaded.get_pages().len(), 2);
    assert!(page_content(&reloaded, 1).contains("/Sig0 Do"));

    // No stray temporary files next to the output
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_failed_write_leaves_no_temporary_file() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be replaced by a file
    let target = dir.path().join("taken.pdf");
    std::fs::create_dir(&target).unwrap();

    let mut doc = create_test_pdf(1);
    let result = write_pdf_atomic(&mut doc, &target);
    assert!(matches!(result, Err(SignError::ExportIo(_))));
    assert!(target.is_dir());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_read_pdf_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"not a pdf").unwrap();
    assert!(matches!(read_pdf(&path), Err(SignError::DocumentLoad(_))));

    let missing = dir.path().join("missing.pdf");
    assert!(matches!(read_pdf(&missing), Err(SignError::DocumentLoad(_))));
}

#[tokio::test]
async fn test_async_load_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    let output = dir.path().join("output.pdf");
    write_test_pdf(4, &input);

    let doc = load_pdf(&input).await.unwrap();
    assert_eq!(doc.get_pages().len(), 4);

    save_pdf(doc, &output).await.unwrap();
    let reloaded = load_pdf(&output).await.unwrap();
    assert_eq!(reloaded.get_pages().len(), 4);
}
