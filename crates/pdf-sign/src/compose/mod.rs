//! PDF compositing - stamping signatures onto pages
//!
//! This module turns a ledger of relative placements into a signed document:
//! 1. Group placements by page
//! 2. Embed the signature image once
//! 3. Convert each placement to PDF points using the page's media box
//! 4. Append an overlay content stream to each touched page
//!
//! Pages without placements are left exactly as they were.

mod io;
mod page;
mod xobject;

pub use io::{load_pdf, page_sizes, read_pdf, save_pdf, write_pdf_atomic};
pub use xobject::{embed_signature, get_page_size};

use crate::asset::SignatureAsset;
use crate::placement::PlacementLedger;
use crate::types::*;
use lopdf::{Document, ObjectId};
use page::{page_rects, stamp_page};

/// Return a copy of `source` with every placement in `ledger` stamped on it.
///
/// Nothing is modified unless every placement refers to an existing page.
pub fn sign_document(
    source: &Document,
    signature: &SignatureAsset,
    ledger: &PlacementLedger,
) -> Result<Document> {
    let mut doc = source.clone();
    sign_in_place(&mut doc, signature, ledger)?;
    Ok(doc)
}

/// Stamp `ledger` onto `doc`, returning the zero-based pages that changed.
pub fn sign_in_place(
    doc: &mut Document,
    signature: &SignatureAsset,
    ledger: &PlacementLedger,
) -> Result<Vec<usize>> {
    if ledger.is_empty() {
        return Err(SignError::EmptyLedger);
    }

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    let groups = ledger.group_by_page();

    if let Some(&last) = groups.keys().next_back() {
        if last >= page_ids.len() {
            return Err(SignError::PageOutOfRange {
                page: last,
                count: page_ids.len(),
            });
        }
    }

    let image_id = embed_signature(doc, signature)?;

    for (&page_index, placements) in &groups {
        let page_id = page_ids[page_index];
        let size = get_page_size(doc, page_id)?;
        let rects = page_rects(&size, placements.iter().map(|p| &p.rect));
        stamp_page(doc, page_id, image_id, &rects)?;
        log::debug!(
            "Stamped {} signature(s) on page {}",
            placements.len(),
            page_index + 1
        );
    }

    Ok(groups.into_keys().collect())
}
