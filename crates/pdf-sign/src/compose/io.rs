//! Document I/O for signing

use crate::types::*;
use lopdf::Document;
use std::io::Write;
use std::path::Path;

use super::xobject::get_page_size;

/// Parse a PDF from disk. Any read or parse failure is a `DocumentLoad`.
pub fn read_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| SignError::DocumentLoad(format!("{}: {}", path.display(), e)))?;
    parse_pdf(&bytes, path)
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| SignError::DocumentLoad(format!("{}: {}", path.display(), e)))?;
    tokio::task::spawn_blocking(move || parse_pdf(&bytes, &path)).await?
}

fn parse_pdf(bytes: &[u8], path: &Path) -> Result<Document> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| SignError::DocumentLoad(format!("{}: {}", path.display(), e)))?;
    if doc.get_pages().is_empty() {
        return Err(SignError::DocumentLoad(format!(
            "{}: document has no pages",
            path.display()
        )));
    }
    Ok(doc)
}

/// Serialize `doc` and replace `path` with it in one step.
///
/// The document is written in full to a temporary file next to the target
/// and then renamed over it, so a failure never leaves a truncated file at
/// `path`.
pub fn write_pdf_atomic(doc: &mut Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| SignError::ExportIo(e.error))?;

    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Save the signed document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    tokio::task::spawn_blocking(move || write_pdf_atomic(&mut doc, &path)).await?
}

/// Media box size of every page, in page order
pub fn page_sizes(doc: &Document) -> Result<Vec<PageSize>> {
    doc.get_pages()
        .values()
        .map(|&page_id| get_page_size(doc, page_id))
        .collect()
}
