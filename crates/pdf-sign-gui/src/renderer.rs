//! Page rendering for the canvas

use pdf_sign::render::raster_dimensions;
use pdf_sign::{BlankPageRenderer, PageRaster, PageRenderer, Result, SignError};
use std::path::Path;

#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "pdf-viewer")]
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    // When running from cargo, the working directory is the workspace root
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Renders pages with PDFium at the requested DPI.
///
/// Page sizes come from the document's media boxes so the canvas and the
/// compositor agree on geometry.
#[cfg(feature = "pdf-viewer")]
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

#[cfg(feature = "pdf-viewer")]
impl PdfiumRenderer {
    pub fn new() -> std::result::Result<Self, PdfiumError> {
        Ok(Self {
            pdfium: init_pdfium()?,
        })
    }
}

#[cfg(feature = "pdf-viewer")]
impl PageRenderer for PdfiumRenderer {
    fn render_pages(&self, path: &Path, dpi: u32) -> Result<Vec<PageRaster>> {
        let render_error =
            |e: PdfiumError| SignError::DocumentLoad(format!("{}: {}", path.display(), e));

        let sizes = pdf_sign::compose::page_sizes(&pdf_sign::read_pdf(path)?)?;
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(render_error)?;

        let pages = document.pages();
        if pages.len() as usize != sizes.len() {
            return Err(SignError::DocumentLoad(format!(
                "{}: page count mismatch ({} rendered, {} in page tree)",
                path.display(),
                pages.len(),
                sizes.len()
            )));
        }

        let mut rasters = Vec::with_capacity(sizes.len());
        for (page, size) in pages.iter().zip(sizes) {
            let (width, height) = raster_dimensions(&size, dpi);
            let config = PdfRenderConfig::new()
                .set_target_width(width as i32)
                .set_target_height(height as i32);

            let bitmap = page.render_with_config(&config).map_err(render_error)?;
            let image = image::RgbaImage::from_raw(
                bitmap.width() as u32,
                bitmap.height() as u32,
                bitmap.as_rgba_bytes().to_vec(),
            )
            .ok_or_else(|| {
                SignError::DocumentLoad(format!("{}: bitmap size mismatch", path.display()))
            })?;

            rasters.push(PageRaster { image, size });
        }

        log::debug!("Rendered {} page(s) at {} DPI", rasters.len(), dpi);
        Ok(rasters)
    }
}

/// PDFium when available, blank pages otherwise.
pub fn default_renderer() -> Box<dyn PageRenderer> {
    #[cfg(feature = "pdf-viewer")]
    {
        match PdfiumRenderer::new() {
            Ok(renderer) => return Box::new(renderer),
            Err(e) => log::warn!("PDFium unavailable ({}); pages will render blank", e),
        }
    }

    Box::new(BlankPageRenderer)
}
