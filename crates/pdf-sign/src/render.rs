//! Page rasters and the renderer seam
//!
//! Rasterizing PDF pages needs a real rendering engine, which lives
//! outside this crate. The session only depends on the `PageRenderer`
//! trait; the GUI plugs PDFium in behind it.

use crate::compose::{page_sizes, read_pdf};
use crate::types::*;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// One page rendered for display
#[derive(Debug, Clone, PartialEq)]
pub struct PageRaster {
    pub image: RgbaImage,
    /// Media box size in points
    pub size: PageSize,
}

impl PageRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Produces one raster per page, in page order.
pub trait PageRenderer {
    fn render_pages(&self, path: &Path, dpi: u32) -> Result<Vec<PageRaster>>;
}

/// Pixel size of a page of `size` points rendered at `dpi`
pub fn raster_dimensions(size: &PageSize, dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / 72.0;
    (
        ((size.width * scale).round() as u32).max(1),
        ((size.height * scale).round() as u32).max(1),
    )
}

/// Renders every page as a blank sheet of the right size.
///
/// Used when no rendering engine is available: placement still works,
/// only the page content is missing from the preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankPageRenderer;

impl PageRenderer for BlankPageRenderer {
    fn render_pages(&self, path: &Path, dpi: u32) -> Result<Vec<PageRaster>> {
        let doc = read_pdf(path)?;
        let rasters = page_sizes(&doc)?
            .into_iter()
            .map(|size| {
                let (width, height) = raster_dimensions(&size, dpi);
                PageRaster {
                    image: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
                    size,
                }
            })
            .collect();
        Ok(rasters)
    }
}
