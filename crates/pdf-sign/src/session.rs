//! The signing session
//!
//! `SigningSession` owns everything a user works on between opening and
//! closing a document: the parsed PDF and its page rasters, the signature
//! image, the placement being positioned and the ledger of committed ones,
//! plus the viewport used to project pages onto the canvas.
//!
//! Every operation either succeeds or returns an error with the session
//! left exactly as it was.

use crate::asset::SignatureAsset;
use crate::compose::{read_pdf, sign_in_place, write_pdf_atomic};
use crate::layout::{
    EdgeScroll, PageLayout, PixelRect, ScrollDirection, ScrollPosition, Viewport,
};
use crate::options::SignerOptions;
use crate::placement::{ActivePlacement, PlacementLedger};
use crate::render::{PageRaster, PageRenderer};
use crate::types::*;
use lopdf::Document;
use std::path::{Path, PathBuf};

/// Yes/no questions the session needs answered before discarding work.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub const REPLACE_DOCUMENT_PROMPT: &str = "Close the current PDF and open a new one?";
pub const DISCARD_CHANGES_PROMPT: &str = "Close the file? Unsaved signatures will be lost.";

struct OpenDocument {
    path: PathBuf,
    document: Document,
    pages: Vec<PageRaster>,
}

/// Grab point inside the active placement, in canvas pixels
#[derive(Debug, Clone, Copy)]
struct DragState {
    grab_x: f64,
    grab_y: f64,
}

pub struct SigningSession {
    options: SignerOptions,
    document: Option<OpenDocument>,
    signature: Option<SignatureAsset>,
    active: Option<ActivePlacement>,
    ledger: PlacementLedger,
    current_page: usize,
    viewport: Viewport,
    signature_width_px: u32,
    drag: Option<DragState>,
    edge_scroll: EdgeScroll,
}

impl Default for SigningSession {
    fn default() -> Self {
        Self::new(SignerOptions::default())
    }
}

impl SigningSession {
    pub fn new(options: SignerOptions) -> Self {
        Self {
            signature_width_px: options.signature_width_px,
            options,
            document: None,
            signature: None,
            active: None,
            ledger: PlacementLedger::new(),
            current_page: 0,
            viewport: Viewport::default(),
            drag: None,
            edge_scroll: EdgeScroll::default(),
        }
    }

    // =========================================================================
    // Document lifecycle
    // =========================================================================

    /// Open `path`, rendering its pages with `renderer`.
    ///
    /// If a document is already open the user is asked first; returns
    /// `Ok(false)` when they decline.
    pub fn open_document(
        &mut self,
        path: impl AsRef<Path>,
        renderer: &dyn PageRenderer,
        confirm: &mut dyn Confirm,
    ) -> Result<bool> {
        let path = path.as_ref();

        if self.document.is_some() && !confirm.confirm(REPLACE_DOCUMENT_PROMPT) {
            return Ok(false);
        }

        let document = read_pdf(path)?;
        let pages = renderer.render_pages(path, self.options.render_dpi)?;
        if pages.is_empty() {
            return Err(SignError::DocumentLoad(format!(
                "{}: renderer produced no pages",
                path.display()
            )));
        }

        log::info!("Opened {} ({} pages)", path.display(), pages.len());

        self.document = Some(OpenDocument {
            path: path.to_owned(),
            document,
            pages,
        });
        self.current_page = 0;
        self.active = None;
        self.ledger.clear();
        self.drag = None;

        Ok(true)
    }

    /// Close the open document, asking first if there is unsaved work.
    ///
    /// Returns `Ok(false)` when the user declines; nothing is changed.
    pub fn close_document(&mut self, confirm: &mut dyn Confirm) -> Result<bool> {
        if self.document.is_none() {
            return Err(SignError::NoDocument);
        }

        if self.has_unsaved_work() && !confirm.confirm(DISCARD_CHANGES_PROMPT) {
            return Ok(false);
        }

        if let Some(doc) = self.document.take() {
            log::info!("Closed {}", doc.path.display());
        }
        self.current_page = 0;
        self.ledger.clear();
        self.active = None;
        self.signature = None;
        self.drag = None;

        Ok(true)
    }

    /// An uncommitted placement or any committed one
    pub fn has_unsaved_work(&self) -> bool {
        self.active.is_some() || !self.ledger.is_empty()
    }

    // =========================================================================
    // Signature
    // =========================================================================

    /// Load a signature image from disk and start placing it.
    pub fn load_signature(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let asset = SignatureAsset::load(path.as_ref())?;
        log::info!(
            "Loaded signature {} ({}x{})",
            path.as_ref().display(),
            asset.width(),
            asset.height()
        );
        self.set_signature(asset);
        Ok(())
    }

    /// Replace the signature, discarding any uncommitted placement.
    pub fn set_signature(&mut self, asset: SignatureAsset) {
        self.signature = Some(asset);
        self.active = None;
        self.drag = None;
        if self.document.is_some() {
            self.active = self.fresh_placement();
        }
    }

    /// Start another placement of the current signature on the current page.
    pub fn new_placement(&mut self) -> Result<()> {
        if self.document.is_none() {
            return Err(SignError::NoDocument);
        }
        if self.signature.is_none() {
            return Err(SignError::NoSignature);
        }
        self.active = self.fresh_placement();
        self.drag = None;
        Ok(())
    }

    /// Drop the uncommitted placement, if any.
    pub fn discard_active(&mut self) {
        self.active = None;
        self.drag = None;
    }

    /// A placement centred on the current page at the configured on-screen width.
    fn fresh_placement(&self) -> Option<ActivePlacement> {
        let signature = self.signature.as_ref()?;
        let layout = self.layout()?;
        let width_px = self.signature_width_px as f64;
        let height_px = width_px / signature.aspect_ratio();
        Some(ActivePlacement::centered(
            self.current_page,
            width_px / layout.rendered_width as f64,
            height_px / layout.rendered_height as f64,
        ))
    }

    /// Set the on-screen width of the signature being placed.
    pub fn resize_signature(&mut self, width_px: u32) {
        let (min_width, max_width) = crate::constants::SIGNATURE_WIDTH_RANGE_PX;
        self.signature_width_px = width_px.clamp(min_width, max_width);

        let (Some(layout), Some(signature)) = (self.layout(), self.signature.as_ref()) else {
            return;
        };
        let aspect = signature.aspect_ratio();
        let page_aspect = layout.rendered_width as f64 / layout.rendered_height as f64;
        let width = self.signature_width_px as f64 / layout.rendered_width as f64;
        if let Some(active) = self.active.as_mut() {
            active.resize_keep_aspect(width, aspect, page_aspect);
        }
    }

    pub fn signature_width_px(&self) -> u32 {
        self.signature_width_px
    }

    // =========================================================================
    // Viewport and navigation
    // =========================================================================

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.viewport.canvas_width = width;
        self.viewport.canvas_height = height;
    }

    /// Set zoom in percent, clamped to the configured range.
    pub fn set_zoom(&mut self, percent: u32) {
        self.viewport.zoom_percent = self.options.clamp_zoom(percent);
    }

    /// Step zoom in (`direction > 0`) or out (`direction < 0`).
    pub fn zoom_by_step(&mut self, direction: i32) {
        let step = self.options.zoom_step as i64 * direction.signum() as i64;
        let target = (self.viewport.zoom_percent as i64 + step).max(0) as u32;
        self.set_zoom(target);
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Show page `index`. The active placement moves along, keeping its
    /// position on the page.
    pub fn go_to_page(&mut self, index: usize) -> Result<()> {
        let count = self.page_count();
        if self.document.is_none() {
            return Err(SignError::NoDocument);
        }
        if index >= count {
            return Err(SignError::PageOutOfRange { page: index, count });
        }

        self.current_page = index;
        self.drag = None;
        self.edge_scroll.reset();
        if let Some(active) = self.active.as_mut() {
            active.page = index;
        }
        Ok(())
    }

    /// Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        let next = self.current_page + 1;
        next < self.page_count() && self.go_to_page(next).is_ok()
    }

    /// Returns false at the first page.
    pub fn previous_page(&mut self) -> bool {
        self.current_page > 0 && self.go_to_page(self.current_page - 1).is_ok()
    }

    /// One wheel notch on the canvas. Returns true when it changed the page.
    pub fn scroll_notch(&mut self, direction: ScrollDirection, position: ScrollPosition) -> bool {
        if self.page_count() <= 1 {
            return false;
        }
        match self.edge_scroll.notch(direction, position) {
            Some(ScrollDirection::Down) => self.next_page(),
            Some(ScrollDirection::Up) => self.previous_page(),
            None => false,
        }
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    /// Start dragging if (`x`, `y`) in canvas pixels hits the active placement.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        let Some(rect) = self.active_rect() else {
            return false;
        };
        if !rect.contains(x, y) {
            return false;
        }
        self.drag = Some(DragState {
            grab_x: x - rect.x,
            grab_y: y - rect.y,
        });
        true
    }

    /// Move the dragged placement so the grab point follows the pointer.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        let (Some(drag), Some(layout)) = (self.drag, self.layout()) else {
            return;
        };
        let Some(active) = self.active.as_mut() else {
            return;
        };

        let target = PixelRect::new(x - drag.grab_x, y - drag.grab_y, 0.0, 0.0);
        let relative = layout.to_relative(target);
        active.move_to(relative.x, relative.y);
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Freeze the active placement into the ledger. Returns the new total.
    pub fn commit(&mut self) -> Result<usize> {
        if self.document.is_none() {
            log::warn!("Commit rejected: no document loaded");
            return Err(SignError::NoDocument);
        }
        let Some(active) = self.active.take() else {
            log::warn!("Commit rejected: no active signature");
            return Err(SignError::NoActivePlacement);
        };

        self.drag = None;
        let placed = self.ledger.commit(active);
        log::info!(
            "Placed signature on page {} at ({:.3}, {:.3}) size {:.3}x{:.3}",
            placed.page + 1,
            placed.rect.x,
            placed.rect.y,
            placed.rect.width,
            placed.rect.height
        );
        Ok(self.ledger.total_count())
    }

    pub fn ledger(&self) -> &PlacementLedger {
        &self.ledger
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Write the signed document to `output`.
    ///
    /// The original file is never modified; the output is only replaced
    /// once the whole document has been assembled.
    pub fn export(&self, output: impl AsRef<Path>) -> Result<ExportSummary> {
        let output = output.as_ref();
        let open = self.document.as_ref().ok_or(SignError::NoDocument)?;
        let signature = self.signature.as_ref().ok_or(SignError::NoSignature)?;
        if self.ledger.is_empty() {
            return Err(SignError::EmptyLedger);
        }

        let mut signed = open.document.clone();
        let pages_touched = sign_in_place(&mut signed, signature, &self.ledger)?;
        write_pdf_atomic(&mut signed, output)?;

        log::info!(
            "Exported {} signature(s) on {} page(s) to {}",
            self.ledger.total_count(),
            pages_touched.len(),
            output.display()
        );

        Ok(ExportSummary {
            placements: self.ledger.total_count(),
            pages_touched,
            path: output.to_owned(),
        })
    }

    // =========================================================================
    // Display projections
    // =========================================================================

    pub fn options(&self) -> &SignerOptions {
        &self.options
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document.as_ref().map(|d| d.path.as_path())
    }

    pub fn page_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.pages.len())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_raster(&self, index: usize) -> Option<&PageRaster> {
        self.document.as_ref()?.pages.get(index)
    }

    pub fn current_raster(&self) -> Option<&PageRaster> {
        self.page_raster(self.current_page)
    }

    pub fn signature(&self) -> Option<&SignatureAsset> {
        self.signature.as_ref()
    }

    pub fn active(&self) -> Option<&ActivePlacement> {
        self.active.as_ref()
    }

    /// Projection of the current page onto the canvas
    pub fn layout(&self) -> Option<PageLayout> {
        let raster = self.current_raster()?;
        Some(self.viewport.layout(raster.width(), raster.height()))
    }

    /// The active placement in canvas pixels, if it is on the current page
    pub fn active_rect(&self) -> Option<PixelRect> {
        let active = self.active.as_ref()?;
        if active.page != self.current_page {
            return None;
        }
        Some(self.layout()?.to_absolute(active.rect))
    }

    /// Committed placements on the current page, in canvas pixels
    pub fn committed_rects(&self) -> Vec<PixelRect> {
        let Some(layout) = self.layout() else {
            return Vec::new();
        };
        self.ledger
            .on_page(self.current_page)
            .map(|p| layout.to_absolute(p.rect))
            .collect()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            file_name: self
                .document_path()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
            current_page: self.current_page,
            page_count: self.page_count(),
            placements_on_page: self.ledger.count_on_page(self.current_page),
            total_placements: self.ledger.total_count(),
            has_active: self.active.is_some(),
            zoom_percent: self.viewport.zoom_percent,
        }
    }
}
