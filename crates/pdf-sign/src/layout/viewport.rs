//! Page-to-canvas projection
//!
//! A page raster is drawn scaled by a single aspect-preserving factor and
//! centred when it is smaller than the canvas. `PageLayout` captures that
//! projection so rectangles can move between canvas pixels and
//! page-relative fractions.

use crate::constants::FALLBACK_CANVAS_SIZE;

use super::{PixelRect, RelativeRect};

/// The visible drawing area and its zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub zoom_percent: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            canvas_width: FALLBACK_CANVAS_SIZE.0,
            canvas_height: FALLBACK_CANVAS_SIZE.1,
            zoom_percent: 100,
        }
    }
}

impl Viewport {
    pub fn new(canvas_width: u32, canvas_height: u32, zoom_percent: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            zoom_percent,
        }
    }

    /// Canvas size, substituting the fallback while the widget is unrealized
    pub fn effective_canvas(&self) -> (u32, u32) {
        if self.canvas_width <= 1 {
            FALLBACK_CANVAS_SIZE
        } else {
            (self.canvas_width, self.canvas_height.max(1))
        }
    }

    /// Project a page raster of `raster_width` × `raster_height` onto this viewport.
    pub fn layout(&self, raster_width: u32, raster_height: u32) -> PageLayout {
        let (canvas_width, canvas_height) = self.effective_canvas();
        let raster_width = raster_width.max(1);
        let raster_height = raster_height.max(1);

        let fit_x = canvas_width as f64 / raster_width as f64;
        let fit_y = canvas_height as f64 / raster_height as f64;
        let base_scale = fit_x.min(fit_y).min(1.0);
        let scale = base_scale * self.zoom_percent as f64 / 100.0;

        let rendered_width = ((raster_width as f64 * scale) as u32).max(1);
        let rendered_height = ((raster_height as f64 * scale) as u32).max(1);

        PageLayout {
            scale,
            rendered_width,
            rendered_height,
            offset_x: canvas_width.saturating_sub(rendered_width) / 2,
            offset_y: canvas_height.saturating_sub(rendered_height) / 2,
        }
    }
}

/// Where and how large a page is drawn on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Raster pixels to canvas pixels
    pub scale: f64,
    pub rendered_width: u32,
    pub rendered_height: u32,
    /// Centring offset when the page is narrower than the canvas
    pub offset_x: u32,
    /// Centring offset when the page is shorter than the canvas
    pub offset_y: u32,
}

impl PageLayout {
    /// Build a layout directly from rendered dimensions and offsets.
    pub fn new(rendered_width: u32, rendered_height: u32, offset_x: u32, offset_y: u32) -> Self {
        Self {
            scale: 1.0,
            rendered_width: rendered_width.max(1),
            rendered_height: rendered_height.max(1),
            offset_x,
            offset_y,
        }
    }

    /// The page itself, in canvas pixels
    pub fn page_rect(&self) -> PixelRect {
        PixelRect::new(
            self.offset_x as f64,
            self.offset_y as f64,
            self.rendered_width as f64,
            self.rendered_height as f64,
        )
    }

    /// Size of the scrollable area needed to show the whole page
    pub fn content_size(&self, canvas_width: u32, canvas_height: u32) -> (u32, u32) {
        (
            canvas_width.max(self.rendered_width),
            canvas_height.max(self.rendered_height),
        )
    }

    /// Canvas pixels to page fractions
    pub fn to_relative(&self, rect: PixelRect) -> RelativeRect {
        let width = self.rendered_width as f64;
        let height = self.rendered_height as f64;
        RelativeRect {
            x: (rect.x - self.offset_x as f64) / width,
            y: (rect.y - self.offset_y as f64) / height,
            width: rect.width / width,
            height: rect.height / height,
        }
    }

    /// Page fractions to canvas pixels
    pub fn to_absolute(&self, rect: RelativeRect) -> PixelRect {
        let width = self.rendered_width as f64;
        let height = self.rendered_height as f64;
        PixelRect {
            x: self.offset_x as f64 + rect.x * width,
            y: self.offset_y as f64 + rect.y * height,
            width: rect.width * width,
            height: rect.height * height,
        }
    }

    /// Convert a pixel distance on the canvas into page fractions.
    pub fn delta_to_relative(&self, dx: f64, dy: f64) -> (f64, f64) {
        (
            dx / self.rendered_width as f64,
            dy / self.rendered_height as f64,
        )
    }
}
