//! Rectangle types for the three coordinate spaces
//!
//! - `PixelRect`: canvas pixels, origin top-left, depends on zoom
//! - `RelativeRect`: fractions of the rendered page, origin top-left
//! - `PointRect`: PDF points, origin bottom-left

use crate::types::PageSize;

/// A rectangle in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive hit test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x <= x && x <= self.right() && self.y <= y && y <= self.bottom()
    }

    /// Snap to whole pixels for drawing
    pub fn rounded(&self) -> (i64, i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.width.round() as i64,
            self.height.round() as i64,
        )
    }
}

/// A rectangle as fractions of the rendered page (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelativeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RelativeRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rect of the given size centred on the page
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(0.5 - width / 2.0, 0.5 - height / 2.0, width, height)
    }

    /// Whether position lies in [0,1] and size in (0,1]
    pub fn is_normalized(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.x)
            && unit.contains(&self.y)
            && self.width > 0.0
            && self.width <= 1.0
            && self.height > 0.0
            && self.height <= 1.0
    }

    /// Project onto a PDF page, flipping the y axis.
    pub fn to_points(&self, page: &PageSize) -> PointRect {
        let page_width = page.width as f64;
        let page_height = page.height as f64;
        PointRect {
            x: page.origin_x as f64 + self.x * page_width,
            y: page.origin_y as f64 + page_height - (self.y + self.height) * page_height,
            width: self.width * page_width,
            height: self.height * page_height,
        }
    }
}

/// A rectangle in PDF points (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointRect {
    /// Left edge
    pub x: f64,
    /// Bottom edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
