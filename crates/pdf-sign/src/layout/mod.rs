//! Coordinate handling for signature placement
//!
//! Placements are stored as fractions of the page so that zooming or
//! resizing the canvas never moves them. Canvas pixels and PDF points are
//! both derived on demand:
//! - `Viewport::layout` projects a page raster onto the canvas
//! - `PageLayout` converts between canvas pixels and page fractions
//! - `RelativeRect::to_points` converts page fractions to PDF points
//! - `EdgeScroll` turns wheel notches at a page edge into page changes

mod scroll;
mod types;
mod viewport;

pub use scroll::*;
pub use types::*;
pub use viewport::*;
