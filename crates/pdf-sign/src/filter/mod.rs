//! Raster filters for turning a signature photo into an ink overlay
//!
//! - `background`: paper removal by brightness/saturation/hue classification
//! - `ink`: optional blue tint of dark strokes

mod background;
mod ink;

pub use background::{
    PixelClass, classify, enhance_contrast, remove_background, transparent_pixel_count,
};
pub use ink::{MAX_INTENSITY, apply_ink_tint, describe_intensity};
