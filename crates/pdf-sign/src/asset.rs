//! Signature raster loading, cropping and saving

use crate::constants::MIN_CROP_SIZE_PX;
use crate::types::*;
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// The ink image stamped onto pages.
///
/// Immutable once constructed; loading another signature replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureAsset {
    image: RgbaImage,
}

impl SignatureAsset {
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SignError::Config("Signature image is empty".to_string()));
        }
        Ok(Self { image })
    }

    /// Decode any supported raster file into RGBA.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())
            .map_err(SignError::SignatureLoad)?
            .to_rgba8();
        Self::from_image(image)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.image.width() as f64 / self.image.height() as f64
    }
}

/// A rectangular selection in source-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSelection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropSelection {
    /// Build a selection from two opposite corners in any order.
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        let (x1, x2) = (a.0.min(b.0), a.0.max(b.0));
        let (y1, y2) = (a.1.min(b.1), a.1.max(b.1));
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}

/// Cut `selection` out of `image`, clipped to the image bounds.
pub fn crop_signature(image: &RgbaImage, selection: CropSelection) -> Result<RgbaImage> {
    let x = selection.x.min(image.width());
    let y = selection.y.min(image.height());
    let width = selection.width.min(image.width() - x);
    let height = selection.height.min(image.height() - y);

    if width < MIN_CROP_SIZE_PX || height < MIN_CROP_SIZE_PX {
        return Err(SignError::Config(format!(
            "Selection {}x{} is too small (minimum {}x{})",
            width, height, MIN_CROP_SIZE_PX, MIN_CROP_SIZE_PX
        )));
    }

    Ok(image::imageops::crop_imm(image, x, y, width, height).to_image())
}
