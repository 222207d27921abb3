//! Background removal for photographed signatures
//!
//! The classifier works on a contrast-boosted copy of the photo and keeps
//! only pixels that look like ink: dark pixels, or pixels whose blue channel
//! clearly dominates. Paper (bright, or grey and fairly bright) is made
//! fully transparent.

use crate::constants::{
    BLUE_CHANNEL_MARGIN, CONTRAST_FACTOR, INK_BRIGHTNESS_CEILING, PAPER_BRIGHTNESS_FLOOR,
    SMOOTH_KERNEL,
};
use crate::types::ProcessingParams;
use image::{Rgba, RgbaImage};

/// Fully transparent white, written for every background pixel
const CLEAR: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// How a single pixel was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// Brighter than the brightness threshold
    Bright,
    /// Greyish and moderately bright: paper in shadow
    Grey,
    /// Dark or blue: kept as-is
    Ink,
    /// Anything else
    Background,
}

impl PixelClass {
    pub fn is_ink(self) -> bool {
        self == PixelClass::Ink
    }
}

/// Remove the paper background from `image`.
///
/// Pure function of its inputs: the same image and parameters always
/// produce the same output.
pub fn remove_background(image: &RgbaImage, params: &ProcessingParams) -> RgbaImage {
    let mut out = enhance_contrast(image, CONTRAST_FACTOR);

    for pixel in out.pixels_mut() {
        if !classify(pixel, params).is_ink() {
            *pixel = CLEAR;
        }
    }

    if params.smooth {
        out = imageproc::filter::median_filter(&out, 1, 1);
        out = smooth(&out);
    }

    out
}

/// Classify one pixel against the thresholds.
pub fn classify(pixel: &Rgba<u8>, params: &ProcessingParams) -> PixelClass {
    let [r, g, b, _] = pixel.0;
    let brightness = (r as f32 + g as f32 + b as f32) / 3.0;
    let saturation = r.max(g).max(b) - r.min(g).min(b);
    let is_blue = b as u16 > r as u16 + BLUE_CHANNEL_MARGIN
        && b as u16 > g as u16 + BLUE_CHANNEL_MARGIN;

    if brightness > params.brightness_threshold as f32 {
        PixelClass::Bright
    } else if saturation < params.saturation_threshold && brightness > PAPER_BRIGHTNESS_FLOOR {
        PixelClass::Grey
    } else if is_blue || brightness < INK_BRIGHTNESS_CEILING {
        PixelClass::Ink
    } else {
        PixelClass::Background
    }
}

/// Stretch colour channels away from the mean luma by `factor`.
///
/// Alpha is left untouched.
pub fn enhance_contrast(image: &RgbaImage, factor: f32) -> RgbaImage {
    let mean = mean_luma(image) as f32;
    let mut out = image.clone();

    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let stretched = mean + factor * (*channel as f32 - mean);
            *channel = stretched.clamp(0.0, 255.0) as u8;
        }
    }

    out
}

/// Rounded mean of ITU-R 601 luma over the whole image.
fn mean_luma(image: &RgbaImage) -> u8 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0;
    }

    let sum: u64 = image
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            (r as u64 * 299 + g as u64 * 587 + b as u64 * 114) / 1000
        })
        .sum();

    ((sum as f64 / count as f64) + 0.5) as u8
}

/// 3×3 weighted smoothing over all four channels, edges clamped.
fn smooth(image: &RgbaImage) -> RgbaImage {
    let weight: f32 = SMOOTH_KERNEL.iter().sum();
    let kernel = SMOOTH_KERNEL.map(|k| k / weight);
    imageproc::filter::filter3x3::<_, f32, u8>(image, &kernel)
}

/// Count pixels with zero alpha.
pub fn transparent_pixel_count(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p.0[3] == 0).count()
}
