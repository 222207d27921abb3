//! Ink colour correction
//!
//! Shifts dark, opaque pixels toward a pen blue. The shift is weighted by
//! how dark the pixel is, so the core of a stroke turns blue while the
//! anti-aliased fringe keeps its original colour.

use crate::constants::{INK_BLUE, TINT_ALPHA_MIN, TINT_BRIGHTNESS_MAX, TINT_GAMMA};
use image::{Rgba, RgbaImage};

/// Maximum tint intensity (percent)
pub const MAX_INTENSITY: u8 = 100;

/// Tint `image` toward [`INK_BLUE`] with `intensity` in percent.
///
/// Intensity 0 returns an untouched copy. Values above 100 are clamped.
pub fn apply_ink_tint(image: &RgbaImage, intensity: u8) -> RgbaImage {
    let mut out = image.clone();
    if intensity == 0 {
        return out;
    }

    let factor = intensity.min(MAX_INTENSITY) as f32 / 100.0;
    for pixel in out.pixels_mut() {
        *pixel = tint_pixel(*pixel, factor);
    }
    out
}

fn tint_pixel(pixel: Rgba<u8>, factor: f32) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    if a < TINT_ALPHA_MIN {
        return pixel;
    }

    let brightness = (r as f32 + g as f32 + b as f32) / 3.0;
    if brightness > TINT_BRIGHTNESS_MAX {
        return pixel;
    }

    let darkness = ((TINT_BRIGHTNESS_MAX - brightness) / TINT_BRIGHTNESS_MAX).clamp(0.0, 1.0);
    let strength = factor * darkness.powf(TINT_GAMMA);

    let blend = |orig: u8, target: u8| -> u8 {
        (orig as f32 * (1.0 - strength) + target as f32 * strength)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(r, INK_BLUE[0]),
        blend(g, INK_BLUE[1]),
        blend(b, INK_BLUE[2]),
        a,
    ])
}

/// Human-readable label for a tint intensity
pub fn describe_intensity(intensity: u8) -> &'static str {
    match intensity {
        0 => "Original",
        1..=29 => "Light blue",
        30..=69 => "Medium blue",
        _ => "Deep blue",
    }
}
