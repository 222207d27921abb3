mod common;

use common::create_test_signature;
use image::{Rgba, RgbaImage};
use pdf_sign::filter::*;
use pdf_sign::*;

fn sharp() -> ProcessingParams {
    ProcessingParams {
        smooth: false,
        ..ProcessingParams::default()
    }
}

#[test]
fn test_white_paper_becomes_transparent() {
    let image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    let out = remove_background(&image, &ProcessingParams::default());
    assert!(out.pixels().all(|p| *p == Rgba([255, 255, 255, 0])));
}

#[test]
fn test_stroke_survives_and_paper_is_cleared() {
    let image = create_test_signature();
    let out = remove_background(&image, &sharp());

    assert_eq!(out.get_pixel(100, 25).0[3], 255);
    assert_eq!(out.get_pixel(5, 5).0[3], 0);
    assert_eq!(transparent_pixel_count(&out), 200 * 50 - 160 * 10);
}

#[test]
fn test_filter_is_deterministic() {
    let image = create_test_signature();
    let params = ProcessingParams::default();
    assert_eq!(
        remove_background(&image, &params),
        remove_background(&image, &params)
    );
}

#[test]
fn test_filter_is_idempotent_without_smoothing() {
    let once = remove_background(&create_test_signature(), &sharp());
    let twice = remove_background(&once, &sharp());
    assert_eq!(once, twice);
}

#[test]
fn test_output_keeps_dimensions() {
    let image = RgbaImage::from_pixel(13, 7, Rgba([90, 90, 200, 255]));
    let out = remove_background(&image, &ProcessingParams::default());
    assert_eq!(out.dimensions(), (13, 7));
}

#[test]
fn test_lower_brightness_threshold_clears_at_least_as_much() {
    // A gradient from dark to light so the threshold actually matters
    let image = RgbaImage::from_fn(256, 4, |x, _| {
        let v = x as u8;
        Rgba([v, v, v.saturating_add(40), 255])
    });

    let mut previous = 0;
    for brightness in [255u8, 230, 200, 170, 150] {
        let params = ProcessingParams {
            brightness_threshold: brightness,
            ..sharp()
        };
        let cleared = transparent_pixel_count(&remove_background(&image, &params));
        assert!(
            cleared >= previous,
            "threshold {} cleared {} < {}",
            brightness,
            cleared,
            previous
        );
        previous = cleared;
    }
}

#[test]
fn test_smoothing_softens_isolated_pixels() {
    let mut image = RgbaImage::from_pixel(9, 9, Rgba([255, 255, 255, 255]));
    image.put_pixel(4, 4, Rgba([0, 0, 0, 255]));

    let out = remove_background(&image, &ProcessingParams::default());
    // The median pass removes a lone speck entirely
    assert_eq!(out.get_pixel(4, 4).0[3], 0);
}

#[test]
fn test_tint_zero_is_identity() {
    let image = create_test_signature();
    assert_eq!(apply_ink_tint(&image, 0), image);
}

#[test]
fn test_tint_moves_dark_pixels_toward_blue() {
    let image = RgbaImage::from_pixel(1, 1, Rgba([30, 30, 30, 255]));
    let light = apply_ink_tint(&image, 30);
    let deep = apply_ink_tint(&image, 90);

    let blue = |img: &RgbaImage| img.get_pixel(0, 0).0[2];
    assert!(blue(&light) > 30);
    assert!(blue(&deep) > blue(&light));
    assert_eq!(deep.get_pixel(0, 0).0[3], 255);
}

#[test]
fn test_tint_clamps_intensity() {
    let image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
    assert_eq!(apply_ink_tint(&image, 250), apply_ink_tint(&image, 100));
}
