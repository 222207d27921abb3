//! Shared constants for signing
//!
//! This module centralizes the tuning numbers used by the filters,
//! the canvas layout, and the compositor.

// =============================================================================
// Page Rendering
// =============================================================================

/// DPI used to rasterize pages for display
pub const RENDER_DPI: u32 = 150;

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Canvas
// =============================================================================

/// Canvas size used before the widget has been laid out
pub const FALLBACK_CANVAS_SIZE: (u32, u32) = (800, 600);

pub const ZOOM_MIN_PERCENT: u32 = 50;
pub const ZOOM_MAX_PERCENT: u32 = 200;
pub const ZOOM_STEP_PERCENT: u32 = 10;

/// Wheel notches against the top or bottom edge before the page changes
pub const EDGE_SCROLL_NOTCHES: u32 = 3;

/// Initial on-screen width of a freshly loaded signature (pixels)
pub const DEFAULT_SIGNATURE_WIDTH_PX: u32 = 150;
pub const SIGNATURE_WIDTH_RANGE_PX: (u32, u32) = (50, 500);

// =============================================================================
// Background Removal
// =============================================================================

/// Contrast boost applied before classification
pub const CONTRAST_FACTOR: f32 = 1.5;

/// Low-saturation pixels brighter than this are treated as paper
pub const PAPER_BRIGHTNESS_FLOOR: f32 = 120.0;

/// Anything darker than this counts as ink regardless of hue
pub const INK_BRIGHTNESS_CEILING: f32 = 160.0;

/// How much the blue channel must exceed red and green to count as blue ink
pub const BLUE_CHANNEL_MARGIN: u16 = 5;

/// PIL-compatible SMOOTH kernel: centre weight 5, neighbours 1, sum 13
pub const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

/// Selections smaller than this (either side, pixels) are rejected when cropping
pub const MIN_CROP_SIZE_PX: u32 = 10;

// =============================================================================
// Ink Tint
// =============================================================================

/// Only pixels at least this opaque are tinted
pub const TINT_ALPHA_MIN: u8 = 240;

/// Only pixels at most this bright are tinted
pub const TINT_BRIGHTNESS_MAX: f32 = 110.0;

/// Darker pixels shift more: strength = intensity × darkness^GAMMA
pub const TINT_GAMMA: f32 = 1.8;

/// Target pen colour
pub const INK_BLUE: [u8; 3] = [15, 45, 220];

// =============================================================================
// Interactive Processing
// =============================================================================

/// Quiet period before a slider change is processed (milliseconds)
pub const DEBOUNCE_MS: u64 = 150;

pub const BACKGROUND_CACHE_CAPACITY: usize = 6;
pub const TINT_CACHE_CAPACITY: usize = 11;
