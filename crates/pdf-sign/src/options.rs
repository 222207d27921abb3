use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables for the signing session and the cleanup pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignerOptions {
    // Page rasterization
    pub render_dpi: u32,

    // Canvas zoom, in percent
    pub zoom_min: u32,
    pub zoom_max: u32,
    pub zoom_step: u32,

    // Initial on-screen signature width, in canvas pixels
    pub signature_width_px: u32,

    // Interactive processing
    pub debounce_ms: u64,
    pub background_cache_capacity: usize,
    pub tint_cache_capacity: usize,
    pub processing: ProcessingParams,
}

impl Default for SignerOptions {
    fn default() -> Self {
        Self {
            render_dpi: RENDER_DPI,
            zoom_min: ZOOM_MIN_PERCENT,
            zoom_max: ZOOM_MAX_PERCENT,
            zoom_step: ZOOM_STEP_PERCENT,
            signature_width_px: DEFAULT_SIGNATURE_WIDTH_PX,
            debounce_ms: DEBOUNCE_MS,
            background_cache_capacity: BACKGROUND_CACHE_CAPACITY,
            tint_cache_capacity: TINT_CACHE_CAPACITY,
            processing: ProcessingParams::default(),
        }
    }
}

impl SignerOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SignError::Config(format!("Failed to read config: {}", e)))?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| SignError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.render_dpi == 0 {
            return Err(SignError::Config("Render DPI must be positive".to_string()));
        }

        if self.zoom_min == 0 || self.zoom_min > self.zoom_max {
            return Err(SignError::Config(format!(
                "Invalid zoom range {}..={}",
                self.zoom_min, self.zoom_max
            )));
        }

        if self.zoom_step == 0 {
            return Err(SignError::Config("Zoom step must be positive".to_string()));
        }

        let (min_width, max_width) = SIGNATURE_WIDTH_RANGE_PX;
        if !(min_width..=max_width).contains(&self.signature_width_px) {
            return Err(SignError::Config(format!(
                "Signature width must be in {}..={} px",
                min_width, max_width
            )));
        }

        if self.background_cache_capacity == 0 || self.tint_cache_capacity == 0 {
            return Err(SignError::Config(
                "Cache capacities must be at least 1".to_string(),
            ));
        }

        self.processing.validate()
    }

    /// Clamp a zoom value into the configured range
    pub fn clamp_zoom(&self, percent: u32) -> u32 {
        percent.clamp(self.zoom_min, self.zoom_max)
    }
}
