//! Interactive signature cleanup
//!
//! Holds the cropped source photo and the current slider values, and
//! produces the cleaned-up signature. Slider changes are debounced and
//! both filter stages are cached, so dragging a slider back and forth
//! only pays for parameter sets that have not been seen recently.

use crate::cache::LruCache;
use crate::debounce::Debouncer;
use crate::filter::{apply_ink_tint, remove_background};
use crate::options::SignerOptions;
use crate::types::*;
use image::RgbaImage;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct SignaturePipeline {
    source: RgbaImage,
    params: ProcessingParams,
    intensity: u8,
    defaults: ProcessingParams,
    background_cache: LruCache<ProcessingParams, Arc<RgbaImage>>,
    tint_cache: LruCache<(ProcessingParams, u8), Arc<RgbaImage>>,
    debouncer: Debouncer<()>,
    result: Arc<RgbaImage>,
}

impl SignaturePipeline {
    /// Create a pipeline and process `source` once with the default parameters.
    pub fn new(source: RgbaImage, options: &SignerOptions) -> Self {
        let mut pipeline = Self {
            result: Arc::new(source.clone()),
            source,
            params: options.processing,
            intensity: 0,
            defaults: options.processing,
            background_cache: LruCache::new(options.background_cache_capacity),
            tint_cache: LruCache::new(options.tint_cache_capacity),
            debouncer: Debouncer::new(Duration::from_millis(options.debounce_ms)),
        };
        pipeline.recompute();
        pipeline
    }

    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    pub fn params(&self) -> ProcessingParams {
        self.params
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// The most recently computed signature
    pub fn result(&self) -> &RgbaImage {
        &self.result
    }

    /// Change the background-removal parameters; recomputed after the quiet period.
    pub fn set_params(&mut self, params: ProcessingParams, now: Instant) {
        if params == self.params {
            return;
        }
        self.params = params;
        self.debouncer.schedule((), now);
    }

    /// Change the tint intensity; recomputed after the quiet period.
    pub fn set_intensity(&mut self, intensity: u8, now: Instant) {
        let intensity = intensity.min(crate::filter::MAX_INTENSITY);
        if intensity == self.intensity {
            return;
        }
        self.intensity = intensity;
        self.debouncer.schedule((), now);
    }

    /// Run the newest pending request if its quiet period is over.
    ///
    /// Returns true when the result changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(()) => {
                self.recompute();
                true
            }
            None => false,
        }
    }

    /// Run any pending request right away.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(()) => {
                self.recompute();
                true
            }
            None => false,
        }
    }

    /// Number of cached (background, tinted) images
    pub fn cached_images(&self) -> (usize, usize) {
        (self.background_cache.len(), self.tint_cache.len())
    }

    /// Time until the pending request is due, for scheduling a repaint.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_remaining(now)
    }

    /// Restore default parameters, drop both caches and reprocess.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.params = self.defaults;
        self.intensity = 0;
        self.background_cache.clear();
        self.tint_cache.clear();
        self.recompute();
    }

    /// Tint-only changes hit the background cache for the base image.
    fn recompute(&mut self) {
        let params = self.params;
        let source = &self.source;

        if !self.background_cache.contains(&params) {
            log::debug!("Background cache miss for {:?}", params);
        }
        let base = Arc::clone(
            self.background_cache
                .get_or_insert_with(params, || Arc::new(remove_background(source, &params))),
        );

        let intensity = self.intensity;
        self.result = if intensity == 0 {
            base
        } else {
            Arc::clone(
                self.tint_cache
                    .get_or_insert_with((params, intensity), || {
                        Arc::new(apply_ink_tint(&base, intensity))
                    }),
            )
        };
    }
}
