//! Signature cleanup window
//!
//! Two stages: pick a crop rectangle on the source photo, then tune the
//! background removal and ink colour while watching a live preview.

use crate::ui_components::{SliderBuilder, full_uv, paint_checkerboard, update_texture};
use eframe::egui;
use image::RgbaImage;
use pdf_sign::filter::{MAX_INTENSITY, describe_intensity};
use pdf_sign::{
    CropSelection, ProcessingParams, SignaturePipeline, SignatureAsset, SignerOptions,
    crop_signature,
};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Instant;

const PHOTO_MAX_SIZE: egui::Vec2 = egui::vec2(520.0, 360.0);
const PREVIEW_MAX_SIZE: egui::Vec2 = egui::vec2(520.0, 260.0);

/// Scale change per wheel notch
const WHEEL_ZOOM_FACTOR: f32 = 1.15;
const PHOTO_ZOOM_RANGE: RangeInclusive<f32> = 0.1..=5.0;
const PREVIEW_ZOOM_RANGE: RangeInclusive<f32> = 0.5..=10.0;

pub struct CleanupWindow {
    source_path: PathBuf,
    photo: RgbaImage,
    photo_texture: Option<egui::TextureHandle>,
    photo_zoom: f32,
    selection: Option<CropSelection>,
    drag_origin: Option<(u32, u32)>,
    pipeline: Option<SignaturePipeline>,
    preview_texture: Option<egui::TextureHandle>,
    preview_zoom: f32,
    params: ProcessingParams,
    intensity: u8,
    options: SignerOptions,
}

impl CleanupWindow {
    pub fn open(path: &Path, options: &SignerOptions) -> pdf_sign::Result<Self> {
        let photo = SignatureAsset::load(path)?.image().clone();
        log::info!(
            "Opened {} for cleanup ({}x{})",
            path.display(),
            photo.width(),
            photo.height()
        );
        Ok(Self {
            source_path: path.to_owned(),
            photo,
            photo_texture: None,
            photo_zoom: 1.0,
            selection: None,
            drag_origin: None,
            pipeline: None,
            preview_texture: None,
            preview_zoom: 1.0,
            params: options.processing,
            intensity: 0,
            options: options.clone(),
        })
    }

    /// Draw the window. Returns the saved signature once the user saves it.
    pub fn show(&mut self, ctx: &egui::Context, open: &mut bool) -> Option<SignatureAsset> {
        self.poll_pipeline(ctx);

        let mut saved = None;
        egui::Window::new("Create signature")
            .open(open)
            .resizable(false)
            .default_width(PHOTO_MAX_SIZE.x + 20.0)
            .show(ctx, |ui| {
                if self.pipeline.is_some() {
                    saved = self.show_adjust(ui);
                } else {
                    self.show_crop(ui);
                }
            });
        saved
    }

    fn poll_pipeline(&mut self, ctx: &egui::Context) {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        let now = Instant::now();
        if pipeline.poll(now) {
            update_texture(ctx, &mut self.preview_texture, "signature_preview", pipeline.result());
        }
        if let Some(remaining) = pipeline.time_remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    // =========================================================================
    // Crop stage
    // =========================================================================

    fn show_crop(&mut self, ui: &mut egui::Ui) {
        ui.label("Drag a rectangle around the signature.");

        let texture = self
            .photo_texture
            .get_or_insert_with(|| {
                crate::ui_components::load_texture(ui.ctx(), "signature_photo", &self.photo)
            })
            .clone();

        let (width, height) = self.photo.dimensions();
        let fit = (PHOTO_MAX_SIZE.x / width as f32)
            .min(PHOTO_MAX_SIZE.y / height as f32)
            .min(1.0);
        let scale = fit * self.photo_zoom;
        let size = egui::vec2(width as f32 * scale, height as f32 * scale);

        egui::ScrollArea::both()
            .id_salt("signature_photo_scroll")
            .max_width(PHOTO_MAX_SIZE.x)
            .max_height(PHOTO_MAX_SIZE.y)
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
                let rect = response.rect;
                painter.image(texture.id(), rect, full_uv(), egui::Color32::WHITE);

                let to_image = |pos: egui::Pos2| -> (u32, u32) {
                    let local = (pos - rect.min) / scale;
                    (
                        (local.x.max(0.0) as u32).min(width),
                        (local.y.max(0.0) as u32).min(height),
                    )
                };

                if response.drag_started() {
                    self.drag_origin = ui.input(|i| i.pointer.press_origin()).map(to_image);
                }
                if response.dragged() {
                    if let (Some(origin), Some(pos)) =
                        (self.drag_origin, response.interact_pointer_pos())
                    {
                        self.selection = Some(CropSelection::from_corners(origin, to_image(pos)));
                    }
                }
                if response.drag_stopped() {
                    self.drag_origin = None;
                }

                if let Some(selection) = self.selection {
                    let selected = egui::Rect::from_min_size(
                        rect.min + egui::vec2(selection.x as f32, selection.y as f32) * scale,
                        egui::vec2(selection.width as f32, selection.height as f32) * scale,
                    );
                    painter.rect_filled(
                        selected,
                        0.0,
                        egui::Color32::from_rgba_unmultiplied(255, 0, 0, 30),
                    );
                    painter.rect_stroke(
                        selected,
                        0.0,
                        egui::Stroke::new(2.0, egui::Color32::RED),
                        egui::StrokeKind::Inside,
                    );
                }

                wheel_zoom(ui, &response, &mut self.photo_zoom, PHOTO_ZOOM_RANGE);
            });

        if let Some(selection) = self.selection {
            ui.label(format!("Selection: {}x{} px", selection.width, selection.height));
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.selection.is_some(), egui::Button::new("Use selection"))
                .clicked()
            {
                if let Some(selection) = self.selection {
                    match crop_signature(&self.photo, selection) {
                        Ok(cropped) => self.start_pipeline(ui.ctx(), cropped),
                        Err(e) => log::warn!("{}", e),
                    }
                }
            }
            if ui.button("Use whole image").clicked() {
                self.start_pipeline(ui.ctx(), self.photo.clone());
            }
        });
    }

    fn start_pipeline(&mut self, ctx: &egui::Context, source: RgbaImage) {
        let pipeline = SignaturePipeline::new(source, &self.options);
        self.params = pipeline.params();
        self.intensity = pipeline.intensity();
        update_texture(ctx, &mut self.preview_texture, "signature_preview", pipeline.result());
        self.pipeline = Some(pipeline);
    }

    // =========================================================================
    // Adjust stage
    // =========================================================================

    fn show_adjust(&mut self, ui: &mut egui::Ui) -> Option<SignatureAsset> {
        if let Some(texture) = self.preview_texture.clone() {
            let [width, height] = texture.size();
            let fit = (PREVIEW_MAX_SIZE.x / width as f32)
                .min(PREVIEW_MAX_SIZE.y / height as f32)
                .min(2.0);
            let scale = fit * self.preview_zoom;
            let size = egui::vec2(width as f32 * scale, height as f32 * scale);

            egui::ScrollArea::both()
                .id_salt("signature_preview_scroll")
                .max_width(PREVIEW_MAX_SIZE.x)
                .max_height(PREVIEW_MAX_SIZE.y)
                .show(ui, |ui| {
                    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                    paint_checkerboard(&painter, response.rect, 10.0);
                    painter.image(texture.id(), response.rect, full_uv(), egui::Color32::WHITE);
                    wheel_zoom(ui, &response, &mut self.preview_zoom, PREVIEW_ZOOM_RANGE);
                });

            ui.horizontal(|ui| {
                ui.label(format!("Zoom {:.0}%", self.preview_zoom * 100.0));
                if ui.button("Reset zoom").clicked() {
                    self.preview_zoom = 1.0;
                }
            });
        }

        let now = Instant::now();
        let mut params_changed = false;
        params_changed |= SliderBuilder::new(&mut self.params.brightness_threshold, 150..=255)
            .text("Brightness threshold")
            .show(ui);
        params_changed |= SliderBuilder::new(&mut self.params.saturation_threshold, 10..=100)
            .text("Saturation threshold")
            .show(ui);
        params_changed |= ui.checkbox(&mut self.params.smooth, "Smooth edges").changed();

        let intensity_changed = ui
            .horizontal(|ui| {
                let changed = SliderBuilder::new(&mut self.intensity, 0..=MAX_INTENSITY)
                    .text("Blue ink")
                    .suffix("%")
                    .show(ui);
                ui.label(describe_intensity(self.intensity));
                changed
            })
            .inner;

        let mut saved = None;
        if let Some(pipeline) = self.pipeline.as_mut() {
            if params_changed {
                pipeline.set_params(self.params, now);
            }
            if intensity_changed {
                pipeline.set_intensity(self.intensity, now);
            }
            if params_changed || intensity_changed {
                ui.ctx().request_repaint();
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    pipeline.reset();
                    self.params = pipeline.params();
                    self.intensity = pipeline.intensity();
                    update_texture(
                        ui.ctx(),
                        &mut self.preview_texture,
                        "signature_preview",
                        pipeline.result(),
                    );
                }
                if ui.button("Save PNG…").clicked() {
                    if pipeline.flush() {
                        update_texture(
                            ui.ctx(),
                            &mut self.preview_texture,
                            "signature_preview",
                            pipeline.result(),
                        );
                    }
                    saved = save_result(pipeline, &self.source_path);
                }
            });
        }

        if ui.button("◀ Back to crop").clicked() {
            self.pipeline = None;
            self.preview_texture = None;
        }

        saved
    }
}

/// Mouse wheel over `response` scales `zoom` by one step per notch.
///
/// The wheel is taken from the enclosing scroll area while hovered. A step
/// that would leave `range` is ignored.
fn wheel_zoom(
    ui: &egui::Ui,
    response: &egui::Response,
    zoom: &mut f32,
    range: RangeInclusive<f32>,
) -> bool {
    if !response.hovered() {
        return false;
    }
    let wheel = ui.input_mut(|i| {
        i.smooth_scroll_delta = egui::Vec2::ZERO;
        i.raw_scroll_delta.y
    });
    if wheel == 0.0 {
        return false;
    }

    match step_zoom(*zoom, wheel, &range) {
        Some(next) => {
            *zoom = next;
            ui.ctx().request_repaint();
            true
        }
        None => false,
    }
}

fn step_zoom(zoom: f32, wheel: f32, range: &RangeInclusive<f32>) -> Option<f32> {
    let next = if wheel > 0.0 {
        zoom * WHEEL_ZOOM_FACTOR
    } else {
        zoom / WHEEL_ZOOM_FACTOR
    };
    range.contains(&next).then_some(next)
}

fn save_result(pipeline: &SignaturePipeline, source_path: &Path) -> Option<SignatureAsset> {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "signature".to_string());

    let path = rfd::FileDialog::new()
        .add_filter("PNG", &["png"])
        .set_file_name(format!("{}_clean.png", stem))
        .save_file()?;

    let result = SignatureAsset::from_image(pipeline.result().clone())
        .and_then(|asset| asset.save_png(&path).map(|()| asset));

    match result {
        Ok(asset) => {
            log::info!("Saved cleaned signature to {}", path.display());
            Some(asset)
        }
        Err(e) => {
            log::error!("Failed to save {}: {}", path.display(), e);
            None
        }
    }
}
