use eframe::egui;
use pdf_sign::{PageRenderer, SignError, SignerOptions, SigningSession};
use std::path::{Path, PathBuf};

use crate::logger::AppLogger;
use crate::renderer::default_renderer;
use crate::ui_components::{SliderBuilder, load_texture};
use crate::views::{CleanupWindow, show_canvas};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub struct SignerApp {
    session: SigningSession,
    renderer: Box<dyn PageRenderer>,
    logger: AppLogger,

    // Page texture is keyed by (document generation, page index)
    document_generation: u64,
    page_texture: Option<egui::TextureHandle>,
    page_texture_key: Option<(u64, usize)>,
    signature_texture: Option<egui::TextureHandle>,
    signature_dirty: bool,

    cleanup: Option<CleanupWindow>,
    show_log: bool,
}

impl SignerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, logger: AppLogger) -> Self {
        Self {
            session: SigningSession::new(SignerOptions::default()),
            renderer: default_renderer(),
            logger,
            document_generation: 0,
            page_texture: None,
            page_texture_key: None,
            signature_texture: None,
            signature_dirty: false,
            cleanup: None,
            show_log: false,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    fn open_pdf(&mut self, path: PathBuf) {
        match self
            .session
            .open_document(&path, self.renderer.as_ref(), &mut ask_yes_no)
        {
            Ok(true) => {
                self.document_generation += 1;
                self.signature_dirty = true;
            }
            Ok(false) => {}
            Err(e) => report("Could not open PDF", &e),
        }
    }

    fn pick_and_open_pdf(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .pick_file()
        {
            self.open_pdf(path);
        }
    }

    fn close_pdf(&mut self) {
        match self.session.close_document(&mut ask_yes_no) {
            Ok(true) => {
                self.document_generation += 1;
                self.signature_dirty = true;
            }
            Ok(false) => {}
            Err(e) => report("Could not close PDF", &e),
        }
    }

    fn load_signature(&mut self, path: &Path) {
        match self.session.load_signature(path) {
            Ok(()) => {
                self.signature_dirty = true;
                if !self.session.has_document() {
                    log::info!("Signature ready; open a PDF to place it");
                }
            }
            Err(e) => report("Could not load signature", &e),
        }
    }

    fn pick_and_load_signature(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_signature(&path);
        }
    }

    fn create_signature(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        match CleanupWindow::open(&path, self.session.options()) {
            Ok(window) => self.cleanup = Some(window),
            Err(e) => report("Could not open image", &e),
        }
    }

    fn place(&mut self) {
        if let Err(e) = self.session.commit() {
            report("Cannot place signature", &e);
        }
    }

    fn add_placement(&mut self) {
        if let Err(e) = self.session.new_placement() {
            report("Cannot add signature", &e);
        }
    }

    fn save(&mut self) {
        if self.session.ledger().is_empty() {
            report("Nothing to save", &SignError::EmptyLedger);
            return;
        }

        let file_name = self
            .session
            .document_path()
            .and_then(|p| p.file_stem())
            .map(|stem| format!("{}_signed.pdf", stem.to_string_lossy()))
            .unwrap_or_else(|| "signed.pdf".to_string());

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        match self.session.export(&path) {
            Ok(summary) => log::info!(
                "Saved {} signature(s) on {} page(s) to {}",
                summary.placements,
                summary.pages_touched.len(),
                summary.path.display()
            ),
            Err(e) => report("Could not save PDF", &e),
        }
    }

    // =========================================================================
    // Frame helpers
    // =========================================================================

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });

        for path in dropped {
            let extension = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.to_ascii_lowercase());
            match extension.as_deref() {
                Some("pdf") => self.open_pdf(path),
                Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => self.load_signature(&path),
                _ => log::warn!("Ignoring dropped file {}", path.display()),
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter)) {
            self.place();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::PageDown)) {
            self.session.next_page();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::PageUp)) {
            self.session.previous_page();
        }

        // Ctrl + mouse wheel
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta > 1.0 {
            self.session.zoom_by_step(1);
        } else if zoom_delta < 1.0 {
            self.session.zoom_by_step(-1);
        }
    }

    fn sync_textures(&mut self, ctx: &egui::Context) {
        let key = self
            .session
            .has_document()
            .then(|| (self.document_generation, self.session.current_page()));
        if key != self.page_texture_key {
            self.page_texture = self
                .session
                .current_raster()
                .map(|raster| load_texture(ctx, "pdf_page", &raster.image));
            self.page_texture_key = key;
        }

        if self.signature_dirty {
            self.signature_texture = self
                .session
                .signature()
                .map(|signature| load_texture(ctx, "signature", signature.image()));
            self.signature_dirty = false;
        }
    }

    // =========================================================================
    // Panels
    // =========================================================================

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let has_document = self.session.has_document();
        let status = self.session.status();

        egui::TopBottomPanel::top("actions").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("📂 Open PDF").clicked() {
                    self.pick_and_open_pdf();
                }
                if ui
                    .add_enabled(has_document, egui::Button::new("Close PDF"))
                    .clicked()
                {
                    self.close_pdf();
                }

                ui.separator();

                if ui.button("✒ Load signature").clicked() {
                    self.pick_and_load_signature();
                }
                if ui.button("Create signature…").clicked() {
                    self.create_signature();
                }

                ui.separator();

                let can_add =
                    has_document && !status.has_active && self.session.signature().is_some();
                if ui
                    .add_enabled(can_add, egui::Button::new("➕ Add signature"))
                    .clicked()
                {
                    self.add_placement();
                }
                if ui
                    .add_enabled(status.has_active, egui::Button::new("✔ Place"))
                    .on_hover_text("Ctrl+Enter")
                    .clicked()
                {
                    self.place();
                }
                let can_save = status.total_placements > 0;
                if ui
                    .add_enabled(can_save, egui::Button::new("💾 Save signed PDF"))
                    .clicked()
                {
                    self.save();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_log, "Log");
                });
            });
        });
    }

    fn show_bottom_bar(&mut self, ctx: &egui::Context) {
        let status = self.session.status();
        let options = self.session.options().clone();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(entry) = self.logger.latest_status() {
                    let color = match entry.level {
                        log::Level::Error => egui::Color32::RED,
                        log::Level::Warn => egui::Color32::from_rgb(200, 140, 0),
                        _ => ui.visuals().text_color(),
                    };
                    ui.colored_label(color, entry.message);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut width = self.session.signature_width_px();
                    let (min_width, max_width) = pdf_sign::constants::SIGNATURE_WIDTH_RANGE_PX;
                    if SliderBuilder::new(&mut width, min_width..=max_width)
                        .text("Size")
                        .suffix(" px")
                        .show(ui)
                    {
                        self.session.resize_signature(width);
                    }

                    ui.separator();

                    if status.page_count > 0 {
                        let mut page = status.current_page + 1;
                        ui.label(format!("of {}", status.page_count));
                        if ui
                            .add(egui::DragValue::new(&mut page).range(1..=status.page_count))
                            .changed()
                        {
                            if let Err(e) = self.session.go_to_page(page - 1) {
                                log::warn!("{}", e);
                            }
                        }
                        ui.label("Page");
                        ui.label(format!(
                            "{} here, {} total",
                            status.placements_on_page, status.total_placements
                        ));
                        ui.separator();
                    }

                    let mut zoom = status.zoom_percent;
                    if SliderBuilder::new(&mut zoom, options.zoom_min..=options.zoom_max)
                        .text("Zoom")
                        .suffix("%")
                        .step(options.zoom_step as f64)
                        .show(ui)
                    {
                        self.session.set_zoom(zoom);
                    }
                });
            });
        });
    }

    fn show_log_window(&mut self, ctx: &egui::Context) {
        let entries = self.logger.get_entries();
        let mut clear = false;

        egui::Window::new("Log")
            .open(&mut self.show_log)
            .default_width(520.0)
            .show(ctx, |ui| {
                if ui.button("Clear").clicked() {
                    clear = true;
                }
                ui.separator();
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in &entries {
                            ui.label(format!(
                                "{} {:5} {}",
                                entry.timestamp.format("%H:%M:%S"),
                                entry.level,
                                entry.message
                            ));
                        }
                    });
            });

        if clear {
            self.logger.clear();
        }
    }
}

impl eframe::App for SignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        self.show_top_bar(ctx);
        self.show_bottom_bar(ctx);

        if self.show_log {
            self.show_log_window(ctx);
        }

        if let Some(window) = self.cleanup.as_mut() {
            let mut open = true;
            if let Some(asset) = window.show(ctx, &mut open) {
                self.session.set_signature(asset);
                self.signature_dirty = true;
                open = false;
            }
            if !open {
                self.cleanup = None;
            }
        }

        // Textures are synced after actions so this frame shows their result
        self.sync_textures(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            show_canvas(
                ui,
                &mut self.session,
                self.page_texture.as_ref(),
                self.signature_texture.as_ref(),
            );
        });
    }
}

/// Yes/No dialog backing the session's confirmation prompts
fn ask_yes_no(prompt: &str) -> bool {
    rfd::MessageDialog::new()
        .set_title("Confirm")
        .set_description(prompt)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        == rfd::MessageDialogResult::Yes
}

/// Log a failed action and tell the user.
fn report(action: &str, error: &SignError) {
    log::warn!("{}: {}", action, error);
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(action)
        .set_description(error.to_string())
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
