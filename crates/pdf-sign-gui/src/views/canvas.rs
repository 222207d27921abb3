//! The page canvas: page raster, placement frames and drag handling

use crate::ui_components::{full_uv, to_screen};
use eframe::egui;
use pdf_sign::{ScrollDirection, ScrollPosition, SigningSession};

const COMMITTED_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 160, 60);
const ACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 30, 30);

pub fn show_canvas(
    ui: &mut egui::Ui,
    session: &mut SigningSession,
    page_texture: Option<&egui::TextureHandle>,
    signature_texture: Option<&egui::TextureHandle>,
) {
    let available = ui.available_size();
    session.set_canvas_size(available.x.max(1.0) as u32, available.y.max(1.0) as u32);

    let Some(layout) = session.layout() else {
        ui.centered_and_justified(|ui| {
            ui.label("Open a PDF to start, or drop one here");
        });
        return;
    };

    let (content_width, content_height) =
        layout.content_size(available.x as u32, available.y as u32);

    // New pages start scrolled to the top
    let shown_page_id = egui::Id::new("canvas_shown_page");
    let page = session.current_page();
    let page_changed = ui.data_mut(|d| {
        let shown = d.get_temp::<usize>(shown_page_id);
        d.insert_temp(shown_page_id, page);
        shown != Some(page)
    });

    let mut scroll_area = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false);
    if page_changed {
        scroll_area = scroll_area.vertical_scroll_offset(0.0);
    }

    let output = scroll_area.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(
            egui::vec2(content_width as f32, content_height as f32),
            egui::Sense::click_and_drag(),
        );
        let origin = response.rect.min;

        // Page
        let page_rect = to_screen(origin, layout.page_rect());
        painter.rect_filled(page_rect, 0.0, egui::Color32::WHITE);
        if let Some(texture) = page_texture {
            painter.image(texture.id(), page_rect, full_uv(), egui::Color32::WHITE);
        }
        painter.rect_stroke(
            page_rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(120)),
            egui::StrokeKind::Outside,
        );

        // Placements
        let frame = |rect: egui::Rect, color: egui::Color32| {
            if let Some(texture) = signature_texture {
                painter.image(texture.id(), rect, full_uv(), egui::Color32::WHITE);
            }
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(2.0, color),
                egui::StrokeKind::Outside,
            );
        };
        for rect in session.committed_rects() {
            frame(to_screen(origin, rect), COMMITTED_COLOR);
        }
        let active = session.active_rect().map(|rect| to_screen(origin, rect));
        if let Some(rect) = active {
            frame(rect, ACTIVE_COLOR);
        }

        // Dragging
        if response.drag_started() {
            if let Some(pos) = ui.input(|i| i.pointer.press_origin()) {
                let local = pos - origin;
                session.begin_drag(local.x as f64, local.y as f64);
            }
        }
        if response.dragged() && session.is_dragging() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - origin;
                session.drag_to(local.x as f64, local.y as f64);
            }
        }
        if response.drag_stopped() {
            session.end_drag();
        }

        if session.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if let (Some(rect), Some(hover)) = (active, response.hover_pos()) {
            if rect.contains(hover) {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
        }
    });

    // Wheel notches against the top or bottom edge switch pages
    let (wheel, zooming) = ui.input(|i| (i.raw_scroll_delta.y, i.modifiers.command));
    if wheel != 0.0 && !zooming && ui.rect_contains_pointer(output.inner_rect) {
        let direction = if wheel < 0.0 {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        let position = ScrollPosition::from_offsets(
            output.state.offset.y as f64,
            output.inner_rect.height() as f64,
            output.content_size.y as f64,
        );
        session.scroll_notch(direction, position);
    }
}
