use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use pdf_stamp::constants::{SURFACE_HEIGHT, SURFACE_WIDTH};
use pdf_stamp::{EditSession, SurfaceRect};
use stamp_async_runtime::{DocumentId, StampCommand};

const UV_FULL: egui::Rect = egui::Rect {
    min: egui::pos2(0.0, 0.0),
    max: egui::pos2(1.0, 1.0),
};

pub struct SurfaceTextures<'a> {
    pub page: Option<&'a egui::TextureHandle>,
    pub stamp: Option<&'a egui::TextureHandle>,
}

/// Editing surface central panel: page navigation, the fixed-size canvas
/// with the draggable stamp overlay, and the export actions. Returns true
/// when the page preview needs a re-render.
#[allow(clippy::too_many_arguments)]
pub fn show_surface(
    ui: &mut egui::Ui,
    session: &mut EditSession,
    doc_id: Option<DocumentId>,
    current_page: &mut u32,
    textures: SurfaceTextures<'_>,
    tokio_handle: &Handle,
    command_tx: &mpsc::UnboundedSender<StampCommand>,
    status: &mut String,
) -> bool {
    let Some((page_count, doc_id)) = session
        .document
        .as_ref()
        .map(|document| document.page_count())
        .zip(doc_id)
    else {
        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.heading("PDF Stamper");
            ui.add_space(20.0);
            ui.label("Drop a PDF file here or use Open PDF…");
        });
        return false;
    };

    let mut needs_render = false;

    // Navigation and export bar
    ui.horizontal(|ui| {
        let can_go_back = *current_page > 1;
        let can_go_forward = *current_page < page_count;

        if ui
            .add_enabled(can_go_back, egui::Button::new("◀ Previous"))
            .clicked()
        {
            *current_page -= 1;
            needs_render = true;
        }

        ui.label(format!("Page {} of {}", current_page, page_count));

        if ui
            .add_enabled(can_go_forward, egui::Button::new("Next ▶"))
            .clicked()
        {
            *current_page += 1;
            needs_render = true;
        }

        ui.separator();

        let has_placed = session.surface.placed().is_some();
        if ui
            .add_enabled(has_placed, egui::Button::new("Apply to page"))
            .clicked()
        {
            match session.record_placement(*current_page) {
                Ok(()) => {
                    *status = format!("Stamp recorded for page {current_page}");
                    needs_render = true;
                }
                Err(e) => *status = format!("Error: {e}"),
            }
        }

        ui.separator();

        if ui.button("Export page").clicked() {
            export(session, doc_id, Some(*current_page), command_tx, status);
        }
        if ui.button("Export all pages").clicked() {
            export(session, doc_id, None, command_tx, status);
        }
    });

    ui.separator();

    // The canvas is always the fixed surface size; the page raster is
    // scaled into it regardless of its resolution
    egui::ScrollArea::both().show(ui, |ui| {
        let size = egui::vec2(SURFACE_WIDTH as f32, SURFACE_HEIGHT as f32);
        let (canvas, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if let Some(texture) = textures.page {
            ui.painter()
                .image(texture.id(), canvas, UV_FULL, egui::Color32::WHITE);
        } else {
            ui.painter()
                .rect_filled(canvas, egui::CornerRadius::ZERO, egui::Color32::from_gray(230));
        }

        // Clicking the surface activates the selected stamp when nothing
        // is placed yet
        if response.clicked()
            && session.surface.placed().is_none()
            && session.surface.selected().is_some()
        {
            match tokio_handle.block_on(session.surface.focus(&session.library)) {
                Ok(true) => *status = "Stamp placed".to_string(),
                Ok(false) => {}
                Err(e) => *status = format!("Error: {e}"),
            }
        }

        if let Some(placed) = session.surface.placed().copied() {
            let stamp_rect = egui::Rect::from_min_size(
                canvas.min + egui::vec2(placed.rect.x as f32, placed.rect.y as f32),
                egui::vec2(placed.rect.width as f32, placed.rect.height as f32),
            );
            let stamp_id = ui.id().with("placed-stamp");

            // Corner handle scales, body drags; aspect ratio is fixed
            let handle_rect = egui::Rect::from_center_size(stamp_rect.max, egui::vec2(10.0, 10.0));
            let handle_response = ui.interact(handle_rect, stamp_id.with("resize"), egui::Sense::drag());
            let body_response = ui.interact(stamp_rect, stamp_id, egui::Sense::drag());

            if handle_response.dragged() {
                let delta = handle_response.drag_delta();
                let aspect = placed.rect.height / placed.rect.width;
                let width = (placed.rect.width + f64::from(delta.x)).max(8.0);
                session.surface.set_rect(SurfaceRect::new(
                    placed.rect.x,
                    placed.rect.y,
                    width,
                    width * aspect,
                ));
            } else if body_response.dragged() {
                let delta = body_response.drag_delta();
                session.surface.set_rect(SurfaceRect::new(
                    placed.rect.x + f64::from(delta.x),
                    placed.rect.y + f64::from(delta.y),
                    placed.rect.width,
                    placed.rect.height,
                ));
            }

            if let Some(texture) = textures.stamp {
                ui.painter()
                    .image(texture.id(), stamp_rect, UV_FULL, egui::Color32::WHITE);
            } else {
                ui.painter().rect_filled(
                    stamp_rect,
                    egui::CornerRadius::same(2),
                    egui::Color32::from_rgba_unmultiplied(200, 30, 30, 120),
                );
            }
            ui.painter().rect_stroke(
                stamp_rect,
                egui::CornerRadius::same(2),
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Outside,
            );
            ui.painter()
                .rect_filled(handle_rect, egui::CornerRadius::same(1), egui::Color32::DARK_GRAY);
        }
    });

    needs_render
}

/// Queue a stamped export: the placed object wins, otherwise the selected
/// asset at the default centered placement.
fn export(
    session: &EditSession,
    doc_id: DocumentId,
    page_number: Option<u32>,
    command_tx: &mpsc::UnboundedSender<StampCommand>,
    status: &mut String,
) {
    let Some(document) = session.document.as_ref() else {
        return;
    };

    let (stamp_png, placement) = if let Some(placed) = session.surface.placed() {
        match session.library.get(placed.stamp_id) {
            Some(asset) => (asset.bytes().to_vec(), Some(placed.rect)),
            None => {
                *status = "Error: the placed stamp is no longer in the library".to_string();
                return;
            }
        }
    } else if let Some(selected) = session.surface.selected() {
        match session.library.get(selected) {
            Some(asset) => (asset.bytes().to_vec(), None),
            None => {
                *status = "Error: no stamp selected".to_string();
                return;
            }
        }
    } else {
        *status = "Error: no stamp selected".to_string();
        return;
    };

    let default_name = match page_number {
        Some(page) => format!("stamped-p{page}.pdf"),
        None => "stamped.pdf".to_string(),
    };
    let Some(output_path) = rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("PDF", &["pdf"])
        .save_file()
    else {
        return;
    };

    let _ = command_tx.send(StampCommand::ExportStamped {
        doc_id,
        bytes: document.bytes().to_vec(),
        stamp_png,
        placement,
        page_number,
        output_path,
    });
    *status = "Stamping…".to_string();
}
