use eframe::egui;
use tokio::runtime::Handle;

use pdf_stamp::EditSession;
use pdf_stamp::constants::MAX_STAMP_ASSETS;

/// Stamp library side panel: add/remove assets, toggle the selection,
/// place the selected stamp. Returns true when the page preview needs a
/// re-render.
pub fn show_library(
    ui: &mut egui::Ui,
    session: &mut EditSession,
    tokio_handle: &Handle,
    status: &mut String,
) -> bool {
    let mut needs_render = false;

    ui.heading("Stamps");
    ui.label(format!(
        "{} of {MAX_STAMP_ASSETS} slots used",
        session.library.len()
    ));
    ui.add_space(4.0);

    if ui.button("Add Stamp…").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .pick_file()
        {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "stamp".to_string());
            match std::fs::read(&path) {
                Ok(bytes) => match session.library.add(name, bytes) {
                    Ok(_) => *status = "Stamp added".to_string(),
                    Err(e) => *status = format!("Error: {e}"),
                },
                Err(e) => *status = format!("Error: failed to read stamp file: {e}"),
            }
        }
    }

    ui.separator();

    let mut toggled = None;
    let mut removed = None;
    for asset in session.library.assets() {
        ui.horizontal(|ui| {
            let selected = session.surface.selected() == Some(asset.id);
            if ui.selectable_label(selected, &asset.name).clicked() {
                toggled = Some(asset.id);
            }
            if ui.small_button("✖").clicked() {
                removed = Some(asset.id);
            }
        });
    }

    if let Some(id) = toggled {
        let selected = session.surface.toggle_select(id);
        *status = if selected {
            "Stamp selected".to_string()
        } else {
            "Stamp deselected".to_string()
        };
    }

    if let Some(id) = removed {
        if session.surface.placed().map(|placed| placed.stamp_id) == Some(id) {
            session.surface.clear_placed();
        }
        if session.surface.selected() == Some(id) {
            session.surface.toggle_select(id);
        }
        session.library.remove(id);
        // Pages with a recorded placement of this stamp fall back to the
        // unstamped render
        needs_render = true;
        *status = "Stamp removed".to_string();
    }

    ui.separator();

    let can_place = session.surface.selected().is_some();
    if ui
        .add_enabled(can_place, egui::Button::new("Place on surface"))
        .clicked()
    {
        // Awaited synchronously: the placement must exist before the next
        // frame reads it
        match tokio_handle.block_on(session.surface.place(&session.library)) {
            Ok(Some(_)) => *status = "Stamp placed".to_string(),
            Ok(None) => *status = "No stamp selected".to_string(),
            Err(e) => *status = format!("Error: {e}"),
        }
    }

    needs_render
}
