use eframe::egui;
use stamp_async_runtime::{DocumentId, StampCommand, StampUpdate};
use tokio::sync::mpsc;

use pdf_stamp::{EditSession, StampId};

use crate::logger::AppLogger;
use crate::views::{self, SurfaceTextures};

pub struct StampApp {
    session: EditSession,
    doc_id: Option<DocumentId>,
    next_doc_id: u64,
    current_page: u32,
    status: String,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<StampCommand>,
    update_rx: mpsc::UnboundedReceiver<StampUpdate>,

    // Replacing a texture handle drops the old GPU allocation, so page
    // renders and stamp overlays never accumulate
    page_texture: Option<egui::TextureHandle>,
    stamp_texture: Option<(StampId, egui::TextureHandle)>,

    logger: AppLogger,
    tokio_handle: tokio::runtime::Handle,
}

impl StampApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            session: EditSession::new(),
            doc_id: None,
            next_doc_id: 0,
            current_page: 1,
            status: String::new(),
            command_tx,
            update_rx,
            page_texture: None,
            stamp_texture: None,
            logger,
            tokio_handle,
        }
    }

    fn load_document(&mut self, path: std::path::PathBuf) {
        let doc_id = DocumentId(self.next_doc_id);
        self.next_doc_id += 1;
        self.doc_id = Some(doc_id);
        let _ = self
            .command_tx
            .send(StampCommand::LoadDocument { doc_id, path });
        self.status = "Loading PDF...".to_string();
    }

    /// Request a render of the current page, stamped when the page has a
    /// recorded placement whose asset is still in the library.
    fn request_render(&self) {
        let (Some(doc_id), Some(document)) = (self.doc_id, self.session.document.as_ref()) else {
            return;
        };

        let cmd = match self.session.stamp_for_page(self.current_page) {
            Some((stamp_png, placement)) => StampCommand::RenderStampedPage {
                doc_id,
                bytes: document.bytes().to_vec(),
                file_name: document.name.clone(),
                page_number: self.current_page,
                stamp_png: stamp_png.to_vec(),
                placement,
            },
            None => StampCommand::RenderPage {
                doc_id,
                bytes: document.bytes().to_vec(),
                file_name: document.name.clone(),
                page_number: self.current_page,
            },
        };
        let _ = self.command_tx.send(cmd);
    }

    fn refresh_stamp_texture(&mut self, ctx: &egui::Context) {
        let Some(placed) = self.session.surface.placed() else {
            self.stamp_texture = None;
            return;
        };
        if self.stamp_texture.as_ref().map(|(id, _)| *id) == Some(placed.stamp_id) {
            return;
        }

        let Some(asset) = self.session.library.get(placed.stamp_id) else {
            self.stamp_texture = None;
            return;
        };
        match image::load_from_memory(asset.bytes()) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                let texture =
                    ctx.load_texture("stamp", color_image, egui::TextureOptions::default());
                self.stamp_texture = Some((placed.stamp_id, texture));
            }
            Err(e) => {
                log::warn!("failed to decode stamp for display: {e}");
                self.stamp_texture = None;
            }
        }
    }
}

impl eframe::App for StampApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop for PDF files
        let mut dropped: Option<std::path::PathBuf> = None;
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    if path.extension().and_then(|s| s.to_str()) == Some("pdf") {
                        dropped = Some(path.clone());
                    }
                }
            }
        });
        if let Some(path) = dropped {
            self.load_document(path);
        }

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                StampUpdate::DocumentLoaded { doc_id, handle } => {
                    if Some(doc_id) == self.doc_id {
                        self.status =
                            format!("Loaded {} ({} pages)", handle.name, handle.page_count());
                        self.session.open_document(handle);
                        self.current_page = 1;
                        self.page_texture = None;
                        self.request_render();
                    }
                }
                StampUpdate::PageRendered {
                    doc_id,
                    page_number,
                    width,
                    height,
                    rgba_data,
                    stamped,
                } => {
                    if Some(doc_id) == self.doc_id && page_number == self.current_page {
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(
                            [width as usize, height as usize],
                            &rgba_data,
                        );
                        if let Some(texture) = &mut self.page_texture {
                            texture.set(color_image, egui::TextureOptions::default());
                        } else {
                            self.page_texture = Some(ctx.load_texture(
                                "pdf_page",
                                color_image,
                                egui::TextureOptions::default(),
                            ));
                        }
                        if stamped {
                            self.status = format!("Page {page_number} (stamped preview)");
                        }
                    }
                }
                StampUpdate::ExportComplete { path, .. } => {
                    self.status = format!("Stamped PDF → {}", path.display());
                }
                StampUpdate::Error { message } => {
                    self.status = format!("Error: {message}");
                }
            }
        }

        self.refresh_stamp_texture(ctx);

        let mut needs_render = false;
        let mut open_path: Option<std::path::PathBuf> = None;

        egui::SidePanel::left("stamp_library")
            .default_width(200.0)
            .show(ctx, |ui| {
                needs_render |= views::show_library(
                    ui,
                    &mut self.session,
                    &self.tokio_handle,
                    &mut self.status,
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open PDF…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("PDF", &["pdf"])
                        .pick_file()
                    {
                        open_path = Some(path);
                    }
                }
            });
            ui.separator();

            let textures = SurfaceTextures {
                page: self.page_texture.as_ref(),
                stamp: self.stamp_texture.as_ref().map(|(_, texture)| texture),
            };
            needs_render |= views::show_surface(
                ui,
                &mut self.session,
                self.doc_id,
                &mut self.current_page,
                textures,
                &self.tokio_handle,
                &self.command_tx,
                &mut self.status,
            );

            ui.separator();
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
            if let Some(message) = self.logger.latest_message() {
                ui.weak(message);
            }
        });

        if let Some(path) = open_path {
            self.load_document(path);
        }
        if needs_render {
            self.request_render();
        }
    }
}
