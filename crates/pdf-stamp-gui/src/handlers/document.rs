use std::path::PathBuf;

use pdf_stamp::{DocumentHandle, SurfaceRect};
use stamp_async_runtime::{DocumentId, StampUpdate};
use tokio::sync::mpsc;

pub async fn handle_load(
    doc_id: DocumentId,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<StampUpdate>,
) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to read PDF file: {e}"),
            });
            return;
        }
    };

    match DocumentHandle::load(name, bytes).await {
        Ok(handle) => {
            let _ = update_tx.send(StampUpdate::DocumentLoaded { doc_id, handle });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to load PDF: {e}"),
            });
        }
    }
}

pub async fn handle_export(
    doc_id: DocumentId,
    bytes: Vec<u8>,
    stamp_png: Vec<u8>,
    placement: Option<SurfaceRect>,
    page_number: Option<u32>,
    output_path: PathBuf,
    update_tx: &mpsc::UnboundedSender<StampUpdate>,
) {
    let result = match page_number {
        Some(page) => pdf_stamp::stamp_page(&bytes, &stamp_png, placement, page).await,
        None => pdf_stamp::stamp_all_pages(&bytes, &stamp_png, placement).await,
    };

    let stamped = match result {
        Ok(stamped) => stamped,
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to stamp PDF: {e}"),
            });
            return;
        }
    };

    match tokio::fs::write(&output_path, stamped).await {
        Ok(()) => {
            let _ = update_tx.send(StampUpdate::ExportComplete {
                doc_id,
                path: output_path,
            });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to write stamped PDF: {e}"),
            });
        }
    }
}
