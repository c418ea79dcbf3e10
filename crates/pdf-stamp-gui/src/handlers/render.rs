use stamp_async_runtime::{StampCommand, StampUpdate};
use tokio::sync::mpsc;

/// Render a page (plain or with a stamp burned in) and hand the UI an
/// RGBA buffer ready for texture upload.
pub async fn handle_render(cmd: StampCommand, update_tx: &mpsc::UnboundedSender<StampUpdate>) {
    let (doc_id, bytes, file_name, page_number, stamp) = match cmd {
        StampCommand::RenderPage {
            doc_id,
            bytes,
            file_name,
            page_number,
        } => (doc_id, bytes, file_name, page_number, None),
        StampCommand::RenderStampedPage {
            doc_id,
            bytes,
            file_name,
            page_number,
            stamp_png,
            placement,
        } => (doc_id, bytes, file_name, page_number, Some((stamp_png, placement))),
        _ => return,
    };

    let stamped = stamp.is_some();
    let result = match &stamp {
        Some((stamp_png, placement)) => {
            pdf_render::render_stamped_page(
                &bytes,
                &file_name,
                page_number,
                Some((stamp_png.as_slice(), Some(*placement))),
            )
            .await
        }
        None => pdf_render::render_page_preview(&bytes, &file_name, page_number).await,
    };

    let page = match result {
        Ok(page) => page,
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to render page: {e}"),
            });
            return;
        }
    };

    // Decode the preview PNG back to raw RGBA for the texture upload
    let decoded = tokio::task::spawn_blocking(move || {
        image::load_from_memory(&page.png).map(|img| {
            let rgba = img.to_rgba8();
            (rgba.width(), rgba.height(), rgba.into_raw())
        })
    })
    .await;

    match decoded {
        Ok(Ok((width, height, rgba_data))) => {
            let _ = update_tx.send(StampUpdate::PageRendered {
                doc_id,
                page_number,
                width,
                height,
                rgba_data,
                stamped,
            });
        }
        Ok(Err(e)) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Failed to decode rendered page: {e}"),
            });
        }
        Err(e) => {
            let _ = update_tx.send(StampUpdate::Error {
                message: format!("Task join error: {e}"),
            });
        }
    }
}
