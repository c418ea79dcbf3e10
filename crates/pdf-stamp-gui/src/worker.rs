use stamp_async_runtime::{StampCommand, StampUpdate};
use tokio::sync::mpsc;

use crate::handlers;

/// Async worker task that processes stamp commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<StampCommand>,
    update_tx: mpsc::UnboundedSender<StampUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
}

async fn process_command(
    cmd: StampCommand,
    command_rx: &mut mpsc::UnboundedReceiver<StampCommand>,
    update_tx: &mpsc::UnboundedSender<StampUpdate>,
) {
    match cmd {
        StampCommand::LoadDocument { doc_id, path } => {
            handlers::document::handle_load(doc_id, path, update_tx).await;
        }
        cmd @ (StampCommand::RenderPage { .. } | StampCommand::RenderStampedPage { .. }) => {
            let mut render_cmd = cmd;

            // Deduplicate render commands - keep the most recent one
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    next @ (StampCommand::RenderPage { .. }
                    | StampCommand::RenderStampedPage { .. }) => {
                        log::debug!("Discarding queued page render, using newer request");
                        render_cmd = next;
                    }
                    other => {
                        // Non-render command found, process it before rendering
                        Box::pin(process_command(other, command_rx, update_tx)).await;
                    }
                }
            }

            handlers::render::handle_render(render_cmd, update_tx).await;
        }
        StampCommand::ExportStamped {
            doc_id,
            bytes,
            stamp_png,
            placement,
            page_number,
            output_path,
        } => {
            handlers::document::handle_export(
                doc_id,
                bytes,
                stamp_png,
                placement,
                page_number,
                output_path,
                update_tx,
            )
            .await;
        }
    }
}
