use std::path::PathBuf;

// Re-export types from library crates
pub use pdf_stamp::{DocumentHandle, StampId, SurfaceRect};

/// Commands sent from UI to worker.
///
/// The worker is stateless: commands carry the document bytes they operate
/// on, and every operation builds its own in-memory structures.
#[derive(Debug)]
pub enum StampCommand {
    LoadDocument {
        doc_id: DocumentId,
        path: PathBuf,
    },
    RenderPage {
        doc_id: DocumentId,
        bytes: Vec<u8>,
        file_name: String,
        page_number: u32,
    },
    /// Render a page with a stamp burned in for preview; the worker falls
    /// back to the plain render when stamping fails
    RenderStampedPage {
        doc_id: DocumentId,
        bytes: Vec<u8>,
        file_name: String,
        page_number: u32,
        stamp_png: Vec<u8>,
        placement: SurfaceRect,
    },
    /// Stamp one page (`page_number: Some`) or every page (`None`) and
    /// write the new document to `output_path`
    ExportStamped {
        doc_id: DocumentId,
        bytes: Vec<u8>,
        stamp_png: Vec<u8>,
        placement: Option<SurfaceRect>,
        page_number: Option<u32>,
        output_path: PathBuf,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum StampUpdate {
    DocumentLoaded {
        doc_id: DocumentId,
        handle: DocumentHandle,
    },
    PageRendered {
        doc_id: DocumentId,
        page_number: u32,
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
        stamped: bool,
    },
    ExportComplete {
        doc_id: DocumentId,
        path: PathBuf,
    },
    Error {
        message: String,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);
