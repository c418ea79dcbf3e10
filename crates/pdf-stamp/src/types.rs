use thiserror::Error;

use crate::constants::{SURFACE_HEIGHT, SURFACE_WIDTH};

#[derive(Error, Debug)]
pub enum StampError {
    #[error("page {page} out of range: valid pages are 1..={page_count}")]
    InvalidPageNumber { page: u32, page_count: u32 },
    #[error("stamp image is not a PNG payload")]
    UnsupportedStampFormat,
    /// Coarse compositing failure; the underlying cause is logged, the
    /// carried detail is for diagnostics only and stays out of Display
    #[error("failed to apply stamp")]
    ApplyFailed(String),
    #[error("no stamp selected")]
    NoStampSelected,
    #[error("stamp library is full ({max} assets)")]
    LibraryFull { max: usize },
    #[error("no document loaded")]
    NoDocument,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Rectangle in editing-surface units: origin top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Rectangle in PDF page units: origin bottom-left, y grows upward
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Intrinsic page width/height in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Geometry matching the editing surface itself (identity scale)
    pub fn surface() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}
