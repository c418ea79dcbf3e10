//! Page rasterization via pdfium
//!
//! Renders single PDF pages to PNG for preview display and export
//! confirmation. Rendering is a quality knob only: previews are shown at
//! the fixed editing-surface size no matter the raster resolution.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pdfium_render::prelude::*;
use thiserror::Error;

use pdf_stamp::SurfaceRect;
use pdf_stamp::constants::PREVIEW_RENDER_SCALE;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("page {page} out of range: valid pages are 1..={page_count}")]
    InvalidPageNumber { page: u32, page_count: u32 },
    #[error("failed to render page {page} of {file}")]
    RenderFailed { page: u32, file: String },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// A rasterized page: encoded PNG plus the labels downstream consumers
/// need for display and download naming
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
    pub page_number: u32,
}

impl RenderedPage {
    /// Encode the raster as a `data:image/png;base64,…` URL.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Initialize pdfium, trying the vendored library first, then falling
/// back to the system library.
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Render one page of a PDF to a PNG image.
///
/// `page_number` is 1-based and validated against the document before any
/// rendering work happens.
pub async fn render_page(
    bytes: &[u8],
    file_name: &str,
    page_number: u32,
    scale: f32,
) -> Result<RenderedPage> {
    let bytes = bytes.to_vec();
    let file = file_name.to_string();
    tokio::task::spawn_blocking(move || render_page_sync(&bytes, &file, page_number, scale)).await?
}

/// Render a page at the fixed preview scale.
pub async fn render_page_preview(
    bytes: &[u8],
    file_name: &str,
    page_number: u32,
) -> Result<RenderedPage> {
    render_page(bytes, file_name, page_number, PREVIEW_RENDER_SCALE).await
}

/// Render a page with a stamp burned in, falling back to the unstamped
/// render when stamping or the stamped render fails. Page-range errors
/// still surface: the fallback render validates the same page number.
pub async fn render_stamped_page(
    bytes: &[u8],
    file_name: &str,
    page_number: u32,
    stamp: Option<(&[u8], Option<SurfaceRect>)>,
) -> Result<RenderedPage> {
    if let Some((stamp_png, placement)) = stamp {
        match pdf_stamp::stamp_page(bytes, stamp_png, placement, page_number).await {
            Ok(stamped) => {
                match render_page(&stamped, file_name, page_number, PREVIEW_RENDER_SCALE).await {
                    Ok(page) => return Ok(page),
                    Err(e) => log::warn!(
                        "stamped preview failed for page {page_number} of {file_name}, serving unstamped render: {e}"
                    ),
                }
            }
            Err(e) => log::warn!(
                "could not stamp page {page_number} of {file_name} for preview, serving unstamped render: {e}"
            ),
        }
    }

    render_page_preview(bytes, file_name, page_number).await
}

fn render_page_sync(
    bytes: &[u8],
    file_name: &str,
    page_number: u32,
    scale: f32,
) -> Result<RenderedPage> {
    let fail = |stage: &str, detail: String| {
        log::error!("{stage} failed for page {page_number} of {file_name}: {detail}");
        RenderError::RenderFailed {
            page: page_number,
            file: file_name.to_string(),
        }
    };

    let pdfium = init_pdfium().map_err(|e| fail("pdfium initialization", e.to_string()))?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| fail("document load", e.to_string()))?;

    let page_count = u32::from(document.pages().len());
    if page_number < 1 || page_number > page_count {
        return Err(RenderError::InvalidPageNumber {
            page: page_number,
            page_count,
        });
    }

    let pages = document.pages();
    let page = pages
        .get((page_number - 1) as u16)
        .map_err(|e| fail("page lookup", e.to_string()))?;

    let config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| fail("rasterization", e.to_string()))?;

    let image = bitmap.as_image();
    let width = image.width();
    let height = image.height();

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| fail("PNG encoding", e.to_string()))?;

    Ok(RenderedPage {
        png,
        width,
        height,
        file_name: file_name.to_string(),
        page_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_has_png_prefix() {
        let page = RenderedPage {
            png: vec![1, 2, 3],
            width: 1,
            height: 1,
            file_name: "sample.pdf".to_string(),
            page_number: 1,
        };

        let url = page.data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url, format!("data:image/png;base64,{}", STANDARD.encode([1u8, 2, 3])));
    }
}
