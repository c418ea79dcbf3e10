//! Stamp compositing: embed a PNG into an existing PDF's page content
//!
//! Every call parses the source bytes into a fresh in-memory document,
//! embeds the stamp image once, draws it onto the target page(s), and
//! serializes a new byte buffer. The caller's bytes are never mutated.

use crate::constants::is_png;
use crate::transform::{default_placement, to_page_space};
use crate::types::{PageGeometry, Result, StampError, SurfaceRect};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, xobject};

#[derive(Debug, Clone, Copy)]
enum Target {
    Page(u32),
    All,
}

/// Burn a stamp into a single page, returning a fresh PDF byte buffer.
///
/// `placement` is in editing-surface units; with `None` the stamp is drawn
/// as the default centered square. `page_number` is 1-based.
pub async fn stamp_page(
    bytes: &[u8],
    stamp_png: &[u8],
    placement: Option<SurfaceRect>,
    page_number: u32,
) -> Result<Vec<u8>> {
    let bytes = bytes.to_vec();
    let stamp = stamp_png.to_vec();
    tokio::task::spawn_blocking(move || {
        stamp_sync(&bytes, &stamp, placement, Target::Page(page_number))
    })
    .await?
}

/// Burn a stamp into every page, returning a fresh PDF byte buffer.
pub async fn stamp_all_pages(
    bytes: &[u8],
    stamp_png: &[u8],
    placement: Option<SurfaceRect>,
) -> Result<Vec<u8>> {
    let bytes = bytes.to_vec();
    let stamp = stamp_png.to_vec();
    tokio::task::spawn_blocking(move || stamp_sync(&bytes, &stamp, placement, Target::All)).await?
}

/// Count the pages of a PDF document.
pub async fn page_count(bytes: &[u8]) -> Result<u32> {
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || {
        let doc = Document::load_mem(&bytes)?;
        Ok(doc.get_pages().len() as u32)
    })
    .await?
}

fn stamp_sync(
    bytes: &[u8],
    stamp_png: &[u8],
    placement: Option<SurfaceRect>,
    target: Target,
) -> Result<Vec<u8>> {
    // The stamp must be the PNG it is declared to be; no sniffing fallback
    if !is_png(stamp_png) {
        return Err(StampError::UnsupportedStampFormat);
    }

    let mut doc = Document::load_mem(bytes).map_err(|e| coarse(e.into()))?;

    let pages = doc.get_pages();
    let page_count = pages.len() as u32;
    let targets: Vec<(u32, ObjectId)> = match target {
        Target::Page(page) => {
            let page_id = pages
                .get(&page)
                .copied()
                .ok_or(StampError::InvalidPageNumber { page, page_count })?;
            vec![(page, page_id)]
        }
        Target::All => pages.into_iter().collect(),
    };

    apply_stamp(&mut doc, stamp_png, placement, &targets).map_err(coarse)?;

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| coarse(e.into()))?;
    Ok(out)
}

/// Collapse internal failures into the single coarse kind callers see.
/// The underlying cause survives only in the log.
fn coarse(err: StampError) -> StampError {
    match err {
        StampError::ApplyFailed(msg) => {
            log::error!("stamp compositing failed: {msg}");
            StampError::ApplyFailed(msg)
        }
        other => {
            log::error!("stamp compositing failed: {other}");
            StampError::ApplyFailed(other.to_string())
        }
    }
}

fn apply_stamp(
    doc: &mut Document,
    stamp_png: &[u8],
    placement: Option<SurfaceRect>,
    targets: &[(u32, ObjectId)],
) -> Result<()> {
    // Embed the image stream once; every page references the same object
    let image = xobject::image_from(stamp_png.to_vec())?;
    let image_id = doc.add_object(image);
    let name = format!("Stamp{}", image_id.0);

    for (page_number, page_id) in targets {
        let geometry = page_geometry(doc, *page_id).ok_or_else(|| {
            StampError::ApplyFailed(format!("page {page_number}: MediaBox not found"))
        })?;

        let rect = match placement {
            Some(surface_rect) => to_page_space(surface_rect, geometry),
            None => default_placement(geometry),
        };

        doc.add_xobject(*page_id, name.as_bytes(), image_id)?;

        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    rect.width.into(),
                    0.into(),
                    0.into(),
                    rect.height.into(),
                    rect.x.into(),
                    rect.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
            Operation::new("Q", vec![]),
        ];
        doc.add_to_page_content(*page_id, Content { operations })?;
    }

    Ok(())
}

/// Resolve a page's intrinsic geometry from its MediaBox, walking Parent
/// links when the box is inherited from the page tree.
fn page_geometry(doc: &Document, page_id: ObjectId) -> Option<PageGeometry> {
    let mut current = page_id;

    for _ in 0..32 {
        let dict = match doc.get_object(current).ok()? {
            Object::Dictionary(dict) => dict,
            Object::Stream(stream) => &stream.dict,
            _ => return None,
        };

        if let Ok(media_box) = dict.get(b"MediaBox") {
            return media_box_geometry(doc, media_box);
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }

    None
}

fn media_box_geometry(doc: &Document, obj: &Object) -> Option<PageGeometry> {
    let arr = match obj {
        Object::Array(arr) => arr,
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        _ => return None,
    };
    if arr.len() != 4 {
        return None;
    }

    let llx = object_to_f64(&arr[0])?;
    let lly = object_to_f64(&arr[1])?;
    let urx = object_to_f64(&arr[2])?;
    let ury = object_to_f64(&arr[3])?;

    let width = urx - llx;
    let height = ury - lly;
    (width > 0.0 && height > 0.0).then(|| PageGeometry::new(width, height))
}

fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(f64::from(*v)),
        _ => None,
    }
}
