//! Explicit session state shared between the core and its UI collaborator
//!
//! Ownership is split deliberately: the surface controller writes the
//! placed object, the library writes the asset list, and the session
//! itself writes the document handle and the per-page placement records.

use std::collections::HashMap;

use lopdf::Document;

use crate::library::{StampId, StampLibrary};
use crate::surface::SurfaceController;
use crate::types::{Result, StampError, SurfaceRect};

/// Opaque handle over raw PDF bytes with the page count cached at load
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub name: String,
    bytes: Vec<u8>,
    page_count: u32,
}

impl DocumentHandle {
    /// Parse `bytes` far enough to count pages and wrap them in a handle.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let doc = Document::load_mem(&bytes)?;
        let page_count = doc.get_pages().len() as u32;
        Ok(Self {
            name: name.into(),
            bytes,
            page_count,
        })
    }

    /// Parsing is CPU-bound, spawn blocking
    pub async fn load(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        tokio::task::spawn_blocking(move || Self::from_bytes(name, bytes)).await?
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn validate_page(&self, page: u32) -> Result<()> {
        if page < 1 || page > self.page_count {
            return Err(StampError::InvalidPageNumber {
                page,
                page_count: self.page_count,
            });
        }
        Ok(())
    }
}

/// A stamp recorded for a specific page, in editing-surface units
#[derive(Debug, Clone, Copy)]
pub struct PlacementRecord {
    pub stamp_id: StampId,
    pub rect: SurfaceRect,
}

#[derive(Debug, Default)]
pub struct EditSession {
    pub document: Option<DocumentHandle>,
    pub library: StampLibrary,
    pub surface: SurfaceController,
    placements: HashMap<u32, PlacementRecord>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new document; placement records belong to the old one.
    pub fn open_document(&mut self, handle: DocumentHandle) {
        self.document = Some(handle);
        self.placements.clear();
    }

    /// Snapshot the currently placed object as this page's stamp.
    pub fn record_placement(&mut self, page: u32) -> Result<()> {
        let document = self.document.as_ref().ok_or(StampError::NoDocument)?;
        document.validate_page(page)?;

        let placed = self.surface.placed().ok_or(StampError::NoStampSelected)?;
        self.placements.insert(
            page,
            PlacementRecord {
                stamp_id: placed.stamp_id,
                rect: placed.rect,
            },
        );
        Ok(())
    }

    pub fn clear_placement(&mut self, page: u32) {
        self.placements.remove(&page);
    }

    pub fn placement(&self, page: u32) -> Option<&PlacementRecord> {
        self.placements.get(&page)
    }

    /// Resolve a page's recorded placement against the live library.
    ///
    /// Returns `None` when nothing is recorded for the page or the
    /// referenced asset has since been removed; callers then serve the
    /// unstamped render instead of failing the request.
    pub fn stamp_for_page(&self, page: u32) -> Option<(&[u8], SurfaceRect)> {
        let record = self.placements.get(&page)?;
        let asset = self.library.get(record.stamp_id)?;
        Some((asset.bytes(), record.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{pdf_with_page_sizes, png_stamp};

    async fn session_with_placed_stamp() -> (EditSession, StampId) {
        let mut session = EditSession::new();
        let pdf = pdf_with_page_sizes(&[(612.0, 792.0), (612.0, 792.0)]);
        session.open_document(DocumentHandle::from_bytes("sample.pdf", pdf).unwrap());

        let id = session.library.add("stamp", png_stamp(64, 64)).unwrap();
        session.surface.toggle_select(id);
        session.surface.place(&session.library).await.unwrap();
        (session, id)
    }

    #[tokio::test]
    async fn records_and_resolves_placement() {
        let (mut session, id) = session_with_placed_stamp().await;

        session.record_placement(1).unwrap();
        let record = session.placement(1).unwrap();
        assert_eq!(record.stamp_id, id);

        let (bytes, rect) = session.stamp_for_page(1).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(rect, record.rect);
        assert!(session.stamp_for_page(2).is_none());
    }

    #[tokio::test]
    async fn removed_asset_falls_back_to_unstamped() {
        let (mut session, id) = session_with_placed_stamp().await;
        session.record_placement(1).unwrap();

        assert!(session.library.remove(id));

        // The record survives, but resolution yields nothing to stamp with
        assert!(session.placement(1).is_some());
        assert!(session.stamp_for_page(1).is_none());
    }

    #[tokio::test]
    async fn record_validates_page_range() {
        let (mut session, _) = session_with_placed_stamp().await;

        let err = session.record_placement(3).unwrap_err();
        assert!(matches!(
            err,
            StampError::InvalidPageNumber {
                page: 3,
                page_count: 2
            }
        ));
    }

    #[test]
    fn record_requires_document_and_object() {
        let mut session = EditSession::new();
        assert!(matches!(
            session.record_placement(1),
            Err(StampError::NoDocument)
        ));

        let pdf = pdf_with_page_sizes(&[(612.0, 792.0)]);
        session.open_document(DocumentHandle::from_bytes("sample.pdf", pdf).unwrap());
        assert!(matches!(
            session.record_placement(1),
            Err(StampError::NoStampSelected)
        ));
    }

    #[test]
    fn handle_caches_page_count() {
        let pdf = pdf_with_page_sizes(&[(612.0, 792.0); 3]);
        let handle = DocumentHandle::from_bytes("sample.pdf", pdf).unwrap();
        assert_eq!(handle.page_count(), 3);
        assert!(handle.validate_page(3).is_ok());
        assert!(handle.validate_page(0).is_err());
        assert!(handle.validate_page(4).is_err());
    }
}
