//! The editing-surface controller: owns the single placed stamp object
//!
//! The controller is the only writer of the placed-object reference.
//! Collaborators read it freely and feed drag/scale updates back through
//! [`SurfaceController::set_rect`].

use image::GenericImageView;

use crate::constants::{MAX_OBJECT_SIZE, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::library::{StampId, StampLibrary};
use crate::types::{Result, StampError, SurfaceRect};

/// The live stamp object on the editing surface
#[derive(Debug, Clone, Copy)]
pub struct PlacedStamp {
    pub stamp_id: StampId,
    pub rect: SurfaceRect,
}

#[derive(Debug, Default)]
pub struct SurfaceController {
    selected: Option<StampId>,
    placed: Option<PlacedStamp>,
}

impl SurfaceController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<StampId> {
        self.selected
    }

    pub fn placed(&self) -> Option<&PlacedStamp> {
        self.placed.as_ref()
    }

    /// Select a stamp, or deselect it when it is already the selection.
    /// Returns whether the stamp is selected afterwards. Deselection does
    /// not remove an already placed object; only a later `place` does.
    pub fn toggle_select(&mut self, id: StampId) -> bool {
        if self.selected == Some(id) {
            self.selected = None;
            false
        } else {
            self.selected = Some(id);
            true
        }
    }

    /// Place the selected stamp on the surface.
    ///
    /// Returns `None` without touching the surface when no stamp is
    /// selected (or the selected asset has been removed from the library).
    /// Any previously placed object is detached before the new one is
    /// attached, so at most one object is ever live. The asset image is
    /// decoded off-thread; on decode failure no object is left behind.
    pub async fn place(&mut self, library: &StampLibrary) -> Result<Option<&PlacedStamp>> {
        let Some(id) = self.selected else {
            return Ok(None);
        };

        self.placed = None;

        let Some(asset) = library.get(id) else {
            log::warn!("selected stamp {id:?} is no longer in the library");
            self.selected = None;
            return Ok(None);
        };

        let bytes = asset.bytes().to_vec();
        let (width, height) = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|img| img.dimensions())
        })
        .await?
        .map_err(|e| {
            log::error!("failed to decode stamp image: {e}");
            StampError::UnsupportedStampFormat
        })?;

        self.placed = Some(PlacedStamp {
            stamp_id: id,
            rect: initial_rect(f64::from(width), f64::from(height)),
        });
        Ok(self.placed.as_ref())
    }

    /// Make the placed object the active one, placing the selected stamp
    /// first when nothing is on the surface yet. Returns whether an object
    /// is active afterwards; fails when no stamp is selected at all.
    pub async fn focus(&mut self, library: &StampLibrary) -> Result<bool> {
        if self.placed.is_some() {
            return Ok(true);
        }
        if self.selected.is_none() {
            return Err(StampError::NoStampSelected);
        }
        Ok(self.place(library).await?.is_some())
    }

    /// Apply a drag/scale update from the view. Ignored when nothing is
    /// placed.
    pub fn set_rect(&mut self, rect: SurfaceRect) {
        if let Some(placed) = &mut self.placed {
            placed.rect = rect;
        }
    }

    /// Remove the placed object from the surface.
    pub fn clear_placed(&mut self) {
        self.placed = None;
    }
}

/// Initial geometry for a freshly placed image: uniformly downscaled to
/// the object size bound when oversized, centered on the surface.
fn initial_rect(width: f64, height: f64) -> SurfaceRect {
    let scale = if width > MAX_OBJECT_SIZE || height > MAX_OBJECT_SIZE {
        (MAX_OBJECT_SIZE / width).min(MAX_OBJECT_SIZE / height)
    } else {
        1.0
    };

    let scaled_width = width * scale;
    let scaled_height = height * scale;

    SurfaceRect {
        x: (SURFACE_WIDTH - scaled_width) / 2.0,
        y: (SURFACE_HEIGHT - scaled_height) / 2.0,
        width: scaled_width,
        height: scaled_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::png_stamp;

    fn library_with(width: u32, height: u32) -> (StampLibrary, StampId) {
        let mut library = StampLibrary::new();
        let id = library.add("stamp", png_stamp(width, height)).unwrap();
        (library, id)
    }

    #[tokio::test]
    async fn oversized_image_scales_uniformly() {
        let (library, id) = library_with(200, 50);
        let mut surface = SurfaceController::new();
        surface.toggle_select(id);

        let placed = surface.place(&library).await.unwrap().copied().unwrap();

        // min(100/200, 100/50) = 0.5 on both axes
        assert!((placed.rect.width - 100.0).abs() < 1e-9);
        assert!((placed.rect.height - 25.0).abs() < 1e-9);
        assert!((placed.rect.x - (SURFACE_WIDTH - 100.0) / 2.0).abs() < 1e-9);
        assert!((placed.rect.y - (SURFACE_HEIGHT - 25.0) / 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn small_image_keeps_intrinsic_size() {
        let (library, id) = library_with(40, 60);
        let mut surface = SurfaceController::new();
        surface.toggle_select(id);

        let placed = surface.place(&library).await.unwrap().copied().unwrap();
        assert!((placed.rect.width - 40.0).abs() < 1e-9);
        assert!((placed.rect.height - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn placing_twice_leaves_one_object() {
        let (library, id) = library_with(64, 64);
        let mut surface = SurfaceController::new();
        surface.toggle_select(id);

        surface.place(&library).await.unwrap();
        surface.set_rect(SurfaceRect::new(10.0, 10.0, 64.0, 64.0));

        // A second placement supersedes the first and resets its geometry
        let placed = surface.place(&library).await.unwrap().copied().unwrap();
        assert!((placed.rect.x - (SURFACE_WIDTH - 64.0) / 2.0).abs() < 1e-9);
        assert!(surface.placed().is_some());
    }

    #[tokio::test]
    async fn place_without_selection_is_a_no_op() {
        let (library, _) = library_with(64, 64);
        let mut surface = SurfaceController::new();

        assert!(surface.place(&library).await.unwrap().is_none());
        assert!(surface.placed().is_none());
    }

    #[tokio::test]
    async fn reselecting_toggles_off() {
        let (library, id) = library_with(64, 64);
        let mut surface = SurfaceController::new();

        assert!(surface.toggle_select(id));
        surface.place(&library).await.unwrap();
        assert!(!surface.toggle_select(id));

        // Deselection alone does not remove the placed object
        assert!(surface.selected().is_none());
        assert!(surface.placed().is_some());
    }

    #[tokio::test]
    async fn focus_without_selection_fails() {
        let (library, _) = library_with(64, 64);
        let mut surface = SurfaceController::new();

        let err = surface.focus(&library).await.unwrap_err();
        assert!(matches!(err, StampError::NoStampSelected));
    }

    #[tokio::test]
    async fn focus_places_selected_stamp() {
        let (library, id) = library_with(64, 64);
        let mut surface = SurfaceController::new();
        surface.toggle_select(id);

        assert!(surface.focus(&library).await.unwrap());
        assert!(surface.placed().is_some());

        // Second focus reuses the existing object
        assert!(surface.focus(&library).await.unwrap());
    }

    #[tokio::test]
    async fn decode_failure_leaves_surface_empty() {
        let mut library = StampLibrary::new();
        // PNG magic with a truncated body: passes the format gate, fails
        // to decode
        let mut bogus = crate::constants::PNG_MAGIC.to_vec();
        bogus.extend_from_slice(&[0, 0, 0, 0]);
        let id = library.add("broken", bogus).unwrap();

        let mut surface = SurfaceController::new();
        surface.toggle_select(id);

        assert!(surface.place(&library).await.is_err());
        assert!(surface.placed().is_none());
    }
}
