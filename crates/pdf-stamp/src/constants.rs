//! Shared constants for the stamping pipeline
//!
//! This module centralizes the editing-surface geometry and stamp limits
//! used throughout the workspace. The surface dimensions feed the
//! coordinate transform directly, so they must never be read from any UI
//! measurement.

// =============================================================================
// Editing Surface
// =============================================================================

/// Width of the editing surface in surface units
pub const SURFACE_WIDTH: f64 = 500.0;

/// Height of the editing surface: width × √2 (A-series proportions),
/// rounded to 2 decimal places
pub const SURFACE_HEIGHT: f64 = 707.11;

// =============================================================================
// Stamp Sizing
// =============================================================================

/// Side length of the default stamp square, in page units
pub const DEFAULT_STAMP_SIZE: f64 = 100.0;

/// Maximum width/height of a freshly placed stamp object, in surface units.
/// Larger images are downscaled uniformly to fit this bound.
pub const MAX_OBJECT_SIZE: f64 = 100.0;

// =============================================================================
// Stamp Library
// =============================================================================

/// Maximum number of live stamp assets in the library
pub const MAX_STAMP_ASSETS: usize = 5;

// =============================================================================
// Rendering
// =============================================================================

/// Scale factor for page previews. A quality knob only: previews are
/// displayed at the fixed surface size regardless of raster resolution.
pub const PREVIEW_RENDER_SCALE: f32 = 4.0;

// =============================================================================
// Image Formats
// =============================================================================

/// PNG signature bytes
pub const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Check whether a byte buffer is a PNG payload
#[inline]
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.len() >= PNG_MAGIC.len() && bytes.starts_with(&PNG_MAGIC)
}
