//! Coordinate transformation between editing-surface and PDF page space
//!
//! The editing surface has its origin at the top-left with y growing
//! downward; PDF page space has its origin at the bottom-left with y
//! growing upward. All translation between the two happens here.

use crate::constants::{DEFAULT_STAMP_SIZE, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::types::{PageGeometry, PageRect, SurfaceRect};

/// Convert a rectangle in editing-surface units to page units.
///
/// The x coordinate is clamped to be non-negative. The y coordinate is
/// left unclamped: it is legitimately 0.0 for a stamp sitting on the
/// bottom edge, and callers that must keep the rectangle on-page can
/// apply [`clamp_to_page`] afterwards.
pub fn to_page_space(rect: SurfaceRect, page: PageGeometry) -> PageRect {
    let scale_x = page.width / SURFACE_WIDTH;
    let scale_y = page.height / SURFACE_HEIGHT;

    let width = rect.width * scale_x;
    let height = rect.height * scale_y;

    PageRect {
        x: (rect.x * scale_x).max(0.0),
        // Flip the vertical axis: surface origin is top-left, page origin
        // is bottom-left
        y: page.height - rect.y * scale_y - height,
        width,
        height,
    }
}

/// Default placement when no surface rectangle was supplied: a
/// 100×100-unit square centered on the page, expressed directly in page
/// units (it never passes through the surface transform).
pub fn default_placement(page: PageGeometry) -> PageRect {
    PageRect {
        x: page.width / 2.0 - DEFAULT_STAMP_SIZE / 2.0,
        y: page.height / 2.0 - DEFAULT_STAMP_SIZE / 2.0,
        width: DEFAULT_STAMP_SIZE,
        height: DEFAULT_STAMP_SIZE,
    }
}

/// Clamp a page rectangle's position so the draw call stays on-page.
pub fn clamp_to_page(rect: PageRect, page: PageGeometry) -> PageRect {
    PageRect {
        x: rect.x.clamp(0.0, (page.width - rect.width).max(0.0)),
        y: rect.y.clamp(0.0, (page.height - rect.height).max(0.0)),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPSILON, "expected {b}, got {a}");
    }

    #[test]
    fn identity_scale_is_axis_flip_only() {
        // When the page matches the surface dimensions, only the vertical
        // axis flips
        let page = PageGeometry::surface();
        let rect = SurfaceRect::new(120.0, 40.0, 80.0, 60.0);

        let out = to_page_space(rect, page);

        assert_close(out.x, 120.0);
        assert_close(out.y, SURFACE_HEIGHT - 40.0 - 60.0);
        assert_close(out.width, 80.0);
        assert_close(out.height, 60.0);
    }

    #[test]
    fn scales_to_page_geometry() {
        let page = PageGeometry::new(SURFACE_WIDTH * 2.0, SURFACE_HEIGHT * 2.0);
        let rect = SurfaceRect::new(100.0, 50.0, 40.0, 30.0);

        let out = to_page_space(rect, page);

        assert_close(out.x, 200.0);
        assert_close(out.width, 80.0);
        assert_close(out.height, 60.0);
        assert_close(out.y, page.height - 100.0 - 60.0);
    }

    #[test]
    fn negative_x_clamps_to_zero() {
        let page = PageGeometry::new(612.0, 792.0);
        let rect = SurfaceRect::new(-25.0, 10.0, 50.0, 50.0);

        let out = to_page_space(rect, page);

        assert_close(out.x, 0.0);
    }

    #[test]
    fn y_is_not_clamped() {
        // A stamp dragged below the bottom edge transforms to a negative
        // page y; the transform leaves it alone
        let page = PageGeometry::new(612.0, 792.0);
        let rect = SurfaceRect::new(0.0, SURFACE_HEIGHT, 50.0, 50.0);

        let out = to_page_space(rect, page);

        assert!(out.y < 0.0);
    }

    #[test]
    fn bottom_edge_maps_to_y_zero() {
        let page = PageGeometry::surface();
        let height = 60.0;
        let rect = SurfaceRect::new(0.0, SURFACE_HEIGHT - height, 50.0, height);

        let out = to_page_space(rect, page);

        assert_close(out.y, 0.0);
    }

    #[test]
    fn default_placement_is_centered_square() {
        for (w, h) in [(612.0, 792.0), (595.0, 842.0), (200.0, 200.0)] {
            let out = default_placement(PageGeometry::new(w, h));
            assert_close(out.x, w / 2.0 - 50.0);
            assert_close(out.y, h / 2.0 - 50.0);
            assert_close(out.width, 100.0);
            assert_close(out.height, 100.0);
        }
    }

    #[test]
    fn clamp_to_page_bounds_both_axes() {
        let page = PageGeometry::new(612.0, 792.0);

        let low = clamp_to_page(
            PageRect {
                x: -10.0,
                y: -20.0,
                width: 100.0,
                height: 100.0,
            },
            page,
        );
        assert_close(low.x, 0.0);
        assert_close(low.y, 0.0);

        let high = clamp_to_page(
            PageRect {
                x: 600.0,
                y: 780.0,
                width: 100.0,
                height: 100.0,
            },
            page,
        );
        assert_close(high.x, 612.0 - 100.0);
        assert_close(high.y, 792.0 - 100.0);
    }
}
