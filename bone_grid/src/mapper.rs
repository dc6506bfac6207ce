//! Proportional mapping between two rectangles.

use tracing::debug;

use crate::linear::LinearMap;
use crate::point::Point;
use crate::rect::Rect;

/// Separable affine transform carrying points from a source [`Rect`] onto a
/// destination [`Rect`], one [`LinearMap`] per axis. No rotation or shear.
///
/// Built from a snapshot of both rectangles; when the source grows the
/// mapper is thrown away and rebuilt rather than adjusted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectMapper {
    y_map:      LinearMap,
    x_map:      LinearMap,
    degenerate: bool,
}

impl RectMapper {
    /// For each axis, `slope = dest_extent / source_extent` and the intercept
    /// sends the source origin onto the destination origin:
    /// `intercept = dest_origin - source_origin * slope`. For a destination
    /// at origin 0, which is every grid built by [`Rect::for_grid`], this is
    /// the same value as `(dest_origin - source_origin) * slope`.
    ///
    /// A source extent that is zero, negative or not finite cannot be divided
    /// by; it is treated as an extent of `1.0` instead, so that axis maps with
    /// `slope = dest_extent` and [`is_degenerate`](Self::is_degenerate)
    /// reports `true`.
    pub fn new(source: &Rect, dest: &Rect) -> Self {
        let (y_extent, y_degenerate) = usable_extent(source.height);
        let (x_extent, x_degenerate) = usable_extent(source.width);

        if y_degenerate || x_degenerate {
            debug!(
                height = source.height,
                width  = source.width,
                "degenerate source extent, falling back to unit extent"
            );
        }

        RectMapper {
            y_map:      axis_map(source.top,  y_extent, dest.top,  dest.height),
            x_map:      axis_map(source.left, x_extent, dest.left, dest.width),
            degenerate: y_degenerate || x_degenerate,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point(self.y_map.apply(point.0), self.x_map.apply(point.1))
    }

    pub fn y_map(&self) -> LinearMap { self.y_map }
    pub fn x_map(&self) -> LinearMap { self.x_map }

    /// True if either source extent had to be replaced by the unit fallback.
    pub fn is_degenerate(&self) -> bool { self.degenerate }
}

fn usable_extent(extent: f64) -> (f64, bool) {
    if extent.is_finite() && extent > 0.0 {
        (extent, false)
    } else {
        (1.0, true)
    }
}

fn axis_map(src_origin: f64, src_extent: f64, dst_origin: f64, dst_extent: f64) -> LinearMap {
    let slope = dst_extent / src_extent;
    LinearMap::new(slope, dst_origin - src_origin * slope)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn maps_corners_and_centre() {
        let src = Rect::new(0.0, 0.0, 10.0, 20.0);
        let dst = Rect::new(0.0, 0.0, 5.0, 10.0);
        let m = RectMapper::new(&src, &dst);

        assert_eq!(m.apply(Point(0.0, 0.0)), Point(0.0, 0.0));
        assert_eq!(m.apply(Point(10.0, 20.0)), Point(5.0, 10.0));
        assert_eq!(m.apply(Point(5.0, 10.0)), Point(2.5, 5.0));
        assert!(!m.is_degenerate());
    }

    #[test]
    fn axes_are_independent() {
        let src = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dst = Rect::new(0.0, 0.0, 100.0, 1.0);
        let m = RectMapper::new(&src, &dst);
        assert_eq!(m.y_map().slope(), 10.0);
        assert_eq!(m.x_map().slope(), 0.1);
        assert_eq!(m.apply(Point(3.0, 0.0)).1, 0.0);
    }

    #[test]
    fn negative_source_origin_maps_to_destination_origin() {
        let src = Rect::new(-50.0, -200.0, 100.0, 400.0);
        let dst = Rect::for_grid(24, 80);
        let m = RectMapper::new(&src, &dst);
        assert!(approx(m.apply(Point(-50.0, -200.0)), Point(0.0, 0.0)));
        assert!(approx(m.apply(Point(50.0, 200.0)), Point(23.0, 79.0)));
    }

    #[test]
    fn offset_destination_origin() {
        let src = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dst = Rect::new(5.0, 5.0, 20.0, 20.0);
        let m = RectMapper::new(&src, &dst);
        assert!(approx(m.apply(Point(0.0, 0.0)), Point(5.0, 5.0)));
        assert!(approx(m.apply(Point(10.0, 10.0)), Point(25.0, 25.0)));
    }

    #[test]
    fn zero_height_falls_back_to_unit_extent() {
        let src = Rect::new(0.0, 0.0, 0.0, 20.0);
        let dst = Rect::new(0.0, 0.0, 5.0, 10.0);
        let m = RectMapper::new(&src, &dst);

        assert!(m.is_degenerate());
        assert_eq!(m.y_map(), LinearMap::new(5.0, 0.0));
        assert_eq!(m.x_map(), LinearMap::new(0.5, 0.0));
        let out = m.apply(Point(0.0, 20.0));
        assert!(out.is_finite());
        assert_eq!(out, Point(0.0, 10.0));
    }

    #[test]
    fn fully_degenerate_source_is_finite() {
        let src = Rect::new(3.0, 4.0, 0.0, 0.0);
        let dst = Rect::for_grid(24, 80);
        let m = RectMapper::new(&src, &dst);
        assert!(m.apply(Point(3.0, 4.0)).is_finite());
        assert_eq!(m.apply(Point(3.0, 4.0)), Point(0.0, 0.0));
    }

    proptest! {
        #[test]
        fn source_rect_lands_in_destination(
            top in -500.0..500.0f64,
            left in -500.0..500.0f64,
            h in 0.5..800.0f64,
            w in 0.5..800.0f64,
            fy in 0.0..=1.0f64,
            fx in 0.0..=1.0f64,
        ) {
            let src = Rect::new(top, left, h, w);
            let dst = Rect::for_grid(24, 80);
            let m = RectMapper::new(&src, &dst);
            let out = m.apply(Point(top + fy * h, left + fx * w));
            prop_assert!((out.0 - fy * dst.height).abs() < 1e-6);
            prop_assert!((out.1 - fx * dst.width).abs() < 1e-6);
        }
    }
}
