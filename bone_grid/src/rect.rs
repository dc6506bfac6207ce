//! Axis-aligned rectangles with inclusive bounds.
//!
//! Axis 0 of a [`Point`] pairs with `top`/`height`, axis 1 with
//! `left`/`width`. The covered region is the closed box
//! `[top, top + height] × [left, left + width]`, so the far row and column
//! are part of the rectangle.

use crate::point::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top:    f64,
    pub left:   f64,
    pub height: f64,
    pub width:  f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, height: f64, width: f64) -> Self {
        Rect { top, left, height, width }
    }

    /// The starting source rectangle: 1×1 at the origin. Grows as points
    /// arrive and never shrinks back.
    pub fn seed() -> Self {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }

    /// The addressable area of a `rows × cols` grid, with the far edges on
    /// the last row and column (`rows - 1`, `cols - 1`).
    pub fn for_grid(rows: u16, cols: u16) -> Self {
        Rect::new(
            0.0,
            0.0,
            f64::from(rows.saturating_sub(1)),
            f64::from(cols.saturating_sub(1)),
        )
    }

    pub fn bottom(&self) -> f64 { self.top + self.height }
    pub fn right(&self)  -> f64 { self.left + self.width }

    pub fn far_corner(&self) -> Point {
        Point(self.bottom(), self.right())
    }

    /// Pull each coordinate into `[origin, origin + extent]`.
    pub fn clamp(&self, point: Point) -> Point {
        Point(
            clamp_axis(point.0, self.top, self.bottom()),
            clamp_axis(point.1, self.left, self.right()),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.0 >= self.top
            && point.0 <= self.bottom()
            && point.1 >= self.left
            && point.1 <= self.right()
    }

    /// [`expand_to_include_with`](Self::expand_to_include_with) with one unit
    /// of padding past the bottom and right edges.
    pub fn expand_to_include(&mut self, point: Point) -> bool {
        self.expand_to_include_with(point, true, true)
    }

    /// Grow the rectangle until it covers `point`.
    ///
    /// A coordinate below the origin drags the origin down to it while the
    /// far edge stays where it was. A coordinate past the far edge pushes the
    /// far edge out to it, plus one unit when the matching `exclusive_*` flag
    /// is set, so the point ends up strictly inside rather than on the edge.
    /// Axes whose coordinate is already in range are not touched, which makes
    /// the call a no-op for any contained point.
    ///
    /// Returns `true` if any field changed.
    pub fn expand_to_include_with(
        &mut self,
        point: Point,
        exclusive_bottom: bool,
        exclusive_right: bool,
    ) -> bool {
        let bottom_pad = if exclusive_bottom { 1.0 } else { 0.0 };
        let right_pad  = if exclusive_right  { 1.0 } else { 0.0 };

        let grew_y = grow_axis(&mut self.top,  &mut self.height, point.0, bottom_pad);
        let grew_x = grow_axis(&mut self.left, &mut self.width,  point.1, right_pad);
        grew_y || grew_x
    }
}

fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    // Not f64::clamp: that panics when lo > hi and passes NaN through.
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

fn grow_axis(origin: &mut f64, extent: &mut f64, v: f64, pad: f64) -> bool {
    let far = *origin + *extent;
    if v < *origin {
        *extent += *origin - v;
        *origin = v;
        reach(*origin, extent, far);
        true
    } else if v > far {
        *extent = v - *origin + pad;
        reach(*origin, extent, v + pad);
        true
    } else {
        false
    }
}

/// Widen `extent` until `origin + extent` is at least `target`. The
/// subtraction that produced `extent` can round, leaving the far edge an ulp
/// or more short of where it was aimed.
fn reach(origin: f64, extent: &mut f64, target: f64) {
    loop {
        let short = target - (origin + *extent);
        if short.is_nan() || short <= 0.0 {
            return;
        }
        *extent = (*extent + short).max(ulp_up(*extent));
    }
}

/// The next representable value above `x`.
fn ulp_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        x
    } else if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
