//! 3D → 2D projection by axis selection.

use crate::point::{Point, Vec3};

/// One of the three sensor axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Flattens a [`Vec3`] by keeping two of its components and dropping the
/// third. No perspective, no depth cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projector {
    pub first:  Axis,
    pub second: Axis,
}

impl Projector {
    /// Depth (z) becomes the row axis, left/right (x) the column axis.
    /// Looking down at the device, the hand appears as seen from above.
    pub const DEPTH_LATERAL: Projector = Projector { first: Axis::Z, second: Axis::X };

    pub fn new(first: Axis, second: Axis) -> Self {
        Projector { first, second }
    }

    pub fn project(&self, v: Vec3) -> Point {
        Point(v.component(self.first), v.component(self.second))
    }
}

impl Default for Projector {
    fn default() -> Self { Projector::DEPTH_LATERAL }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_depth_then_lateral() {
        let p = Projector::default().project(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point(3.0, 1.0));
    }

    #[test]
    fn custom_axes() {
        let front = Projector::new(Axis::Y, Axis::X);
        assert_eq!(front.project(Vec3::new(-5.0, 200.0, 9.0)), Point(200.0, -5.0));
    }

    #[test]
    fn diagonal_points_project_to_diagonal() {
        let proj = Projector::DEPTH_LATERAL;
        for k in 0..3 {
            let k = k as f64;
            assert_eq!(proj.project(Vec3::new(k, k, k)), Point(k, k));
        }
    }
}
