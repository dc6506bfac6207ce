//! Point types for the sensor and screen spaces.

use crate::projector::Axis;

// ════════════════════════════════════════════════════════════════════════════
// Point — an ordered pair
// ════════════════════════════════════════════════════════════════════════════

/// An ordered pair `(axis0, axis1)`.
///
/// Used for projected sensor points and for screen positions `(row, col)`
/// alike; the type does not record which space it lives in, so callers keep
/// track of that themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Vec3 — a sensor-space point
// ════════════════════════════════════════════════════════════════════════════

/// A 3D point in tracking-device space (LeapMotion reports millimetres,
/// x = left/right, y = up, z = toward the user).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
        Vec3::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
