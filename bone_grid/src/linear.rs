//! One-dimensional affine functions.

use std::fmt;

/// `f(x) = slope * x + intercept`.
///
/// Never mutated: when the source rectangle changes a fresh pair of maps is
/// built by [`RectMapper::new`](crate::RectMapper::new).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMap {
    slope:     f64,
    intercept: f64,
}

impl LinearMap {
    pub fn new(slope: f64, intercept: f64) -> Self {
        LinearMap { slope, intercept }
    }

    pub fn slope(&self)     -> f64 { self.slope }
    pub fn intercept(&self) -> f64 { self.intercept }

    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl fmt::Display for LinearMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(x) = {} * x + {}", self.slope, self.intercept)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
