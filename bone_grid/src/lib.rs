//! # bone_grid
//!
//! Coordinate plumbing for drawing tracked hand bones on a character grid.
//!
//! Sensor points arrive in 3D millimetre space, get flattened to a 2D
//! [`Point`] by a [`Projector`], and are carried onto the screen by a
//! [`RectMapper`] built from two [`Rect`]s: the *source* rectangle that
//! bounds every point seen so far, and the fixed *destination* rectangle of
//! the grid.
//!
//! ```text
//!   Vec3 ──Projector──▶ Point ──RectMapper──▶ Point ──Rect::clamp──▶ cell
//!   (x, y, z)           (z, x)  (src → dst)   (row, col)
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use bone_grid::{Point, Projector, Rect, RectMapper, Vec3};
//!
//! let mut source = Rect::seed();
//! let dest       = Rect::for_grid(24, 80);
//!
//! let p = Projector::DEPTH_LATERAL.project(Vec3::new(2.0, 0.0, 2.0));
//! source.expand_to_include(p);
//!
//! let mapper = RectMapper::new(&source, &dest);
//! let cell   = dest.clamp(mapper.apply(p));
//! assert!(dest.contains(cell));
//! ```
//!
//! Nothing here allocates or fails; the degenerate cases (zero-size source
//! extents) are handled inside [`RectMapper::new`].

pub mod linear;
pub mod mapper;
pub mod point;
pub mod projector;
pub mod rect;

pub use linear::LinearMap;
pub use mapper::RectMapper;
pub use point::{Point, Vec3};
pub use projector::{Axis, Projector};
pub use rect::Rect;
