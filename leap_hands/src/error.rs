//! Error types.

use std::io;

use thiserror::Error;

/// Failures reported by a [`DisplaySurface`](crate::surface::DisplaySurface).
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The terminal itself failed (closed, not a tty, write error).
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A cell outside `0..rows × 0..cols` was addressed.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds { row: u16, col: u16, rows: u16, cols: u16 },

    /// An in-grid cell the terminal would not write (some terminals refuse
    /// the bottom-right cell).
    #[error("terminal refused cell ({row}, {col})")]
    Refused { row: u16, col: u16 },
}

impl SurfaceError {
    /// Bounds and refusal failures concern one cell; the surface itself is
    /// still usable.
    pub fn is_cell_error(&self) -> bool {
        matches!(self, SurfaceError::OutOfBounds { .. } | SurfaceError::Refused { .. })
    }
}

/// Failures reported by a [`TrackingSource`](crate::tracking::TrackingSource).
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("could not connect to tracking device: {0}")]
    Connect(String),

    #[error("tracking poll failed: {0}")]
    Poll(String),
}

/// Everything that can end a session early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error("could not set up logging: {0}")]
    Log(String),
}
