//! # leap_hands
//!
//! Draws the finger bones of tracked hands on a terminal character grid.
//!
//! Each finger bone contributes three markers (start, middle, end). Sensor
//! coordinates are projected to a plane, then mapped onto the grid through a
//! rectangle that grows to enclose every point seen so far, so the picture
//! rescales itself as the hands explore more of the device's range.
//!
//! ## Modules
//!
//! | Module | Role |
//! |---|---|
//! | [`tracking`] | Frames of bones from LeapMotion, a synthetic hand, or a script |
//! | [`surface`]  | The character grid: crossterm terminal or in-memory |
//! | [`view`]     | Adaptive calibration and per-frame drawing |
//! | [`app`]      | Run loop, configuration, logging |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: a synthetic hand drifts above the device.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `LEAP_HANDS_LOG` | Log file path (no logging when unset) |
//! | `RUST_LOG` | Log filter, default `info` |
//! | `LEAP_HANDS_IDLE_MS` | Sleep after a frame with no hands (default 100) |
//! | `LEAP_HANDS_FRAME_MS` | Sleep after a drawn frame (default 16) |
//! | `LEAP_HANDS_QUIT_EVERY` | Iterations between quit-key checks (default 50) |

pub mod app;
pub mod error;
pub mod surface;
pub mod tracking;
pub mod view;

pub use app::{run, run_terminal, AppConfig, RunSummary};
pub use error::{AppError, SurfaceError, TrackingError};
pub use surface::{DisplaySurface, MemorySurface, TerminalSurface};
pub use tracking::{Bone, BoneSegment, Frame, ScriptedSource, SimTrackingSource, TrackingSource};
pub use view::{draw_marker, DrawFailure, DrawOutcome, FrameReport, TrackingView, ViewConfig};
