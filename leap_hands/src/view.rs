//! Adaptive sensor→grid mapping and per-frame drawing.
//!
//! `TrackingView` owns the calibration state: the fixed destination
//! rectangle matching the grid, the source rectangle that grows to bound every
//! point seen so far, and the mapper rebuilt whenever the source grows.
//!
//! ```text
//!  uninitialized ──first point──▶ calibrated ──point outside source──▶ calibrated
//!  (mapper: None)                 (mapper: Some)      (expand + rebuild)
//! ```
//!
//! There is no way back to uninitialized: calibration only ever widens.

use std::thread;
use std::time::Duration;

use bone_grid::{Point, Rect, RectMapper};
use tracing::{debug, warn};

use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use crate::tracking::BoneSegment;

// ════════════════════════════════════════════════════════════════════════════
// ViewConfig
// ════════════════════════════════════════════════════════════════════════════

/// Drawing settings for a [`TrackingView`].
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Markers indexed by a point's position within its bone, modulo length.
    pub palette:       Vec<char>,
    /// Shown at the top-left while no hands are in view.
    pub idle_message:  String,
    /// How long a draw-failure report stays on screen before drawing resumes.
    pub failure_pause: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            palette:       vec!['*', 'x'],
            idle_message:  "(No fingers; any key to exit.)".to_string(),
            failure_pause: Duration::from_secs(1),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Outcomes
// ════════════════════════════════════════════════════════════════════════════

/// Result of trying to place one marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    /// The surface would not take the cell, or the mapped coordinate did not
    /// name a cell at all. Coordinates are the truncated screen position;
    /// `reason` is the surface's own error text.
    OutOfBounds { row: i64, col: i64, reason: String },
}

/// A point that could not be drawn, as reported on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawFailure {
    pub source: Point,
    /// Where the point was sent on the grid; `None` if it was never mapped.
    pub screen: Option<Point>,
    pub reason: String,
}

impl DrawFailure {
    /// The truncated `(row, col)` the draw was aimed at.
    pub fn cell(&self) -> Option<(i64, i64)> {
        self.screen.map(|s| (s.0 as i64, s.1 as i64))
    }
}

/// What happened to one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameReport {
    /// No bones in view; the idle message was shown instead.
    Idle,
    /// Every point was drawn and the screen refreshed.
    Drawn { points: usize },
    /// Some points failed; each was reported on screen and skipped.
    Degraded { drawn: usize, failures: Vec<DrawFailure> },
}

impl FrameReport {
    pub fn points_drawn(&self) -> usize {
        match self {
            FrameReport::Idle                   => 0,
            FrameReport::Drawn { points }       => *points,
            FrameReport::Degraded { drawn, .. } => *drawn,
        }
    }

    pub fn failures(&self) -> usize {
        match self {
            FrameReport::Degraded { failures, .. } => failures.len(),
            _ => 0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingView
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct TrackingView {
    dest:           Rect,
    source:         Rect,
    mapper:         Option<RectMapper>,
    config:         ViewConfig,
    recalibrations: u64,
}

impl TrackingView {
    pub fn new(rows: u16, cols: u16, config: ViewConfig) -> Self {
        TrackingView {
            dest:           Rect::for_grid(rows, cols),
            source:         Rect::seed(),
            mapper:         None,
            config,
            recalibrations: 0,
        }
    }

    /// Size the destination to whatever the surface reports.
    pub fn for_surface<S: DisplaySurface + ?Sized>(surface: &S, config: ViewConfig) -> Self {
        let (rows, cols) = surface.size();
        TrackingView::new(rows, cols, config)
    }

    // ── calibration ───────────────────────────────────────────────────────

    /// Make sure the mapper covers `point`.
    ///
    /// Builds the first mapper on the first point. Afterwards, a point outside
    /// the source rectangle expands it and the mapper is rebuilt from scratch;
    /// a point inside changes nothing. Returns `true` if a mapper was built.
    pub fn ensure_mapping(&mut self, point: Point) -> bool {
        let grew = !self.source.contains(point) && self.source.expand_to_include(point);
        if !grew && self.mapper.is_some() {
            return false;
        }

        self.mapper = Some(RectMapper::new(&self.source, &self.dest));
        self.recalibrations += 1;
        debug!(
            top    = self.source.top,
            left   = self.source.left,
            height = self.source.height,
            width  = self.source.width,
            "recalibrated source rect"
        );
        true
    }

    /// Calibrate on `point`, map it and clamp the result onto the grid.
    pub fn to_screen(&mut self, point: Point) -> Point {
        self.ensure_mapping(point);
        let mapped = match &self.mapper {
            Some(m) => m.apply(point),
            None    => point,
        };
        self.dest.clamp(mapped)
    }

    pub fn marker_for(&self, index: usize) -> char {
        match self.config.palette.len() {
            0 => '*',
            n => self.config.palette[index % n],
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Draw one frame's worth of bones.
    ///
    /// With no segments the idle message is written and nothing is
    /// calibrated. Otherwise each point of each segment is calibrated,
    /// mapped, clamped and drawn in order. A point the surface refuses, or
    /// one that is not finite and so cannot be mapped, is reported on screen
    /// with the reason it failed, the view pauses for
    /// [`ViewConfig::failure_pause`], and drawing moves on to the next point.
    /// Only when every point drew is the cursor parked on the far corner and
    /// the screen refreshed.
    ///
    /// Terminal I/O failures are returned; bounds failures never are.
    pub fn render_frame<S: DisplaySurface + ?Sized>(
        &mut self,
        surface: &mut S,
        segments: &[BoneSegment],
    ) -> Result<FrameReport, SurfaceError> {
        if segments.is_empty() {
            write_line(surface, 0, &self.config.idle_message)?;
            surface.refresh()?;
            return Ok(FrameReport::Idle);
        }

        let mut drawn = 0;
        let mut failures = Vec::new();

        for segment in segments {
            for (i, point) in segment.points().into_iter().enumerate() {
                let failure = if point.is_finite() {
                    let screen = self.to_screen(point);
                    match draw_marker(surface, screen, self.marker_for(i))? {
                        DrawOutcome::Drawn => {
                            drawn += 1;
                            continue;
                        }
                        DrawOutcome::OutOfBounds { reason, .. } => {
                            DrawFailure { source: point, screen: Some(screen), reason }
                        }
                    }
                } else {
                    DrawFailure {
                        source: point,
                        screen: None,
                        reason: "tracking point is not finite".to_string(),
                    }
                };
                self.report_failure(surface, &failure)?;
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            let corner = self.dest.far_corner();
            match surface.move_cursor(clamp_u16(corner.0 as i64), clamp_u16(corner.1 as i64)) {
                Err(SurfaceError::OutOfBounds { .. }) => debug!("grid too small to park cursor"),
                other => other?,
            }
            surface.refresh()?;
            Ok(FrameReport::Drawn { points: drawn })
        } else {
            Ok(FrameReport::Degraded { drawn, failures })
        }
    }

    fn report_failure<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        failure: &DrawFailure,
    ) -> Result<(), SurfaceError> {
        let source = format!("({},{})", round3(failure.source.0), round3(failure.source.1));
        let coords = match failure.cell() {
            Some((row, col)) => format!("{} => ({},{})", source, row, col),
            None             => format!("{} => not mapped", source),
        };
        let reason = &failure.reason;
        warn!(%coords, %reason, "draw failed");

        surface.clear()?;
        write_line(surface, 0, &coords)?;
        write_line(surface, 1, reason)?;
        surface.refresh()?;
        if !self.config.failure_pause.is_zero() {
            thread::sleep(self.config.failure_pause);
        }
        Ok(())
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn source_rect(&self)   -> &Rect                { &self.source }
    pub fn dest_rect(&self)     -> &Rect                { &self.dest }
    pub fn mapper(&self)        -> Option<&RectMapper>  { self.mapper.as_ref() }
    pub fn is_calibrated(&self) -> bool                 { self.mapper.is_some() }
    pub fn recalibrations(&self) -> u64                 { self.recalibrations }
}

/// The typed draw wrapper: a refused cell becomes an outcome, not an error.
pub fn draw_marker<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    screen: Point,
    marker: char,
) -> Result<DrawOutcome, SurfaceError> {
    let (row, col) = (screen.0 as i64, screen.1 as i64);
    let (Some(r), Some(c)) = (to_cell(screen.0), to_cell(screen.1)) else {
        let reason = format!("({}, {}) does not name a grid cell", screen.0, screen.1);
        return Ok(DrawOutcome::OutOfBounds { row, col, reason });
    };
    match surface.put_char(r, c, marker) {
        Ok(())                        => Ok(DrawOutcome::Drawn),
        Err(e) if e.is_cell_error()   => Ok(DrawOutcome::OutOfBounds { row, col, reason: e.to_string() }),
        Err(e)                        => Err(e),
    }
}

/// Truncate toward zero, the way a cell index is taken from a coordinate.
fn to_cell(v: f64) -> Option<u16> {
    if v.is_finite() && v >= 0.0 && v < f64::from(u16::MAX) + 1.0 {
        Some(v as u16)
    } else {
        None
    }
}

fn clamp_u16(v: i64) -> u16 {
    v.clamp(0, i64::from(u16::MAX)) as u16
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Status text; a grid too small to hold the line is not an error.
fn write_line<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    row: u16,
    text: &str,
) -> Result<(), SurfaceError> {
    match surface.put_str(row, 0, text) {
        Err(SurfaceError::OutOfBounds { .. }) => {
            debug!(row, text, "status line does not fit");
            Ok(())
        }
        other => other,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
