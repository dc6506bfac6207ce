//! Top-level run loop and configuration.
//!
//! [`run`] owns the tracking source, the display surface and the
//! [`TrackingView`] for the whole session: one synchronous loop that polls a
//! frame, draws it, and sleeps. The only exits are a key press (checked every
//! [`AppConfig::quit_check_every`] iterations) and a terminal I/O failure.

use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use bone_grid::Projector;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::surface::{DisplaySurface, TerminalSurface};
use crate::tracking::{Frame, TrackingSource};
use crate::view::{FrameReport, TrackingView, ViewConfig};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub view:             ViewConfig,
    pub projector:        Projector,
    /// Sleep after a frame with no hands in view.
    pub idle_interval:    Duration,
    /// Sleep after a drawn frame.
    pub frame_interval:   Duration,
    /// Look for a quit key once every this many iterations.
    pub quit_check_every: u64,
    /// Where `tracing` output goes. `None` disables logging.
    pub log_file:         Option<PathBuf>,
    /// Stop after this many iterations even without a key press.
    pub max_iterations:   Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            view:             ViewConfig::default(),
            projector:        Projector::DEPTH_LATERAL,
            idle_interval:    Duration::from_millis(100),
            frame_interval:   Duration::from_millis(16),
            quit_check_every: 50,
            log_file:         None,
            max_iterations:   None,
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by `LEAP_HANDS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    /// Values that don't parse are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = AppConfig::default();
        let millis = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
        };

        if let Some(d) = millis("LEAP_HANDS_IDLE_MS")  { cfg.idle_interval  = d; }
        if let Some(d) = millis("LEAP_HANDS_FRAME_MS") { cfg.frame_interval = d; }
        if let Some(n) = lookup("LEAP_HANDS_QUIT_EVERY").and_then(|v| v.trim().parse::<u64>().ok()) {
            cfg.quit_check_every = n.max(1);
        }
        if let Some(path) = lookup("LEAP_HANDS_LOG").filter(|p| !p.trim().is_empty()) {
            cfg.log_file = Some(PathBuf::from(path));
        }
        cfg
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Logging
// ════════════════════════════════════════════════════════════════════════════

/// Install a `tracing` subscriber writing to `cfg.log_file`, filtered by
/// `RUST_LOG` (default `info`). The terminal belongs to the grid, so nothing
/// is logged to it; with no file configured this does nothing.
pub fn init_logging(cfg: &AppConfig) -> Result<(), AppError> {
    let Some(path) = &cfg.log_file else { return Ok(()) };

    let file = File::create(path)
        .map_err(|e| AppError::Log(format!("{}: {}", path.display(), e)))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Log(e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main loop
// ════════════════════════════════════════════════════════════════════════════

/// Counters for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations:      u64,
    pub idle_frames:     u64,
    pub points_drawn:    u64,
    pub draw_failures:   u64,
    pub tracking_errors: u64,
    pub recalibrations:  u64,
}

/// Drive `source` onto `surface` until a key is pressed.
pub fn run<T, S>(source: &mut T, surface: &mut S, cfg: &AppConfig) -> Result<RunSummary, AppError>
where
    T: TrackingSource + ?Sized,
    S: DisplaySurface + ?Sized,
{
    let mut view = TrackingView::for_surface(surface, cfg.view.clone());
    let mut summary = RunSummary::default();
    let quit_every = cfg.quit_check_every.max(1);

    let (rows, cols) = surface.size();
    info!(rows, cols, "session started");

    loop {
        if cfg.max_iterations.is_some_and(|max| summary.iterations >= max) {
            break;
        }
        summary.iterations += 1;
        if summary.iterations % quit_every == 0 {
            if let Some(key) = surface.poll_key()? {
                info!(?key, "quit requested");
                break;
            }
        }

        surface.clear()?;
        let frame = source.frame().unwrap_or_else(|e| {
            warn!("{}", e);
            summary.tracking_errors += 1;
            Frame::empty()
        });
        let segments = frame.segments(&cfg.projector);

        let report = view.render_frame(surface, &segments)?;
        summary.points_drawn  += report.points_drawn() as u64;
        summary.draw_failures += report.failures() as u64;

        let pause = match report {
            FrameReport::Idle => {
                summary.idle_frames += 1;
                cfg.idle_interval
            }
            _ => cfg.frame_interval,
        };
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    surface.refresh()?;
    summary.recalibrations = view.recalibrations();
    info!(?summary, "session ended");
    Ok(summary)
}

/// Open the terminal and the tracking device and [`run`] until a key press.
///
/// Uses the LeapMotion controller when built with the `leap` feature, the
/// synthetic hand otherwise. Both handles are released when this returns,
/// whichever way it returns.
pub fn run_terminal(cfg: &AppConfig) -> Result<RunSummary, AppError> {
    #[cfg(feature = "leap")]
    let mut source = crate::tracking::LeapTrackingSource::connect()?;
    #[cfg(not(feature = "leap"))]
    let mut source = crate::tracking::SimTrackingSource::default();

    let mut surface = TerminalSurface::new()?;
    run(&mut source, &mut surface, cfg)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackingError;
    use crate::surface::MemorySurface;
    use crate::tracking::{Bone, ScriptedSource, SimTrackingSource};
    use bone_grid::Vec3;
    use crossterm::event::KeyCode;
    use std::collections::HashMap;

    fn fast() -> AppConfig {
        AppConfig {
            view: ViewConfig { failure_pause: Duration::ZERO, ..ViewConfig::default() },
            idle_interval:  Duration::ZERO,
            frame_interval: Duration::ZERO,
            ..AppConfig::default()
        }
    }

    fn diagonal_frame() -> Frame {
        Frame::new(vec![Bone {
            prev_joint: Vec3::new(0.0, 0.0, 0.0),
            center:     Vec3::new(1.0, 1.0, 1.0),
            next_joint: Vec3::new(2.0, 2.0, 2.0),
            is_valid:   true,
        }])
    }

    struct Failing;

    impl TrackingSource for Failing {
        fn frame(&mut self) -> Result<Frame, TrackingError> {
            Err(TrackingError::Poll("device unplugged".into()))
        }
    }

    #[test]
    fn defaults_match_documented_pacing() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.idle_interval, Duration::from_millis(100));
        assert_eq!(cfg.quit_check_every, 50);
        assert_eq!(cfg.projector, Projector::DEPTH_LATERAL);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let vars: HashMap<&str, &str> = [
            ("LEAP_HANDS_IDLE_MS", "250"),
            ("LEAP_HANDS_FRAME_MS", "fast"),
            ("LEAP_HANDS_QUIT_EVERY", "0"),
            ("LEAP_HANDS_LOG", "/tmp/hands.log"),
        ]
        .into_iter()
        .collect();
        let cfg = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.idle_interval, Duration::from_millis(250));
        assert_eq!(cfg.frame_interval, AppConfig::default().frame_interval);
        assert_eq!(cfg.quit_check_every, 1);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/hands.log")));
    }

    #[test]
    fn no_log_file_means_no_subscriber() {
        assert!(init_logging(&AppConfig::default()).is_ok());
    }

    #[test]
    fn quit_key_is_polled_only_every_nth_iteration() {
        let mut surface = MemorySurface::new(24, 80);
        // Keys queued before the check runs are only seen at iteration 5.
        surface.script_keys([Some(KeyCode::Char('q'))]);
        let cfg = AppConfig { quit_check_every: 5, ..fast() };

        let summary = run(&mut ScriptedSource::default(), &mut surface, &cfg).unwrap();
        assert_eq!(summary.iterations, 5);
        assert_eq!(summary.idle_frames, 4);
    }

    #[test]
    fn no_key_keeps_running_until_key_arrives() {
        let mut surface = MemorySurface::new(24, 80);
        surface.script_keys([None, None, Some(KeyCode::Esc)]);
        let cfg = AppConfig { quit_check_every: 2, ..fast() };

        let summary = run(&mut ScriptedSource::default(), &mut surface, &cfg).unwrap();
        assert_eq!(summary.iterations, 6);
    }

    #[test]
    fn scripted_frame_then_idle() {
        let mut surface = MemorySurface::new(24, 80);
        let mut source = ScriptedSource::new(vec![diagonal_frame()]);
        let cfg = AppConfig { max_iterations: Some(3), ..fast() };

        let summary = run(&mut source, &mut surface, &cfg).unwrap();
        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.points_drawn, 3);
        assert_eq!(summary.idle_frames, 2);
        assert_eq!(summary.recalibrations, 2);
        assert_eq!(surface.row_text(0), "(No fingers; any key to exit.)");
    }

    #[test]
    fn tracking_errors_become_idle_frames() {
        let mut surface = MemorySurface::new(24, 80);
        let cfg = AppConfig { max_iterations: Some(4), ..fast() };

        let summary = run(&mut Failing, &mut surface, &cfg).unwrap();
        assert_eq!(summary.tracking_errors, 4);
        assert_eq!(summary.idle_frames, 4);
        assert!(surface.char_draws().is_empty());
    }

    #[test]
    fn sim_hand_stays_on_grid() {
        let mut surface = MemorySurface::new(30, 100);
        let mut sim = SimTrackingSource::new(40, 5);
        let cfg = AppConfig { max_iterations: Some(60), ..fast() };

        let summary = run(&mut sim, &mut surface, &cfg).unwrap();
        assert_eq!(summary.draw_failures, 0);
        assert_eq!(summary.idle_frames, 5);
        assert_eq!(summary.points_drawn, 55 * 60);
        for (row, col, _) in surface.char_draws() {
            assert!(row < 30 && col < 100);
        }
    }
}
