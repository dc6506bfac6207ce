//! Whole-session runs against the in-memory grid.

use std::time::Duration;

use bone_grid::{Point, Rect, Vec3};
use crossterm::event::KeyCode;
use leap_hands::{
    run, AppConfig, Bone, DisplaySurface, Frame, FrameReport, MemorySurface, ScriptedSource,
    TrackingView, ViewConfig,
};

fn quiet_view() -> ViewConfig {
    ViewConfig { failure_pause: Duration::ZERO, ..ViewConfig::default() }
}

fn fast() -> AppConfig {
    AppConfig {
        view:           quiet_view(),
        idle_interval:  Duration::ZERO,
        frame_interval: Duration::ZERO,
        ..AppConfig::default()
    }
}

fn diagonal_bone() -> Bone {
    Bone {
        prev_joint: Vec3::new(0.0, 0.0, 0.0),
        center:     Vec3::new(1.0, 1.0, 1.0),
        next_joint: Vec3::new(2.0, 2.0, 2.0),
        is_valid:   true,
    }
}

#[test]
fn one_bone_on_a_24_by_80_terminal() {
    let mut surface = MemorySurface::new(24, 80);
    let mut view = TrackingView::for_surface(&surface, quiet_view());
    assert_eq!(*view.dest_rect(), Rect::new(0.0, 0.0, 23.0, 79.0));

    let segments = Frame::new(vec![diagonal_bone()]).segments(&AppConfig::default().projector);
    assert_eq!(segments[0].points(), [Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 2.0)]);

    let report = view.render_frame(&mut surface, &segments).unwrap();
    assert_eq!(report, FrameReport::Drawn { points: 3 });

    for p in segments[0].points() {
        assert!(view.source_rect().contains(p));
    }

    let draws = surface.char_draws();
    assert_eq!(draws.len(), 3);
    let mut cells: Vec<_> = draws.iter().map(|&(r, c, _)| (r, c)).collect();
    cells.sort_unstable();
    cells.dedup();
    assert_eq!(cells.len(), 3, "three distinct cells");
    assert_eq!(draws.iter().map(|d| d.2).collect::<String>(), "*x*");
}

#[test]
fn empty_frames_draw_nothing_and_keep_calibration() {
    let mut surface = MemorySurface::new(24, 80);
    let mut view = TrackingView::for_surface(&surface, quiet_view());
    let segments = Frame::new(vec![diagonal_bone()]).segments(&AppConfig::default().projector);
    view.render_frame(&mut surface, &segments).unwrap();

    let source = *view.source_rect();
    let mapper = view.mapper().copied();
    surface.clear_ops();
    surface.clear().unwrap();

    assert_eq!(view.render_frame(&mut surface, &[]).unwrap(), FrameReport::Idle);
    assert!(surface.char_draws().is_empty());
    assert!(surface.row_text(0).contains("No fingers"));
    assert_eq!(*view.source_rect(), source);
    assert_eq!(view.mapper().copied(), mapper);
}

#[test]
fn invalid_bones_never_reach_the_grid() {
    let mut bad = diagonal_bone();
    bad.is_valid = false;
    bad.next_joint = Vec3::new(1e6, 1e6, 1e6);

    let mut surface = MemorySurface::new(24, 80);
    let mut source = ScriptedSource::new(vec![Frame::new(vec![bad])]);
    let cfg = AppConfig { max_iterations: Some(1), ..fast() };

    let summary = run(&mut source, &mut surface, &cfg).unwrap();
    assert_eq!(summary.idle_frames, 1);
    assert_eq!(summary.recalibrations, 0);
}

#[test]
fn calibration_widens_across_frames_and_session_survives_refusals() {
    let wide = Bone::between(Vec3::new(-100.0, 0.0, -50.0), Vec3::new(100.0, 0.0, 50.0));
    let mut surface = MemorySurface::new(10, 20);
    surface.reject_cell(9, 19);
    surface.script_keys([None, Some(KeyCode::Char(' '))]);

    let mut source = ScriptedSource::new(vec![
        Frame::new(vec![diagonal_bone()]),
        Frame::empty(),
        Frame::new(vec![wide, diagonal_bone()]),
    ]);
    let cfg = AppConfig { quit_check_every: 2, ..fast() };

    let summary = run(&mut source, &mut surface, &cfg).unwrap();
    // The quit key is seen at the start of iteration 4, before its frame.
    assert_eq!(summary.iterations, 4);
    assert_eq!(summary.idle_frames, 1);
    assert!(summary.draw_failures >= 1);
    assert_eq!(summary.points_drawn + summary.draw_failures, 9);
}
