use approx::assert_relative_eq;
use chart_viewport::api::{ViewportLimits, drag_update};
use chart_viewport::core::{ScaleMode, SurfaceSize, ViewportState};
use chart_viewport::interaction::{DragMode, DragSession};

fn surface() -> SurfaceSize {
    SurfaceSize::new(1000.0, 400.0)
}

fn snapshot(mode: ScaleMode) -> ViewportState {
    ViewportState::new(100, 200, 10.0, 1000.0, mode, 60).expect("snapshot viewport")
}

fn updated(session: &DragSession, x: f64, y: f64) -> ViewportState {
    let update = drag_update(session, x, y, surface(), 200, ViewportLimits::default())
        .expect("drag update");
    let mut viewport = *session.snapshot();
    update.apply_to(&mut viewport);
    viewport
}

#[test]
fn pan_shifts_by_whole_candles_against_pointer() {
    let session = DragSession::new(DragMode::Pan, 500.0, 200.0, snapshot(ScaleMode::Linear));
    // 10px per candle; 34px rounds to 3 candles.
    let viewport = updated(&session, 534.0, 200.0);
    assert_eq!(viewport.visible_index_range(), (97, 197));
    assert_eq!(viewport.price_range(), (10.0, 1000.0));
}

#[test]
fn pan_may_run_past_the_data_edges() {
    let session = DragSession::new(DragMode::Pan, 0.0, 200.0, snapshot(ScaleMode::Linear));
    let viewport = updated(&session, 5_000.0, 200.0);
    assert_eq!(viewport.visible_index_range(), (-400, -300));

    let viewport = updated(&session, -5_000.0, 200.0);
    assert_eq!(viewport.visible_index_range(), (600, 700));
}

#[test]
fn vertical_pan_moves_price_range_in_working_space() {
    let session =
        DragSession::new(DragMode::Pan, 500.0, 200.0, snapshot(ScaleMode::Logarithmic));
    // Dragging down a quarter of the height raises the range by a quarter span.
    let viewport = updated(&session, 500.0, 300.0);
    let (w_min, w_max) = viewport.working_price_range();
    let span = 100f64.ln();
    assert_relative_eq!(w_min, 10f64.ln() + span / 4.0, max_relative = 1e-9);
    assert_relative_eq!(w_max, 1000f64.ln() + span / 4.0, max_relative = 1e-9);
}

#[test]
fn linear_vertical_pan_keeps_minimum_at_zero() {
    let session = DragSession::new(DragMode::Pan, 500.0, 200.0, snapshot(ScaleMode::Linear));
    let viewport = updated(&session, 500.0, -400.0);
    assert!(viewport.min_visible_price() >= 0.0);
    assert_relative_eq!(
        viewport.max_visible_price() - viewport.min_visible_price(),
        990.0,
        epsilon = 1e-9
    );
}

#[test]
fn vertical_scale_grows_exponentially_around_midpoint() {
    let session =
        DragSession::new(DragMode::ScaleVertical, 950.0, 100.0, snapshot(ScaleMode::Linear));
    // Half the surface height downward doubles the span at sensitivity 2.
    let viewport = updated(&session, 950.0, 300.0);
    assert_relative_eq!(viewport.min_visible_price(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(viewport.max_visible_price(), 1495.0, epsilon = 1e-9);
    assert_eq!(viewport.visible_index_range(), (100, 200));
}

#[test]
fn vertical_scale_never_collapses_the_span() {
    let session =
        DragSession::new(DragMode::ScaleVertical, 950.0, 0.0, snapshot(ScaleMode::Linear));
    let viewport = updated(&session, 950.0, -40_000.0);
    assert!(viewport.max_visible_price() > viewport.min_visible_price());
    assert!(viewport.max_visible_price() - viewport.min_visible_price() >= 1e-6 * 0.999);
}

#[test]
fn horizontal_scale_is_centered_on_snapshot_center() {
    let session =
        DragSession::new(DragMode::ScaleHorizontal, 500.0, 390.0, snapshot(ScaleMode::Linear));
    // Dragging left by half the width doubles the candle count.
    let viewport = updated(&session, 0.0, 390.0);
    assert_eq!(viewport.visible_count(), 200);
    assert_eq!(viewport.visible_index_range(), (0, 200));
    assert_eq!(viewport.price_range(), (10.0, 1000.0));
}

#[test]
fn replaying_a_delta_gives_identical_results() {
    let base = snapshot(ScaleMode::Logarithmic);
    for mode in [DragMode::Pan, DragMode::ScaleVertical, DragMode::ScaleHorizontal] {
        let session = DragSession::new(mode, 400.0, 150.0, base);
        let first = updated(&session, 463.0, 211.0);
        let _detour = updated(&session, 10.0, 390.0);
        let second = updated(&session, 463.0, 211.0);
        assert_eq!(first, second, "{mode:?} drifted between identical deltas");
    }
}

#[test]
fn zero_surface_is_a_stale_session() {
    let session = DragSession::new(DragMode::Pan, 500.0, 200.0, snapshot(ScaleMode::Linear));
    let update = drag_update(
        &session,
        600.0,
        200.0,
        SurfaceSize::new(0.0, 0.0),
        200,
        ViewportLimits::default(),
    );
    assert!(update.is_none());
}

#[test]
fn update_only_writes_the_axes_the_mode_owns() {
    let session =
        DragSession::new(DragMode::ScaleVertical, 950.0, 100.0, snapshot(ScaleMode::Linear));
    let update = drag_update(&session, 950.0, 150.0, surface(), 200, ViewportLimits::default())
        .expect("drag update");
    assert!(update.index_range.is_none());
    assert!(update.price_range.is_some());
}
