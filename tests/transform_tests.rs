use approx::assert_relative_eq;
use chart_viewport::core::{
    Candle, ScaleMode, ViewportState, candle_at_x, candle_band, index_at_time, index_to_x,
    price_to_y, time_at_index, x_to_index, y_to_price,
};

fn linear_view(min: f64, max: f64) -> ViewportState {
    ViewportState::new(0, 10, min, max, ScaleMode::Linear, 60).expect("linear viewport")
}

fn hourly_series(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64;
            Candle::new(
                1_700_000_000 + i as i64 * 3_600,
                base - 2.0,
                base + 2.0,
                base - 1.0,
                base + 1.0,
                10.0,
            )
            .expect("valid candle")
        })
        .collect()
}

#[test]
fn linear_midpoint_maps_to_surface_middle() {
    let viewport = linear_view(100.0, 200.0);
    assert_relative_eq!(price_to_y(150.0, 400.0, &viewport), 200.0, epsilon = 1e-9);
    assert_relative_eq!(price_to_y(200.0, 400.0, &viewport), 0.0, epsilon = 1e-9);
    assert_relative_eq!(price_to_y(100.0, 400.0, &viewport), 400.0, epsilon = 1e-9);
}

#[test]
fn log_geometric_midpoint_maps_to_surface_middle() {
    let viewport =
        ViewportState::new(0, 10, 1.0, 100.0, ScaleMode::Logarithmic, 60).expect("log viewport");
    assert_relative_eq!(price_to_y(10.0, 400.0, &viewport), 200.0, epsilon = 1e-9);
    assert_relative_eq!(y_to_price(200.0, 400.0, &viewport), 10.0, max_relative = 1e-12);
}

#[test]
fn collapsed_price_span_resolves_to_midpoints() {
    let viewport = linear_view(100.0, 100.0 + 1e-13);
    assert_eq!(price_to_y(250.0, 400.0, &viewport), 200.0);
    assert_relative_eq!(y_to_price(17.0, 400.0, &viewport), 100.0, epsilon = 1e-9);
}

#[test]
fn transforms_stay_finite_for_non_finite_input() {
    let viewport = linear_view(100.0, 200.0);
    assert_eq!(price_to_y(f64::NAN, 400.0, &viewport), 200.0);
    assert_eq!(price_to_y(f64::INFINITY, 400.0, &viewport), 200.0);
    assert!(y_to_price(f64::NAN, 400.0, &viewport).is_finite());
    assert!(y_to_price(10.0, 0.0, &viewport).is_finite());
    assert!(index_to_x(f64::NAN, 1000.0, &viewport).is_finite());
    assert!(x_to_index(f64::NEG_INFINITY, 1000.0, &viewport).is_finite());
}

#[test]
fn index_and_x_are_inverse() {
    let viewport =
        ViewportState::new(40, 60, 1.0, 2.0, ScaleMode::Linear, 60).expect("viewport");
    assert_eq!(index_to_x(40.0, 1000.0, &viewport), 0.0);
    assert_eq!(index_to_x(50.0, 1000.0, &viewport), 500.0);
    assert_relative_eq!(x_to_index(750.0, 1000.0, &viewport), 55.0, epsilon = 1e-12);
}

#[test]
fn candle_band_spans_one_slot() {
    let viewport = ViewportState::new(0, 10, 1.0, 2.0, ScaleMode::Linear, 60).expect("viewport");
    let band = candle_band(3, 1000.0, &viewport, 0.8);
    assert_relative_eq!(band.left, 300.0);
    assert_relative_eq!(band.right, 400.0);
    assert_relative_eq!(band.center, 350.0);
    assert_relative_eq!(band.body_width, 80.0);
}

#[test]
fn candle_at_x_reports_blank_slots_outside_series() {
    let viewport =
        ViewportState::new(-5, 15, 1.0, 2.0, ScaleMode::Linear, 60).expect("viewport past edges");
    // 20 slots over 1000px: 50px each, index 0 starts at x=250.
    assert_eq!(candle_at_x(10, 100.0, 1000.0, &viewport), None);
    assert_eq!(candle_at_x(10, 260.0, 1000.0, &viewport), Some(0));
    assert_eq!(candle_at_x(10, 749.0, 1000.0, &viewport), Some(9));
    assert_eq!(candle_at_x(10, 760.0, 1000.0, &viewport), None);
}

#[test]
fn time_lookup_extrapolates_past_both_edges() {
    let series = hourly_series(4);
    let first = series[0].time as f64;
    assert_eq!(time_at_index(&series, 3_600, 0.0), Some(first));
    assert_eq!(time_at_index(&series, 3_600, 1.5), Some(first + 5_400.0));
    assert_eq!(time_at_index(&series, 3_600, -2.0), Some(first - 7_200.0));
    assert_eq!(time_at_index(&series, 3_600, 5.0), Some(first + 18_000.0));
    assert_eq!(time_at_index(&[], 3_600, 1.0), None);
}

#[test]
fn index_at_time_inverts_time_at_index() {
    let series = hourly_series(6);
    for index in [-3.0, 0.0, 0.25, 2.5, 5.0, 9.0] {
        let time = time_at_index(&series, 3_600, index).expect("time");
        let back = index_at_time(&series, 3_600, time).expect("index");
        assert_relative_eq!(back, index, epsilon = 1e-9);
    }
}
