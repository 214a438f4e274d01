use std::time::Duration;

use chart_viewport::ChartError;
use chart_viewport::api::{CHART_VIEW_CONFIG_JSON_SCHEMA_V1, ChartViewConfig};

#[test]
fn default_config_is_valid() {
    let config = ChartViewConfig::default().validate().expect("valid defaults");
    assert_eq!(config.zoom_step_x, 0.1);
    assert_eq!(config.min_visible_candles, 5);
    assert_eq!(config.max_visible_multiplier, 5);
    assert_eq!(config.pointer_throttle(), Duration::from_millis(16));
}

#[test]
fn config_json_round_trip_keeps_every_field() {
    let config = ChartViewConfig::default()
        .with_zoom_steps(0.2, 0.05)
        .with_visible_candle_limits(10, 3)
        .with_default_visible_candles(250)
        .with_price_padding_ratio(0.25)
        .with_axis_scale_sensitivity(1.5)
        .with_pointer_throttle_ms(33);

    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains(&format!(
        "\"schema_version\": {CHART_VIEW_CONFIG_JSON_SCHEMA_V1}"
    )));
    let parsed = ChartViewConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn bare_config_object_falls_back_to_defaults() {
    let parsed = ChartViewConfig::from_json_str(r#"{ "zoom_step_x": 0.3 }"#).expect("parse");
    assert_eq!(parsed.zoom_step_x, 0.3);
    assert_eq!(parsed.zoom_step_y, ChartViewConfig::default().zoom_step_y);
    assert_eq!(parsed.default_visible_candles, 100);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let json = r#"{ "schema_version": 99, "config": {} }"#;
    let err = ChartViewConfig::from_json_str(json).expect_err("unsupported version");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = ChartViewConfig::from_json_str("{ not json").expect_err("malformed");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn out_of_range_values_are_rejected() {
    let cases = [
        ChartViewConfig::default().with_zoom_steps(1.0, 0.1),
        ChartViewConfig::default().with_zoom_steps(0.1, f64::NAN),
        ChartViewConfig::default().with_visible_candle_limits(0, 5),
        ChartViewConfig::default().with_visible_candle_limits(5, 0),
        ChartViewConfig::default().with_default_visible_candles(0),
        ChartViewConfig::default().with_price_padding_ratio(-0.1),
        ChartViewConfig::default().with_axis_scale_sensitivity(0.0),
    ];
    for config in cases {
        assert!(
            matches!(config.validate(), Err(ChartError::InvalidConfig(_))),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn parsed_config_is_validated() {
    let json = r#"{ "min_log_range_ratio": 0.5 }"#;
    assert!(matches!(
        ChartViewConfig::from_json_str(json),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn viewport_limits_clamp_between_minimum_and_series_multiple() {
    let limits = ChartViewConfig::default().viewport_limits();
    assert_eq!(limits.clamp_visible_count(1, 100), 5);
    assert_eq!(limits.clamp_visible_count(10_000, 100), 500);
    assert_eq!(limits.clamp_visible_count(10_000, 0), 5);
    assert_eq!(limits.clamp_visible_count(42, 100), 42);
}
