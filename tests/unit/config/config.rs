use super::*;

#[test]
fn defaults_follow_compat_mode() {
    let cfg = ScreenConfig::default();
    assert_eq!(cfg.effective_frame_rate(), 60);
    assert!(cfg.keep_ratio);
    assert!(!cfg.allow_skip_frame);

    let legacy = ScreenConfig {
        compat: CompatMode::Legacy,
        ..Default::default()
    };
    assert_eq!(legacy.effective_frame_rate(), 40);
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = ScreenConfig::from_json_str(r#"{ "compat": "legacy", "smooth_scale": true }"#)
        .unwrap();
    assert_eq!(cfg.compat, CompatMode::Legacy);
    assert!(cfg.smooth_scale);
    assert_eq!(cfg.resolution, Resolution::new(640, 480));
}

#[test]
fn out_of_range_values_are_clamped_not_rejected() {
    let json = serde_json::json!({
        "resolution": { "width": 0, "height": 240 },
        "frame_rate": 0
    });
    let cfg = ScreenConfig::from_json_str(&json.to_string()).unwrap();
    assert_eq!(cfg.resolution, Resolution::new(1, 240));
    assert_eq!(cfg.frame_rate, Some(1));
    assert_eq!(clamp_frame_rate(100_000), MAX_FRAME_RATE);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = ScreenConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("config error:"));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = ScreenConfig::from_path("target/does-not-exist/screen.json").unwrap_err();
    assert!(matches!(err, FramepaceError::Config(_)));
}
