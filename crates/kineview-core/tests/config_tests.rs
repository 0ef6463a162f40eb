use kineview_core::constants::{DEFAULT_INTERCONNECTION_WIDTH, DEFAULT_POINT_SIZE};
use kineview_core::{Axis, PlayerConfig};

#[test]
fn empty_document_gives_defaults() {
    let config = PlayerConfig::from_json("{}").unwrap();
    assert_eq!(config, PlayerConfig::default());
    assert_eq!(config.up, Axis::Y);
    assert_eq!(config.anterior, Axis::X);
    assert_eq!(config.point_size, DEFAULT_POINT_SIZE);
    assert_eq!(config.interconnection_width, DEFAULT_INTERCONNECTION_WIDTH);
    assert!(config.looping);
    assert!(config.perspective);
}

#[test]
fn legacy_option_names_are_accepted() {
    let json = r#"{
        "segments": {"Arm": {"color": [1, 0, 0], "links": [["*Shoulder", "*Elbow"]]}},
        "segment_width": 0,
        "current_frame": 12,
        "up": "z",
        "anterior": "-y"
    }"#;
    let config = PlayerConfig::from_json(json).unwrap();
    assert!(config.interconnections.contains_key("Arm"));
    assert_eq!(config.interconnection_width, 0.0);
    assert_eq!(config.initial_frame_index, Some(12));
    assert_eq!(config.up, Axis::Z);
    assert_eq!(config.anterior, Axis::NegY);
}

#[test]
fn loop_key_and_unknown_axis() {
    let config = PlayerConfig::from_json(r#"{"loop": false, "playback_rate": -2.0}"#).unwrap();
    assert!(!config.looping);
    assert_eq!(config.playback_rate, -2.0);

    assert!(PlayerConfig::from_json(r#"{"up": "sideways"}"#).is_err());
}

#[test]
fn config_survives_json_round_trip() {
    let config = PlayerConfig {
        azimuth: 0.5,
        grid_divisions: 4,
        current_time: Some(1.25),
        up: Axis::NegZ,
        ..PlayerConfig::default()
    };
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(PlayerConfig::from_json(&text).unwrap(), config);
}
