use glam::Vec3;
use kineview_core::constants::{ELEVATION_LIMIT, MAX_GRID_DIVISIONS};
use kineview_core::{
    Axis, Contents, DrawList, Interconnection, Layer, Player, PlayerConfig, PlayerError, Shape,
    TrackSeries, Viewport,
};
use std::time::Duration;

const VIEWPORT: Viewport = Viewport {
    width: 320,
    height: 240,
};

/// "L" walks along x; "R" stands still and is missing at t = 1.
fn left_right() -> Contents {
    let time = vec![0.0, 1.0, 2.0];
    let l: Vec<Option<Vec3>> = (0..3).map(|i| Some(Vec3::new(0.5 * i as f32, 1.0, -0.2))).collect();
    let r = [Some(Vec3::new(0.0, 1.0, 0.2)), None, Some(Vec3::new(0.0, 1.0, 0.2))];
    let mut c = Contents::new();
    c.insert("L", TrackSeries::points(time.clone(), &l))
        .insert("R", TrackSeries::points(time, &r));
    c
}

fn marker_center(list: &DrawList, name: &str) -> Option<glam::Vec2> {
    list.primitives.iter().find_map(|p| match p.shape {
        Shape::Marker { center, .. } if p.layer == Layer::Point && p.label == name => Some(center),
        _ => None,
    })
}

fn player() -> Player {
    Player::new(left_right(), PlayerConfig::default()).unwrap()
}

#[test]
fn missing_sample_hides_only_that_point() {
    let mut p = player();
    p.set_current_time(1.0).unwrap();
    let list = p.render(VIEWPORT);
    assert!(list.has_point("L"));
    assert!(!list.has_point("R"));

    p.set_current_time(0.0).unwrap();
    let list = p.render(VIEWPORT);
    assert!(list.has_point("L") && list.has_point("R"));
}

#[test]
fn moving_marker_is_redrawn_at_its_new_position() {
    let mut p = player();
    p.set_view("right").unwrap();
    p.set_current_time(0.0).unwrap();
    let start = marker_center(&p.render(VIEWPORT), "L").unwrap();
    p.set_current_time(2.0).unwrap();
    let end = marker_center(&p.render(VIEWPORT), "L").unwrap();
    assert!((end - start).length() > 1.0, "L stayed at {start} -> {end}");

    // "R" does not move, so its marker stays put.
    p.set_current_time(0.0).unwrap();
    let r0 = marker_center(&p.render(VIEWPORT), "R").unwrap();
    p.set_current_time(2.0).unwrap();
    let r2 = marker_center(&p.render(VIEWPORT), "R").unwrap();
    assert!((r2 - r0).length() < 1e-4);
}

#[test]
fn bounds_default_to_track_extent_and_seek_clamps() {
    let mut p = player();
    assert_eq!((p.min_time(), p.max_time()), (0.0, 2.0));
    p.set_current_time(0.25).unwrap();
    assert_eq!(p.render(VIEWPORT).time, 0.25);
    p.set_current_time(7.0).unwrap();
    assert_eq!(p.current_time(), 2.0);
    assert!(matches!(
        p.set_current_time(f64::NAN),
        Err(PlayerError::InvalidValue { .. })
    ));
}

#[test]
fn contents_and_interconnections_round_trip() {
    let mut config = PlayerConfig::default();
    config.interconnections.insert(
        "LR".into(),
        Interconnection {
            color: [0.2, 0.4, 0.6],
            links: vec![vec!["L".into(), "R".into()]],
        },
    );
    let mut p = Player::new(left_right(), config).unwrap();
    p.set_current_time(0.5).unwrap();
    let before = p.render(VIEWPORT);

    p.set_contents(p.get_contents());
    p.set_interconnections(p.get_interconnections()).unwrap();
    assert_eq!(p.render(VIEWPORT), before);
    assert_eq!(p.current_time(), 0.5);
}

#[test]
fn swapping_contents_resets_bounds_but_not_camera() {
    let mut p = player();
    p.set_azimuth(1.2).unwrap();
    p.set_point_size(7.0).unwrap();
    p.set_current_time(1.0).unwrap();

    let mut later = Contents::new();
    later.insert(
        "Head",
        TrackSeries::points(vec![4.0, 4.5, 5.0], &[Some(Vec3::Y); 3]),
    );
    p.set_contents(later);
    assert_eq!((p.min_time(), p.max_time()), (4.0, 5.0));
    assert_eq!(p.current_time(), 4.5);
    assert_eq!(p.azimuth(), 1.2);
    assert_eq!(p.point_size(), 7.0);

    p.set_contents(Contents::new());
    assert_eq!((p.min_time(), p.max_time()), (0.0, 0.0));
    assert!(p.render(VIEWPORT).primitives.is_empty());
}

#[test]
fn named_views_read_back_documented_angles() {
    let mut p = player();
    p.set_view("top").unwrap();
    assert_eq!((p.azimuth(), p.elevation()), (0.0, ELEVATION_LIMIT));
    p.set_view("Right").unwrap();
    assert_eq!((p.azimuth(), p.elevation()), (std::f32::consts::FRAC_PI_2, 0.0));
    assert!(p.set_view("isometric").is_err());
}

#[test]
fn rejected_setters_keep_prior_values() {
    let mut p = player();
    p.set_frame_width(2.0).unwrap();
    assert!(p.set_frame_width(-1.0).is_err());
    assert!(p.set_frame_width(f32::NAN).is_err());
    assert_eq!(p.frame_width(), 2.0);

    assert!(p.set_background_color([0.0, 2.0, 0.0]).is_err());
    assert!(p.set_grid_divisions(0).is_err());
    p.set_grid_divisions(MAX_GRID_DIVISIONS).unwrap();
    assert!(matches!(
        p.set_grid_divisions(u32::MAX),
        Err(PlayerError::InvalidValue { field: "grid_divisions", .. })
    ));
    assert_eq!(p.grid_divisions(), MAX_GRID_DIVISIONS);
    assert!(!p.render(VIEWPORT).grid.is_empty());
    assert!(p.set_azimuth(f32::INFINITY).is_err());
    assert!(p.set_target(Vec3::new(f32::NAN, 0.0, 0.0)).is_err());

    p.set_interconnection_width(0.0).unwrap();
    assert_eq!(p.interconnection_width(), 0.0);
}

#[test]
fn frame_index_maps_through_reference_axis() {
    let mut p = player();
    assert_eq!(p.current_index(), Some(0));
    p.set_current_index(2).unwrap();
    assert_eq!(p.current_time(), 2.0);
    assert!(p.set_current_index(3).is_err());
    assert_eq!(p.current_time(), 2.0);
}

#[test]
fn config_picks_start_time_or_frame() {
    let config = PlayerConfig {
        initial_frame_index: Some(1),
        ..PlayerConfig::default()
    };
    assert_eq!(Player::new(left_right(), config).unwrap().current_time(), 1.0);

    let config = PlayerConfig {
        current_time: Some(0.3),
        initial_frame_index: Some(1),
        ..PlayerConfig::default()
    };
    assert_eq!(Player::new(left_right(), config).unwrap().current_time(), 0.3);
}

#[test]
fn construction_rejects_bad_axes_and_values() {
    let config = PlayerConfig {
        up: Axis::X,
        anterior: Axis::NegX,
        ..PlayerConfig::default()
    };
    assert!(matches!(
        Player::new(left_right(), config),
        Err(PlayerError::InvalidAxisConvention { .. })
    ));

    let config = PlayerConfig {
        point_size: -1.0,
        ..PlayerConfig::default()
    };
    assert!(matches!(
        Player::new(left_right(), config),
        Err(PlayerError::InvalidValue { field: "point_size", .. })
    ));

    let config = PlayerConfig::from_json(r#"{"grid_divisions": 4294967295}"#).unwrap();
    assert!(matches!(
        Player::new(left_right(), config),
        Err(PlayerError::InvalidValue { field: "grid_divisions", .. })
    ));
}

#[test]
fn changing_axes_keeps_the_data_space_target() {
    let config = PlayerConfig {
        target: [0.5, 1.0, -0.25],
        ..PlayerConfig::default()
    };
    let mut p = Player::new(left_right(), config).unwrap();
    p.set_up(Axis::Z).unwrap();
    assert_eq!(p.up(), Axis::Z);
    assert!((p.target() - Vec3::new(0.5, 1.0, -0.25)).length() < 1e-6);

    assert!(p.set_anterior(Axis::NegZ).is_err());
    assert_eq!(p.anterior(), Axis::X);
}

#[test]
fn tick_plays_and_loops() {
    let mut p = player();
    p.play();
    assert!(p.tick(Duration::from_millis(400)));
    assert!((p.current_time() - 0.4).abs() < 1e-9);
    p.tick(Duration::from_millis(1700));
    assert_eq!(p.current_time(), 0.0, "wrapped to the start");
    p.pause();
    assert!(!p.tick(Duration::from_millis(100)));
}

#[test]
fn closed_player_ignores_ticks_and_input() {
    let mut p = player();
    p.play();
    p.close();
    assert!(p.is_closed());
    assert!(!p.is_playing());
    assert!(!p.tick(Duration::from_secs(1)));
    assert!(p.render(VIEWPORT).primitives.is_empty());
}
