use glam::{Mat4, Vec3};
use kineview_core::scene::{expand_polyline, PointTrack};
use kineview_core::timeline::sample;
use kineview_core::{
    Contents, Interconnection, Interconnections, Player, PlayerConfig, SceneModel, TrackSeries,
    Viewport,
};

fn left_right() -> Contents {
    let mut c = Contents::new();
    c.insert(
        "L",
        TrackSeries::points(vec![0.0, 1.0], &[Some(Vec3::new(0.0, 1.0, -0.2)), Some(Vec3::new(0.1, 1.0, -0.2))]),
    )
    .insert(
        "R",
        TrackSeries::points(vec![0.0, 1.0], &[Some(Vec3::new(0.0, 1.0, 0.2)), None]),
    );
    c
}

fn point_track<'a>(scene: &'a SceneModel, name: &str) -> &'a PointTrack {
    scene.points().get(name).unwrap()
}

#[test]
fn missing_samples_read_as_none() {
    let scene = SceneModel::new(left_right(), Interconnections::new()).unwrap();
    let r = point_track(&scene, "R");
    assert!(sample(r, 0.0).is_some());
    assert!(sample(r, 1.0).is_none());
    assert!(sample(r, 5.0).is_none(), "last sample is held, and it is missing");
    assert!(sample(r, -0.5).is_none(), "nothing before the first sample");
    let l = point_track(&scene, "L");
    assert_eq!(sample(l, 0.7), Some(Vec3::new(0.0, 1.0, -0.2)), "no interpolation");
}

#[test]
fn tracks_are_classified_by_sample_shape() {
    let mut c = left_right();
    c.insert(
        "Pelvis",
        TrackSeries::frames(vec![0.0], &[Some(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)))]),
    )
    .insert(
        "Homogeneous",
        TrackSeries {
            time: vec![0.0],
            shape: vec![4],
            values: vec![2.0, 4.0, 6.0, 2.0],
        },
    )
    .insert("Force", TrackSeries::scalars(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]));
    let scene = SceneModel::new(c.clone(), Interconnections::new()).unwrap();

    assert_eq!(scene.points().len(), 3);
    assert_eq!(scene.frames().len(), 1);
    assert!(!scene.points().contains_key("Force"));
    assert_eq!(
        sample(point_track(&scene, "Homogeneous"), 0.0),
        Some(Vec3::new(1.0, 2.0, 3.0))
    );
    let m = sample(scene.frames().get("Pelvis").unwrap(), 0.0).unwrap();
    assert!((m.transform_point3(Vec3::ZERO) - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    // Non-drawable tracks still round-trip.
    assert_eq!(scene.contents().tracks.get("Force"), c.tracks.get("Force"));
}

#[test]
fn inconsistent_and_unsorted_tracks_are_skipped() {
    let mut c = Contents::new();
    c.insert(
        "Short",
        TrackSeries {
            time: vec![0.0],
            shape: vec![3],
            values: vec![1.0, 2.0, 3.0, 4.0],
        },
    )
    .insert(
        "Backwards",
        TrackSeries::points(vec![1.0, 0.0], &[Some(Vec3::ZERO), Some(Vec3::ONE)]),
    );
    let scene = SceneModel::new(c, Interconnections::new()).unwrap();
    assert!(scene.is_empty());
    assert_eq!(scene.contents().tracks.len(), 2);
    assert_eq!(scene.time_extent(), None);
}

#[test]
fn oversized_shapes_are_skipped_without_overflow() {
    let huge = TrackSeries {
        time: vec![0.0],
        shape: vec![usize::MAX, 2],
        values: vec![1.0],
    };
    assert_eq!(huge.sample_len(), None);
    let long = TrackSeries {
        time: vec![0.0, 1.0, 2.0],
        shape: vec![usize::MAX / 2],
        values: vec![1.0],
    };
    assert_eq!(long.sample_len(), Some(usize::MAX / 2));

    let mut c = left_right();
    c.insert("Huge", huge).insert("Long", long);
    let scene = SceneModel::new(c, Interconnections::new()).unwrap();
    assert_eq!(scene.points().len(), 2);
    assert_eq!(scene.contents().tracks.len(), 4);

    let p = Player::new(scene.contents().clone(), PlayerConfig::default()).unwrap();
    assert!(p.render(Viewport::new(32, 32)).has_point("L"));
}

#[test]
fn time_extent_is_the_union_of_tracks() {
    let mut c = left_right();
    c.insert("Late", TrackSeries::points(vec![0.5, 3.0], &[Some(Vec3::ZERO), Some(Vec3::ZERO)]));
    let scene = SceneModel::new(c, Interconnections::new()).unwrap();
    assert_eq!(scene.time_extent(), Some((0.0, 3.0)));
}

#[test]
fn reference_times_come_from_the_longest_track() {
    let mut c = left_right();
    c.insert(
        "Dense",
        TrackSeries::points(vec![0.0, 0.25, 0.5], &[Some(Vec3::ZERO); 3]),
    );
    let scene = SceneModel::new(c, Interconnections::new()).unwrap();
    assert_eq!(scene.reference_times(), &[0.0, 0.25, 0.5]);
}

#[test]
fn snapshots_do_not_see_later_swaps() {
    let mut scene = SceneModel::new(left_right(), Interconnections::new()).unwrap();
    let snapshot = scene.clone();
    scene.set_contents(Contents::new());
    assert!(scene.is_empty());
    assert_eq!(snapshot.points().len(), 2);
}

#[test]
fn interconnection_colors_are_validated() {
    let mut scene = SceneModel::default();
    let mut bad = Interconnections::new();
    bad.insert(
        "Arm".into(),
        Interconnection {
            color: [1.5, 0.0, 0.0],
            links: vec![vec!["a".into(), "b".into()]],
        },
    );
    assert!(scene.set_interconnections(bad).is_err());
    assert!(scene.interconnections().is_empty());
}

#[test]
fn wildcard_polylines_expand_once_per_prefix() {
    let names = ["Ann:LTOE", "Ann:LHEE", "Bob:LTOE", "Bob:LHEE"];
    let polyline: Vec<String> = vec!["*LTOE".into(), "*LHEE".into()];
    let expanded = expand_polyline(&polyline, &names);
    assert_eq!(
        expanded,
        vec![
            vec!["Ann:LTOE".to_string(), "Ann:LHEE".to_string()],
            vec!["Bob:LTOE".to_string(), "Bob:LHEE".to_string()],
        ]
    );

    let unmatched: Vec<String> = vec!["*Wrist".into(), "*Elbow".into()];
    assert!(expand_polyline(&unmatched, &names).is_empty());

    let plain: Vec<String> = vec!["A".into(), "B".into()];
    assert_eq!(expand_polyline(&plain, &names), vec![plain.clone()]);

    // Wildcards and exact names mix; only the wildcard element takes the prefix.
    let mixed: Vec<String> = vec!["*LTOE".into(), "RTOE".into()];
    let with_rtoe = ["Ann:LTOE", "RTOE"];
    assert_eq!(
        expand_polyline(&mixed, &with_rtoe),
        vec![vec!["Ann:LTOE".to_string(), "RTOE".to_string()]]
    );
}

#[test]
fn contents_merge_and_json_round_trip() {
    let mut markers = left_right();
    let mut frames = Contents::new();
    frames.insert("Pelvis", TrackSeries::frames(vec![0.0], &[Some(Mat4::IDENTITY)]));
    markers.merge(frames);
    assert_eq!(markers.tracks.len(), 3);

    let json = r#"{"tracks": {"Head": {"time": [0.0, 0.1], "shape": [3], "values": [0,1,2, 3,4,5]}}}"#;
    let parsed = Contents::from_json(json).unwrap();
    let scene = SceneModel::new(parsed, Interconnections::new()).unwrap();
    assert_eq!(
        sample(point_track(&scene, "Head"), 0.1),
        Some(Vec3::new(3.0, 4.0, 5.0))
    );
}

#[test]
fn legacy_interconnection_keys_are_accepted() {
    let json = r#"{"Spine": {"Color": [0.5, 0.5, 0.5], "Links": [["*C7", "*T10"]]}}"#;
    let ic = kineview_core::scene::interconnections_from_json(json).unwrap();
    assert_eq!(ic["Spine"].links[0], vec!["*C7".to_string(), "*T10".to_string()]);
}
