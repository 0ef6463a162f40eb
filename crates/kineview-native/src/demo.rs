//! Synthetic walking figure shown when no data file is given.

use glam::{Mat4, Quat, Vec3};
use kineview_core::{Contents, Interconnection, Interconnections, TrackSeries};
use std::f32::consts::TAU;

const SAMPLE_RATE: f32 = 100.0; // Hz
const DURATION: f32 = 4.0; // seconds
const STRIDE_HZ: f32 = 1.0;
const WALK_SPEED: f32 = 0.6; // m/s along +x

// Marker name, rest position (x anterior, y up, z lateral), swing amplitude.
const MARKERS: &[(&str, [f32; 3], f32)] = &[
    ("Demo:Head", [0.0, 1.7, 0.0], 0.0),
    ("Demo:LShoulder", [0.0, 1.45, -0.2], 0.0),
    ("Demo:RShoulder", [0.0, 1.45, 0.2], 0.0),
    ("Demo:LElbow", [0.0, 1.15, -0.25], 0.12),
    ("Demo:RElbow", [0.0, 1.15, 0.25], -0.12),
    ("Demo:LWrist", [0.0, 0.9, -0.25], 0.25),
    ("Demo:RWrist", [0.0, 0.9, 0.25], -0.25),
    ("Demo:LHip", [0.0, 0.95, -0.1], 0.0),
    ("Demo:RHip", [0.0, 0.95, 0.1], 0.0),
    ("Demo:LKnee", [0.0, 0.5, -0.1], -0.15),
    ("Demo:RKnee", [0.0, 0.5, 0.1], 0.15),
    ("Demo:LAnkle", [0.0, 0.08, -0.1], -0.3),
    ("Demo:RAnkle", [0.0, 0.08, 0.1], 0.3),
];

pub fn contents() -> Contents {
    let n = (DURATION * SAMPLE_RATE) as usize + 1;
    let time: Vec<f64> = (0..n).map(|i| i as f64 / SAMPLE_RATE as f64).collect();
    let mut contents = Contents::new();

    for &(name, rest, swing) in MARKERS {
        let positions: Vec<Option<Vec3>> = time
            .iter()
            .map(|&t| {
                let t = t as f32;
                let phase = (TAU * STRIDE_HZ * t).sin();
                let forward = WALK_SPEED * t + swing * phase;
                Some(Vec3::new(rest[0] + forward, rest[1], rest[2]))
            })
            .collect();
        contents.insert(name, TrackSeries::points(time.clone(), &positions));
    }

    let pelvis: Vec<Option<Mat4>> = time
        .iter()
        .map(|&t| {
            let t = t as f32;
            let yaw = 0.15 * (TAU * STRIDE_HZ * t).sin();
            Some(Mat4::from_rotation_translation(
                Quat::from_rotation_y(yaw),
                Vec3::new(WALK_SPEED * t, 0.95, 0.0),
            ))
        })
        .collect();
    contents.insert("Demo:Pelvis", TrackSeries::frames(time, &pelvis));
    contents
}

fn polyline(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn interconnections() -> Interconnections {
    let mut out = Interconnections::new();
    out.insert(
        "Trunk".to_string(),
        Interconnection {
            color: [0.9, 0.9, 0.4],
            links: vec![
                polyline(&["*Head", "*LShoulder", "*RShoulder", "*Head"]),
                polyline(&["*LShoulder", "*LHip", "*RHip", "*RShoulder"]),
            ],
        },
    );
    out.insert(
        "LeftSide".to_string(),
        Interconnection {
            color: [1.0, 0.4, 0.4],
            links: vec![
                polyline(&["*LShoulder", "*LElbow", "*LWrist"]),
                polyline(&["*LHip", "*LKnee", "*LAnkle"]),
            ],
        },
    );
    out.insert(
        "RightSide".to_string(),
        Interconnection {
            color: [0.4, 0.6, 1.0],
            links: vec![
                polyline(&["*RShoulder", "*RElbow", "*RWrist"]),
                polyline(&["*RHip", "*RKnee", "*RAnkle"]),
            ],
        },
    );
    out
}
