//! Scene model: the tracks and interconnections of the current session.
//!
//! Raw tracks arrive as [`TrackSeries`] (a time axis plus flattened per-sample
//! values of some shape). On [`SceneModel::set_contents`] each series is
//! classified by sample shape into point tracks (`[3]`, or homogeneous `[4]`)
//! and frame tracks (`[4, 4]`, row-major). Anything else is kept so that
//! `get_contents` round-trips, but it is never drawn. Missing samples are
//! NaN values.

use crate::error::PlayerError;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A time axis with flattened per-sample values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSeries {
    pub time: Vec<f64>,
    /// Shape of one sample, e.g. `[3]`, `[4]` or `[4, 4]`. Empty for scalars.
    #[serde(default)]
    pub shape: Vec<usize>,
    /// Row-major values, `time.len() * shape.product()` of them.
    pub values: Vec<f64>,
}

impl TrackSeries {
    /// Build a `[3]` point series; `None` samples are stored as NaN.
    pub fn points(time: Vec<f64>, positions: &[Option<Vec3>]) -> Self {
        let values = positions
            .iter()
            .flat_map(|p| match p {
                Some(v) => [v.x as f64, v.y as f64, v.z as f64],
                None => [f64::NAN; 3],
            })
            .collect();
        Self {
            time,
            shape: vec![3],
            values,
        }
    }

    /// Build a `[4, 4]` frame series; `None` samples are stored as NaN.
    pub fn frames(time: Vec<f64>, transforms: &[Option<Mat4>]) -> Self {
        let mut values = Vec::with_capacity(transforms.len() * 16);
        for t in transforms {
            match t {
                // Stored row-major, glam is column-major.
                Some(m) => values.extend(m.transpose().to_cols_array().iter().map(|v| *v as f64)),
                None => values.extend([f64::NAN; 16]),
            }
        }
        Self {
            time,
            shape: vec![4, 4],
            values,
        }
    }

    /// Build a scalar series. Never drawn.
    pub fn scalars(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            time,
            shape: Vec::new(),
            values,
        }
    }

    /// Values per sample, or `None` when the shape overflows `usize`.
    pub fn sample_len(&self) -> Option<usize> {
        self.shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn kind(&self) -> TrackKind {
        match self.shape.as_slice() {
            [3] | [4] => TrackKind::Point,
            [4, 4] => TrackKind::Frame,
            _ => TrackKind::Other,
        }
    }

    fn has_valid_time_axis(&self) -> bool {
        self.time.iter().all(|t| t.is_finite()) && self.time.windows(2).all(|w| w[0] < w[1])
    }

    fn has_consistent_values(&self) -> bool {
        self.sample_len()
            .and_then(|n| n.checked_mul(self.time.len()))
            .is_some_and(|total| total == self.values.len())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Point,
    Frame,
    Other,
}

/// Named track container handed over by the data layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contents {
    pub tracks: BTreeMap<String, TrackSeries>,
}

impl Contents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, series: TrackSeries) -> &mut Self {
        self.tracks.insert(name.into(), series);
        self
    }

    /// Fold another container in; tracks of `other` win on name clashes.
    pub fn merge(&mut self, other: Contents) {
        self.tracks.extend(other.tracks);
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Samples of one entity over time. A `None` sample is missing at that stamp.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledTrack<T> {
    time: Vec<f64>,
    samples: Vec<Option<T>>,
}

pub type PointTrack = SampledTrack<Vec3>;
pub type FrameTrack = SampledTrack<Mat4>;

impl<T: Copy> SampledTrack<T> {
    pub fn times(&self) -> &[f64] {
        &self.time
    }

    pub fn samples(&self) -> &[Option<T>] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn extent(&self) -> Option<(f64, f64)> {
        Some((*self.time.first()?, *self.time.last()?))
    }
}

impl PointTrack {
    fn from_series(series: &TrackSeries) -> Self {
        let n = if series.shape == [4] { 4 } else { 3 };
        let samples = series
            .values
            .chunks_exact(n)
            .map(|c| {
                if !c.iter().all(|v| v.is_finite()) {
                    return None;
                }
                let w = if n == 4 { c[3] } else { 1.0 };
                if w.abs() < f64::EPSILON {
                    return None;
                }
                Some(Vec3::new((c[0] / w) as f32, (c[1] / w) as f32, (c[2] / w) as f32))
            })
            .collect();
        Self {
            time: series.time.clone(),
            samples,
        }
    }
}

impl FrameTrack {
    fn from_series(series: &TrackSeries) -> Self {
        let samples = series
            .values
            .chunks_exact(16)
            .map(|c| {
                if !c.iter().all(|v| v.is_finite()) {
                    return None;
                }
                let mut cols = [0.0f32; 16];
                for (dst, src) in cols.iter_mut().zip(c) {
                    *dst = *src as f32;
                }
                Some(Mat4::from_cols_array(&cols).transpose())
            })
            .collect();
        Self {
            time: series.time.clone(),
            samples,
        }
    }
}

/// A colored set of polylines joining point tracks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interconnection {
    #[serde(alias = "Color")]
    pub color: [f32; 3],
    #[serde(alias = "Links")]
    pub links: Vec<Vec<String>>,
}

pub type Interconnections = BTreeMap<String, Interconnection>;

pub fn interconnections_from_json(text: &str) -> Result<Interconnections, serde_json::Error> {
    serde_json::from_str(text)
}

pub(crate) fn validate_color(field: &'static str, c: [f32; 3]) -> Result<(), PlayerError> {
    if c.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)) {
        Ok(())
    } else {
        Err(PlayerError::invalid(
            field,
            format!("color components must lie in [0, 1], got {c:?}"),
        ))
    }
}

#[derive(Debug, Default)]
struct SceneData {
    contents: Contents,
    interconnections: Interconnections,
    points: BTreeMap<String, PointTrack>,
    frames: BTreeMap<String, FrameTrack>,
}

/// Owner of the session's tracks and interconnections.
///
/// Cloning is cheap and yields an immutable snapshot: replacements go through
/// a fresh `Arc`, so a clone taken for export never observes later swaps.
#[derive(Clone, Debug, Default)]
pub struct SceneModel {
    data: Arc<SceneData>,
}

impl SceneModel {
    pub fn new(contents: Contents, interconnections: Interconnections) -> Result<Self, PlayerError> {
        let mut scene = Self::default();
        scene.set_interconnections(interconnections)?;
        scene.set_contents(contents);
        Ok(scene)
    }

    pub fn contents(&self) -> &Contents {
        &self.data.contents
    }

    pub fn interconnections(&self) -> &Interconnections {
        &self.data.interconnections
    }

    pub fn points(&self) -> &BTreeMap<String, PointTrack> {
        &self.data.points
    }

    pub fn frames(&self) -> &BTreeMap<String, FrameTrack> {
        &self.data.frames
    }

    pub fn is_empty(&self) -> bool {
        self.data.points.is_empty() && self.data.frames.is_empty()
    }

    /// Replace every track at once.
    pub fn set_contents(&mut self, contents: Contents) {
        let mut points = BTreeMap::new();
        let mut frames = BTreeMap::new();
        for (name, series) in &contents.tracks {
            if !series.has_valid_time_axis() {
                log::warn!("[scene] track {name:?} skipped: time axis is not strictly increasing");
                continue;
            }
            if !series.has_consistent_values() {
                log::debug!(
                    "[scene] track {name:?} skipped: {} values for {} samples of shape {:?}",
                    series.values.len(),
                    series.time.len(),
                    series.shape
                );
                continue;
            }
            match series.kind() {
                TrackKind::Point => {
                    points.insert(name.clone(), PointTrack::from_series(series));
                }
                TrackKind::Frame => {
                    frames.insert(name.clone(), FrameTrack::from_series(series));
                }
                TrackKind::Other => {
                    log::debug!("[scene] track {name:?} of shape {:?} is not drawable", series.shape);
                }
            }
        }
        log::info!(
            "[scene] contents replaced: {} point tracks, {} frame tracks",
            points.len(),
            frames.len()
        );
        self.data = Arc::new(SceneData {
            contents,
            interconnections: self.data.interconnections.clone(),
            points,
            frames,
        });
    }

    /// Replace every interconnection at once. Rejected sets leave the
    /// current one in place.
    pub fn set_interconnections(&mut self, interconnections: Interconnections) -> Result<(), PlayerError> {
        for ic in interconnections.values() {
            validate_color("interconnection color", ic.color)?;
        }
        self.data = Arc::new(SceneData {
            contents: self.data.contents.clone(),
            interconnections,
            points: self.data.points.clone(),
            frames: self.data.frames.clone(),
        });
        Ok(())
    }

    /// Union of the extents of every drawable track.
    pub fn time_extent(&self) -> Option<(f64, f64)> {
        let point_extents = self.data.points.values().filter_map(|t| t.extent());
        let frame_extents = self.data.frames.values().filter_map(|t| t.extent());
        point_extents
            .chain(frame_extents)
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }

    /// Time axis used for frame indices and sample stepping: the drawable
    /// track with the most samples, ties broken by name.
    pub fn reference_times(&self) -> &[f64] {
        let points = self.data.points.values().map(|t| t.times());
        let frames = self.data.frames.values().map(|t| t.times());
        points
            .chain(frames)
            .fold(&[][..], |best, t| if t.len() > best.len() { t } else { best })
    }
}

/// Expand a polyline with wildcards into one concrete polyline per prefix.
///
/// Every name matching a `*suffix` element contributes its prefix; each
/// prefix then instantiates the whole polyline, so `*LTOE` and `*LHEE` for
/// `Ann:` and `Bob:` yield two polylines. A polyline whose wildcards match
/// nothing expands to nothing.
pub fn expand_polyline(polyline: &[String], available: &[&str]) -> Vec<Vec<String>> {
    let suffixes: SmallVec<[&str; 8]> = polyline.iter().filter_map(|p| p.strip_prefix('*')).collect();
    if suffixes.is_empty() {
        return vec![polyline.to_vec()];
    }
    let mut prefixes = BTreeSet::new();
    for name in available {
        for suffix in &suffixes {
            if let Some(prefix) = name.strip_suffix(suffix) {
                prefixes.insert(prefix);
            }
        }
    }
    prefixes
        .into_iter()
        .map(|prefix| {
            polyline
                .iter()
                .map(|p| match p.strip_prefix('*') {
                    Some(suffix) => format!("{prefix}{suffix}"),
                    None => p.clone(),
                })
                .collect()
        })
        .collect()
}
