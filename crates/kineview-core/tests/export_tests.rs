use glam::Vec3;
use image::RgbaImage;
use kineview_core::export::write_video;
use kineview_core::raster::rasterize;
use kineview_core::constants::MAX_EXPORT_FRAMES;
use kineview_core::{
    Camera, Contents, ExportSettings, FfmpegEncoder, Player, PlayerConfig, PlayerError, SinkError,
    TrackSeries, VideoEncoder, Viewport,
};
use std::path::PathBuf;

fn player() -> Player {
    let time: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
    let positions: Vec<Option<Vec3>> = time
        .iter()
        .map(|&t| Some(Vec3::new(t as f32, 1.0, 0.0)))
        .collect();
    let mut c = Contents::new();
    c.insert("Head", TrackSeries::points(time, &positions));
    Player::new(c, PlayerConfig::default()).unwrap()
}

fn small() -> ExportSettings {
    ExportSettings {
        viewport: Viewport::new(64, 48),
        camera: None,
    }
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kineview-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[derive(Default)]
struct Recorder {
    size: Option<(u32, u32)>,
    frame_rate: f64,
    frames: Vec<RgbaImage>,
    finished: bool,
}

impl VideoEncoder for Recorder {
    fn begin(&mut self, width: u32, height: u32, frame_rate: f64) -> anyhow::Result<()> {
        self.size = Some((width, height));
        self.frame_rate = frame_rate;
        Ok(())
    }

    fn push_frame(&mut self, frame: &RgbaImage) -> anyhow::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.finished = true;
        Ok(())
    }
}

struct Broken;

impl VideoEncoder for Broken {
    fn begin(&mut self, _: u32, _: u32, _: f64) -> anyhow::Result<()> {
        Ok(())
    }

    fn push_frame(&mut self, _: &RgbaImage) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn sequence_includes_both_ends() {
    let p = player();
    let seq = p.render_sequence(0.0, 1.0, 10.0).unwrap();
    assert_eq!(seq.len(), 11);
    let times: Vec<f64> = seq.map(|frame| frame.time).collect();
    assert_eq!(times.len(), 11);
    for (k, t) in times.iter().enumerate() {
        assert!((t - k as f64 / 10.0).abs() < 1e-12, "frame {k} at {t}");
    }
}

#[test]
fn sequence_edge_cases() {
    let p = player();
    assert_eq!(p.render_sequence(0.5, 0.5, 30.0).unwrap().count(), 1);
    assert_eq!(p.render_sequence(0.0, 0.95, 10.0).unwrap().len(), 10);
    assert!(matches!(
        p.render_sequence(1.0, 0.0, 10.0),
        Err(PlayerError::InvalidValue { .. })
    ));
    assert!(p.render_sequence(0.0, 1.0, 0.0).is_err());
    assert!(p.render_sequence(0.0, f64::INFINITY, 10.0).is_err());
    assert!(matches!(
        p.render_sequence(0.0, 1.0e10, 1.0e10),
        Err(PlayerError::InvalidValue { field: "time_range", .. })
    ));
    let longest = (MAX_EXPORT_FRAMES - 1) as f64;
    assert_eq!(p.render_sequence(0.0, longest, 1.0).unwrap().len(), MAX_EXPORT_FRAMES);
    assert!(p.render_sequence(0.0, longest + 1.0, 1.0).is_err());
}

#[test]
fn times_outside_the_data_clamp_into_it() {
    let p = player();
    let frames: Vec<_> = p.render_sequence(-1.0, 2.0, 1.0).unwrap().collect();
    assert_eq!(frames.len(), 4);
    let times: Vec<f64> = frames.iter().map(|f| f.time).collect();
    assert_eq!(times, vec![0.0, 0.0, 1.0, 1.0]);
    assert!(frames.iter().all(|f| f.has_point("Head")));
}

#[test]
fn sequence_is_restartable_and_detached() {
    let mut p = player();
    p.set_current_time(0.7).unwrap();
    p.play();
    let mut seq = p.render_sequence(0.0, 0.2, 10.0).unwrap();
    let first: Vec<_> = seq.by_ref().collect();
    seq.restart();
    let second: Vec<_> = seq.collect();
    assert_eq!(first, second);
    assert!(first.iter().all(|f| !f.overlay[0].text.contains("playing")));

    assert!(p.is_playing());
    assert_eq!(p.current_time(), 0.7);
}

#[test]
fn sequence_ignores_later_contents_swaps() {
    let mut p = player();
    let seq = p.render_sequence(0.0, 1.0, 5.0).unwrap();
    p.set_contents(Contents::new());
    assert!(seq.into_iter().all(|frame| frame.has_point("Head")));
}

#[test]
fn export_uses_initial_camera_unless_given_one() {
    let mut p = player();
    let reference: Vec<_> = p.render_sequence(0.0, 0.0, 1.0).unwrap().collect();
    p.set_azimuth(2.0).unwrap();
    p.set_zoom(3.0).unwrap();
    let after: Vec<_> = p.render_sequence(0.0, 0.0, 1.0).unwrap().collect();
    assert_eq!(reference, after);

    let settings = ExportSettings {
        camera: Some(p.camera().clone()),
        ..ExportSettings::default()
    };
    let live: Vec<_> = p
        .render_sequence_with(0.0, 0.0, 1.0, &settings)
        .unwrap()
        .collect();
    assert_ne!(reference, live);
}

#[test]
fn video_frames_are_handed_over_in_order() {
    let p = player();
    let mut rec = Recorder::default();
    let n = p
        .to_video_with(&mut rec, 10.0, Some((0.0, 0.5)), &small())
        .unwrap();
    assert_eq!(n, 6);
    assert_eq!(rec.frames.len(), 6);
    assert_eq!(rec.size, Some((64, 48)));
    assert_eq!(rec.frame_rate, 10.0);
    assert!(rec.finished);
    assert!(rec.frames.iter().all(|f| f.dimensions() == (64, 48)));
}

#[test]
fn encoder_failures_propagate() {
    let p = player();
    let seq = p.render_sequence_with(0.0, 1.0, 10.0, &small()).unwrap();
    assert!(matches!(
        write_video(seq, &mut Broken),
        Err(PlayerError::ExportSinkFailure(SinkError::Encoder(_)))
    ));
}

#[cfg(unix)]
#[test]
fn abandoned_ffmpeg_encoder_reaps_its_child() {
    // `cat` rejects ffmpeg's arguments, which is fine: only the process
    // lifetime matters here.
    let mut encoder = FfmpegEncoder::new(temp_path("abandoned.mp4")).with_program("cat");
    encoder.begin(4, 4, 10.0).unwrap();
    let _ = encoder.push_frame(&RgbaImage::new(4, 4));
    drop(encoder);

    let mut never_started = FfmpegEncoder::new(temp_path("never.mp4"));
    assert!(never_started.push_frame(&RgbaImage::new(4, 4)).is_err());
    drop(never_started);
}

#[test]
fn still_image_is_written() {
    let p = player();
    let path = temp_path("still.png");
    p.to_image_with(&path, &small()).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unwritable_image_path_is_a_sink_failure() {
    let p = player();
    let path = temp_path("missing-dir").join("nested").join("still.png");
    assert!(matches!(
        p.to_image_with(&path, &small()),
        Err(PlayerError::ExportSinkFailure(_))
    ));
}

#[test]
fn raster_paints_background_and_markers() {
    let mut p = player();
    p.set_background_color([0.0, 0.0, 1.0]).unwrap();
    p.set_grid_size(0.0).unwrap();
    p.set_point_size(6.0).unwrap();
    p.set_default_point_color([1.0, 0.0, 0.0]).unwrap();
    let settings = ExportSettings {
        camera: Some(Camera::default()),
        ..small()
    };
    let frame = p
        .render_sequence_with(0.0, 0.0, 1.0, &settings)
        .unwrap()
        .next()
        .unwrap();
    let img = rasterize(&frame);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
    let center = match frame.primitives[0].shape {
        kineview_core::Shape::Marker { center, .. } => center,
        _ => panic!("expected a marker"),
    };
    let px = img.get_pixel(center.x as u32, center.y as u32).0;
    assert_eq!(px, [255, 0, 0, 255]);
}

#[test]
fn embedded_animation_is_self_contained() {
    let p = player();
    let html = p
        .to_embedded_animation_with(5.0, Some((0.0, 1.0)), &small())
        .unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<svg").count(), 6);
    assert_eq!(html.matches("class=\"kv-frame\"").count(), 6);
    assert!(html.contains("<script>"));
    assert!(html.contains("0.000 s (frame 0)"));
    assert!(!html.contains("src=\"http"));
}
