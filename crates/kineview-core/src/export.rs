//! Off-screen rendering of a time range and the sinks it feeds.
//!
//! A [`FrameSequence`] owns a snapshot of the scene and of the player state,
//! so it can be consumed while the live player keeps changing. Dropping it
//! early cancels the export; frames already produced stay valid.

use crate::camera::{Camera, Viewport};
use crate::constants::{DEFAULT_EXPORT_HEIGHT, DEFAULT_EXPORT_WIDTH, MAX_EXPORT_FRAMES, TIME_EPSILON};
use crate::error::{PlayerError, SinkError};
use crate::raster::rasterize;
use crate::render::{render, DrawList};
use crate::scene::SceneModel;
use crate::state::PlayerState;
use crate::svg::to_svg;
use anyhow::{bail, Context};
use image::RgbaImage;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Output size and optional camera override for exports.
///
/// Without a camera, exports use the camera the player was built with, not
/// whatever the user has since dragged the live view to.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSettings {
    pub viewport: Viewport,
    pub camera: Option<Camera>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(DEFAULT_EXPORT_WIDTH, DEFAULT_EXPORT_HEIGHT),
            camera: None,
        }
    }
}

/// Frames at `start + k / frame_rate` for every `k` that stays within
/// `end`, both ends included.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    scene: SceneModel,
    state: PlayerState,
    viewport: Viewport,
    start: f64,
    frame_rate: f64,
    count: usize,
    next: usize,
}

impl FrameSequence {
    pub fn new(
        scene: SceneModel,
        mut state: PlayerState,
        viewport: Viewport,
        start: f64,
        end: f64,
        frame_rate: f64,
    ) -> Result<Self, PlayerError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(PlayerError::invalid("time_range", format!("({start}, {end}) is not finite")));
        }
        if start > end {
            return Err(PlayerError::invalid("time_range", format!("start {start} is after end {end}")));
        }
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(PlayerError::invalid("frame_rate", format!("expected a positive rate, got {frame_rate}")));
        }
        let count = ((end - start) * frame_rate + TIME_EPSILON).floor() + 1.0;
        if count > MAX_EXPORT_FRAMES as f64 {
            return Err(PlayerError::invalid(
                "time_range",
                format!("{count} frames exceed the limit of {MAX_EXPORT_FRAMES}"),
            ));
        }
        let count = count as usize;

        // Exports never show live transport state or the help block. The
        // cursor keeps the scene's bounds, so times outside the data clamp.
        state.cursor.pause();
        state.show_help = false;

        Ok(Self {
            scene,
            state,
            viewport,
            start,
            frame_rate,
            count,
            next: 0,
        })
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time_at(&self, k: usize) -> f64 {
        self.start + k as f64 / self.frame_rate
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|k| self.time_at(k))
    }

    /// Rewind to the first frame.
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for FrameSequence {
    type Item = DrawList;

    fn next(&mut self) -> Option<DrawList> {
        if self.next >= self.count {
            return None;
        }
        let t = self.time_at(self.next);
        self.next += 1;
        self.state.cursor.seek(t);
        Some(render(&self.scene, &self.state, self.viewport))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FrameSequence {}

/// Receives rendered frames in order.
pub trait VideoEncoder {
    fn begin(&mut self, width: u32, height: u32, frame_rate: f64) -> anyhow::Result<()>;
    fn push_frame(&mut self, frame: &RgbaImage) -> anyhow::Result<()>;
    fn finish(&mut self) -> anyhow::Result<()>;
}

/// Streams raw RGBA frames to an `ffmpeg` child process.
pub struct FfmpegEncoder {
    path: PathBuf,
    program: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            program: "ffmpeg".to_string(),
            child: None,
            stdin: None,
        }
    }

    /// Use a specific ffmpeg executable instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn begin(&mut self, width: u32, height: u32, frame_rate: f64) -> anyhow::Result<()> {
        let mut child = Command::new(&self.program)
            .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .arg("-s")
            .arg(format!("{width}x{height}"))
            .arg("-r")
            .arg(format!("{frame_rate}"))
            .args(["-i", "-", "-an", "-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2", "-pix_fmt", "yuv420p"])
            .arg(&self.path)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {}", self.program))?;
        self.stdin = child.stdin.take();
        self.child = Some(child);
        log::debug!("[export] {} started for {}", self.program, self.path.display());
        Ok(())
    }

    fn push_frame(&mut self, frame: &RgbaImage) -> anyhow::Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            bail!("encoder was not started");
        };
        stdin.write_all(frame.as_raw()).context("writing frame to encoder")?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        // Closing stdin signals end of stream.
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            bail!("encoder was not started");
        };
        let status = child.wait().context("waiting for encoder")?;
        if !status.success() {
            bail!("{} exited with {status}", self.program);
        }
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    /// An encoder abandoned before `finish` must not leave ffmpeg running.
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                log::debug!("[export] {} already exited: {e}", self.program);
            }
            let _ = child.wait();
        }
    }
}

/// Rasterize one frame and write it; the format follows the file extension.
pub fn write_image(frame: &DrawList, path: &Path) -> Result<(), PlayerError> {
    let img = rasterize(frame);
    img.save(path).map_err(SinkError::from)?;
    log::info!("[export] wrote {}x{} image to {}", img.width(), img.height(), path.display());
    Ok(())
}

/// Hand every frame of `frames` to `encoder`. Returns the number written.
pub fn write_video<E: VideoEncoder + ?Sized>(
    frames: FrameSequence,
    encoder: &mut E,
) -> Result<usize, PlayerError> {
    let viewport = frames.viewport();
    encoder
        .begin(viewport.width, viewport.height, frames.frame_rate())
        .map_err(SinkError::from)?;
    let mut written = 0;
    for frame in frames {
        encoder.push_frame(&rasterize(&frame)).map_err(SinkError::from)?;
        written += 1;
    }
    if written == 0 {
        return Err(SinkError::NoFrames.into());
    }
    encoder.finish().map_err(SinkError::from)?;
    log::info!("[export] encoded {written} frames");
    Ok(written)
}

/// Self-contained HTML document replaying `frames` as inline SVG.
///
/// Space pauses and resumes playback; the animation loops.
pub fn embedded_animation(frames: FrameSequence) -> Result<String, PlayerError> {
    let interval_ms = 1000.0 / frames.frame_rate();
    let Viewport { width, height } = frames.viewport();
    let background = frames.state.style.background_color();
    let [r, g, b] = background.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);

    let mut body = String::new();
    let mut count = 0usize;
    for (k, frame) in frames.enumerate() {
        let display = if k == 0 { "block" } else { "none" };
        let _ = write!(body, r#"<div class="kv-frame" style="display:{display}">{}</div>"#, to_svg(&frame));
        count += 1;
    }
    if count == 0 {
        return Err(SinkError::NoFrames.into());
    }

    let mut html = String::new();
    let _ = write!(
        html,
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>kineview</title>\n</head>\n",
            "<body style=\"margin:0;background:rgb({r},{g},{b})\">\n",
            "<div id=\"kv-player\" style=\"width:{w}px;height:{h}px\">{body}</div>\n",
            "<script>\n(function () {{\n",
            "  var frames = document.querySelectorAll('#kv-player .kv-frame');\n",
            "  var i = 0, playing = true;\n",
            "  setInterval(function () {{\n",
            "    if (!playing || frames.length < 2) return;\n",
            "    frames[i].style.display = 'none';\n",
            "    i = (i + 1) % frames.length;\n",
            "    frames[i].style.display = 'block';\n",
            "  }}, {interval});\n",
            "  document.addEventListener('keydown', function (e) {{\n",
            "    if (e.key === ' ') {{ playing = !playing; e.preventDefault(); }}\n",
            "  }});\n",
            "}})();\n</script>\n</body>\n</html>\n"
        ),
        r = r,
        g = g,
        b = b,
        w = width,
        h = height,
        body = body,
        interval = interval_ms,
    );
    log::info!("[export] embedded animation with {count} frames");
    Ok(html)
}
