//! The [`Player`] facade: one scene plus one [`PlayerState`], with validated
//! accessors for every option and the export surface.

use crate::axes::{Axis, AxisConvention};
use crate::camera::{Camera, ViewPreset, Viewport};
use crate::config::PlayerConfig;
use crate::constants::DEFAULT_EXPORT_FRAME_RATE;
use crate::error::{PlayerError, SinkError};
use crate::export::{
    embedded_animation, write_image, write_video, ExportSettings, FfmpegEncoder, FrameSequence,
    VideoEncoder,
};
use crate::input::{InputEvent, InteractionController};
use crate::render::{render, DrawList};
use crate::scene::{Contents, Interconnections, SceneModel};
use crate::state::PlayerState;
use crate::style::Style;
use crate::timeline::{sample_index, TimeCursor};
use glam::Vec3;
use std::path::Path;
use std::time::Duration;

pub struct Player {
    scene: SceneModel,
    state: PlayerState,
    controller: InteractionController,
    initial_camera: Camera,
    closed: bool,
}

impl Player {
    pub fn new(contents: Contents, config: PlayerConfig) -> Result<Self, PlayerError> {
        let convention = AxisConvention::new(config.up, config.anterior)?;
        let scene = SceneModel::new(contents, config.interconnections)?;

        let mut camera = Camera::default();
        camera.set_azimuth(config.azimuth)?;
        camera.set_elevation(config.elevation)?;
        camera.set_target(convention.to_display(Vec3::from(config.target)))?;
        camera.set_zoom(config.zoom)?;
        camera.set_perspective(config.perspective);

        let mut style = Style::default();
        style.set_point_size(config.point_size)?;
        style.set_default_point_color(config.default_point_color)?;
        style.set_interconnection_width(config.interconnection_width)?;
        style.set_frame_size(config.frame_size)?;
        style.set_frame_width(config.frame_width)?;
        style.set_grid_size(config.grid_size)?;
        style.set_grid_divisions(config.grid_divisions)?;
        style.set_grid_origin(Vec3::from(config.grid_origin))?;
        style.set_grid_color(config.grid_color)?;
        style.set_background_color(config.background_color)?;

        let (min_time, max_time) = scene.time_extent().unwrap_or((0.0, 0.0));
        let mut cursor = TimeCursor::new(min_time, max_time);
        cursor.set_playback_rate(config.playback_rate)?;
        cursor.set_looping(config.looping);

        let mut player = Self {
            state: PlayerState {
                initial_view: (camera.azimuth(), camera.elevation()),
                camera: camera.clone(),
                cursor,
                style,
                convention,
                show_help: false,
            },
            scene,
            controller: InteractionController::new(),
            initial_camera: camera,
            closed: false,
        };

        match (config.current_time, config.initial_frame_index) {
            (Some(t), index) => {
                if index.is_some() {
                    log::warn!("[player] both current_time and initial_frame_index given, using current_time");
                }
                player.set_current_time(t)?;
            }
            (None, Some(i)) => player.set_current_index(i)?,
            (None, None) => {}
        }

        log::info!(
            "[player] ready: {} point tracks, {} frame tracks, time [{}, {}]",
            player.scene.points().len(),
            player.scene.frames().len(),
            min_time,
            max_time
        );
        Ok(player)
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    pub fn style(&self) -> &Style {
        &self.state.style
    }

    pub fn cursor(&self) -> &TimeCursor {
        &self.state.cursor
    }

    // Scene

    pub fn get_contents(&self) -> Contents {
        self.scene.contents().clone()
    }

    /// Swap every track. Camera and style are kept; time bounds are reset to
    /// the new extent and the cursor keeps its relative position in it.
    pub fn set_contents(&mut self, contents: Contents) {
        let cursor = &self.state.cursor;
        let span = cursor.max_time() - cursor.min_time();
        let fraction = if span > 0.0 {
            (cursor.current_time() - cursor.min_time()) / span
        } else {
            0.0
        };

        self.scene.set_contents(contents);
        let (lo, hi) = self.scene.time_extent().unwrap_or((0.0, 0.0));
        let cursor = &mut self.state.cursor;
        cursor.set_bounds(lo, hi);
        cursor.seek(lo + fraction * (hi - lo));
    }

    pub fn get_interconnections(&self) -> Interconnections {
        self.scene.interconnections().clone()
    }

    pub fn set_interconnections(&mut self, interconnections: Interconnections) -> Result<(), PlayerError> {
        self.scene.set_interconnections(interconnections)
    }

    // Axes

    pub fn up(&self) -> Axis {
        self.state.convention.up()
    }

    pub fn anterior(&self) -> Axis {
        self.state.convention.anterior()
    }

    pub fn set_up(&mut self, up: Axis) -> Result<(), PlayerError> {
        self.set_axes(up, self.anterior())
    }

    pub fn set_anterior(&mut self, anterior: Axis) -> Result<(), PlayerError> {
        self.set_axes(self.up(), anterior)
    }

    /// Replace the convention, keeping the camera pivot on the same data point.
    pub fn set_axes(&mut self, up: Axis, anterior: Axis) -> Result<(), PlayerError> {
        let convention = AxisConvention::new(up, anterior)?;
        let old = &self.state.convention;
        let live = convention.to_display(old.to_data(self.state.camera.target()));
        let initial = convention.to_display(old.to_data(self.initial_camera.target()));
        self.state.camera.set_target(live)?;
        self.initial_camera.set_target(initial)?;
        self.state.convention = convention;
        log::info!("[player] axes set to up {up}, anterior {anterior}");
        Ok(())
    }

    // Camera

    pub fn azimuth(&self) -> f32 {
        self.state.camera.azimuth()
    }

    pub fn set_azimuth(&mut self, azimuth: f32) -> Result<(), PlayerError> {
        self.state.camera.set_azimuth(azimuth)
    }

    pub fn elevation(&self) -> f32 {
        self.state.camera.elevation()
    }

    pub fn set_elevation(&mut self, elevation: f32) -> Result<(), PlayerError> {
        self.state.camera.set_elevation(elevation)
    }

    /// Camera pivot in data coordinates.
    pub fn target(&self) -> Vec3 {
        self.state.convention.to_data(self.state.camera.target())
    }

    pub fn set_target(&mut self, target: Vec3) -> Result<(), PlayerError> {
        let display = self.state.convention.to_display(target);
        self.state.camera.set_target(display)
    }

    pub fn zoom(&self) -> f32 {
        self.state.camera.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), PlayerError> {
        self.state.camera.set_zoom(zoom)
    }

    pub fn perspective(&self) -> bool {
        self.state.camera.perspective()
    }

    pub fn set_perspective(&mut self, perspective: bool) {
        self.state.camera.set_perspective(perspective);
    }

    /// Apply a named preset: front, back, left, right, top or bottom.
    pub fn set_view(&mut self, name: &str) -> Result<(), PlayerError> {
        let preset: ViewPreset = name.parse()?;
        self.set_view_preset(preset);
        Ok(())
    }

    pub fn set_view_preset(&mut self, preset: ViewPreset) {
        self.state.camera.set_view(preset);
    }

    // Time

    pub fn current_time(&self) -> f64 {
        self.state.cursor.current_time()
    }

    /// Seek, clamping into `[min_time, max_time]`.
    pub fn set_current_time(&mut self, time: f64) -> Result<(), PlayerError> {
        if time.is_nan() {
            return Err(PlayerError::invalid("current_time", "NaN"));
        }
        self.state.cursor.seek(time);
        Ok(())
    }

    /// Index of the current sample on the reference time axis.
    pub fn current_index(&self) -> Option<usize> {
        sample_index(self.scene.reference_times(), self.current_time())
    }

    pub fn set_current_index(&mut self, index: usize) -> Result<(), PlayerError> {
        let times = self.scene.reference_times();
        let Some(&t) = times.get(index) else {
            return Err(PlayerError::invalid(
                "current_index",
                format!("{index} is out of range for {} samples", times.len()),
            ));
        };
        self.state.cursor.seek(t);
        Ok(())
    }

    pub fn min_time(&self) -> f64 {
        self.state.cursor.min_time()
    }

    pub fn max_time(&self) -> f64 {
        self.state.cursor.max_time()
    }

    pub fn playback_rate(&self) -> f64 {
        self.state.cursor.playback_rate()
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        self.state.cursor.set_playback_rate(rate)
    }

    pub fn looping(&self) -> bool {
        self.state.cursor.is_looping()
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.state.cursor.set_looping(looping);
    }

    pub fn is_playing(&self) -> bool {
        self.state.cursor.is_playing()
    }

    pub fn play(&mut self) {
        self.state.cursor.play();
    }

    pub fn pause(&mut self) {
        self.state.cursor.pause();
    }

    // Style

    pub fn point_size(&self) -> f32 {
        self.state.style.point_size()
    }

    pub fn set_point_size(&mut self, v: f32) -> Result<(), PlayerError> {
        self.state.style.set_point_size(v)
    }

    pub fn default_point_color(&self) -> [f32; 3] {
        self.state.style.default_point_color()
    }

    pub fn set_default_point_color(&mut self, c: [f32; 3]) -> Result<(), PlayerError> {
        self.state.style.set_default_point_color(c)
    }

    pub fn interconnection_width(&self) -> f32 {
        self.state.style.interconnection_width()
    }

    pub fn set_interconnection_width(&mut self, v: f32) -> Result<(), PlayerError> {
        self.state.style.set_interconnection_width(v)
    }

    pub fn frame_size(&self) -> f32 {
        self.state.style.frame_size()
    }

    pub fn set_frame_size(&mut self, v: f32) -> Result<(), PlayerError> {
        self.state.style.set_frame_size(v)
    }

    pub fn frame_width(&self) -> f32 {
        self.state.style.frame_width()
    }

    pub fn set_frame_width(&mut self, v: f32) -> Result<(), PlayerError> {
        self.state.style.set_frame_width(v)
    }

    pub fn grid_size(&self) -> f32 {
        self.state.style.grid_size()
    }

    pub fn set_grid_size(&mut self, v: f32) -> Result<(), PlayerError> {
        self.state.style.set_grid_size(v)
    }

    pub fn grid_divisions(&self) -> u32 {
        self.state.style.grid_divisions()
    }

    pub fn set_grid_divisions(&mut self, n: u32) -> Result<(), PlayerError> {
        self.state.style.set_grid_divisions(n)
    }

    pub fn grid_origin(&self) -> Vec3 {
        self.state.style.grid_origin()
    }

    pub fn set_grid_origin(&mut self, origin: Vec3) -> Result<(), PlayerError> {
        self.state.style.set_grid_origin(origin)
    }

    pub fn grid_color(&self) -> [f32; 3] {
        self.state.style.grid_color()
    }

    pub fn set_grid_color(&mut self, c: [f32; 3]) -> Result<(), PlayerError> {
        self.state.style.set_grid_color(c)
    }

    pub fn background_color(&self) -> [f32; 3] {
        self.state.style.background_color()
    }

    pub fn set_background_color(&mut self, c: [f32; 3]) -> Result<(), PlayerError> {
        self.state.style.set_background_color(c)
    }

    pub fn show_help(&self) -> bool {
        self.state.show_help
    }

    pub fn set_show_help(&mut self, show: bool) {
        self.state.show_help = show;
    }

    // Frame loop

    /// Advance the playback clock. Returns whether a redraw is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.closed {
            return false;
        }
        self.state.cursor.advance(dt)
    }

    /// Feed one input event. Returns whether a redraw is needed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.closed {
            return false;
        }
        self.controller.handle(event, &mut self.state, &self.scene)
    }

    pub fn render(&self, viewport: Viewport) -> DrawList {
        render(&self.scene, &self.state, viewport)
    }

    /// Release the scene data. Later ticks and input are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.state.cursor.pause();
        self.scene = SceneModel::default();
        self.state.cursor.set_bounds(0.0, 0.0);
        self.closed = true;
        log::info!("[player] closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // Export

    fn export_state(&self, settings: &ExportSettings) -> PlayerState {
        let mut state = self.state.clone();
        state.camera = settings
            .camera
            .clone()
            .unwrap_or_else(|| self.initial_camera.clone());
        state
    }

    /// Lazy frames over `[start, end]` using the default export settings.
    pub fn render_sequence(&self, start: f64, end: f64, frame_rate: f64) -> Result<FrameSequence, PlayerError> {
        self.render_sequence_with(start, end, frame_rate, &ExportSettings::default())
    }

    pub fn render_sequence_with(
        &self,
        start: f64,
        end: f64,
        frame_rate: f64,
        settings: &ExportSettings,
    ) -> Result<FrameSequence, PlayerError> {
        FrameSequence::new(
            self.scene.clone(),
            self.export_state(settings),
            settings.viewport,
            start,
            end,
            frame_rate,
        )
    }

    /// Write the current time as a still image (PNG or JPEG by extension).
    pub fn to_image(&self, path: impl AsRef<Path>) -> Result<(), PlayerError> {
        self.to_image_with(path, &ExportSettings::default())
    }

    pub fn to_image_with(&self, path: impl AsRef<Path>, settings: &ExportSettings) -> Result<(), PlayerError> {
        let t = self.current_time();
        let mut frames = self.render_sequence_with(t, t, DEFAULT_EXPORT_FRAME_RATE, settings)?;
        let frame = frames.next().ok_or(SinkError::NoFrames)?;
        write_image(&frame, path.as_ref())
    }

    /// Encode a video through `ffmpeg`. `time_range` defaults to the full
    /// extent. Returns the number of frames written.
    pub fn to_video(
        &self,
        path: impl AsRef<Path>,
        frame_rate: f64,
        time_range: Option<(f64, f64)>,
    ) -> Result<usize, PlayerError> {
        let mut encoder = FfmpegEncoder::new(path.as_ref());
        self.to_video_with(&mut encoder, frame_rate, time_range, &ExportSettings::default())
    }

    pub fn to_video_with<E: VideoEncoder + ?Sized>(
        &self,
        encoder: &mut E,
        frame_rate: f64,
        time_range: Option<(f64, f64)>,
        settings: &ExportSettings,
    ) -> Result<usize, PlayerError> {
        let (start, end) = time_range.unwrap_or((self.min_time(), self.max_time()));
        let frames = self.render_sequence_with(start, end, frame_rate, settings)?;
        write_video(frames, encoder)
    }

    /// Self-contained HTML animation of the full extent at the default rate.
    pub fn to_embedded_animation(&self) -> Result<String, PlayerError> {
        self.to_embedded_animation_with(DEFAULT_EXPORT_FRAME_RATE, None, &ExportSettings::default())
    }

    pub fn to_embedded_animation_with(
        &self,
        frame_rate: f64,
        time_range: Option<(f64, f64)>,
        settings: &ExportSettings,
    ) -> Result<String, PlayerError> {
        let (start, end) = time_range.unwrap_or((self.min_time(), self.max_time()));
        let frames = self.render_sequence_with(start, end, frame_rate, settings)?;
        embedded_animation(frames)
    }
}
