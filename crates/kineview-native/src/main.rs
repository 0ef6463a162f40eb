use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use kineview_core::overlay::HELP_LINES;
use kineview_core::scene::interconnections_from_json;
use kineview_core::{
    Contents, ExportSettings, FfmpegEncoder, InputEvent, Modifiers, Player, PlayerConfig, Viewport,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

mod demo;
mod events;
mod gpu;
mod tessellate;

use gpu::GpuState;

const MAX_FRAME_DT: Duration = Duration::from_millis(100); // caps clock jumps after idle waits

#[derive(Parser, Debug)]
#[command(name = "kineview", version, about = "Player for marker and rigid-body kinematics")]
struct Args {
    /// Track containers (JSON). Several files are merged; a demo figure is
    /// shown when none is given.
    contents: Vec<PathBuf>,

    /// Player options (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interconnection definitions (JSON), replacing those of the config.
    #[arg(long)]
    interconnections: Option<PathBuf>,

    /// Write the first frame as an image and exit.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Encode the time range to a video file with ffmpeg and exit.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Write a self-contained HTML animation and exit.
    #[arg(long)]
    html: Option<PathBuf>,

    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    #[arg(long)]
    start: Option<f64>,

    #[arg(long)]
    end: Option<f64>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,
}

impl Args {
    fn headless(&self) -> bool {
        self.png.is_some() || self.video.is_some() || self.html.is_some()
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn build_player(args: &Args) -> anyhow::Result<Player> {
    let mut config = match &args.config {
        Some(path) => PlayerConfig::from_json(&read(path)?)
            .with_context(|| format!("parsing {}", path.display()))?,
        None => PlayerConfig::default(),
    };
    if let Some(path) = &args.interconnections {
        config.interconnections = interconnections_from_json(&read(path)?)
            .with_context(|| format!("parsing {}", path.display()))?;
    }

    let contents = if args.contents.is_empty() {
        log::info!("No data file given, showing the demo figure");
        if config.interconnections.is_empty() {
            config.interconnections = demo::interconnections();
        }
        demo::contents()
    } else {
        let mut merged = Contents::new();
        for path in &args.contents {
            let part = Contents::from_json(&read(path)?)
                .with_context(|| format!("parsing {}", path.display()))?;
            merged.merge(part);
        }
        merged
    };

    Ok(Player::new(contents, config)?)
}

fn export(player: &mut Player, args: &Args) -> anyhow::Result<()> {
    let settings = ExportSettings {
        viewport: Viewport::new(args.width, args.height),
        camera: None,
    };
    let range = (
        args.start.unwrap_or(player.min_time()),
        args.end.unwrap_or(player.max_time()),
    );
    if let Some(path) = &args.png {
        player.set_current_time(range.0)?;
        player.to_image_with(path, &settings)?;
    }
    if let Some(path) = &args.video {
        let mut encoder = FfmpegEncoder::new(path);
        let frames = player.to_video_with(&mut encoder, args.fps, Some(range), &settings)?;
        log::info!("Wrote {frames} frames to {}", path.display());
    }
    if let Some(path) = &args.html {
        let html = player.to_embedded_animation_with(args.fps, Some(range), &settings)?;
        std::fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn window_title(player: &Player) -> String {
    match player.current_index() {
        Some(i) => format!("kineview  {:.3} s  (frame {i})", player.current_time()),
        None => format!("kineview  {:.3} s", player.current_time()),
    }
}

fn run_window(mut player: Player, args: &Args) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(window_title(&player))
        .with_inner_size(winit::dpi::PhysicalSize::new(args.width, args.height))
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;
    let mut last_frame = Instant::now();
    let mut cursor = Vec2::ZERO;
    let mut mods = Modifiers::default();
    let mut dirty = true;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => {
            let input = match event {
                WindowEvent::Resized(size) => {
                    state.resize(size);
                    dirty = true;
                    None
                }
                WindowEvent::CloseRequested => {
                    player.close();
                    elwt.exit();
                    None
                }
                WindowEvent::ModifiersChanged(m) => {
                    mods = events::modifiers(m.state());
                    None
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Vec2::new(position.x as f32, position.y as f32);
                    Some(InputEvent::PointerMove { position: cursor })
                }
                WindowEvent::MouseInput { state: s, button, .. } => {
                    events::mouse_input(s, button, cursor, mods)
                }
                WindowEvent::MouseWheel { delta, .. } => Some(events::scroll(delta)),
                WindowEvent::KeyboardInput { event: key_event, .. }
                    if key_event.state == ElementState::Pressed =>
                {
                    events::key(&key_event.logical_key).map(|key| InputEvent::KeyDown {
                        key,
                        modifiers: mods,
                    })
                }
                _ => None,
            };
            if let Some(input) = input {
                let help_before = player.show_help();
                dirty |= player.handle_input(input);
                if player.show_help() && !help_before {
                    for line in HELP_LINES {
                        log::info!("{line}");
                    }
                }
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            dirty |= player.tick((now - last_frame).min(MAX_FRAME_DT));
            last_frame = now;
            if !dirty {
                return;
            }
            let list = player.render(state.viewport());
            match state.render(&list) {
                Ok(_) => {
                    dirty = player.is_playing();
                    state.window.set_title(&window_title(&player));
                    state.window.request_redraw();
                }
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let mut player = build_player(&args)?;

    if args.headless() {
        return export(&mut player, &args);
    }
    run_window(player, &args)
}
