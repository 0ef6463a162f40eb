pub mod axes;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod input;
pub mod overlay;
pub mod player;
pub mod raster;
pub mod render;
pub mod scene;
pub mod state;
pub mod style;
pub mod svg;
pub mod timeline;

pub use axes::{Axis, AxisConvention};
pub use camera::{Camera, Projected, ViewPreset, Viewport};
pub use config::PlayerConfig;
pub use error::{PlayerError, SinkError};
pub use export::{ExportSettings, FfmpegEncoder, FrameSequence, VideoEncoder};
pub use input::{InputEvent, InteractionController, Key, Modifiers, MouseButton};
pub use player::Player;
pub use render::{DrawList, Layer, OverlayText, Primitive, Shape};
pub use scene::{Contents, Interconnection, Interconnections, SceneModel, TrackSeries};
pub use state::PlayerState;
pub use style::Style;
pub use timeline::TimeCursor;
