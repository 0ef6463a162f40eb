use thiserror::Error;

/// Failures surfaced synchronously by the player.
///
/// Per-frame data problems (missing samples, tracks of unexpected shape,
/// wildcards matching nothing) are never errors; the renderer omits the
/// affected geometry instead.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("unknown axis label {0:?}, expected one of x, y, z, -x, -y, -z")]
    InvalidAxisLabel(String),

    #[error("up axis {up} and anterior axis {anterior} are not orthogonal")]
    InvalidAxisConvention { up: String, anterior: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("export sink failed: {0}")]
    ExportSinkFailure(#[from] SinkError),
}

impl PlayerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by the sinks rendered frames are handed to.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("encoder error: {0}")]
    Encoder(#[from] anyhow::Error),

    #[error("no frames in the requested range")]
    NoFrames,
}
