use std::path::PathBuf;

use image::ImageError;

#[derive(thiserror::Error, Debug)]
pub enum ExplorerError {
    #[error("frame must be at least 1x1 pixels, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
    #[error("max iterations must be at least 1")]
    NoIterations,
    #[error("default zoom must be positive and finite, got {0}")]
    InvalidZoom(f64),
    #[error("zoom factor must be finite and greater than 1, got {0}")]
    InvalidZoomFactor(f64),
    #[error("move speed must be positive and finite, got {0}")]
    InvalidMoveSpeed(f64),
    #[error("coordinate multiplier must be finite, got {0}")]
    InvalidCoordsMul(f64),
    #[error("engine needs at least one worker")]
    NoWorkers,
    #[error("unknown intent key {0:?}")]
    UnknownIntent(char),
    #[error("repeat count {0} is not followed by a key")]
    DanglingRepeat(u32),
    #[error("repeat count {0} does not fit in 32 bits")]
    RepeatTooLarge(String),
    #[error("key script expands past {0} intents")]
    ScriptTooLong(usize),
    #[error("frame {width}x{height} exceeds the {max} pixel limit per side")]
    FrameTooLarge { width: u32, height: u32, max: u32 },
    #[error("{workers} workers exceeds the limit of {max}")]
    TooManyWorkers { workers: usize, max: usize },
    #[error("Thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image: {0}")]
    Image(ImageError),
    #[error("Config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
    #[cfg(feature = "viewer")]
    #[error("Viewer: {0}")]
    Viewer(String),
    #[cfg(not(feature = "viewer"))]
    #[error("built without the `viewer` feature; try `mandelzoom render`")]
    ViewerUnavailable,
}

impl From<ImageError> for ExplorerError {
    fn from(err: ImageError) -> Self {
        ExplorerError::Image(err)
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
