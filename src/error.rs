// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The raster surface could not be set up. Fatal for the canvas.
    #[error("drawing unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Camera init error: {0}")]
    CameraInit(String),

    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// Encoding the surface failed; the drawing is untouched and saving can be retried.
    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid content record: {0}")]
    InvalidRecord(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No child selected")]
    NoChildSelected,
}

pub type Result<T> = std::result::Result<T, Error>;
