use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceAuthError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("An operation is already in progress.")]
    Busy,

    #[error("Camera is not available.")]
    CameraUnavailable,

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Non-success HTTP response. Displays as the server message alone.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Capture controller has stopped")]
    ControllerStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FaceAuthError>;
