use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorksError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response from content store: {0}")]
    MalformedResponse(String),

    #[error("Request aborted")]
    Aborted,

    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("Share failed: {0}")]
    Share(String),
}

impl WorksError {
    /// Cancellation is reported separately so callers can treat it as a no-op.
    pub fn is_aborted(&self) -> bool {
        matches!(self, WorksError::Aborted)
    }
}

pub type Result<T> = std::result::Result<T, WorksError>;
