use thiserror::Error;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Response error: {0}")]
    Response(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeminiError {
    /// True when the failure happened before a well-formed reply arrived:
    /// the request could not be sent or the service rejected it outright.
    pub fn is_transport(&self) -> bool {
        matches!(self, GeminiError::Request(_) | GeminiError::Http { .. })
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::Parse(err.to_string())
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
