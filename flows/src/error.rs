use studymate_core::errors::GeminiError;
use thiserror::Error;

/// Failures of one capability invocation.
///
/// `InputInvalid` is raised before any remote call; the other variants can
/// only occur after dispatch.
#[derive(Error, Debug)]
pub enum FlowError {
    /// A required input field is missing or empty. Callers should treat
    /// this as a local validation error, not a remote failure.
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    /// The remote call completed but returned an empty or schema-invalid
    /// payload.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The remote call itself could not complete (network/auth/quota).
    #[error("Transport failure: {0}")]
    Transport(GeminiError),
}

impl FlowError {
    /// Classify a client error: request/HTTP failures are transport
    /// problems, everything after a successful exchange is a generation
    /// failure.
    pub(crate) fn from_client(err: GeminiError) -> Self {
        if err.is_transport() {
            FlowError::Transport(err)
        } else {
            FlowError::Generation(err.to_string())
        }
    }

    pub fn is_input_invalid(&self) -> bool {
        matches!(self, FlowError::InputInvalid(_))
    }
}

pub type FlowResult<T> = Result<T, FlowError>;

/// Rejects an empty or whitespace-only required field.
pub(crate) fn require_non_empty(value: &str, field: &str) -> FlowResult<()> {
    if value.trim().is_empty() {
        Err(FlowError::InputInvalid(format!("{} is required", field)))
    } else {
        Ok(())
    }
}
