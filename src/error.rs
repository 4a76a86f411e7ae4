use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by catalog lookups, roster building and series generation.
///
/// Every variant is reported synchronously to the caller; nothing here is
/// retried internally and no variant leaves a partial dataset behind.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unresolvable location: {0}")]
    UnresolvableLocation(String),

    #[error("Generation failure: {0}")]
    GenerationFailure(String),

    #[error("Generation cancelled")]
    Cancelled,
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Error body handed to external callers alongside the success flag
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl GenerationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GenerationError::InvalidRequest(message.into())
    }

    /// Stable error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            GenerationError::InvalidRequest(_) => "InvalidRequest",
            GenerationError::UnresolvableLocation(_) => "UnresolvableLocation",
            GenerationError::GenerationFailure(_) => "GenerationFailure",
            GenerationError::Cancelled => "Cancelled",
        }
    }

    /// True for errors caused by the caller's input rather than by the engine
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GenerationError::InvalidRequest(_) | GenerationError::UnresolvableLocation(_)
        )
    }

    /// Log at a level matching the error class and build the external body.
    pub fn body(&self) -> ErrorBody {
        match self {
            GenerationError::GenerationFailure(_) => {
                tracing::error!(error = %self, "generation failed");
            }
            GenerationError::Cancelled => {
                tracing::warn!("generation cancelled");
            }
            _ => {
                tracing::debug!(error = %self, "rejected generation request");
            }
        }

        ErrorBody {
            error: self.error_type().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for GenerationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GenerationError::InvalidRequest(errors.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for GenerationError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        GenerationError::GenerationFailure(format!("worker pool: {}", error))
    }
}
