use crate::domain::narration::NarrationError;
use crate::domain::segment::ProcessingError;
use crate::domain::speech::SynthesisError;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<NarrationError> for AppError {
    fn from(err: NarrationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Invalid(msg) => AppError::InvalidInput(msg),
            ProcessingError::Network(msg)
            | ProcessingError::Parse(msg)
            | ProcessingError::Quota(msg) => AppError::ExternalService(msg),
            ProcessingError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
