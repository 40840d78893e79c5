use mutscope_core::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::dto::ErrorDto;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Threshold must be a number between 0 and 100, got {0}")]
    InvalidThreshold(f64),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidThreshold(_) | ServiceError::MalformedRequest(_) => 400,
            ServiceError::Config(_) | ServiceError::Io(_) | ServiceError::Internal(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }

    pub fn to_dto(&self) -> ErrorDto {
        ErrorDto {
            error: self.to_string(),
            status: self.status(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ServiceError::Internal(err.to_string())
        } else {
            ServiceError::MalformedRequest(err.to_string())
        }
    }
}
