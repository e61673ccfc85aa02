use medrest_core::{CoreError, ErrorCategory};
use medrest_search::SearchError;
use thiserror::Error;

/// Errors surfaced by [`RestService`](crate::RestService).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Resource(#[from] CoreError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ServiceError {
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Resource(e) => e.is_client_error(),
            Self::Search(e) => e.is_client_error(),
            Self::Configuration(_) => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Resource(e) => e.category(),
            Self::Search(e) => e.category(),
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
