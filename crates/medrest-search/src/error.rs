use medrest_core::ErrorCategory;
use thiserror::Error;

/// Errors raised while registering or resolving search handlers.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("The search with id '{id}' for '{resource}' resource is not recognized")]
    UnknownSearchId { resource: String, id: String },

    #[error("The search is ambiguous. Please specify {}", choices(.selector, .ids))]
    Ambiguous {
        resource: String,
        selector: String,
        ids: Vec<String>,
    },

    #[error("A search with id '{id}' is already registered for '{resource}' resource")]
    DuplicateSearchId { resource: String, id: String },

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    #[error("Search execution error: {0}")]
    Delegate(#[from] anyhow::Error),
}

fn choices(selector: &str, ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("{selector}={id}"))
        .collect::<Vec<_>>()
        .join(" or ")
}

impl SearchError {
    pub fn unknown_search_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::UnknownSearchId {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// The caller sent a search that cannot be resolved to a single handler.
    pub fn is_invalid_search(&self) -> bool {
        matches!(self, Self::UnknownSearchId { .. } | Self::Ambiguous { .. })
    }

    pub fn is_client_error(&self) -> bool {
        self.is_invalid_search()
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSearchId { .. } | Self::Ambiguous { .. } => ErrorCategory::Validation,
            Self::DuplicateSearchId { .. } | Self::InvalidQuery(_) => ErrorCategory::Registration,
            Self::InvalidVersion(_) => ErrorCategory::Configuration,
            Self::Delegate(_) => ErrorCategory::System,
        }
    }
}
