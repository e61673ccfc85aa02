use thiserror::Error;

/// Core error types for MedRest resource resolution and delegation
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("No resource registered for class {0} or any of its ancestors")]
    NoResourceForClass(String),

    #[error("Resource name '{0}' is already registered")]
    DuplicateResourceName(String),

    #[error("Class {class} is already supported by resource '{existing}'")]
    DuplicateSupportedClass { class: String, existing: String },

    #[error("Resource not found: {resource}/{uuid}")]
    ResourceNotFound { resource: String, uuid: String },

    #[error("Operation '{operation}' is not supported by resource '{resource}'")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("Invalid resource data: {message}")]
    InvalidResource { message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Domain service error: {0}")]
    Delegate(#[from] anyhow::Error),
}

impl CoreError {
    /// Create a new UnknownResource error
    pub fn unknown_resource(name: impl Into<String>) -> Self {
        Self::UnknownResource(name.into())
    }

    /// Create a new NoResourceForClass error
    pub fn no_resource_for_class(class: impl Into<String>) -> Self {
        Self::NoResourceForClass(class.into())
    }

    /// Create a new ResourceNotFound error
    pub fn resource_not_found(resource: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource: resource.into(),
            uuid: uuid.into(),
        }
    }

    /// Create a new UnsupportedOperation error
    pub fn unsupported_operation(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Create a new InvalidResource error
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Self::InvalidResource {
            message: message.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownResource(_)
                | Self::NoResourceForClass(_)
                | Self::ResourceNotFound { .. }
                | Self::UnsupportedOperation { .. }
                | Self::InvalidResource { .. }
                | Self::JsonError(_)
        )
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateResourceName(_)
                | Self::DuplicateSupportedClass { .. }
                | Self::Configuration(_)
                | Self::Delegate(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownResource(_) | Self::NoResourceForClass(_) => ErrorCategory::NotFound,
            Self::ResourceNotFound { .. } => ErrorCategory::NotFound,
            Self::UnsupportedOperation { .. } | Self::InvalidResource { .. } => {
                ErrorCategory::Validation
            }
            Self::DuplicateResourceName(_) | Self::DuplicateSupportedClass { .. } => {
                ErrorCategory::Registration
            }
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Delegate(_) => ErrorCategory::System,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Registration,
    Serialization,
    System,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Registration => write!(f, "registration"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
