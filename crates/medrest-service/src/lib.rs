pub mod config;
pub mod error;
pub mod observability;
pub mod service;

pub use config::{AppConfig, LoggingConfig, PlatformSettings, SearchSettings};
pub use error::{Result, ServiceError};
pub use observability::{apply_logging_level, init_tracing};
pub use service::RestService;
