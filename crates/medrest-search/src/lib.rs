pub mod error;
pub mod handler;
pub mod matcher;
pub mod parameters;
pub mod registry;
pub mod version;

pub use error::SearchError;
pub use handler::{SearchHandler, SearchHandlerProvider};
pub use parameters::{SearchConfig, SearchQuery, SearchQueryBuilder};
pub use registry::{SearchHandlerRegistry, SearchOptions};
pub use version::{PlatformVersion, VersionRange};
