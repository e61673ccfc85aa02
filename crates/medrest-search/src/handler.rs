use async_trait::async_trait;
use medrest_core::{RequestContext, RequestParameters};
use serde_json::Value;
use std::sync::Arc;

use crate::error::SearchError;
use crate::parameters::SearchConfig;

/// A component servicing parameterized searches for one resource.
#[async_trait]
pub trait SearchHandler: Send + Sync {
    /// Registration data: id, resource, versions and signature.
    fn search_config(&self) -> &SearchConfig;

    /// Run the search. Reserved parameters are passed through untouched.
    async fn search(
        &self,
        parameters: &RequestParameters,
        context: &RequestContext,
    ) -> Result<Value, SearchError>;

    fn id(&self) -> &str {
        &self.search_config().id
    }
}

/// Trait for modules to register their search handlers
///
/// Handlers are collected at startup into the search handler registry.
pub trait SearchHandlerProvider: Send + Sync {
    /// Get all search handlers provided by this module
    fn search_handlers(&self) -> Vec<Arc<dyn SearchHandler>>;

    /// Get the module identifier
    fn module_id(&self) -> &str;
}
