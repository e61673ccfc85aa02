//! Request-facing entry point composing representation resolution, resource
//! lookup and search handler disambiguation.
//!
//! The three resolvers are independent; the service only bundles them with
//! shared registries built once at startup from module providers.

use medrest_core::{
    ClassDescriptor, RequestContext, RequestParameters, Representation, Resource,
    ResourceProvider, ResourceRegistry, Typed,
};
use medrest_search::{SearchHandler, SearchHandlerProvider, SearchHandlerRegistry};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{Result, ServiceError};

/// Resolution service shared by request handlers.
#[derive(Debug, Clone)]
pub struct RestService {
    resources: Arc<ResourceRegistry>,
    searches: Arc<SearchHandlerRegistry>,
}

impl RestService {
    pub fn new(resources: Arc<ResourceRegistry>, searches: Arc<SearchHandlerRegistry>) -> Self {
        Self {
            resources,
            searches,
        }
    }

    /// Build the registries from configuration and collect every provider's
    /// registrations.
    pub fn bootstrap(
        config: &AppConfig,
        resource_providers: &[Arc<dyn ResourceProvider>],
        search_providers: &[Arc<dyn SearchHandlerProvider>],
    ) -> Result<Self> {
        config.validate().map_err(ServiceError::Configuration)?;
        let options = config
            .search_options()
            .map_err(ServiceError::Configuration)?;

        let resources = Arc::new(ResourceRegistry::new());
        for provider in resource_providers {
            resources.register_all(provider.as_ref())?;
        }

        let searches = Arc::new(SearchHandlerRegistry::new(options));
        for provider in search_providers {
            searches.register_all(provider.as_ref())?;
        }

        info!(
            resources = resources.len(),
            search_handlers = searches.len(),
            platform_version = config.platform.version.as_deref().unwrap_or("any"),
            "Resolution service initialized"
        );
        Ok(Self::new(resources, searches))
    }

    pub fn resources(&self) -> &Arc<ResourceRegistry> {
        &self.resources
    }

    pub fn searches(&self) -> &Arc<SearchHandlerRegistry> {
        &self.searches
    }

    /// Resolve a `v` token into a representation.
    pub fn get_representation(&self, token: Option<&str>) -> Representation {
        Representation::resolve(token)
    }

    /// Per-request options derived from the reserved request parameters.
    pub fn request_context(&self, parameters: &RequestParameters) -> RequestContext {
        RequestContext::from_parameters(parameters)
    }

    pub fn get_resource_by_name(&self, name: &str) -> Result<Arc<dyn Resource>> {
        Ok(self.resources.get_by_name(name)?)
    }

    pub fn get_resource_by_supported_class(
        &self,
        class: &'static ClassDescriptor,
    ) -> Result<Arc<dyn Resource>> {
        Ok(self.resources.get_by_supported_class(class)?)
    }

    /// Resource handling a domain object, by its runtime class.
    pub fn get_resource_for(&self, object: &dyn Typed) -> Result<Arc<dyn Resource>> {
        Ok(self.resources.get_for(object)?)
    }

    /// Resolve the search handler for `resource`; `Ok(None)` means no search applies.
    pub fn get_search_handler(
        &self,
        resource: &str,
        parameters: &RequestParameters,
    ) -> Result<Option<Arc<dyn SearchHandler>>> {
        Ok(self.searches.get_search_handler(resource, parameters)?)
    }
}
