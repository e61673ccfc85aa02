//! Resource adapter contract and registration records.
//!
//! A resource adapter translates between the JSON shape exchanged with clients
//! and calls into the domain services that own an entity. Adapters are
//! registered once at startup, each under a resource name and the domain class
//! it supports.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::class::ClassDescriptor;
use crate::error::{CoreError, Result};
use crate::params::RequestContext;

/// JSON object exchanged with resource adapters.
pub type SimpleObject = Map<String, Value>;

/// CRUD and sub-resource operations of a single resource.
///
/// Implementations delegate to domain services and report their failures as
/// [`CoreError::Delegate`] or [`CoreError::ResourceNotFound`].
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource name used in error messages.
    fn name(&self) -> &str;

    async fn create(&self, payload: SimpleObject, context: &RequestContext) -> Result<SimpleObject>;

    async fn retrieve(&self, uuid: &str, context: &RequestContext) -> Result<SimpleObject>;

    /// Apply `payload` to the entity and save it.
    async fn update(
        &self,
        uuid: &str,
        payload: SimpleObject,
        context: &RequestContext,
    ) -> Result<SimpleObject>;

    /// Void or retire the entity.
    async fn delete(&self, uuid: &str, reason: &str, context: &RequestContext) -> Result<()>;

    /// Permanently remove the entity.
    async fn purge(&self, uuid: &str, context: &RequestContext) -> Result<()>;

    /// List the current values of a nested collection, e.g. a patient's names.
    async fn list_sub_resource(
        &self,
        parent_uuid: &str,
        sub_resource: &str,
        context: &RequestContext,
    ) -> Result<Value> {
        let _ = (parent_uuid, context);
        Err(CoreError::unsupported_operation(
            self.name(),
            format!("listSubResource({sub_resource})"),
        ))
    }

    /// Add an entry to a nested collection.
    async fn create_child(
        &self,
        parent_uuid: &str,
        sub_resource: &str,
        payload: SimpleObject,
        context: &RequestContext,
    ) -> Result<SimpleObject> {
        let _ = (parent_uuid, payload, context);
        Err(CoreError::unsupported_operation(
            self.name(),
            format!("createChild({sub_resource})"),
        ))
    }
}

/// Registration record binding a resource name and a domain class to an adapter.
#[derive(Clone)]
pub struct ResourceDefinition {
    pub name: String,
    pub supported_class: &'static ClassDescriptor,
    pub resource: Arc<dyn Resource>,
}

impl ResourceDefinition {
    pub fn new(
        name: impl Into<String>,
        supported_class: &'static ClassDescriptor,
        resource: Arc<dyn Resource>,
    ) -> Self {
        Self {
            name: name.into(),
            supported_class,
            resource,
        }
    }
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("name", &self.name)
            .field("supported_class", &self.supported_class.name())
            .finish_non_exhaustive()
    }
}

/// Trait for modules to register their resources
///
/// Each module implements this trait to expose the resources it provides.
/// Definitions are collected at startup into the resource registry.
pub trait ResourceProvider: Send + Sync {
    /// Get all resources provided by this module
    fn resources(&self) -> Vec<ResourceDefinition>;

    /// Get the module identifier
    fn module_id(&self) -> &str;
}
