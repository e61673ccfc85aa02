//! Resource registry for name and class-hierarchy lookup.
//!
//! Resources are indexed by:
//! - Resource name (e.g. "patient")
//! - Supported domain class (e.g. `Patient`)
//!
//! Class lookups walk the ancestor chain of the requested class, so a subclass
//! without its own registration resolves to the nearest registered superclass.
//!
//! Readers work on an immutable snapshot swapped in atomically on every
//! registration, so lookups never block and never observe a half-applied
//! registration. Class resolutions are memoized per concrete class; a memo
//! entry only answers for a descriptor with the same ancestor chain.

use arc_swap::ArcSwap;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::class::{ClassDescriptor, Typed};
use crate::error::{CoreError, Result};
use crate::resource::{Resource, ResourceDefinition, ResourceProvider};

#[derive(Debug, Clone, Default)]
struct ResourceTables {
    /// Bumped on every registration; tags memoized resolutions
    generation: u64,
    by_name: IndexMap<String, Arc<ResourceDefinition>>,
    by_class: HashMap<&'static str, Arc<ResourceDefinition>>,
}

/// Registry of resource adapters keyed by name and supported class.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    tables: ArcSwap<ResourceTables>,
    /// Serializes registrations
    write_lock: Mutex<()>,
    /// Concrete class name -> memoized resolution
    resolved: DashMap<&'static str, Resolution>,
}

#[derive(Debug, Clone)]
struct Resolution {
    generation: u64,
    class: &'static ClassDescriptor,
    definition: Arc<ResourceDefinition>,
}

impl ResourceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource definition.
    ///
    /// Fails if the name or the exact supported class is already registered.
    /// Ancestors and descendants of registered classes may be registered freely.
    pub fn register(&self, definition: ResourceDefinition) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.tables.load();

        if current.by_name.contains_key(&definition.name) {
            warn!(resource = %definition.name, "Rejected duplicate resource name");
            return Err(CoreError::DuplicateResourceName(definition.name));
        }
        let class = definition.supported_class.name();
        if let Some(existing) = current.by_class.get(class) {
            warn!(
                resource = %definition.name,
                class,
                existing = %existing.name,
                "Rejected duplicate supported class"
            );
            return Err(CoreError::DuplicateSupportedClass {
                class: class.to_string(),
                existing: existing.name.clone(),
            });
        }

        let mut next = ResourceTables::clone(&current);
        next.generation += 1;
        let definition = Arc::new(definition);
        next.by_name
            .insert(definition.name.clone(), definition.clone());
        next.by_class.insert(class, definition.clone());
        self.tables.store(Arc::new(next));
        self.resolved.clear();

        info!(resource = %definition.name, class, "Registered resource");
        Ok(())
    }

    /// Register every resource offered by a provider.
    ///
    /// Stops at the first rejected definition; earlier ones stay registered.
    pub fn register_all(&self, provider: &dyn ResourceProvider) -> Result<usize> {
        let definitions = provider.resources();
        let count = definitions.len();
        for definition in definitions {
            self.register(definition)?;
        }
        info!(
            module = %provider.module_id(),
            count,
            "Collected resources from provider"
        );
        Ok(count)
    }

    /// Get the adapter registered under `name`.
    pub fn get_by_name(&self, name: &str) -> Result<Arc<dyn Resource>> {
        self.get_definition(name)
            .map(|definition| definition.resource.clone())
            .ok_or_else(|| CoreError::unknown_resource(name))
    }

    /// Get the registration record for `name`.
    pub fn get_definition(&self, name: &str) -> Option<Arc<ResourceDefinition>> {
        self.tables.load().by_name.get(name).cloned()
    }

    /// Get the adapter for the most specific registered ancestor of `class`.
    pub fn get_by_supported_class(
        &self,
        class: &'static ClassDescriptor,
    ) -> Result<Arc<dyn Resource>> {
        self.resolve_class(class)
            .map(|definition| definition.resource.clone())
    }

    /// Get the adapter handling a domain object, by its runtime class.
    pub fn get_for(&self, object: &dyn Typed) -> Result<Arc<dyn Resource>> {
        self.get_by_supported_class(object.class())
    }

    /// Resolve `class` to the registration of its nearest registered ancestor.
    ///
    /// The class itself is tested first, then its superclasses up to the root.
    pub fn resolve_class(
        &self,
        class: &'static ClassDescriptor,
    ) -> Result<Arc<ResourceDefinition>> {
        let tables = self.tables.load();

        if let Some(entry) = self.resolved.get(class.name()) {
            let memo = entry.value();
            if memo.generation == tables.generation && memo.class == class {
                return Ok(memo.definition.clone());
            }
        }

        // Same-named classes on another chain never match a registration
        let definition = class
            .ancestors()
            .find_map(|ancestor| {
                tables
                    .by_class
                    .get(ancestor.name())
                    .filter(|definition| definition.supported_class == ancestor)
                    .cloned()
            })
            .ok_or_else(|| CoreError::no_resource_for_class(class.name()))?;

        debug!(
            class = class.name(),
            resource = %definition.name,
            via = definition.supported_class.name(),
            "Resolved resource by class"
        );
        self.resolved.insert(
            class.name(),
            Resolution {
                generation: tables.generation,
                class,
                definition: definition.clone(),
            },
        );
        Ok(definition)
    }

    /// Registered resource names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tables.load().by_name.keys().cloned().collect()
    }

    /// All registration records, in registration order.
    pub fn definitions(&self) -> Vec<Arc<ResourceDefinition>> {
        self.tables.load().by_name.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.load().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
