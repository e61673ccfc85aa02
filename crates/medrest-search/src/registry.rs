//! Search handler registry and disambiguation.
//!
//! Handlers are indexed by the resource they support and by their id. A
//! request either names its handler explicitly through the selector
//! parameter, or is matched against the signatures of every handler of the
//! resource, preferring the most specific one.
//!
//! Registrations publish a new immutable table through `ArcSwap`, so lookups
//! never block and always see complete registrations.

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use medrest_core::{RequestParameters, reserved};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::handler::{SearchHandler, SearchHandlerProvider};
use crate::matcher::{is_candidate, most_specific, search_parameter_names};
use crate::version::PlatformVersion;

/// Options controlling registration and matching.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Parameter carrying an explicit handler id
    pub selector: String,
    /// Parameters never treated as search criteria (always includes the selector)
    pub reserved_parameters: BTreeSet<String>,
    /// When set, handlers not supporting this version are skipped at registration
    pub platform_version: Option<PlatformVersion>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            selector: reserved::SEARCH_ID.to_string(),
            reserved_parameters: reserved::ALL.iter().map(|name| name.to_string()).collect(),
            platform_version: None,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn with_platform_version(mut self, version: PlatformVersion) -> Self {
        self.platform_version = Some(version);
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self.reserved_parameters.insert(self.selector.clone());
        self
    }

    #[must_use]
    pub fn with_reserved_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_parameters = names.into_iter().map(Into::into).collect();
        self.reserved_parameters.insert(self.selector.clone());
        self
    }
}

type HandlersById = IndexMap<String, Arc<dyn SearchHandler>>;

#[derive(Clone, Default)]
struct HandlerTables {
    by_resource: HashMap<String, HandlersById>,
}

/// Registry of search handlers keyed by supported resource and id.
pub struct SearchHandlerRegistry {
    options: SearchOptions,
    tables: ArcSwap<HandlerTables>,
    /// Serializes registrations
    write_lock: Mutex<()>,
}

impl Default for SearchHandlerRegistry {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl fmt::Debug for SearchHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.load();
        let ids: HashMap<&str, Vec<&str>> = tables
            .by_resource
            .iter()
            .map(|(resource, handlers)| {
                (resource.as_str(), handlers.keys().map(String::as_str).collect())
            })
            .collect();
        f.debug_struct("SearchHandlerRegistry")
            .field("options", &self.options)
            .field("handlers", &ids)
            .finish()
    }
}

impl SearchHandlerRegistry {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            tables: ArcSwap::from_pointee(HandlerTables::default()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Register a search handler.
    ///
    /// Returns `Ok(false)` when the handler does not support the configured
    /// platform version and was skipped. Fails if the handler's id is already
    /// registered for its resource.
    pub fn register(&self, handler: Arc<dyn SearchHandler>) -> Result<bool, SearchError> {
        let config = handler.search_config();

        if let Some(version) = &self.options.platform_version {
            if !config.supports_version(version) {
                debug!(
                    id = %config.id,
                    resource = %config.supported_resource,
                    %version,
                    "Skipped search handler not supporting platform version"
                );
                return Ok(false);
            }
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.tables.load();

        let taken = current
            .by_resource
            .get(&config.supported_resource)
            .is_some_and(|handlers| handlers.contains_key(&config.id));
        if taken {
            warn!(
                id = %config.id,
                resource = %config.supported_resource,
                "Rejected duplicate search handler id"
            );
            return Err(SearchError::DuplicateSearchId {
                resource: config.supported_resource.clone(),
                id: config.id.clone(),
            });
        }

        let mut next = HandlerTables::clone(&current);
        next.by_resource
            .entry(config.supported_resource.clone())
            .or_default()
            .insert(config.id.clone(), handler.clone());
        self.tables.store(Arc::new(next));

        info!(
            id = %config.id,
            resource = %config.supported_resource,
            required = ?config.query.required_parameters,
            optional = ?config.query.optional_parameters,
            "Registered search handler"
        );
        Ok(true)
    }

    /// Register every handler offered by a provider, returning how many were
    /// registered (skipped handlers are not counted).
    pub fn register_all(&self, provider: &dyn SearchHandlerProvider) -> Result<usize, SearchError> {
        let mut registered = 0;
        for handler in provider.search_handlers() {
            if self.register(handler)? {
                registered += 1;
            }
        }
        info!(
            module = %provider.module_id(),
            count = registered,
            "Collected search handlers from provider"
        );
        Ok(registered)
    }

    /// Resolve the handler servicing a search on `resource`.
    ///
    /// - An explicit id in the selector parameter picks that handler without
    ///   checking its signature, or fails with [`SearchError::UnknownSearchId`].
    /// - Otherwise the handlers whose signature fits the supplied parameters
    ///   are collected. No fit yields `Ok(None)`; several fits are narrowed to
    ///   the most specific one or fail with [`SearchError::Ambiguous`].
    pub fn get_search_handler(
        &self,
        resource: &str,
        parameters: &RequestParameters,
    ) -> Result<Option<Arc<dyn SearchHandler>>, SearchError> {
        let tables = self.tables.load();
        let handlers = tables.by_resource.get(resource);

        let explicit_id = parameters
            .first(&self.options.selector)
            .map(str::trim)
            .filter(|id| !id.is_empty());
        if let Some(id) = explicit_id {
            return match handlers.and_then(|handlers| handlers.get(id)) {
                Some(handler) => Ok(Some(handler.clone())),
                None => {
                    debug!(resource, id, "Unknown search id");
                    Err(SearchError::unknown_search_id(resource, id))
                }
            };
        }

        let Some(handlers) = handlers else {
            return Ok(None);
        };
        let supplied = search_parameter_names(parameters, &self.options.reserved_parameters);
        if supplied.is_empty() {
            return Ok(None);
        }

        let candidates: Vec<&Arc<dyn SearchHandler>> = handlers
            .values()
            .filter(|handler| is_candidate(&handler.search_config().query, &supplied))
            .collect();

        match candidates.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(Arc::clone(*only))),
            _ => {
                let winners = most_specific(&candidates, |handler| &handler.search_config().query);
                match winners.as_slice() {
                    [winner] => Ok(Some(Arc::clone(**winner))),
                    _ => {
                        let ids: Vec<String> =
                            winners.iter().map(|handler| handler.id().to_string()).collect();
                        debug!(resource, ?ids, ?supplied, "Ambiguous search");
                        Err(SearchError::Ambiguous {
                            resource: resource.to_string(),
                            selector: self.options.selector.clone(),
                            ids,
                        })
                    }
                }
            }
        }
    }

    /// Get a handler by resource and id.
    pub fn get_by_id(&self, resource: &str, id: &str) -> Option<Arc<dyn SearchHandler>> {
        self.tables
            .load()
            .by_resource
            .get(resource)
            .and_then(|handlers| handlers.get(id))
            .cloned()
    }

    /// All handlers registered for `resource`, in registration order.
    pub fn handlers_for(&self, resource: &str) -> Vec<Arc<dyn SearchHandler>> {
        self.tables
            .load()
            .by_resource
            .get(resource)
            .map(|handlers| handlers.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Resources with at least one handler, sorted.
    pub fn resources(&self) -> Vec<String> {
        let mut resources: Vec<String> = self.tables.load().by_resource.keys().cloned().collect();
        resources.sort();
        resources
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.tables
            .load()
            .by_resource
            .values()
            .map(IndexMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
