//! Request parameters and the per-request context derived from them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::representation::Representation;

/// Well-known request parameters that carry request options rather than
/// search criteria.
pub mod reserved {
    /// Explicit search handler id
    pub const SEARCH_ID: &str = "s";
    /// Representation token
    pub const REPRESENTATION: &str = "v";
    pub const LIMIT: &str = "limit";
    pub const START_INDEX: &str = "startIndex";
    pub const INCLUDE_ALL: &str = "includeAll";
    pub const TOTAL_COUNT: &str = "totalCount";

    /// All reserved parameter names
    pub const ALL: &[&str] = &[
        SEARCH_ID,
        REPRESENTATION,
        LIMIT,
        START_INDEX,
        INCLUDE_ALL,
        TOTAL_COUNT,
    ];
}

/// Request parameters as supplied by the caller: name to values, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParameters {
    values: IndexMap<String, Vec<String>>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Repeated keys accumulate their values.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.append(name.into_owned(), value.into_owned());
        }
        params
    }

    /// Add a value, keeping any previous values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Replace all values for a name.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.values.insert(name.into(), values);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// First value for a name, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

impl From<HashMap<String, Vec<String>>> for RequestParameters {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self {
            values: map.into_iter().collect(),
        }
    }
}

/// Options of a single request, handed to resource adapters and search handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub representation: Representation,
    /// Include voided/retired entities
    pub include_all: bool,
}

impl RequestContext {
    pub fn new(representation: Representation) -> Self {
        Self {
            representation,
            include_all: false,
        }
    }

    /// Build the context from the reserved `v` and `includeAll` parameters.
    pub fn from_parameters(params: &RequestParameters) -> Self {
        let include_all = params
            .first(reserved::INCLUDE_ALL)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            representation: Representation::resolve(params.first(reserved::REPRESENTATION)),
            include_all,
        }
    }

    #[must_use]
    pub fn with_include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }
}
