use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::SearchError;
use crate::version::{PlatformVersion, VersionRange};

/// Signature of a search: the parameters it needs and the ones it tolerates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub description: String,
    pub required_parameters: BTreeSet<String>,
    pub optional_parameters: BTreeSet<String>,
}

impl SearchQuery {
    /// Start building a query with a human-readable description.
    pub fn builder(description: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder {
            description: description.into(),
            required: BTreeSet::new(),
            optional: BTreeSet::new(),
        }
    }

    /// Whether `name` is part of this signature.
    pub fn accepts(&self, name: &str) -> bool {
        self.required_parameters.contains(name) || self.optional_parameters.contains(name)
    }
}

/// Builder for [`SearchQuery`], validated on [`build`](SearchQueryBuilder::build).
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    description: String,
    required: BTreeSet<String>,
    optional: BTreeSet<String>,
}

impl SearchQueryBuilder {
    #[must_use]
    pub fn with_required_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_optional_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<SearchQuery, SearchError> {
        if self.description.trim().is_empty() {
            return Err(SearchError::invalid_query("description must be set"));
        }
        if self.required.is_empty() && self.optional.is_empty() {
            return Err(SearchError::invalid_query(
                "either required or optional parameters must be set",
            ));
        }
        if let Some(name) = self.required.intersection(&self.optional).next() {
            return Err(SearchError::invalid_query(format!(
                "parameter '{name}' cannot be both required and optional"
            )));
        }
        Ok(SearchQuery {
            description: self.description,
            required_parameters: self.required,
            optional_parameters: self.optional,
        })
    }
}

/// Registration of a search handler: its id, target resource, supported
/// platform versions and signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub id: String,
    pub supported_resource: String,
    pub supported_versions: Vec<VersionRange>,
    pub query: SearchQuery,
}

impl SearchConfig {
    pub fn new(
        id: impl Into<String>,
        supported_resource: impl Into<String>,
        supported_versions: Vec<VersionRange>,
        query: SearchQuery,
    ) -> Self {
        Self {
            id: id.into(),
            supported_resource: supported_resource.into(),
            supported_versions,
            query,
        }
    }

    /// Convenience constructor parsing a single version range.
    pub fn for_versions(
        id: impl Into<String>,
        supported_resource: impl Into<String>,
        versions: &str,
        query: SearchQuery,
    ) -> Result<Self, SearchError> {
        Ok(Self::new(id, supported_resource, vec![versions.parse()?], query))
    }

    /// Whether this search is available on `version`.
    ///
    /// A config without version ranges is available everywhere.
    pub fn supports_version(&self, version: &PlatformVersion) -> bool {
        self.supported_versions.is_empty()
            || self
                .supported_versions
                .iter()
                .any(|range| range.contains(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_parameters() {
        let query = SearchQuery::builder("Find concepts by mapping")
            .with_required_parameters(["sourceName"])
            .with_optional_parameters(["code", "name"])
            .build()
            .unwrap();

        assert_eq!(query.required_parameters.len(), 1);
        assert!(query.accepts("sourceName"));
        assert!(query.accepts("code"));
        assert!(!query.accepts("q"));
    }

    #[test]
    fn builder_rejects_invalid_signatures() {
        let err = SearchQuery::builder("")
            .with_required_parameters(["q"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("description"));

        let err = SearchQuery::builder("Nothing").build().unwrap_err();
        assert!(err.to_string().contains("either required or optional"));

        let err = SearchQuery::builder("Overlap")
            .with_required_parameters(["code"])
            .with_optional_parameters(["code"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("'code'"));
    }

    #[test]
    fn version_support() {
        let query = SearchQuery::builder("Fuzzy search")
            .with_required_parameters(["q"])
            .build()
            .unwrap();
        let config = SearchConfig::for_versions("default", "concept", "1.9.* - 2.*", query.clone())
            .unwrap();

        assert!(config.supports_version(&"2.4.0".parse().unwrap()));
        assert!(!config.supports_version(&"1.8.3".parse().unwrap()));

        let everywhere = SearchConfig::new("default", "concept", Vec::new(), query);
        assert!(everywhere.supports_version(&"1.8.3".parse().unwrap()));
    }

    #[test]
    fn config_deserializes_from_json() {
        let config: SearchConfig = serde_json::from_str(
            r#"{
                "id": "byIdentifier",
                "supportedResource": "patient",
                "supportedVersions": ["1.8.*", "1.9.* - 9.*"],
                "query": {
                    "description": "Find patients by identifier",
                    "requiredParameters": ["identifier"],
                    "optionalParameters": []
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.id, "byIdentifier");
        assert_eq!(config.supported_versions.len(), 2);
        assert!(config.query.accepts("identifier"));
    }
}
