//! Response representations.
//!
//! A representation controls how much of an entity is rendered in a response.
//! Clients select one with the `v` request parameter; the token is resolved
//! here without any failure mode, unknown tokens become named representations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token for the reference representation
pub const REF: &str = "ref";
/// Token for the default representation
pub const DEFAULT: &str = "default";
/// Token for the full representation
pub const FULL: &str = "full";
/// Prefix introducing a custom representation, e.g. `custom:(uuid,display)`
pub const CUSTOM_PREFIX: &str = "custom:";

/// Shape of a rendered response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Representation {
    #[default]
    Default,
    Ref,
    Full,
    /// A representation registered by name, kept verbatim
    Named(String),
    /// A custom property selection, prefix stripped
    Custom(String),
}

impl Representation {
    /// Resolve a request token into a representation.
    ///
    /// Missing and empty tokens resolve to [`Representation::Default`].
    #[must_use]
    pub fn resolve(token: Option<&str>) -> Self {
        match token {
            None | Some("") => Self::Default,
            Some(REF) => Self::Ref,
            Some(DEFAULT) => Self::Default,
            Some(FULL) => Self::Full,
            Some(other) => match other.strip_prefix(CUSTOM_PREFIX) {
                Some(definition) => Self::Custom(definition.to_string()),
                None => Self::Named(other.to_string()),
            },
        }
    }

    /// The representation payload: the fixed token, the name, or the custom definition.
    pub fn representation(&self) -> &str {
        match self {
            Self::Default => DEFAULT,
            Self::Ref => REF,
            Self::Full => FULL,
            Self::Named(name) => name,
            Self::Custom(definition) => definition,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(definition) => write!(f, "{CUSTOM_PREFIX}{definition}"),
            other => f.write_str(other.representation()),
        }
    }
}

impl From<&str> for Representation {
    fn from(token: &str) -> Self {
        Self::resolve(Some(token))
    }
}

impl From<String> for Representation {
    fn from(token: String) -> Self {
        Self::resolve(Some(&token))
    }
}

impl From<Representation> for String {
    fn from(rep: Representation) -> Self {
        rep.to_string()
    }
}
