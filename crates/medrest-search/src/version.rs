//! Platform versions and the version ranges search handlers declare.
//!
//! Ranges are written the way module descriptors write them: a single pattern
//! (`2.4.0`, `1.9.*`) or an inclusive `lower - upper` pair (`1.9.* - 9.*`).
//! A `*` component matches any remainder; missing components count as `0`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Version of the running platform, e.g. `2.4.0` (qualifiers like `-SNAPSHOT` are ignored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformVersion {
    parts: Vec<u64>,
}

impl PlatformVersion {
    pub fn new(parts: Vec<u64>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }
}

impl FromStr for PlatformVersion {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s.trim().split(['-', ' ']).next().unwrap_or_default();
        if core.is_empty() {
            return Err(SearchError::InvalidVersion(s.to_string()));
        }
        let parts = core
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SearchError::InvalidVersion(s.to_string()))?;
        Ok(Self { parts })
    }
}

impl TryFrom<String> for PlatformVersion {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlatformVersion> for String {
    fn from(version: PlatformVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Num(u64),
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern(Vec<Part>);

impl Pattern {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        for part in s.split('.') {
            // a wildcard may only be the last component
            if parts.last() == Some(&Part::Any) {
                return None;
            }
            parts.push(match part {
                "*" => Part::Any,
                _ => Part::Num(part.parse().ok()?),
            });
        }
        Some(Self(parts))
    }

    /// `version >= self` when `lower`, `version <= self` otherwise.
    fn bounds(&self, version: &[u64], lower: bool) -> bool {
        let len = self.0.len().max(version.len());
        for i in 0..len {
            let bound = match self.0.get(i) {
                Some(Part::Any) => return true,
                Some(Part::Num(n)) => *n,
                None => 0,
            };
            let actual = version.get(i).copied().unwrap_or(0);
            if actual != bound {
                return (actual > bound) == lower;
            }
        }
        true
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|part| match part {
                Part::Num(n) => n.to_string(),
                Part::Any => "*".to_string(),
            })
            .collect();
        f.write_str(&parts.join("."))
    }
}

/// Inclusive range of platform versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    lower: Pattern,
    upper: Pattern,
}

impl VersionRange {
    pub fn contains(&self, version: &PlatformVersion) -> bool {
        self.lower.bounds(version.parts(), true) && self.upper.bounds(version.parts(), false)
    }
}

impl FromStr for VersionRange {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SearchError::InvalidVersion(s.to_string());
        match s.split_once(" - ") {
            Some((lower, upper)) => Ok(Self {
                lower: Pattern::parse(lower).ok_or_else(invalid)?,
                upper: Pattern::parse(upper).ok_or_else(invalid)?,
            }),
            None => {
                let pattern = Pattern::parse(s).ok_or_else(invalid)?;
                Ok(Self {
                    lower: pattern.clone(),
                    upper: pattern,
                })
            }
        }
    }
}

impl TryFrom<String> for VersionRange {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionRange> for String {
    fn from(range: VersionRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "{} - {}", self.lower, self.upper)
        }
    }
}
