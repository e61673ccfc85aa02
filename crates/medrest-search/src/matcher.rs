//! Signature matching between request parameters and search queries.
//!
//! A query is a candidate for a request when every required parameter was
//! supplied and every supplied parameter is either required or optional.
//! Among several candidates, a query whose required set strictly contains
//! another candidate's required set is more specific and wins over it.

use medrest_core::RequestParameters;
use std::collections::BTreeSet;

use crate::parameters::SearchQuery;

/// Names of the supplied parameters that take part in matching.
pub fn search_parameter_names<'a>(
    parameters: &'a RequestParameters,
    reserved: &BTreeSet<String>,
) -> BTreeSet<&'a str> {
    parameters
        .names()
        .filter(|name| !reserved.contains(*name))
        .collect()
}

/// Whether `query` can service a request supplying exactly `supplied`.
pub fn is_candidate(query: &SearchQuery, supplied: &BTreeSet<&str>) -> bool {
    query
        .required_parameters
        .iter()
        .all(|name| supplied.contains(name.as_str()))
        && supplied.iter().all(|name| query.accepts(name))
}

/// Whether `a` demands strictly more of the request than `b`.
pub fn is_more_specific(a: &SearchQuery, b: &SearchQuery) -> bool {
    a.required_parameters.len() > b.required_parameters.len()
        && a.required_parameters.is_superset(&b.required_parameters)
}

/// Candidates not outranked by any other candidate, in their original order.
///
/// A single survivor is the greatest candidate under the specificity order;
/// several survivors are mutually incomparable or equal.
pub fn most_specific<T, F>(candidates: &[T], query: F) -> Vec<&T>
where
    F: Fn(&T) -> &SearchQuery,
{
    candidates
        .iter()
        .filter(|candidate| {
            !candidates
                .iter()
                .any(|other| is_more_specific(query(other), query(*candidate)))
        })
        .collect()
}
