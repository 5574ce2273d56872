//! Path-addressed JSON body filters.
//!
//! A [`JsonPathFilter`] parses the body, resolves a path, mutates every matched
//! node and serializes the document back. Several filters built here can be merged
//! so that they share one parse/serialize pass.
//!
//! # Path Syntax
//!
//! The path syntax is auto-detected based on the prefix (see [`PathSyntax`]):
//! - Paths starting with `$` use JSONPath (RFC 9535) - supports wildcards
//! - Paths starting with `/` use JSON Pointer (RFC 6901) - exact paths only
//!
//! # Example
//!
//! ```rust
//! use bodyfilter_core::{BodyFilter, json_path};
//! use regex::Regex;
//!
//! let body = r#"{"id":1,"name":"Alice","friends":[{"id":2,"name":"Bob"}]}"#;
//!
//! let filter = json_path("$.id")?.delete();
//! let filter = filter
//!     .merge(&json_path("$.friends.*.name")?.replace_pattern(Regex::new(r"^(\w).+")?, "$1."));
//!
//! let filtered = filter.filter("application/json", body)?;
//! assert_eq!(filtered, r#"{"name":"Alice","friends":[{"id":2,"name":"B."}]}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`PathSyntax`]: crate::PathSyntax

use std::borrow::Cow;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

mod matcher;
mod mutation;

pub use self::matcher::{Located, Location, NodeKind, PathMatcher, Segment};
pub use self::mutation::{DynamicReplacement, Literal, Mutation, Transform};
use crate::body_filter::{BodyFilter, FilterFamily};
use crate::error::FilterError;
use crate::media_type::is_json;
use crate::options::FilterOptions;

/// Creates a builder for a filter on the given path, with default options.
///
/// # Errors
///
/// Returns an error if the path is invalid.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::json_path;
///
/// let delete_id = json_path("$.id")?.delete();
/// let hide_password = json_path("/user/password")?.replace("XXX");
/// # Ok::<(), bodyfilter_core::FilterError>(())
/// ```
pub fn json_path(path: &str) -> Result<JsonPathBuilder, FilterError> {
    json_path_with(path, FilterOptions::default())
}

/// Creates a builder for a filter on the given path, with explicit options.
///
/// # Errors
///
/// Returns an error if the path is invalid for the configured syntax.
pub fn json_path_with(path: &str, options: FilterOptions) -> Result<JsonPathBuilder, FilterError> {
    let matcher = PathMatcher::parse_with(path, options.syntax)?;
    Ok(JsonPathBuilder { matcher, options })
}

/// Builder choosing the mutation applied at a compiled path.
#[derive(Debug, Clone)]
pub struct JsonPathBuilder {
    matcher: PathMatcher,
    options: FilterOptions,
}

impl JsonPathBuilder {
    /// Removes every matched node from its parent.
    #[must_use]
    pub fn delete(self) -> JsonPathFilter {
        self.mutate(Mutation::Delete)
    }

    /// Replaces every matched node with a typed literal.
    ///
    /// Use [`Literal::try_from`] for floating point values.
    #[must_use]
    pub fn replace(self, literal: impl Into<Literal>) -> JsonPathFilter {
        self.mutate(Mutation::ReplaceStatic(literal.into()))
    }

    /// Replaces every match of `pattern` in the matched nodes using a template.
    ///
    /// The template supports back-references (`$1`, `${name}`). A reference followed
    /// by a letter, digit or `_` must be braced: `${1}X`, since `$1X` names a group `1X`
    /// and expands to nothing.
    /// Strings where the pattern does not match are left unchanged; other nodes are
    /// matched through their JSON text and become strings when rewritten.
    #[must_use]
    pub fn replace_pattern(self, pattern: Regex, template: impl Into<String>) -> JsonPathFilter {
        self.mutate(Mutation::ReplaceDynamic(DynamicReplacement::Template {
            pattern,
            template: template.into(),
        }))
    }

    /// Replaces every matched string with the output of `transform`.
    ///
    /// Applying the filter fails if the path matches a node that is not a string.
    #[must_use]
    pub fn replace_with<F>(self, transform: F) -> JsonPathFilter
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.mutate(Mutation::ReplaceDynamic(DynamicReplacement::Function {
            pattern: None,
            transform: Arc::new(transform),
        }))
    }

    /// Replaces every matched string where `pattern` matches with the output of `transform`.
    #[must_use]
    pub fn replace_pattern_with<F>(self, pattern: Regex, transform: F) -> JsonPathFilter
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.mutate(Mutation::ReplaceDynamic(DynamicReplacement::Function {
            pattern: Some(pattern),
            transform: Arc::new(transform),
        }))
    }

    /// Applies an arbitrary mutation.
    #[must_use]
    pub fn mutate(self, mutation: Mutation) -> JsonPathFilter {
        JsonPathFilter {
            operations: vec![Operation {
                matcher: self.matcher,
                mutation,
            }],
            options: self.options,
        }
    }
}

#[derive(Debug, Clone)]
struct Operation {
    matcher: PathMatcher,
    mutation: Mutation,
}

/// A filter applying one or more path mutations within a single parse/serialize pass.
///
/// Built with [`json_path`]; merged filters keep their operations in merge order and
/// the options of the left-most filter.
#[derive(Debug, Clone)]
pub struct JsonPathFilter {
    operations: Vec<Operation>,
    options: FilterOptions,
}

impl JsonPathFilter {
    /// Number of path mutations performed by this filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Always `false`: a filter performs at least one mutation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The path expressions of this filter, in application order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(|op| op.matcher.expression())
    }

    /// The options used to serialize filtered documents.
    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Combines this filter with `other`: this filter's mutations run first.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut operations = self.operations.clone();
        operations.extend(other.operations.iter().cloned());
        Self {
            operations,
            options: self.options.clone(),
        }
    }

    /// Applies all mutations, in order, to a parsed document.
    ///
    /// Returns the number of nodes changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a dynamic replacement cannot be applied.
    pub fn apply(&self, document: &mut Value) -> Result<usize, FilterError> {
        let mut changed = 0;
        for Operation { matcher, mutation } in &self.operations {
            let locations = matcher.locations(document);
            trace!(path = matcher.expression(), matches = locations.len(), "path resolved");
            changed += mutation.apply(document, locations)?;
        }
        Ok(changed)
    }

    fn serialize(&self, document: &Value) -> Result<String, FilterError> {
        let result = if self.options.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        result.map_err(|error| FilterError::SerializationError { error })
    }
}

impl BodyFilter for JsonPathFilter {
    fn filter<'a>(&self, media_type: &str, body: &'a str) -> Result<Cow<'a, str>, FilterError> {
        if !is_json(media_type) {
            debug!(%media_type, "skip filtering non-JSON body");
            return Ok(Cow::Borrowed(body));
        }
        if body.trim().is_empty() {
            return Ok(Cow::Borrowed(body));
        }

        let mut document = serde_json::from_str::<Value>(body)
            .map_err(|error| FilterError::MalformedDocument { error })?;

        if self.apply(&mut document)? == 0 {
            return Ok(Cow::Borrowed(body));
        }

        self.serialize(&document).map(Cow::Owned)
    }

    fn try_merge(&self, other: &dyn BodyFilter) -> Option<Box<dyn BodyFilter>> {
        let FilterFamily::JsonPath(other) = other.family() else {
            debug!(?other, "cannot merge with a JSON path filter");
            return None;
        };

        let merged = self.merge(other);
        debug!(paths = ?merged.paths().collect::<Vec<_>>(), "merged JSON path filters");
        Some(Box::new(merged))
    }

    fn family(&self) -> FilterFamily<'_> {
        FilterFamily::JsonPath(self)
    }
}
