//! Token-level filters replacing JSON string properties without parsing the body.
//!
//! These filters scan the raw text, so they also work on bodies that are not
//! well-formed JSON. They cannot share a pass with path-addressed filters.

use std::borrow::Cow;
use std::collections::BTreeSet;

use regex::{Captures, Regex};
use tracing::debug;

use crate::body_filter::{BodyFilter, FilterFamily};
use crate::error::FilterError;
use crate::media_type::is_json;

const ACCESS_TOKEN_PROPERTIES: [&str; 4] = ["access_token", "refresh_token", "open_id", "id_token"];

/// Masks OAuth tokens (`access_token`, `refresh_token`, `open_id`, `id_token`) with `XXX`.
///
/// # Errors
///
/// Returns an error if the property pattern cannot be compiled.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::{BodyFilter, access_token};
///
/// let filter = access_token()?;
/// let body = r#"{"access_token":"eyJhbGciOi","expires_in":3600}"#;
///
/// let filtered = filter.filter("application/json", body)?;
/// assert_eq!(filtered, r#"{"access_token":"XXX","expires_in":3600}"#);
/// # Ok::<(), bodyfilter_core::FilterError>(())
/// ```
pub fn access_token() -> Result<PropertyFilter, FilterError> {
    PropertyFilter::new(ACCESS_TOKEN_PROPERTIES, "XXX")
}

/// Replaces the string value of named properties, wherever they appear in the body.
///
/// Only string values are replaced; a property holding a number, an object or an
/// array is left alone.
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    properties: BTreeSet<String>,
    replacement: String,
    pattern: Option<Regex>,
}

impl PropertyFilter {
    /// Creates a filter replacing the string value of every listed property.
    ///
    /// # Errors
    ///
    /// Returns an error if the property pattern cannot be compiled.
    pub fn new<I, S>(properties: I, replacement: impl Into<String>) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let properties = properties.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        let pattern = if properties.is_empty() {
            None
        } else {
            let names = properties
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r#"("(?:{names})"\s*:\s*)"(?:[^"\\]|\\.)*""#
            ))?)
        };

        Ok(Self {
            properties,
            replacement: replacement.into(),
            pattern,
        })
    }

    /// The names of the replaced properties.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(String::as_str)
    }

    /// The replacement written instead of the property values.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl BodyFilter for PropertyFilter {
    fn filter<'a>(&self, media_type: &str, body: &'a str) -> Result<Cow<'a, str>, FilterError> {
        let Some(pattern) = &self.pattern else {
            return Ok(Cow::Borrowed(body));
        };
        if !is_json(media_type) {
            debug!(%media_type, "skip filtering non-JSON body");
            return Ok(Cow::Borrowed(body));
        }

        let quoted = serde_json::Value::String(self.replacement.clone()).to_string();
        Ok(pattern.replace_all(body, |caps: &Captures| {
            let prefix = caps.get(1).map_or("", |it| it.as_str());
            format!("{prefix}{quoted}")
        }))
    }

    fn try_merge(&self, other: &dyn BodyFilter) -> Option<Box<dyn BodyFilter>> {
        let FilterFamily::Property(other) = other.family() else {
            debug!(?other, "cannot merge with a property filter");
            return None;
        };
        if other.replacement != self.replacement {
            debug!(
                left = %self.replacement,
                right = %other.replacement,
                "cannot merge property filters with different replacements"
            );
            return None;
        }

        let properties = self.properties.union(&other.properties).cloned();
        let merged = Self::new(properties, self.replacement.clone()).ok()?;
        Some(Box::new(merged))
    }

    fn family(&self) -> FilterFamily<'_> {
        FilterFamily::Property(self)
    }
}
