use std::borrow::Cow;
use std::fmt::Debug;

use crate::error::FilterError;
use crate::json_path::JsonPathFilter;
use crate::property::PropertyFilter;

/// The family a filter belongs to, used to decide whether two filters can merge.
///
/// Only filters of the same family share an internal representation, so only they
/// can be combined into a single pass over the body.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum FilterFamily<'a> {
    /// A path-addressed filter working on a parsed JSON document.
    JsonPath(&'a JsonPathFilter),
    /// A token-level filter working on the raw JSON text.
    Property(&'a PropertyFilter),
    /// Any other filter, never mergeable.
    Other,
}

/// Transforms a request or response body before it is logged.
///
/// Filters are immutable: the same instance can be shared by any number of
/// threads and applied to any number of bodies.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::{BodyFilter, json_path};
///
/// let filter = json_path("$.password")?.replace("XXX");
///
/// let body = r#"{"user":"alice","password":"s3cr3t"}"#;
/// let filtered = filter.filter("application/json", body)?;
/// assert_eq!(filtered, r#"{"user":"alice","password":"XXX"}"#);
///
/// // non-JSON bodies are left alone
/// let xml = "<password>s3cr3t</password>";
/// assert_eq!(filter.filter("application/xml", xml)?, xml);
/// # Ok::<(), bodyfilter_core::FilterError>(())
/// ```
pub trait BodyFilter: Send + Sync + Debug {
    /// Filters `body`, declared with the given `media_type`.
    ///
    /// Returns the body unchanged (borrowed) when nothing had to be filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if a body declared as JSON cannot be processed. The body is
    /// then never partially filtered.
    fn filter<'a>(&self, media_type: &str, body: &'a str) -> Result<Cow<'a, str>, FilterError>;

    /// Tries to combine this filter with `other` into a single filter.
    ///
    /// The merged filter applies this filter first, then `other`. Returns `None` when
    /// the filters cannot be merged: both stay usable and should be chained instead.
    fn try_merge(&self, other: &dyn BodyFilter) -> Option<Box<dyn BodyFilter>>;

    /// The family of this filter.
    fn family(&self) -> FilterFamily<'_> {
        FilterFamily::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainedFilter;
    use crate::json_path::json_path;
    use crate::property::access_token;

    #[test]
    fn should_report_family_of_each_filter() {
        let path = json_path("$.id").expect("valid path").delete();
        let property = access_token().expect("valid properties");
        let chain = ChainedFilter::default();

        let FilterFamily::JsonPath(found) = path.family() else {
            panic!("path filter should be in the JSON path family");
        };
        assert_eq!(found.paths().collect::<Vec<_>>(), vec!["$.id"]);
        assert!(matches!(property.family(), FilterFamily::Property(_)));
        assert!(matches!(chain.family(), FilterFamily::Other));
    }
}
