//! Sequential composition of body filters that cannot be merged.

use std::borrow::Cow;
use std::ptr;

use tracing::debug;

use crate::body_filter::BodyFilter;
use crate::error::FilterError;

/// Combines two filters, merging them when they belong to the same family.
///
/// When [`BodyFilter::try_merge`] refuses, the result applies `left` then `right`.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::{BodyFilter, access_token, json_path, merge};
///
/// let filter = merge(
///     Box::new(json_path("$.password")?.delete()),
///     Box::new(access_token()?),
/// );
///
/// let body = r#"{"password":"s3cr3t","access_token":"abc"}"#;
/// assert_eq!(
///     filter.filter("application/json", body)?,
///     r#"{"access_token":"XXX"}"#
/// );
/// # Ok::<(), bodyfilter_core::FilterError>(())
/// ```
#[must_use]
pub fn merge(left: Box<dyn BodyFilter>, right: Box<dyn BodyFilter>) -> Box<dyn BodyFilter> {
    if let Some(merged) = left.try_merge(right.as_ref()) {
        return merged;
    }

    let mut chain = ChainedFilter::default();
    chain.push(left);
    chain.push(right);
    Box::new(chain)
}

/// Applies filters one after the other, each on the output of the previous one.
///
/// Pushing a filter merges it into the last one when possible, so adjacent filters
/// of the same family share a single pass.
#[derive(Debug, Default)]
pub struct ChainedFilter {
    filters: Vec<Box<dyn BodyFilter>>,
}

impl ChainedFilter {
    /// Appends a filter, merging it with the last filter when possible.
    pub fn push(&mut self, filter: Box<dyn BodyFilter>) {
        let merged = self
            .filters
            .last()
            .and_then(|last| last.try_merge(filter.as_ref()));

        match merged {
            Some(merged) => {
                debug!("filter merged into the chain");
                self.filters.pop();
                self.filters.push(merged);
            }
            None => self.filters.push(filter),
        }
    }

    /// Appends a filter, merging it with the last filter when possible.
    #[must_use]
    pub fn with(mut self, filter: impl BodyFilter + 'static) -> Self {
        self.push(Box::new(filter));
        self
    }

    /// Number of passes performed by this chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the chain has no filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl BodyFilter for ChainedFilter {
    fn filter<'a>(&self, media_type: &str, body: &'a str) -> Result<Cow<'a, str>, FilterError> {
        let mut current = Cow::Borrowed(body);

        for filter in &self.filters {
            let next = match filter.filter(media_type, &current)? {
                Cow::Borrowed(same) if ptr::eq(same, &*current) => None,
                filtered => Some(filtered.into_owned()),
            };
            if let Some(next) = next {
                current = Cow::Owned(next);
            }
        }

        Ok(current)
    }

    fn try_merge(&self, _other: &dyn BodyFilter) -> Option<Box<dyn BodyFilter>> {
        None
    }
}
