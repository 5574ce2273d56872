//! # Bodyfilter Core
//!
//! Redact, mask or rewrite JSON fields of HTTP bodies before they are logged.
//!
//! Filters never touch the payload delivered to the application: they take the
//! declared media type and the body text, and return the text to write in the log.
//! Bodies that are not JSON pass through unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use bodyfilter_core::{BodyFilter, Literal, json_path};
//! use regex::Regex;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let body = r#"{"id":1,"name":"Alice","card":"4111 1111 1111 1111","balance":12.5}"#;
//!
//! // Remove a field
//! let filter = json_path("$.id")?.delete();
//!
//! // Replace with a typed literal
//! let filter = filter.merge(&json_path("$.balance")?.replace(Literal::try_from(0.0)?));
//!
//! // Rewrite from a pattern, with back-references
//! let filter = filter.merge(&json_path("$.card")?.replace_pattern(Regex::new(r"\d{4} ")?, "**** "));
//!
//! // Or with a function
//! let filter = filter.merge(&json_path("$.name")?.replace_with(str::to_uppercase));
//!
//! let filtered = filter.filter("application/json", body)?;
//! assert_eq!(
//!     filtered,
//!     r#"{"name":"ALICE","card":"**** **** **** 1111","balance":0}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Paths
//!
//! Paths use JSONPath (RFC 9535) when starting with `$`, and JSON Pointer
//! (RFC 6901) when starting with `/`:
//!
//! - `$.friends.*.name` - the `name` of every friend
//! - `$..password` - every `password`, at any depth
//! - `/friends/0/name` - the `name` of the first friend
//!
//! A path that matches nothing is not an error: the filter does nothing.
//!
//! ## Dynamic replacements
//!
//! Pattern replacements apply to the value of string nodes. When the path
//! addresses another kind of node (object, array, number...), the pattern is
//! applied to its compact JSON text and, if it matches, the node becomes a string:
//!
//! ```rust
//! use bodyfilter_core::{BodyFilter, json_path};
//! use regex::Regex;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let filter = json_path("$.grades")?.replace_pattern(Regex::new(r"(\d+)\.\d+")?, "$1.X");
//!
//! let filtered = filter.filter("application/json", r#"{"grades":{"Math":1.3,"PE":4.0}}"#)?;
//! assert_eq!(filtered, r#"{"grades":"{\"Math\":1.X,\"PE\":4.X}"}"#);
//! # Ok(())
//! # }
//! ```
//!
//! ## Composing filters
//!
//! Filters of the same family merge into one filter doing a single
//! parse/serialize pass. Use [`merge`] or [`ChainedFilter`] to combine any
//! filters: they merge when possible and are applied in sequence otherwise.

mod body_filter;
mod chain;
mod error;
mod json_path;
mod media_type;
mod options;
mod property;

pub use self::body_filter::{BodyFilter, FilterFamily};
pub use self::chain::{ChainedFilter, merge};
pub use self::error::FilterError;
pub use self::json_path::{
    DynamicReplacement, JsonPathBuilder, JsonPathFilter, Literal, Located, Location, Mutation,
    NodeKind, PathMatcher, Segment, Transform, json_path, json_path_with,
};
pub use self::media_type::is_json;
pub use self::options::{FilterOptions, PathSyntax};
pub use self::property::{PropertyFilter, access_token};
