use crate::json_path::NodeKind;

/// Errors that can occur while building or applying a body filter.
///
/// Per-match conditions (a path matching nothing, a pattern not matching a
/// value) are never errors. Only document-level failures and invalid
/// configuration are surfaced through this type.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum FilterError {
    /// The body was declared as JSON but could not be parsed.
    ///
    /// The caller decides whether to log the raw body, skip filtering or drop the log line.
    #[display("Malformed JSON document: {error}")]
    #[from(skip)]
    MalformedDocument {
        /// The underlying JSON parsing error.
        error: serde_json::Error,
    },

    /// The filtered document (or a subtree of it) could not be serialized.
    #[display("Failed to serialize JSON: {error}")]
    #[from(skip)]
    SerializationError {
        /// The underlying JSON serialization error.
        error: serde_json::Error,
    },

    /// The path expression could not be compiled.
    ///
    /// Occurs for invalid JSONPath syntax, invalid JSON Pointer syntax, or a
    /// path whose prefix is not accepted by the configured syntax.
    #[display("Invalid path '{path}': {message}")]
    #[from(skip)]
    InvalidPath {
        /// The rejected path expression.
        path: String,
        /// Description of why the path is invalid.
        message: String,
    },

    /// A replacement pattern could not be compiled.
    InvalidPattern(regex::Error),

    /// A function-based replacement addressed a node that is not a string.
    #[display("Cannot apply a string transform at '{location}' to a {kind} node")]
    #[from(skip)]
    UnsupportedDynamicTarget {
        /// The JSON Pointer of the offending node.
        location: String,
        /// The type of the offending node.
        kind: NodeKind,
    },

    /// A numeric replacement cannot be represented in JSON.
    #[display("Cannot use {value} as a JSON number")]
    #[from(skip)]
    NonFiniteNumber {
        /// The rejected value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FilterError>();
        assert_sync::<FilterError>();
    }

    #[test]
    fn should_display_unsupported_dynamic_target() {
        let error = FilterError::UnsupportedDynamicTarget {
            location: "/id".to_string(),
            kind: NodeKind::Number,
        };

        insta::assert_snapshot!(error, @"Cannot apply a string transform at '/id' to a number node");
    }

    #[test]
    fn should_display_invalid_path() {
        let error = FilterError::InvalidPath {
            path: "id".to_string(),
            message: "must start with '$' or '/'".to_string(),
        };

        insta::assert_snapshot!(error, @"Invalid path 'id': must start with '$' or '/'");
    }
}
