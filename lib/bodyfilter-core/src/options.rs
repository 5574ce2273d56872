/// Path syntaxes accepted when compiling a path expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathSyntax {
    /// Detect the syntax from the prefix: `$` for JSONPath, `/` (or empty) for JSON Pointer.
    #[default]
    Auto,
    /// Only accept JSONPath (RFC 9535) expressions.
    JsonPath,
    /// Only accept JSON Pointer (RFC 6901) expressions.
    JsonPointer,
}

/// Options for configuring how JSON body filters compile paths and render documents.
///
/// Options are fixed when a filter is built and travel with it; nothing is read
/// from global state.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::{FilterOptions, PathSyntax, json_path_with};
///
/// let options = FilterOptions {
///     pretty: true,
///     syntax: PathSyntax::JsonPath,
/// };
///
/// let filter = json_path_with("$.password", options)?.delete();
/// # Ok::<(), bodyfilter_core::FilterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// If true, filtered documents are pretty-printed instead of compact.
    pub pretty: bool,
    /// Which path syntaxes are accepted.
    pub syntax: PathSyntax,
}
