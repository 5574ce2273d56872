//! Path matcher supporting both JSONPath (RFC 9535) and JSON Pointer (RFC 6901) syntax.
//!
//! A [`PathMatcher`] is compiled once and resolved against many documents. Resolution
//! never fails: a missing or partially missing path simply yields no [`Located`] node.

use std::fmt;

use jsonptr::index::Index;
use jsonptr::{Pointer, PointerBuf, Token};
use serde_json::Value;
use serde_json_path::{JsonPath, PathElement};

use crate::error::FilterError;
use crate::options::PathSyntax;

/// The type tag of a JSON node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NodeKind {
    /// A JSON object.
    #[display("object")]
    Object,
    /// A JSON array.
    #[display("array")]
    Array,
    /// A JSON string.
    #[display("string")]
    String,
    /// A JSON number.
    #[display("number")]
    Number,
    /// A JSON boolean.
    #[display("boolean")]
    Boolean,
    /// The JSON `null` value.
    #[display("null")]
    Null,
}

impl NodeKind {
    /// Returns the type tag of a value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    /// Returns `true` for scalar kinds (everything but objects and arrays).
    #[must_use]
    pub fn is_leaf(self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// A field of an object.
    Field(String),
    /// An element of an array.
    Index(usize),
}

/// The concrete location of a node inside a document.
///
/// Locations order like the document: a parent comes before its children and
/// array elements are ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    /// The location of the document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if this is the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The steps leading from the root to this location.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Gets the node at this location, if it exists.
    #[must_use]
    pub fn resolve<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| match (current, segment) {
                (Value::Object(map), Segment::Field(name)) => map.get(name),
                (Value::Array(items), Segment::Index(index)) => items.get(*index),
                _ => None,
            })
    }

    /// Gets a mutable reference to the node at this location, if it exists.
    pub fn resolve_mut<'v>(&self, document: &'v mut Value) -> Option<&'v mut Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| match (current, segment) {
                (Value::Object(map), Segment::Field(name)) => map.get_mut(name),
                (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
                _ => None,
            })
    }

    /// Removes the node at this location from its parent container.
    ///
    /// Object fields keep their relative order and array elements after the
    /// removed one shift down. Removing the root replaces the document with `null`.
    /// Returns `None` if nothing exists at this location.
    pub fn remove(&self, document: &mut Value) -> Option<Value> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Some(std::mem::take(document));
        };

        let parent = Self {
            segments: parents.to_vec(),
        };
        match (parent.resolve_mut(document)?, last) {
            (Value::Object(map), Segment::Field(name)) => map.shift_remove(name),
            (Value::Array(items), Segment::Index(index)) if *index < items.len() => {
                Some(items.remove(*index))
            }
            _ => None,
        }
    }

    /// Renders this location as a JSON Pointer (e.g. `/friends/0/name`).
    #[must_use]
    pub fn to_json_pointer(&self) -> PointerBuf {
        PointerBuf::from_tokens(self.segments.iter().map(|segment| match segment {
            Segment::Field(name) => Token::new(name.as_str()),
            Segment::Index(index) => Token::from(*index),
        }))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json_pointer())
    }
}

impl FromIterator<Segment> for Location {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// A node matched by a [`PathMatcher`], with its location.
#[derive(Debug, Clone)]
pub struct Located<'v> {
    location: Location,
    node: &'v Value,
}

impl<'v> Located<'v> {
    /// Where the node lives in the document.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The matched node.
    #[must_use]
    pub fn node(&self) -> &'v Value {
        self.node
    }

    /// The type tag of the matched node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        NodeKind::of(self.node)
    }

    /// Consumes the match, keeping only its location.
    #[must_use]
    pub fn into_location(self) -> Location {
        self.location
    }
}

#[derive(Debug, Clone)]
enum Selector {
    Pointer(PointerBuf),
    JsonPath(JsonPath),
}

/// A compiled path expression.
///
/// The syntax is selected by [`PathSyntax`]; with [`PathSyntax::Auto`]:
/// - `$...` → JSONPath (RFC 9535) - supports wildcards like `.*`, `[*]`, `..`
/// - `/...` → JSON Pointer (RFC 6901) - exact path only, the empty pointer is the root
#[derive(Debug, Clone)]
pub struct PathMatcher {
    expression: String,
    selector: Selector,
}

impl PathMatcher {
    /// Parse a path string, auto-detecting the syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path doesn't start with `$` or `/` (and is not empty)
    /// - JSONPath parsing fails for `$` prefixed paths
    /// - JSON Pointer parsing fails for `/` prefixed paths
    pub fn parse(path: &str) -> Result<Self, FilterError> {
        Self::parse_with(path, PathSyntax::Auto)
    }

    /// Parse a path string using the given syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid for the requested syntax.
    pub fn parse_with(path: &str, syntax: PathSyntax) -> Result<Self, FilterError> {
        let selector = match syntax {
            PathSyntax::JsonPath => parse_json_path(path)?,
            PathSyntax::JsonPointer => parse_pointer(path)?,
            PathSyntax::Auto if path.starts_with('$') => parse_json_path(path)?,
            // Empty string is valid JSON Pointer (root)
            PathSyntax::Auto if path.starts_with('/') || path.is_empty() => parse_pointer(path)?,
            PathSyntax::Auto => {
                return Err(FilterError::InvalidPath {
                    path: path.to_string(),
                    message: "must start with '$' (JSONPath) or '/' (JSON Pointer)".to_string(),
                });
            }
        };

        Ok(Self {
            expression: path.to_string(),
            selector,
        })
    }

    /// The source expression this matcher was compiled from.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Resolve the matcher against a document.
    ///
    /// Nodes come in document order for wildcards, and in selector order for
    /// unions. Matching nothing is not an error, the iterator is just empty.
    pub fn resolve<'v>(&self, document: &'v Value) -> Box<dyn Iterator<Item = Located<'v>> + 'v> {
        match &self.selector {
            Selector::JsonPath(path) => {
                Box::new(path.query_located(document).into_iter().map(|node| {
                    let location = node
                        .location()
                        .iter()
                        .map(|element| match element {
                            PathElement::Name(name) => Segment::Field((*name).to_string()),
                            PathElement::Index(index) => Segment::Index(*index),
                        })
                        .collect();
                    Located {
                        location,
                        node: node.node(),
                    }
                }))
            }
            Selector::Pointer(pointer) => Box::new(resolve_pointer(pointer, document).into_iter()),
        }
    }

    /// Resolve the matcher and keep only the locations.
    pub fn locations(&self, document: &Value) -> Vec<Location> {
        self.resolve(document).map(Located::into_location).collect()
    }
}

fn parse_json_path(path: &str) -> Result<Selector, FilterError> {
    let json_path = JsonPath::parse(path).map_err(|err| FilterError::InvalidPath {
        path: path.to_string(),
        message: format!("invalid JSONPath: {err}"),
    })?;
    Ok(Selector::JsonPath(json_path))
}

fn parse_pointer(path: &str) -> Result<Selector, FilterError> {
    let pointer = Pointer::parse(path).map_err(|err| FilterError::InvalidPath {
        path: path.to_string(),
        message: format!("invalid JSON Pointer: {err}"),
    })?;
    Ok(Selector::Pointer(pointer.to_buf()))
}

fn resolve_pointer<'v>(pointer: &Pointer, document: &'v Value) -> Option<Located<'v>> {
    let mut node = document;
    let mut segments = Vec::new();

    for token in pointer.tokens() {
        match node {
            Value::Object(map) => {
                let name = token.decoded();
                node = map.get(name.as_ref())?;
                segments.push(Segment::Field(name.into_owned()));
            }
            Value::Array(items) => {
                let Ok(Index::Num(index)) = token.to_index() else {
                    return None;
                };
                node = items.get(index)?;
                segments.push(Segment::Index(index));
            }
            _ => return None,
        }
    }

    Some(Located {
        location: Location { segments },
        node,
    })
}
