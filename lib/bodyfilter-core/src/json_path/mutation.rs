//! Mutations applied to every node matched by a path.
//!
//! - [`Mutation::Delete`] removes the node from its parent.
//! - [`Mutation::ReplaceStatic`] swaps the node for a typed [`Literal`].
//! - [`Mutation::ReplaceDynamic`] rewrites the node from its string form with a
//!   [`DynamicReplacement`].
//!
//! A dynamic replacement works on the string value for string nodes. Any other
//! node (object, array, number, boolean, null) is first serialized to compact JSON
//! text, and a successful substitution stores the result as a JSON string.

use std::sync::Arc;

use regex::Regex;
use serde_json::{Number, Value};

use super::matcher::{Location, NodeKind};
use crate::error::FilterError;

/// A string-to-string function used by dynamic replacements.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

// Largest integer an f64 represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A typed replacement value.
///
/// The JSON type of the literal is kept in the output: a boolean literal yields a
/// JSON boolean, a number yields a JSON number.
///
/// # Example
///
/// ```rust
/// use bodyfilter_core::Literal;
/// use serde_json::{Value, json};
///
/// assert_eq!(Value::from(Literal::from("XXX")), json!("XXX"));
/// assert_eq!(Value::from(Literal::from(true)), json!(true));
/// // integral floats are written as integers
/// assert_eq!(Value::from(Literal::try_from(0.0)?), json!(0));
/// # Ok::<(), bodyfilter_core::FilterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A JSON string.
    String(String),
    /// A JSON number.
    Number(Number),
    /// A JSON boolean.
    Boolean(bool),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl TryFrom<f64> for Literal {
    type Error = FilterError;

    /// Builds a canonical number: integral values become integers (`0.0` is written `0`).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::NonFiniteNumber`] for NaN and infinities.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
            return Ok(Self::Number(Number::from(value as i64)));
        }

        let number = Number::from_f64(value).ok_or(FilterError::NonFiniteNumber { value })?;
        Ok(Self::Number(number))
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::String(text) => Self::String(text),
            Literal::Number(number) => Self::Number(number),
            Literal::Boolean(flag) => Self::Bool(flag),
        }
    }
}

/// A pattern-driven rewrite of a node's string form.
#[derive(Clone, derive_more::Debug)]
pub enum DynamicReplacement {
    /// Replace every match of `pattern` using a template with back-references (`$1`, `${name}`).
    Template {
        /// The pattern searched in the subject string.
        pattern: Regex,
        /// The replacement template.
        template: String,
    },
    /// Replace the whole subject string with the function output.
    ///
    /// Without a pattern every string node is transformed; with a pattern only the
    /// strings where it matches are.
    Function {
        /// Optional guard on the subject string.
        pattern: Option<Regex>,
        /// The transform applied to the subject string.
        #[debug(skip)]
        transform: Transform,
    },
}

impl DynamicReplacement {
    /// Computes the replacement of `node`.
    ///
    /// Returns `Ok(None)` when the pattern does not match, meaning the node stays as is.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-string node cannot be serialized, or if a
    /// function replacement addresses a non-string node.
    pub fn replace(&self, location: &Location, node: &Value) -> Result<Option<Value>, FilterError> {
        match NodeKind::of(node) {
            NodeKind::String => Ok(node.as_str().and_then(|text| self.substitute(text))),
            kind @ (NodeKind::Object
            | NodeKind::Array
            | NodeKind::Number
            | NodeKind::Boolean
            | NodeKind::Null) => match self {
                Self::Template { .. } => {
                    let text = serde_json::to_string(node)
                        .map_err(|error| FilterError::SerializationError { error })?;
                    Ok(self.substitute(&text))
                }
                Self::Function { .. } => Err(FilterError::UnsupportedDynamicTarget {
                    location: location.to_string(),
                    kind,
                }),
            },
        }
    }

    fn substitute(&self, text: &str) -> Option<Value> {
        match self {
            Self::Template { pattern, template } => pattern
                .is_match(text)
                .then(|| Value::String(pattern.replace_all(text, template.as_str()).into_owned())),
            Self::Function { pattern, transform } => pattern
                .as_ref()
                .is_none_or(|pattern| pattern.is_match(text))
                .then(|| Value::String(transform(text))),
        }
    }
}

/// The transform applied to every matched node.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Remove the node from its parent object or array.
    Delete,
    /// Replace the node with a typed literal, whatever its original type.
    ReplaceStatic(Literal),
    /// Rewrite the node from its string form.
    ReplaceDynamic(DynamicReplacement),
}

impl Mutation {
    /// Applies the mutation at every location of `document`.
    ///
    /// Locations that no longer exist (for example, below a node replaced earlier)
    /// are skipped. Returns the number of nodes changed.
    ///
    /// # Errors
    ///
    /// Returns an error only for dynamic replacements, see [`DynamicReplacement::replace`].
    /// The document may then be partially mutated and must be discarded.
    pub fn apply(
        &self,
        document: &mut Value,
        mut locations: Vec<Location>,
    ) -> Result<usize, FilterError> {
        let mut changed = 0;

        match self {
            Self::Delete => {
                // Deepest and highest indices first, so pending indices never shift
                locations.sort();
                locations.dedup();
                for location in locations.iter().rev() {
                    if location.remove(document).is_some() {
                        changed += 1;
                    }
                }
            }
            Self::ReplaceStatic(literal) => {
                for location in &locations {
                    if let Some(node) = location.resolve_mut(document) {
                        *node = Value::from(literal.clone());
                        changed += 1;
                    }
                }
            }
            Self::ReplaceDynamic(replacement) => {
                for location in &locations {
                    let Some(node) = location.resolve_mut(document) else {
                        continue;
                    };
                    if let Some(value) = replacement.replace(location, node)? {
                        *node = value;
                        changed += 1;
                    }
                }
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_path::matcher::Segment;
    use serde_json::json;

    fn at(fields: &[&str]) -> Location {
        fields
            .iter()
            .map(|field| Segment::Field((*field).to_string()))
            .collect()
    }

    fn template(pattern: &str, template: &str) -> DynamicReplacement {
        DynamicReplacement::Template {
            pattern: Regex::new(pattern).expect("valid pattern"),
            template: template.to_string(),
        }
    }

    fn uppercase() -> DynamicReplacement {
        DynamicReplacement::Function {
            pattern: None,
            transform: Arc::new(str::to_uppercase),
        }
    }

    #[test]
    fn should_build_canonical_numbers() {
        assert_eq!(Value::from(Literal::try_from(0.0).expect("finite")), json!(0));
        assert_eq!(Value::from(Literal::try_from(-3.0).expect("finite")), json!(-3));
        assert_eq!(Value::from(Literal::try_from(1.5).expect("finite")), json!(1.5));
        assert_eq!(Value::from(Literal::from(42)), json!(42));
    }

    #[test]
    fn should_reject_non_finite_numbers() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = Literal::try_from(value);
            assert!(matches!(result, Err(FilterError::NonFiniteNumber { .. })));
        }
    }

    #[test]
    fn should_substitute_template_on_string() {
        let replacement = template(r"^(\w).+", "$1.");

        let result = replacement
            .replace(&at(&["name"]), &json!("Alice"))
            .expect("should replace");

        assert_eq!(result, Some(json!("A.")));
    }

    #[test]
    fn should_leave_string_when_pattern_does_not_match() {
        let replacement = template(r"\s+", "XXX");

        let result = replacement
            .replace(&at(&["name"]), &json!("Alice"))
            .expect("should not fail");

        assert_eq!(result, None);
    }

    #[test]
    fn should_leave_number_when_pattern_does_not_match() {
        let replacement = template(r"\s+", "XXX");

        let result = replacement
            .replace(&at(&["id"]), &json!(1))
            .expect("should not fail");

        assert_eq!(result, None);
    }

    #[test]
    fn should_substitute_serialized_number_as_string() {
        let replacement = template(r"\d", "#");

        let result = replacement
            .replace(&at(&["id"]), &json!(42))
            .expect("should replace");

        assert_eq!(result, Some(json!("##")));
    }

    #[test]
    fn should_substitute_serialized_object_as_string() {
        let replacement = template(r"(\d+)\.\d+", "$1.X");

        let result = replacement
            .replace(&at(&["grades"]), &json!({"Math": 1.3, "PE": 4.0}))
            .expect("should replace");

        assert_eq!(result, Some(json!(r#"{"Math":1.X,"PE":4.X}"#)));
    }

    #[test]
    fn should_transform_string_with_function() {
        let result = uppercase()
            .replace(&at(&["name"]), &json!("Alice"))
            .expect("should replace");

        assert_eq!(result, Some(json!("ALICE")));
    }

    #[test]
    fn should_guard_function_with_pattern() {
        let replacement = DynamicReplacement::Function {
            pattern: Some(Regex::new("^B").expect("valid pattern")),
            transform: Arc::new(|text: &str| text.chars().rev().collect::<String>()),
        };

        let bob = replacement.replace(&at(&["name"]), &json!("Bob"));
        let alice = replacement.replace(&at(&["name"]), &json!("Alice"));

        assert_eq!(bob.expect("should replace"), Some(json!("boB")));
        assert_eq!(alice.expect("should not fail"), None);
    }

    #[test]
    fn should_reject_function_on_non_string() {
        let result = uppercase().replace(&at(&["id"]), &json!(1));

        let Err(FilterError::UnsupportedDynamicTarget { location, kind }) = result else {
            panic!("expected an unsupported target error, got {result:?}");
        };
        assert_eq!(location, "/id");
        assert_eq!(kind, NodeKind::Number);
    }

    #[test]
    fn should_delete_every_element_of_an_array() {
        let mut json = json!({"items": [1, 2, 3], "keep": true});
        let locations = (0..3)
            .map(|index| [Segment::Field("items".into()), Segment::Index(index)])
            .map(Location::from_iter)
            .collect();

        let changed = Mutation::Delete
            .apply(&mut json, locations)
            .expect("delete should succeed");

        assert_eq!(changed, 3);
        assert_eq!(json, json!({"items": [], "keep": true}));
    }

    #[test]
    fn should_delete_nothing_without_locations() {
        let mut json = json!({"id": 1});

        let changed = Mutation::Delete
            .apply(&mut json, Vec::new())
            .expect("delete should succeed");

        assert_eq!(changed, 0);
        assert_eq!(json, json!({"id": 1}));
    }

    #[test]
    fn should_replace_static_keeping_literal_type() {
        let mut json = json!({"id": 1, "friends": [{"id": 2}]});

        Mutation::ReplaceStatic(Literal::from(true))
            .apply(&mut json, vec![at(&["id"])])
            .expect("replace should succeed");
        Mutation::ReplaceStatic(Literal::try_from(0.0).expect("finite"))
            .apply(&mut json, vec![at(&["friends"])])
            .expect("replace should succeed");

        assert_eq!(json, json!({"id": true, "friends": 0}));
    }

    #[test]
    fn should_skip_locations_removed_by_earlier_replacement() {
        let mut json = json!({"a": {"b": "secret"}});
        let locations = vec![at(&["a"]), at(&["a", "b"])];

        let changed = Mutation::ReplaceStatic(Literal::from("XXX"))
            .apply(&mut json, locations)
            .expect("replace should succeed");

        assert_eq!(changed, 1);
        assert_eq!(json, json!({"a": "XXX"}));
    }
}
