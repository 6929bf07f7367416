//! Dynamic field values.
//!
//! Form controls carry loosely typed data: a text input holds a string, a
//! checkbox a bool, a checkbox set a list, a select whatever scalar its
//! options were built from. `Value` is the single representation shared by
//! every element, the configuration layer and the validators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value bound to a form field.
///
/// # Examples
///
/// ```rust
/// use forma::value::Value;
/// let v = Value::from("hello");
/// assert_eq!(v.type_name(), "String");
/// assert!(Value::default().is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true when the value counts as "not provided" for a required
    /// field: null, the empty string, `false`, or an empty list.
    ///
    /// Zero is a real answer, so numbers are never empty.
    ///
    /// ```rust
    /// use forma::value::Value;
    /// assert!(Value::from("").is_empty());
    /// assert!(Value::from(false).is_empty());
    /// assert!(!Value::from(0).is_empty());
    /// assert!(!Value::from("0").is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(_) => false,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view of the value. Strings are parsed after trimming, so
    /// submitted form data (`"42"`) can be compared against numbers.
    ///
    /// ```rust
    /// use forma::value::Value;
    /// assert_eq!(Value::from(" 4.5 ").to_number(), Some(4.5));
    /// assert_eq!(Value::from("four").to_number(), None);
    /// ```
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Truthiness used when a checkbox receives submitted data.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// The string form a value takes inside markup and in loose comparisons.
    ///
    /// Whole numbers print without a fractional part, `true` prints as `1`,
    /// `false` and null print as the empty string, and lists join their items
    /// with commas.
    pub fn to_form_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_form_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Loose equality between submitted data and configured values.
    ///
    /// The rule is explicit rather than coercion-by-accident:
    ///
    /// - null equals only null;
    /// - lists are equal when they have the same length and their items are
    ///   pairwise loosely equal, and never equal a scalar;
    /// - when both sides read as numbers (see [`Value::to_number`]) they are
    ///   compared numerically;
    /// - otherwise both sides are compared by [`Value::to_form_string`].
    ///
    /// ```rust
    /// use forma::value::Value;
    /// assert!(Value::from("2").loosely_equals(&Value::from(2)));
    /// assert!(Value::from("2.0").loosely_equals(&Value::from(2)));
    /// assert!(Value::from(true).loosely_equals(&Value::from("1")));
    /// assert!(!Value::Null.loosely_equals(&Value::from("")));
    /// ```
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Value::List(_), _) | (_, Value::List(_)) => false,
            (a, b) => match (a.to_number(), b.to_number()) {
                (Some(x), Some(y)) => x == y,
                _ => a.to_form_string() == b.to_form_string(),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => Value::fmt_list(f, items),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(Value::from(3).to_form_string(), "3");
        assert_eq!(Value::from(2.5).to_form_string(), "2.5");
    }

    #[test]
    fn loose_equality_is_symmetric_for_scalars() {
        let pairs = [
            (Value::from("1"), Value::from(1)),
            (Value::from(true), Value::from(1)),
            (Value::from("abc"), Value::from("abc")),
        ];
        for (a, b) in pairs {
            assert!(a.loosely_equals(&b));
            assert!(b.loosely_equals(&a));
        }
        assert!(!Value::from("abc").loosely_equals(&Value::from("abd")));
    }

    #[test]
    fn lists_never_match_scalars() {
        let list = Value::List(vec![Value::from("a")]);
        assert!(!list.loosely_equals(&Value::from("a")));
        assert!(list.loosely_equals(&Value::List(vec![Value::from("a")])));
    }

    #[test]
    fn deserializes_untagged_scalars() {
        let parsed: Vec<Value> = serde_json::from_str(r#"[null, true, 2, "x", [1]]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Number(2.0),
                Value::from("x"),
                Value::List(vec![Value::Number(1.0)]),
            ]
        );
    }
}
