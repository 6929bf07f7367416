//! Field validators.
//!
//! A [`Validator`] pairs a [`Rule`] (the predicate) with the message recorded
//! on the field when the predicate fails. Validators come either from code or
//! from configuration records:
//!
//! ```yaml
//! validators:
//!   - rule: min_length
//!     length: 3
//!   - rule: pattern
//!     pattern: "^[a-z]+$"
//!     message: Lowercase letters only.
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::diagnostics::FormError;
use crate::value::Value;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("url pattern compiles")
});

pub fn is_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

pub fn is_url(candidate: &str) -> bool {
    URL_PATTERN.is_match(candidate)
}

/// Length in user-perceived characters; lists count their items.
fn length_of(value: &Value) -> usize {
    match value {
        Value::List(items) => items.len(),
        other => other.to_form_string().graphemes(true).count(),
    }
}

// ============================================================================
// PATTERN
// ============================================================================

/// A compiled regular expression that serializes as its source text.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, FormError> {
        Regex::new(pattern)
            .map(Pattern)
            .map_err(|source| FormError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Regex::new(&source)
            .map(Pattern)
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// CUSTOM RULES
// ============================================================================

/// Predicate supplied from code. Never read from configuration.
#[derive(Clone)]
pub struct CustomRule {
    name: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl CustomRule {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule").field("name", &self.name).finish()
    }
}

impl PartialEq for CustomRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.check, &other.check)
    }
}

// ============================================================================
// RULES
// ============================================================================

/// The predicate half of a validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    NotEmpty,
    Email,
    Url,
    MinLength { length: usize },
    MaxLength { length: usize },
    LengthBetween { min: usize, max: usize },
    Equal { value: Value },
    NotEqual { value: Value },
    GreaterThan { value: f64 },
    LessThan { value: f64 },
    Between { min: f64, max: f64 },
    OneOf { values: Vec<Value> },
    Pattern { pattern: Pattern },
    Numeric,
    AlphaNumeric,
    #[serde(skip)]
    Custom(CustomRule),
}

impl Rule {
    /// Evaluates the predicate. Numeric rules fail on non-numeric input.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Rule::NotEmpty => !value.is_empty(),
            Rule::Email => is_email(&value.to_form_string()),
            Rule::Url => is_url(&value.to_form_string()),
            Rule::MinLength { length } => length_of(value) >= *length,
            Rule::MaxLength { length } => length_of(value) <= *length,
            Rule::LengthBetween { min, max } => (*min..=*max).contains(&length_of(value)),
            Rule::Equal { value: expected } => value.loosely_equals(expected),
            Rule::NotEqual { value: expected } => !value.loosely_equals(expected),
            Rule::GreaterThan { value: bound } => value.to_number().is_some_and(|n| n > *bound),
            Rule::LessThan { value: bound } => value.to_number().is_some_and(|n| n < *bound),
            Rule::Between { min, max } => value.to_number().is_some_and(|n| n >= *min && n <= *max),
            Rule::OneOf { values } => match value {
                Value::List(items) => items
                    .iter()
                    .all(|item| values.iter().any(|allowed| item.loosely_equals(allowed))),
                scalar => values.iter().any(|allowed| scalar.loosely_equals(allowed)),
            },
            Rule::Pattern { pattern } => pattern.is_match(&value.to_form_string()),
            Rule::Numeric => value.to_number().is_some(),
            Rule::AlphaNumeric => {
                let text = value.to_form_string();
                !text.is_empty() && text.chars().all(char::is_alphanumeric)
            }
            Rule::Custom(custom) => (custom.check)(value),
        }
    }

    /// Message used when a validator does not carry its own.
    pub fn default_message(&self) -> String {
        match self {
            Rule::NotEmpty => "This field is required.".to_string(),
            Rule::Email => "The value must be a valid email address.".to_string(),
            Rule::Url => "The value must be a valid URL.".to_string(),
            Rule::MinLength { length } => {
                format!("The value must be at least {} characters long.", length)
            }
            Rule::MaxLength { length } => {
                format!("The value must be at most {} characters long.", length)
            }
            Rule::LengthBetween { min, max } => {
                format!("The value must be between {} and {} characters long.", min, max)
            }
            Rule::Equal { value } => format!("The value must be equal to '{}'.", value),
            Rule::NotEqual { value } => format!("The value must not be equal to '{}'.", value),
            Rule::GreaterThan { value } => {
                format!("The value must be greater than {}.", Value::from(*value))
            }
            Rule::LessThan { value } => {
                format!("The value must be less than {}.", Value::from(*value))
            }
            Rule::Between { min, max } => format!(
                "The value must be between {} and {}.",
                Value::from(*min),
                Value::from(*max)
            ),
            Rule::OneOf { .. } => "The value is not one of the allowed choices.".to_string(),
            Rule::Pattern { .. } => "The value format is invalid.".to_string(),
            Rule::Numeric => "The value must be numeric.".to_string(),
            Rule::AlphaNumeric => "The value must contain only letters and digits.".to_string(),
            Rule::Custom(custom) => format!("The value failed the '{}' check.", custom.name()),
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// A rule plus the message recorded when it fails.
///
/// # Examples
///
/// ```rust
/// use forma::validation::Validator;
/// use forma::value::Value;
/// let v = Validator::min_length(3).with_message("Too short");
/// assert_eq!(v.evaluate(&Value::from("ab")), Err("Too short".to_string()));
/// assert_eq!(v.evaluate(&Value::from("abc")), Ok(()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    #[serde(flatten)]
    rule: Rule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Validator {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn not_empty() -> Self {
        Self::new(Rule::NotEmpty)
    }

    pub fn email() -> Self {
        Self::new(Rule::Email)
    }

    pub fn url() -> Self {
        Self::new(Rule::Url)
    }

    pub fn min_length(length: usize) -> Self {
        Self::new(Rule::MinLength { length })
    }

    pub fn max_length(length: usize) -> Self {
        Self::new(Rule::MaxLength { length })
    }

    pub fn one_of(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::new(Rule::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn pattern(pattern: &str) -> Result<Self, FormError> {
        Ok(Self::new(Rule::Pattern {
            pattern: Pattern::new(pattern)?,
        }))
    }

    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(Rule::Custom(CustomRule::new(name, check)))
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.rule.default_message())
    }

    /// Runs the rule; on failure returns the message to record.
    pub fn evaluate(&self, value: &Value) -> Result<(), String> {
        if self.rule.check(value) {
            Ok(())
        } else {
            Err(self.message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_graphemes() {
        let v = Validator::max_length(3);
        assert!(v.evaluate(&Value::from("née")).is_ok());
        assert!(v.evaluate(&Value::from("e\u{301}e\u{301}e\u{301}")).is_ok());
        assert!(v.evaluate(&Value::from("four")).is_err());
    }

    #[test]
    fn numeric_rules_reject_text() {
        let rule = Rule::GreaterThan { value: 10.0 };
        assert!(rule.check(&Value::from("11")));
        assert!(!rule.check(&Value::from("ten")));
        assert!(!rule.check(&Value::from(10)));
    }

    #[test]
    fn one_of_checks_every_list_item() {
        let v = Validator::one_of(["red", "green"]);
        assert!(v.evaluate(&Value::List(vec!["red".into(), "green".into()])).is_ok());
        assert!(v.evaluate(&Value::List(vec!["red".into(), "blue".into()])).is_err());
    }

    #[test]
    fn deserializes_from_config_records() {
        let validators: Vec<Validator> = serde_json::from_str(
            r#"[
                {"rule": "min_length", "length": 2},
                {"rule": "pattern", "pattern": "^[a-z]+$", "message": "lowercase"},
                {"rule": "between", "min": 1, "max": 5}
            ]"#,
        )
        .unwrap();
        assert_eq!(validators[0].rule(), &Rule::MinLength { length: 2 });
        assert_eq!(validators[1].evaluate(&Value::from("ABC")), Err("lowercase".into()));
        assert!(validators[2].evaluate(&Value::from(3)).is_ok());
    }

    #[test]
    fn bad_pattern_in_config_is_rejected() {
        let parsed: Result<Validator, _> =
            serde_json::from_str(r#"{"rule": "pattern", "pattern": "("}"#);
        assert!(parsed.is_err());
        assert!(matches!(
            Validator::pattern("("),
            Err(FormError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn custom_rules_use_their_name_in_messages() {
        let v = Validator::custom("even", |value| {
            value.to_number().is_some_and(|n| n % 2.0 == 0.0)
        });
        assert!(v.evaluate(&Value::from(4)).is_ok());
        assert_eq!(
            v.evaluate(&Value::from(3)),
            Err("The value failed the 'even' check.".into())
        );
    }

    #[test]
    fn builtin_formats() {
        assert!(is_email("user@example.com"));
        assert!(!is_email("user@example"));
        assert!(is_url("https://example.com/path?q=1"));
        assert!(!is_url("example.com"));
    }
}
