//! # Form elements
//!
//! An [`Element`] is one form control bound to a name and a value. The kind
//! of control is a closed set ([`ElementKind`]), so validation and rendering
//! match exhaustively over every variant.
//!
//! ## Module Structure
//!
//! - **`select`**: option trees and the select value-binding rules
//! - **`choice`**: radio and checkbox sets
//! - **`token`**: CSRF and captcha elements
//!
//! ## Value defaults
//!
//! After [`Element::reset_value`] an element holds its empty default: the
//! empty string for inputs, textareas and buttons, `false` for a checkbox,
//! null for selects, choice sets and token elements.

use indexmap::IndexMap;
use rand::Rng;

use crate::dom::Node;
use crate::tokens::{self, TokenStore};
use crate::validation::{self, Validator};
use crate::value::Value;

pub mod choice;
pub mod select;
pub mod token;

pub use choice::{Choice, ChoiceSet};
pub use select::{OptionEntry, Select, SelectValues};
pub use token::{Captcha, CsrfToken};

/// Suffix marking a field that submits several values.
pub const MULTI_VALUE_SUFFIX: &str = "[]";

pub const REQUIRED_MESSAGE: &str = "This field is required.";

// ============================================================================
// CONTROL KINDS
// ============================================================================

/// `type` attribute of an `<input>` control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Email,
    Url,
    Password,
    Hidden,
    Number,
    Range,
    Date,
    DatetimeLocal,
    Time,
    Tel,
    Search,
    Color,
    File,
    Submit,
    Reset,
}

impl InputType {
    pub const ALL: [InputType; 16] = [
        InputType::Text,
        InputType::Email,
        InputType::Url,
        InputType::Password,
        InputType::Hidden,
        InputType::Number,
        InputType::Range,
        InputType::Date,
        InputType::DatetimeLocal,
        InputType::Time,
        InputType::Tel,
        InputType::Search,
        InputType::Color,
        InputType::File,
        InputType::Submit,
        InputType::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Password => "password",
            InputType::Hidden => "hidden",
            InputType::Number => "number",
            InputType::Range => "range",
            InputType::Date => "date",
            InputType::DatetimeLocal => "datetime-local",
            InputType::Time => "time",
            InputType::Tel => "tel",
            InputType::Search => "search",
            InputType::Color => "color",
            InputType::File => "file",
            InputType::Submit => "submit",
            InputType::Reset => "reset",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Inputs that act as buttons never get a label column.
    pub fn is_button(&self) -> bool {
        matches!(self, InputType::Submit | InputType::Reset)
    }

    /// Whether the current value is written back into the markup.
    fn renders_value(&self) -> bool {
        !matches!(self, InputType::Password | InputType::File)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Input { input_type: InputType, value: Value },
    Button { value: Value },
    Textarea { value: Value },
    Checkbox { checked: bool, checked_value: String },
    RadioSet(ChoiceSet),
    CheckboxSet(ChoiceSet),
    Select(Select),
    Csrf(CsrfToken),
    Captcha(Captcha),
}

impl ElementKind {
    /// The configuration tag naming this kind.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ElementKind::Input { input_type, .. } => input_type.as_str(),
            ElementKind::Button { .. } => "button",
            ElementKind::Textarea { .. } => "textarea",
            ElementKind::Checkbox { .. } => "checkbox",
            ElementKind::RadioSet(_) => "radio",
            ElementKind::CheckboxSet(_) => "checkbox-set",
            ElementKind::Select(_) => "select",
            ElementKind::Csrf(_) => "csrf",
            ElementKind::Captcha(_) => "captcha",
        }
    }

    /// Format check implied by the control type itself.
    fn format_error(&self, value: &Value) -> Option<&'static str> {
        let ElementKind::Input { input_type, .. } = self else {
            return None;
        };
        match input_type {
            InputType::Email if !validation::is_email(&value.to_form_string()) => {
                Some("The value must be a valid email address.")
            }
            InputType::Url if !validation::is_url(&value.to_form_string()) => {
                Some("The value must be a valid URL.")
            }
            InputType::Number | InputType::Range if value.to_number().is_none() => {
                Some("The value must be numeric.")
            }
            _ => None,
        }
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// A single form control.
///
/// # Examples
///
/// ```rust
/// use forma::element::Element;
/// use forma::validation::Validator;
/// let mut username = Element::text("username")
///     .with_label("Username:")
///     .required(true)
///     .with_validator(Validator::min_length(3));
/// assert!(!username.validate());
/// assert_eq!(username.errors(), ["This field is required."]);
/// username.set_value("al");
/// assert!(!username.validate());
/// username.set_value("alice");
/// assert!(username.validate());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    kind: ElementKind,
    label: Option<String>,
    hint: Option<String>,
    required: bool,
    attributes: IndexMap<String, String>,
    validators: Vec<Validator>,
    errors: Vec<String>,
}

impl Element {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            hint: None,
            required: false,
            attributes: IndexMap::new(),
            validators: Vec::new(),
            errors: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Constructors per control kind
    // ------------------------------------------------------------------------

    pub fn input(name: impl Into<String>, input_type: InputType) -> Self {
        Self::new(
            name,
            ElementKind::Input {
                input_type,
                value: Value::from(""),
            },
        )
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::input(name, InputType::Text)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::input(name, InputType::Email)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::input(name, InputType::Url)
    }

    pub fn password(name: impl Into<String>) -> Self {
        Self::input(name, InputType::Password)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::input(name, InputType::File)
    }

    pub fn hidden(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::input(name, InputType::Hidden).with_value(value)
    }

    pub fn submit(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::input(name, InputType::Submit).with_value(value)
    }

    pub fn button(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, ElementKind::Button { value: value.into() })
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ElementKind::Textarea {
                value: Value::from(""),
            },
        )
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ElementKind::Checkbox {
                checked: false,
                checked_value: "1".to_string(),
            },
        )
    }

    pub fn radio_set(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(name, ElementKind::RadioSet(ChoiceSet::radio(choices)))
    }

    pub fn checkbox_set(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(name, ElementKind::CheckboxSet(ChoiceSet::checkboxes(choices)))
    }

    pub fn select(name: impl Into<String>, values: &SelectValues, selected: impl Into<Value>) -> Self {
        Self::new(name, ElementKind::Select(Select::new(values, selected)))
    }

    /// A hidden CSRF guard carrying the token held by `store` (issued on
    /// first use).
    pub fn csrf(name: impl Into<String>, store: &mut dyn TokenStore, rng: &mut impl Rng) -> Self {
        let token = tokens::issue_csrf_token(store, rng);
        Self::new(name, ElementKind::Csrf(CsrfToken::new(token)))
    }

    /// A required captcha question; a new challenge is issued on every call.
    pub fn captcha(name: impl Into<String>, store: &mut dyn TokenStore, rng: &mut impl Rng) -> Self {
        let (question, answer) = tokens::issue_captcha(store, rng);
        let label = format!("What is {}?", question);
        Self::new(name, ElementKind::Captcha(Captcha::new(question, answer)))
            .with_label(label)
            .required(true)
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators.extend(validators);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without a trailing multi-value marker.
    pub fn base_name(&self) -> &str {
        self.name
            .strip_suffix(MULTI_VALUE_SUFFIX)
            .unwrap_or(&self.name)
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn add_validator(&mut self, validator: Validator) -> &mut Self {
        self.validators.push(validator);
        self
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn clear_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }

    // ------------------------------------------------------------------------
    // Value binding
    // ------------------------------------------------------------------------

    pub fn value(&self) -> Value {
        match &self.kind {
            ElementKind::Input { value, .. }
            | ElementKind::Button { value }
            | ElementKind::Textarea { value } => value.clone(),
            ElementKind::Checkbox { checked, .. } => Value::Bool(*checked),
            ElementKind::RadioSet(set) | ElementKind::CheckboxSet(set) => set.value().clone(),
            ElementKind::Select(select) => select.value().clone(),
            ElementKind::Csrf(token) => token.submitted().clone(),
            ElementKind::Captcha(captcha) => captcha.submitted().clone(),
        }
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match &mut self.kind {
            ElementKind::Input { value: current, .. }
            | ElementKind::Button { value: current }
            | ElementKind::Textarea { value: current } => *current = value,
            ElementKind::Checkbox { checked, checked_value } => {
                *checked = value.is_truthy() || value.loosely_equals(&Value::from(checked_value.as_str()))
            }
            ElementKind::RadioSet(set) | ElementKind::CheckboxSet(set) => set.set_value(value),
            ElementKind::Select(select) => {
                select.set_value(value);
            }
            ElementKind::Csrf(token) => token.set_submitted(value),
            ElementKind::Captcha(captcha) => captcha.set_submitted(value),
        }
        self
    }

    /// Puts the element back to its empty default.
    pub fn reset_value(&mut self) -> &mut Self {
        match &mut self.kind {
            ElementKind::Input { value, .. }
            | ElementKind::Button { value }
            | ElementKind::Textarea { value } => *value = Value::from(""),
            ElementKind::Checkbox { checked, .. } => *checked = false,
            ElementKind::RadioSet(set) | ElementKind::CheckboxSet(set) => set.reset_value(),
            ElementKind::Select(select) => {
                select.reset_value();
            }
            ElementKind::Csrf(token) => token.set_submitted(Value::Null),
            ElementKind::Captcha(captcha) => captcha.set_submitted(Value::Null),
        }
        self
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Checks the current value and records every failure on the element.
    ///
    /// Errors from a previous run are discarded first. An empty value only
    /// fails when the element is required; validators run against non-empty
    /// values. Token elements always compare against their expected answer.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        let value = self.value();

        if value.is_empty() {
            if self.required {
                self.errors.push(REQUIRED_MESSAGE.to_string());
            }
        } else {
            if let Some(message) = self.kind.format_error(&value) {
                self.errors.push(message.to_string());
            }
            for validator in &self.validators {
                if let Err(message) = validator.evaluate(&value) {
                    self.errors.push(message);
                }
            }
        }

        match &self.kind {
            ElementKind::Csrf(token) if !token.verify() => {
                self.errors.push(token::CSRF_MESSAGE.to_string())
            }
            ElementKind::Captcha(captcha) if !value.is_empty() && !captcha.verify() => {
                self.errors.push(token::CAPTCHA_MESSAGE.to_string())
            }
            _ => {}
        }

        tracing::trace!(field = %self.name, errors = self.errors.len(), "validated field");
        self.errors.is_empty()
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// The bare control: `<input>`, `<select>`, `<textarea>`, ...
    pub fn control_node(&self) -> Node {
        let id = self.base_name().to_string();
        let mut node = match &self.kind {
            ElementKind::Input { input_type, value } => {
                let mut node = Node::new("input");
                node.set_attributes([("type", input_type.as_str()), ("name", self.name.as_str()), ("id", id.as_str())]);
                if input_type.renders_value() && !value.is_empty() {
                    node.set_attribute("value", value.to_form_string());
                }
                node
            }
            ElementKind::Button { value } => {
                let mut node = Node::with_text("button", value.to_form_string());
                node.set_attributes([("type", "button"), ("name", self.name.as_str()), ("id", id.as_str())]);
                node
            }
            ElementKind::Textarea { value } => {
                let mut node = Node::with_text("textarea", value.to_form_string());
                node.set_attributes([("name", self.name.as_str()), ("id", id.as_str())]);
                node
            }
            ElementKind::Checkbox { checked, checked_value } => {
                let mut node = Node::new("input");
                node.set_attributes([
                    ("type", "checkbox"),
                    ("name", self.name.as_str()),
                    ("id", id.as_str()),
                    ("value", checked_value.as_str()),
                ]);
                if *checked {
                    node.set_attribute("checked", "checked");
                }
                node
            }
            ElementKind::RadioSet(set) => set.to_node(&self.name, &id),
            ElementKind::CheckboxSet(set) => {
                let name = if self.name.ends_with(MULTI_VALUE_SUFFIX) {
                    self.name.clone()
                } else {
                    format!("{}{}", self.name, MULTI_VALUE_SUFFIX)
                };
                set.to_node(&name, &id)
            }
            ElementKind::Select(select) => {
                let mut node = Node::new("select");
                node.set_attributes([("name", self.name.as_str()), ("id", id.as_str())]);
                select.append_nodes(&mut node);
                node
            }
            ElementKind::Csrf(token) => {
                let mut node = Node::new("input");
                node.set_attributes([
                    ("type", "hidden"),
                    ("name", self.name.as_str()),
                    ("id", id.as_str()),
                    ("value", token.expected()),
                ]);
                node
            }
            ElementKind::Captcha(_) => {
                let mut node = Node::new("input");
                node.set_attributes([("type", "text"), ("name", self.name.as_str()), ("id", id.as_str())]);
                node
            }
        };
        if self.required && self.accepts_required_attribute() {
            node.set_attribute("required", "required");
        }
        node.set_attributes(self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        node
    }

    fn accepts_required_attribute(&self) -> bool {
        !matches!(
            self.kind,
            ElementKind::RadioSet(_) | ElementKind::CheckboxSet(_) | ElementKind::Button { .. }
        )
    }

    fn is_hidden(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Csrf(_)
                | ElementKind::Input {
                    input_type: InputType::Hidden,
                    ..
                }
        )
    }

    /// The control with its label, hint and recorded errors.
    ///
    /// Hidden controls are returned bare; everything else is wrapped in a
    /// `div.forma-field`.
    pub fn to_node(&self) -> Node {
        if self.is_hidden() {
            return self.control_node();
        }
        let mut wrapper = Node::new("div");
        wrapper.set_attribute("class", if self.has_errors() { "forma-field forma-field-error" } else { "forma-field" });
        if let Some(label) = &self.label {
            let mut label_node = Node::with_text("label", label.clone());
            label_node.set_attribute("for", self.base_name());
            if self.required {
                label_node.set_attribute("class", "required");
            }
            wrapper.add_child(label_node);
        }
        wrapper.add_child(self.control_node());
        if let Some(hint) = &self.hint {
            wrapper.add_child(Node::with_text("span", hint.clone()).attr("class", "forma-hint"));
        }
        if self.has_errors() {
            let mut list = Node::new("ul");
            list.set_attribute("class", "forma-errors");
            list.add_children(self.errors.iter().map(|e| Node::with_text("li", e.clone())));
            wrapper.add_child(list);
        }
        wrapper
    }

    pub fn render(&self, depth: usize, indent: Option<&str>) -> String {
        self.to_node().render(depth, indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::MemoryTokenStore;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn email_inputs_check_format() {
        let mut email = Element::email("email").with_value("nope");
        assert!(!email.validate());
        email.set_value("a@b.io");
        assert!(email.validate());
    }

    #[test]
    fn optional_empty_fields_skip_validators() {
        let mut field = Element::text("nickname").with_validator(Validator::min_length(5));
        assert!(field.validate());
    }

    #[test]
    fn validate_discards_previous_errors() {
        let mut field = Element::text("name").required(true);
        field.validate();
        field.validate();
        assert_eq!(field.errors().len(), 1);
    }

    #[test]
    fn reset_defaults_per_kind() {
        let mut text = Element::text("t").with_value("x");
        let mut check = Element::checkbox("c").with_value(true);
        let mut select = Element::select("s", &select::select_values([("a", 1)]), 1);
        text.reset_value();
        check.reset_value();
        select.reset_value();
        assert_eq!(text.value(), Value::from(""));
        assert_eq!(check.value(), Value::Bool(false));
        assert_eq!(select.value(), Value::Null);
    }

    #[test]
    fn password_value_is_not_rendered() {
        let field = Element::password("secret").with_value("hunter2");
        assert!(!field.render(0, None).contains("hunter2"));
    }

    #[test]
    fn checkbox_set_gets_multi_value_name() {
        let field = Element::checkbox_set("colors", vec![Choice::new("Red", "r")]);
        let node = field.control_node();
        assert_eq!(node.children()[0].attribute("name"), Some("colors[]"));
        assert_eq!(node.children()[0].attribute("id"), Some("colors-1"));
    }

    #[test]
    fn errors_render_after_control() {
        let mut field = Element::text("username").with_label("Username:").required(true);
        field.validate();
        let html = field.render(0, None);
        let control = html.find("<input").unwrap();
        let errors = html.find("forma-errors").unwrap();
        assert!(control < errors);
        assert!(html.contains("<li>This field is required.</li>"));
        assert!(html.contains("<label for=\"username\" class=\"required\">Username:</label>"));
    }

    #[test]
    fn csrf_round_trip() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        let mut store = MemoryTokenStore::new();
        let mut csrf = Element::csrf("token", &mut store, &mut rng);
        assert!(!csrf.validate());
        let expected = store.get(tokens::CSRF_KEY).unwrap();
        csrf.set_value(expected.as_str());
        assert!(csrf.validate());
        assert!(csrf.render(0, None).contains(&expected));
    }

    #[test]
    fn captcha_is_required_and_checked() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let mut store = MemoryTokenStore::new();
        let mut captcha = Element::captcha("human", &mut store, &mut rng);
        assert!(captcha.label().unwrap().starts_with("What is"));
        assert!(!captcha.validate());
        let answer = store.get(tokens::CAPTCHA_KEY).unwrap();
        captcha.set_value(answer.as_str());
        assert!(captcha.validate());
    }

    #[test]
    fn input_type_tags_round_trip() {
        for t in InputType::ALL {
            assert_eq!(InputType::from_tag(t.as_str()), Some(t));
        }
        assert_eq!(InputType::from_tag("slider"), None);
    }
}
