//! Radio and checkbox sets.
//!
//! Both are a list of labelled choices bound to one field. A radio set holds
//! a single scalar; a checkbox set holds a list. Choices follow the same
//! convention as select options: the key is the visible label, the value is
//! what gets submitted.

use indexmap::IndexMap;

use crate::dom::Node;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    label: String,
    value: Value,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
    checked: Value,
    multiple: bool,
}

impl ChoiceSet {
    pub fn radio(choices: Vec<Choice>) -> Self {
        Self {
            choices,
            checked: Value::Null,
            multiple: false,
        }
    }

    pub fn checkboxes(choices: Vec<Choice>) -> Self {
        Self {
            choices,
            checked: Value::Null,
            multiple: true,
        }
    }

    /// Builds the choices from an ordered label → value map.
    pub fn choices_from(map: &IndexMap<String, Value>) -> Vec<Choice> {
        map.iter()
            .map(|(label, value)| Choice::new(label.as_str(), value.clone()))
            .collect()
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn value(&self) -> &Value {
        &self.checked
    }

    /// A checkbox set always stores a list; a scalar is wrapped.
    pub fn set_value(&mut self, value: Value) {
        self.checked = match value {
            Value::Null => Value::Null,
            Value::List(items) if !self.multiple => items.into_iter().next().unwrap_or_default(),
            scalar if self.multiple && !matches!(scalar, Value::List(_)) => Value::List(vec![scalar]),
            other => other,
        };
    }

    pub fn reset_value(&mut self) {
        self.checked = Value::Null;
    }

    pub fn is_checked(&self, choice: &Choice) -> bool {
        match &self.checked {
            Value::Null => false,
            Value::List(items) => items.iter().any(|item| item.loosely_equals(&choice.value)),
            scalar => scalar.loosely_equals(&choice.value),
        }
    }

    /// Lowers the set to a wrapper holding one input + label pair per
    /// choice. `name` is the submitted name, `id` the base for input ids.
    pub fn to_node(&self, name: &str, id: &str) -> Node {
        let (input_type, class) = if self.multiple {
            ("checkbox", "forma-checkbox-set")
        } else {
            ("radio", "forma-radio-set")
        };
        let mut wrapper = Node::new("div");
        wrapper.set_attribute("class", class);
        for (i, choice) in self.choices.iter().enumerate() {
            let input_id = format!("{}-{}", id, i + 1);
            let mut input = Node::new("input");
            input.set_attributes([
                ("type", input_type.to_string()),
                ("name", name.to_string()),
                ("id", input_id.clone()),
                ("value", choice.value.to_form_string()),
            ]);
            if self.is_checked(choice) {
                input.set_attribute("checked", "checked");
            }
            wrapper.add_child(input);
            wrapper.add_child(Node::with_text("label", choice.label.clone()).attr("for", input_id));
        }
        wrapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Vec<Choice> {
        vec![Choice::new("Red", "r"), Choice::new("Green", "g"), Choice::new("Blue", "b")]
    }

    #[test]
    fn checkbox_set_wraps_scalars() {
        let mut set = ChoiceSet::checkboxes(colors());
        set.set_value(Value::from("g"));
        assert_eq!(set.value(), &Value::List(vec![Value::from("g")]));
        assert!(set.is_checked(&set.choices()[1].clone()));
    }

    #[test]
    fn radio_keeps_first_of_list() {
        let mut set = ChoiceSet::radio(colors());
        set.set_value(Value::List(vec![Value::from("b"), Value::from("r")]));
        assert_eq!(set.value(), &Value::from("b"));
    }

    #[test]
    fn renders_checked_inputs() {
        let mut set = ChoiceSet::radio(colors());
        set.set_value(Value::from("r"));
        let node = set.to_node("color", "color");
        assert_eq!(node.children().len(), 6);
        assert_eq!(node.children()[0].attribute("checked"), Some("checked"));
        assert_eq!(node.children()[2].attribute("checked"), None);
        assert_eq!(node.children()[1].attribute("for"), Some("color-1"));
    }
}
