//! Select value binding.
//!
//! A [`Select`] owns a tree of options, optionally grouped, and a single
//! `selected` value. The `selected` value is the source of truth: every
//! transition ends with exactly the options whose value loosely equals it
//! marked selected, and none marked when it is null.
//!
//! Option maps come in three shapes, freely mixed across sibling keys:
//!
//! ```yaml
//! a: 1                      # flat: option "a" with value 1
//! fruit:                    # grouped: optgroup "fruit"
//!   apple: 10
//!   pear: 11
//! b:                        # attributed: option "b" with extra attributes
//!   value: 2
//!   attributes: { class: highlight }
//! ```
//!
//! Note that two options sharing a value (for example in different groups)
//! are both selected by [`Select::set_value`], even though a select models a
//! single value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dom::Node;
use crate::value::Value;

/// Ordered option map accepted by [`Select::set_values`].
pub type SelectValues = IndexMap<String, OptionEntry>;

/// One entry of a top-level option map.
///
/// Deserialization tries the shapes in declaration order: a map carrying
/// both `value` and `attributes` is a single option, any other map is a
/// group, anything else is a plain option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Attributed {
        value: Value,
        attributes: IndexMap<String, String>,
    },
    Group(IndexMap<String, GroupEntry>),
    Scalar(Value),
}

/// One entry inside an option group. Groups do not nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupEntry {
    Attributed {
        value: Value,
        attributes: IndexMap<String, String>,
    },
    Scalar(Value),
}

impl OptionEntry {
    pub fn scalar(value: impl Into<Value>) -> Self {
        OptionEntry::Scalar(value.into())
    }

    pub fn attributed<K, V>(value: impl Into<Value>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        OptionEntry::Attributed {
            value: value.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn group<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        OptionEntry::Group(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), GroupEntry::Scalar(v.into())))
                .collect(),
        )
    }
}

/// Builds a flat option map from `(key, value)` pairs.
///
/// ```rust
/// use forma::element::select::select_values;
/// let values = select_values([("a", 1), ("b", 2)]);
/// assert_eq!(values.len(), 2);
/// ```
pub fn select_values<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> SelectValues
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), OptionEntry::scalar(v)))
        .collect()
}

// ============================================================================
// OPTIONS AND GROUPS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    key: String,
    value: Value,
    selected: bool,
    attributes: IndexMap<String, String>,
}

impl SelectOption {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            selected: false,
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// The option's value goes into the `value` attribute so that submitted
    /// data binds back through [`Select::set_value`]; the key is the visible
    /// text.
    pub fn to_node(&self) -> Node {
        let mut node = Node::with_text("option", self.key.clone());
        node.set_attribute("value", self.value.to_form_string());
        node.set_attributes(self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if self.selected {
            node.set_attribute("selected", "selected");
        }
        node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Optgroup {
    label: String,
    options: Vec<SelectOption>,
}

impl Optgroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            options: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn add_option(&mut self, option: SelectOption) -> &mut Self {
        self.options.push(option);
        self
    }

    pub fn to_node(&self) -> Node {
        let mut node = Node::new("optgroup");
        node.set_attribute("label", self.label.clone());
        node.add_children(self.options.iter().map(SelectOption::to_node));
        node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectChild {
    Option(SelectOption),
    Group(Optgroup),
}

// ============================================================================
// SELECT
// ============================================================================

/// # Examples
///
/// ```rust
/// use forma::element::select::{select_values, Select};
/// use forma::value::Value;
/// let mut select = Select::new(&select_values([("a", 1), ("b", 2)]), Value::Null);
/// select.set_value(2);
/// let chosen: Vec<_> = select.selected_options().iter().map(|o| o.key()).collect();
/// assert_eq!(chosen, vec!["b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    children: Vec<SelectChild>,
    selected: Value,
}

impl Select {
    /// Stores `selected` first, then builds the options, so options whose
    /// value matches it start out selected.
    pub fn new(values: &SelectValues, selected: impl Into<Value>) -> Self {
        let mut select = Select {
            children: Vec::new(),
            selected: selected.into(),
        };
        select.set_values(values);
        select
    }

    pub fn value(&self) -> &Value {
        &self.selected
    }

    pub fn children(&self) -> &[SelectChild] {
        &self.children
    }

    /// Every option in document order, descending into groups.
    pub fn options(&self) -> impl Iterator<Item = &SelectOption> {
        self.children.iter().flat_map(|child| match child {
            SelectChild::Option(option) => std::slice::from_ref(option).iter(),
            SelectChild::Group(group) => group.options.iter(),
        })
    }

    pub fn selected_options(&self) -> Vec<&SelectOption> {
        self.options().filter(|o| o.is_selected()).collect()
    }

    fn options_mut(&mut self) -> impl Iterator<Item = &mut SelectOption> {
        self.children.iter_mut().flat_map(|child| match child {
            SelectChild::Option(option) => std::slice::from_mut(option).iter_mut(),
            SelectChild::Group(group) => group.options.iter_mut(),
        })
    }

    /// Rebuilds the whole option tree from `values`.
    pub fn set_values(&mut self, values: &SelectValues) -> &mut Self {
        self.children.clear();
        for (key, entry) in values {
            let child = match entry {
                OptionEntry::Attributed { value, attributes } => SelectChild::Option(
                    self.leaf(key, value).with_attributes(attributes.clone()),
                ),
                OptionEntry::Scalar(value) => SelectChild::Option(self.leaf(key, value)),
                OptionEntry::Group(entries) => {
                    let mut group = Optgroup::new(key.as_str());
                    for (option_key, option_entry) in entries {
                        let option = match option_entry {
                            GroupEntry::Attributed { value, attributes } => self
                                .leaf(option_key, value)
                                .with_attributes(attributes.clone()),
                            GroupEntry::Scalar(value) => self.leaf(option_key, value),
                        };
                        group.add_option(option);
                    }
                    SelectChild::Group(group)
                }
            };
            self.children.push(child);
        }
        self
    }

    /// A fresh option, pre-selected when its value matches the stored one.
    fn leaf(&self, key: &str, value: &Value) -> SelectOption {
        let mut option = SelectOption::new(key, value.clone());
        if !self.selected.is_null() && value.loosely_equals(&self.selected) {
            option.select();
        }
        option
    }

    /// Sets the selected value and resynchronizes every option in one pass.
    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.selected = value.into();
        if self.selected.is_null() {
            return self.reset_value();
        }
        let selected = self.selected.clone();
        for option in self.options_mut() {
            if option.value.loosely_equals(&selected) {
                option.select();
            } else {
                option.deselect();
            }
        }
        self
    }

    pub fn reset_value(&mut self) -> &mut Self {
        self.selected = Value::Null;
        for option in self.options_mut() {
            option.deselect();
        }
        self
    }

    /// Appends option and group nodes to `node`.
    pub fn append_nodes(&self, node: &mut Node) {
        for child in &self.children {
            node.add_child(match child {
                SelectChild::Option(option) => option.to_node(),
                SelectChild::Group(group) => group.to_node(),
            });
        }
    }
}
