//! Fieldsets: field groups that render as a `<fieldset>`.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;

use crate::dom::Node;
use crate::field_group::FieldGroup;

/// A [`FieldGroup`] with a legend and its own attributes.
///
/// Dereferences to the inner group, so every field operation is available
/// directly on the fieldset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fieldset {
    group: FieldGroup,
    legend: Option<String>,
    attributes: IndexMap<String, String>,
}

impl Fieldset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_legend(legend: impl Into<String>) -> Self {
        Self {
            legend: Some(legend.into()),
            ..Self::default()
        }
    }

    pub fn legend(&self) -> Option<&str> {
        self.legend.as_deref()
    }

    pub fn set_legend(&mut self, legend: impl Into<String>) -> &mut Self {
        self.legend = Some(legend.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn group(&self) -> &FieldGroup {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut FieldGroup {
        &mut self.group
    }

    /// Builds the `<fieldset>` tree from the current fields. The tree is
    /// rebuilt from scratch on every call: legend first, then one node per
    /// field in field order.
    pub fn prepare(&self) -> Node {
        let mut node = Node::new("fieldset");
        node.set_attributes(self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(legend) = &self.legend {
            node.add_child(Node::with_text("legend", legend.clone()));
        }
        node.add_children(self.group.fields().values().map(|field| field.to_node()));
        node
    }

    pub fn render(&self, depth: usize, indent: Option<&str>) -> String {
        self.prepare().render(depth, indent)
    }
}

impl From<FieldGroup> for Fieldset {
    fn from(group: FieldGroup) -> Self {
        Self {
            group,
            ..Self::default()
        }
    }
}

impl Deref for Fieldset {
    type Target = FieldGroup;

    fn deref(&self) -> &FieldGroup {
        &self.group
    }
}

impl DerefMut for Fieldset {
    fn deref_mut(&mut self) -> &mut FieldGroup {
        &mut self.group
    }
}
