//! Named, ordered collections of elements.
//!
//! A [`FieldGroup`] keys every [`Element`] by its name. Insertion order is
//! preserved; adding an element under a name that already exists replaces
//! it in place, so the name keeps the position of its first insertion.

use indexmap::IndexMap;

use crate::config::FormConfig;
use crate::diagnostics::Result;
use crate::element::Element;
use crate::factory::FieldFactory;
use crate::value::Value;

/// # Examples
///
/// ```rust
/// use forma::element::Element;
/// use forma::field_group::FieldGroup;
/// let mut group = FieldGroup::new();
/// group
///     .add_field(Element::text("first"))
///     .add_field(Element::text("last"));
/// group.set("first", "Ada");
/// assert_eq!(group.get("first").unwrap().to_string(), "Ada");
/// assert!(!group.has("middle"));
/// assert_eq!(group.count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldGroup {
    fields: IndexMap<String, Element>,
}

impl FieldGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every field in `config` through `factory`, in config order.
    pub fn from_config(config: &FormConfig, factory: &mut FieldFactory<'_>) -> Result<Self> {
        let mut group = Self::new();
        group.add_fields(factory.create_all(config)?);
        Ok(group)
    }

    pub fn add_field(&mut self, field: Element) -> &mut Self {
        self.fields.insert(field.name().to_string(), field);
        self
    }

    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = Element>) -> &mut Self {
        for field in fields {
            self.add_field(field);
        }
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Element> {
        self.fields.get(name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.fields.get_mut(name)
    }

    pub fn get_field_value(&self, name: &str) -> Option<Value> {
        self.fields.get(name).map(Element::value)
    }

    /// Does nothing when no field is called `name`.
    pub fn set_field_value(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        if let Some(field) = self.fields.get_mut(name) {
            field.set_value(value);
        }
        self
    }

    pub fn set_field_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.set_field_value(name.as_ref(), value);
        }
        self
    }

    pub fn fields(&self) -> &IndexMap<String, Element> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.fields.values_mut()
    }

    /// Field name to current value, in field order.
    pub fn to_array(&self) -> IndexMap<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Named access
    // ------------------------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<Value> {
        self.get_field_value(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.set_field_value(name, value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Removes the field, keeping the order of the remaining ones.
    pub fn delete(&mut self, name: &str) -> Option<Element> {
        self.fields.shift_remove(name)
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over a snapshot of [`FieldGroup::to_array`] taken now.
    pub fn iter(&self) -> indexmap::map::IntoIter<String, Value> {
        self.to_array().into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldGroup {
    type Item = &'a Element;
    type IntoIter = indexmap::map::Values<'a, String, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}

impl FromIterator<Element> for FieldGroup {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut group = FieldGroup::new();
        group.add_fields(iter);
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_replace_in_place() {
        let mut group = FieldGroup::new();
        group.add_fields([
            Element::text("a").with_value("1"),
            Element::text("b"),
            Element::text("a").with_value("2"),
        ]);
        assert_eq!(group.count(), 2);
        let names: Vec<_> = group.to_array().into_keys().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(group.get("a"), Some(Value::from("2")));
    }

    #[test]
    fn missing_names_are_ignored() {
        let mut group: FieldGroup = [Element::text("a")].into_iter().collect();
        group.set_field_value("zzz", "x");
        assert_eq!(group.get_field_value("zzz"), None);
        assert_eq!(group.count(), 1);
    }

    #[test]
    fn delete_keeps_order() {
        let mut group: FieldGroup = ["a", "b", "c"].into_iter().map(Element::text).collect();
        assert!(group.delete("b").is_some());
        assert!(group.delete("b").is_none());
        let names: Vec<_> = (&group).into_iter().map(Element::name).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn from_config_keeps_config_order() {
        let config = crate::config::parse_json(
            r#"{"name": {"type": "text", "value": "Ada"}, "bio": {"type": "textarea"}}"#,
        )
        .unwrap();
        let group = FieldGroup::from_config(&config, &mut FieldFactory::new()).unwrap();
        let names: Vec<_> = group.fields().keys().cloned().collect();
        assert_eq!(names, ["name", "bio"]);
        assert_eq!(group.get("name"), Some(Value::from("Ada")));
    }

    #[test]
    fn iteration_is_a_snapshot() {
        let mut group: FieldGroup = [Element::text("a")].into_iter().collect();
        let snapshot = group.iter();
        group.set("a", "changed");
        let values: Vec<_> = snapshot.map(|(_, v)| v).collect();
        assert_eq!(values, [Value::from("")]);
    }
}
