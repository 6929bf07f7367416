//! # Forms
//!
//! A [`Form`] owns an ordered list of [`Fieldset`]s and a cursor naming the
//! *current* one. Field lookups and value updates by name address the current
//! fieldset only; whole-form views ([`Form::fields`], [`Form::to_array`],
//! [`Form::is_valid`], [`Form::reset`]) span every fieldset.
//!
//! Adding a field to a form with no fieldset creates one first, so `current`
//! indexes a real fieldset whenever the form holds any.
//!
//! The form action is always explicit. [`Form::default`] uses `"#"` and
//! `post`.

use std::fmt;

use indexmap::IndexMap;

use crate::config::{FieldsetConfig, FormConfig, FormDocument};
use crate::diagnostics::Result;
use crate::dom::Node;
use crate::element::{Element, MULTI_VALUE_SUFFIX};
use crate::factory::FieldFactory;
use crate::fieldset::Fieldset;
use crate::tokens::{TokenStore, CAPTCHA_KEY, CSRF_KEY};
use crate::value::Value;

/// Id and class given to a form that has none.
pub const DEFAULT_FORM_ID: &str = "forma-form";

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    fieldsets: Vec<Fieldset>,
    current: usize,
    attributes: IndexMap<String, String>,
}

impl Default for Form {
    fn default() -> Self {
        Form::new("#", "post")
    }
}

impl Form {
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert("action".to_string(), action.into());
        attributes.insert("method".to_string(), method.into());
        Self {
            fieldsets: Vec::new(),
            current: 0,
            attributes,
        }
    }

    pub fn with_fields(
        fields: impl IntoIterator<Item = Element>,
        action: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        let mut form = Form::new(action, method);
        form.add_fields(fields);
        form
    }

    /// Builds a single-fieldset form from a field name to config map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use forma::config;
    /// use forma::factory::FieldFactory;
    /// use forma::form::Form;
    /// let config = config::parse_json(r#"{
    ///     "username": {"type": "text", "required": true},
    ///     "submit": {"type": "submit", "value": "Go"}
    /// }"#).unwrap();
    /// let form = Form::from_config(&config, &mut FieldFactory::new()).unwrap();
    /// assert_eq!(form.count(), 2);
    /// ```
    pub fn from_config(config: &FormConfig, factory: &mut FieldFactory<'_>) -> Result<Self> {
        let mut form = Form::default();
        form.add_fields(factory.create_all(config)?);
        tracing::debug!(fields = form.count(), "built form from config");
        Ok(form)
    }

    /// Builds one fieldset per entry, in order, each with its legend.
    pub fn from_fieldset_config(configs: &[FieldsetConfig], factory: &mut FieldFactory<'_>) -> Result<Self> {
        let mut form = Form::default();
        for config in configs {
            let fields = factory.create_all(&config.fields)?;
            form.create_fieldset(config.legend.as_deref()).add_fields(fields);
        }
        tracing::debug!(
            fieldsets = form.fieldsets.len(),
            fields = form.count(),
            "built form from fieldset config"
        );
        Ok(form)
    }

    pub fn from_document(document: &FormDocument, factory: &mut FieldFactory<'_>) -> Result<Self> {
        match document {
            FormDocument::Fields(config) => Form::from_config(config, factory),
            FormDocument::Fieldsets(configs) => Form::from_fieldset_config(configs, factory),
        }
    }

    // ========================================================================
    // ATTRIBUTES
    // ========================================================================

    pub fn action(&self) -> &str {
        self.attribute("action").unwrap_or_default()
    }

    pub fn set_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.set_attribute("action", action)
    }

    pub fn method(&self) -> &str {
        self.attribute("method").unwrap_or_default()
    }

    pub fn set_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.set_attribute("method", method)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    // ========================================================================
    // FIELDSETS
    // ========================================================================

    /// Creates a fieldset, appends it and makes it current.
    ///
    /// The fieldset is numbered from 1 and named after the form:
    /// `<form-id>-fieldset-<n>` with class `<form-class>-fieldset`.
    pub fn create_fieldset(&mut self, legend: Option<&str>) -> &mut Fieldset {
        let number = self.fieldsets.len() + 1;
        let id = self.attribute("id").unwrap_or(DEFAULT_FORM_ID);
        let class = self.attribute("class").unwrap_or(DEFAULT_FORM_ID);

        let mut fieldset = Fieldset::new();
        fieldset
            .set_attribute("id", format!("{}-fieldset-{}", id, number))
            .set_attribute("class", format!("{}-fieldset", class));
        if let Some(legend) = legend {
            fieldset.set_legend(legend);
        }
        self.add_fieldset(fieldset);
        &mut self.fieldsets[self.current]
    }

    pub fn add_fieldset(&mut self, fieldset: Fieldset) -> &mut Self {
        self.fieldsets.push(fieldset);
        self.current = self.fieldsets.len() - 1;
        self
    }

    /// Removes the fieldset at `index` if there is one, then clamps
    /// `current` back into range (0 for a form left without fieldsets).
    pub fn remove_fieldset(&mut self, index: usize) -> Option<Fieldset> {
        let removed = (index < self.fieldsets.len()).then(|| self.fieldsets.remove(index));
        if self.current >= self.fieldsets.len() {
            self.current = self.fieldsets.len().saturating_sub(1);
        }
        removed
    }

    pub fn fieldsets(&self) -> &[Fieldset] {
        &self.fieldsets
    }

    /// The current fieldset.
    pub fn fieldset(&self) -> Option<&Fieldset> {
        self.fieldsets.get(self.current)
    }

    pub fn fieldset_mut(&mut self) -> Option<&mut Fieldset> {
        self.fieldsets.get_mut(self.current)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves the cursor to `index`, creating a fieldset when `index` is
    /// past the end. The created fieldset is appended, so the cursor then
    /// points at the new last position.
    pub fn set_current(&mut self, index: usize) -> &mut Self {
        if index < self.fieldsets.len() {
            self.current = index;
        } else {
            self.create_fieldset(None);
        }
        self
    }

    /// Legend of the current fieldset.
    pub fn legend(&self) -> Option<&str> {
        self.fieldset().and_then(Fieldset::legend)
    }

    pub fn set_legend(&mut self, legend: impl Into<String>) -> &mut Self {
        self.current_or_new().set_legend(legend);
        self
    }

    fn current_or_new(&mut self) -> &mut Fieldset {
        if self.fieldsets.is_empty() {
            self.create_fieldset(None);
        }
        &mut self.fieldsets[self.current]
    }

    // ========================================================================
    // FIELDS IN THE CURRENT FIELDSET
    // ========================================================================

    pub fn add_field(&mut self, field: Element) -> &mut Self {
        self.current_or_new().add_field(field);
        self
    }

    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = Element>) -> &mut Self {
        self.current_or_new().add_fields(fields);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Element> {
        self.fieldset()?.get_field(name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.fieldset_mut()?.get_field_mut(name)
    }

    pub fn get_field_value(&self, name: &str) -> Option<Value> {
        self.fieldset()?.get_field_value(name)
    }

    pub fn set_field_value(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        if let Some(fieldset) = self.fieldset_mut() {
            fieldset.set_field_value(name, value);
        }
        self
    }

    pub fn set_field_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        if let Some(fieldset) = self.fieldset_mut() {
            fieldset.set_field_values(values);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.get_field_value(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.set_field_value(name, value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.fieldset().map_or(false, |f| f.has(name))
    }

    pub fn delete(&mut self, name: &str) -> Option<Element> {
        self.fieldset_mut()?.delete(name)
    }

    /// Errors recorded on a field of the current fieldset.
    pub fn get_errors(&self, name: &str) -> Option<&[String]> {
        self.get_field(name).map(Element::errors)
    }

    // ========================================================================
    // WHOLE-FORM VIEWS
    // ========================================================================

    fn all_fields(&self) -> impl Iterator<Item = &Element> {
        self.fieldsets.iter().flat_map(|fieldset| fieldset.fields().values())
    }

    fn all_fields_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.fieldsets.iter_mut().flat_map(|fieldset| fieldset.fields_mut())
    }

    /// Every field of every fieldset keyed by name.
    pub fn fields(&self) -> IndexMap<&str, &Element> {
        self.all_fields().map(|field| (field.name(), field)).collect()
    }

    pub fn to_array(&self) -> IndexMap<String, Value> {
        self.all_fields()
            .map(|field| (field.name().to_string(), field.value()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.fieldsets.iter().map(|fieldset| fieldset.count()).sum()
    }

    pub fn iter(&self) -> indexmap::map::IntoIter<String, Value> {
        self.to_array().into_iter()
    }

    /// Validates every field of every fieldset. All fields run, so each one
    /// carries its own errors afterwards.
    pub fn is_valid(&mut self) -> bool {
        let mut valid = true;
        for field in self.all_fields_mut() {
            valid &= field.validate();
        }
        tracing::debug!(valid, "validated form");
        valid
    }

    /// Errors per field, for fields that have any. Multi-value names are
    /// reported without their `[]` suffix.
    pub fn get_all_errors(&self) -> IndexMap<String, Vec<String>> {
        self.all_fields()
            .filter(|field| field.has_errors())
            .map(|field| {
                let name = field.name();
                let key = name.strip_suffix(MULTI_VALUE_SUFFIX).unwrap_or(name);
                (key.to_string(), field.errors().to_vec())
            })
            .collect()
    }

    pub fn reset(&mut self) -> &mut Self {
        for field in self.all_fields_mut() {
            field.reset_value();
        }
        self
    }

    /// Forgets the CSRF token and captcha answer held by `store`.
    pub fn clear_tokens(&mut self, store: &mut dyn TokenStore) -> &mut Self {
        store.clear(CSRF_KEY);
        store.clear(CAPTCHA_KEY);
        tracing::debug!("cleared form tokens");
        self
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Fills in `id` and `class` when they are absent and returns the form
    /// tree built from the current state of every fieldset.
    pub fn prepare(&mut self) -> Node {
        for key in ["id", "class"] {
            if !self.attributes.contains_key(key) {
                self.attributes.insert(key.to_string(), DEFAULT_FORM_ID.to_string());
            }
        }
        self.to_node()
    }

    /// The form tree, using the default id and class where none is set.
    pub fn to_node(&self) -> Node {
        let mut node = Node::new("form");
        node.set_attributes(self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        for key in ["id", "class"] {
            if !node.has_attribute(key) {
                node.set_attribute(key, DEFAULT_FORM_ID);
            }
        }
        node.add_children(self.fieldsets.iter().map(Fieldset::prepare));
        node
    }

    pub fn render(&mut self, depth: usize, indent: Option<&str>) -> String {
        self.prepare().render(depth, indent)
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_node().render(0, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::MemoryTokenStore;

    #[test]
    fn adding_a_field_creates_a_fieldset() {
        let mut form = Form::default();
        assert!(form.fieldset().is_none());
        form.add_field(Element::text("a"));
        assert_eq!(form.fieldsets().len(), 1);
        assert_eq!(form.fieldsets()[0].attribute("id"), Some("forma-form-fieldset-1"));
        assert_eq!(form.fieldsets()[0].attribute("class"), Some("forma-form-fieldset"));
    }

    #[test]
    fn fieldset_names_follow_form_id() {
        let mut form = Form::new("/login", "post");
        form.set_attribute("id", "login").set_attribute("class", "auth");
        form.create_fieldset(Some("One"));
        form.create_fieldset(None);
        assert_eq!(form.fieldsets()[1].attribute("id"), Some("login-fieldset-2"));
        assert_eq!(form.fieldsets()[1].attribute("class"), Some("auth-fieldset"));
        assert_eq!(form.current(), 1);
    }

    #[test]
    fn set_current_past_end_creates_fieldset() {
        let mut form = Form::default();
        form.create_fieldset(None);
        form.set_current(5);
        assert_eq!(form.fieldsets().len(), 2);
        assert_eq!(form.current(), 1);
        form.set_current(0);
        assert_eq!(form.current(), 0);
    }

    #[test]
    fn lookups_use_current_fieldset() {
        let mut form = Form::default();
        form.add_field(Element::text("a"));
        form.create_fieldset(None).add_field(Element::text("b"));
        assert!(form.has("b"));
        assert!(!form.has("a"));
        assert_eq!(form.count(), 2);
        assert_eq!(form.to_array().len(), 2);
    }

    #[test]
    fn prepare_fills_only_missing_attributes() {
        let mut form = Form::default();
        form.set_attribute("id", "custom");
        form.prepare();
        assert_eq!(form.attribute("id"), Some("custom"));
        assert_eq!(form.attribute("class"), Some(DEFAULT_FORM_ID));
    }

    #[test]
    fn clear_tokens_empties_store() {
        let mut store = MemoryTokenStore::new();
        store.set(CSRF_KEY, "x".into());
        store.set(CAPTCHA_KEY, "7".into());
        Form::default().clear_tokens(&mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn errors_strip_multi_value_suffix() {
        let mut form = Form::default();
        form.add_field(Element::checkbox_set("tags[]", vec![]).required(true));
        assert!(!form.is_valid());
        assert!(form.get_all_errors().contains_key("tags"));
    }
}
