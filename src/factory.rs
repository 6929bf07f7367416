//! # Field factory
//!
//! Maps a [`FieldConfig`] record onto the matching [`Element`]. The type tag
//! picks the control; the remaining keys fill in label, value, selection,
//! attributes and validators.
//!
//! Token-backed types (`csrf`, `captcha`) need a [`TokenStore`], supplied
//! through [`FieldFactory::with_token_store`]. The random source is seedable
//! so generated tokens are reproducible in tests.

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::{ConfigValue, FieldConfig, FormConfig};
use crate::config_err;
use crate::diagnostics::{FormError, Result};
use crate::element::{Choice, ChoiceSet, Element, ElementKind, InputType, OptionEntry, SelectValues};
use crate::tokens::TokenStore;
use crate::value::Value;

/// Every type tag [`FieldFactory::create`] accepts.
pub const FIELD_TYPES: &[&str] = &[
    "text",
    "email",
    "url",
    "password",
    "hidden",
    "number",
    "range",
    "date",
    "datetime-local",
    "time",
    "tel",
    "search",
    "color",
    "file",
    "submit",
    "reset",
    "button",
    "textarea",
    "checkbox",
    "radio",
    "checkbox-set",
    "select",
    "csrf",
    "captcha",
];

pub struct FieldFactory<'a> {
    rng: Xoshiro256StarStar,
    tokens: Option<&'a mut dyn TokenStore>,
}

impl Default for FieldFactory<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FieldFactory<'a> {
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256StarStar::from_entropy(),
            tokens: None,
        }
    }

    pub fn with_token_store(store: &'a mut dyn TokenStore) -> Self {
        Self {
            rng: Xoshiro256StarStar::from_entropy(),
            tokens: Some(store),
        }
    }

    /// Replaces the random source with a seeded one.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = Xoshiro256StarStar::seed_from_u64(seed);
        self
    }

    /// Builds every field of `config` in order.
    pub fn create_all(&mut self, config: &FormConfig) -> Result<Vec<Element>> {
        config
            .iter()
            .map(|(name, field)| self.create(name, field))
            .collect()
    }

    /// Builds one element named `name` from its config record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use forma::config::FieldConfig;
    /// use forma::factory::FieldFactory;
    /// let mut factory = FieldFactory::new();
    /// let field = factory.create("bio", &FieldConfig::new("textarea")).unwrap();
    /// assert_eq!(field.type_tag(), "textarea");
    /// assert!(factory.create("x", &FieldConfig::new("slider")).is_err());
    /// ```
    pub fn create(&mut self, name: &str, config: &FieldConfig) -> Result<Element> {
        let tag = config.field_type.as_str();
        let element = match tag {
            "button" => Element::button(name, scalar_value(name, config)?.unwrap_or_else(|| Value::from(""))),
            "textarea" => with_scalar(Element::textarea(name), name, config)?,
            "checkbox" => checkbox(name, config)?,
            "radio" => Element::radio_set(name, choices(name, config)?)
                .with_value(config.selected.clone().unwrap_or_default()),
            "checkbox-set" => Element::checkbox_set(name, choices(name, config)?)
                .with_value(config.selected.clone().unwrap_or_default()),
            "select" => {
                let values = match &config.value {
                    Some(ConfigValue::Options(values)) => values.clone(),
                    Some(ConfigValue::Scalar(_)) => {
                        return Err(config_err!(name, "a select needs a map of options as its value"))
                    }
                    None => SelectValues::new(),
                };
                Element::select(name, &values, config.selected.clone().unwrap_or_default())
            }
            "csrf" => {
                let store = self.tokens.as_deref_mut().ok_or_else(|| missing_store(name, tag))?;
                Element::csrf(name, store, &mut self.rng)
            }
            "captcha" => {
                let store = self.tokens.as_deref_mut().ok_or_else(|| missing_store(name, tag))?;
                Element::captcha(name, store, &mut self.rng)
            }
            other => {
                let input_type = InputType::from_tag(other).ok_or_else(|| FormError::UnknownFieldType {
                    name: name.to_string(),
                    field_type: other.to_string(),
                })?;
                with_scalar(Element::input(name, input_type), name, config)?
            }
        };

        let element = decorate(element, config);
        tracing::debug!(field = name, field_type = tag, "created field");
        Ok(element)
    }
}

/// Applies the keys shared by every field type.
fn decorate(mut element: Element, config: &FieldConfig) -> Element {
    if let Some(label) = &config.label {
        element.set_label(label.as_str());
    }
    if config.required {
        element.set_required(true);
    }
    for (key, value) in &config.attributes {
        element.set_attribute(key.as_str(), value.as_str());
    }
    for validator in &config.validators {
        element.add_validator(validator.clone());
    }
    match &config.hint {
        Some(hint) => element.with_hint(hint.as_str()),
        None => element,
    }
}

fn scalar_value(name: &str, config: &FieldConfig) -> Result<Option<Value>> {
    match &config.value {
        None => Ok(None),
        Some(ConfigValue::Scalar(value)) => Ok(Some(value.clone())),
        Some(ConfigValue::Options(_)) => Err(config_err!(
            name,
            "a '{}' field takes a single value, not a map",
            config.field_type
        )),
    }
}

fn checkbox(name: &str, config: &FieldConfig) -> Result<Element> {
    let mut element = Element::checkbox(name);
    if let Some(value) = scalar_value(name, config)? {
        if let ElementKind::Checkbox { checked_value, .. } = element.kind_mut() {
            *checked_value = value.to_form_string();
        }
    }
    if let Some(selected) = &config.selected {
        element.set_value(selected.clone());
    }
    Ok(element)
}

fn missing_store(name: &str, tag: &str) -> FormError {
    FormError::MissingTokenStore {
        name: name.to_string(),
        field_type: tag.to_string(),
    }
}

fn with_scalar(mut element: Element, name: &str, config: &FieldConfig) -> Result<Element> {
    if let Some(value) = scalar_value(name, config)? {
        element.set_value(value);
    }
    Ok(element)
}

/// Radio and checkbox sets take a flat `label: value` map.
fn choices(name: &str, config: &FieldConfig) -> Result<Vec<Choice>> {
    let values = match &config.value {
        Some(ConfigValue::Options(values)) => values,
        Some(ConfigValue::Scalar(_)) => {
            return Err(config_err!(name, "a '{}' field needs a map of choices", config.field_type))
        }
        None => return Ok(Vec::new()),
    };
    let map: IndexMap<String, Value> = values
        .iter()
        .map(|(label, entry)| match entry {
            OptionEntry::Scalar(value) => Ok((label.clone(), value.clone())),
            _ => Err(config_err!(name, "choice '{}' must be a plain value", label)),
        })
        .collect::<Result<_>>()?;
    Ok(ChoiceSet::choices_from(&map))
}
