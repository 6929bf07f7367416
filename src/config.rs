//! # Field configuration
//!
//! Serde models for configuration-driven forms, plus loaders for JSON and
//! YAML documents. A document is either a map of field name to
//! [`FieldConfig`] (one fieldset) or a list of [`FieldsetConfig`]s.
//!
//! ```yaml
//! username:
//!   type: text
//!   label: "Username:"
//!   required: true
//!   validators:
//!     - rule: min_length
//!       length: 3
//! color:
//!   type: select
//!   value: { Red: r, Green: g }
//!   selected: g
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{FormError, Result};
use crate::element::SelectValues;
use crate::validation::Validator;
use crate::value::Value;

/// Ordered field name to config map.
pub type FormConfig = IndexMap<String, FieldConfig>;

/// One field record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// A plain value, or the option map of a select, radio or checkbox set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConfigValue>,
    #[serde(default, alias = "checked", alias = "marked", skip_serializing_if = "Option::is_none")]
    pub selected: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FieldConfig {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Scalar(Value),
    Options(SelectValues),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldsetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    pub fields: FormConfig,
}

/// A whole configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormDocument {
    Fieldsets(Vec<FieldsetConfig>),
    Fields(FormConfig),
}

// ============================================================================
// LOADING
// ============================================================================

/// File extensions [`load`] understands.
pub const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

pub fn parse_json(source: &str) -> Result<FormConfig> {
    Ok(serde_json::from_str(source)?)
}

pub fn parse_yaml(source: &str) -> Result<FormConfig> {
    Ok(serde_yaml::from_str(source)?)
}

pub fn is_config_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| CONFIG_EXTENSIONS.contains(&ext))
}

/// Reads a configuration document, choosing the format from the extension.
pub fn load(path: &Path) -> Result<FormDocument> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    if !CONFIG_EXTENSIONS.contains(&extension) {
        return Err(FormError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    let source = fs::read_to_string(path).map_err(|source| FormError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = if extension == "json" {
        serde_json::from_str(&source)?
    } else {
        serde_yaml::from_str(&source)?
    };
    tracing::debug!(path = %path.display(), "loaded form config");
    Ok(document)
}

/// Reads a flat `name -> value` map of submitted values from JSON.
pub fn parse_values(source: &str) -> Result<IndexMap<String, Value>> {
    Ok(serde_json::from_str(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;

    #[test]
    fn yaml_field_records() {
        let config = parse_yaml(
            r#"
username:
  type: text
  required: true
  validators:
    - rule: min_length
      length: 3
      message: Too short
agree:
  type: checkbox
  checked: true
"#,
        )
        .unwrap();
        let username = &config["username"];
        assert!(username.required);
        assert_eq!(username.validators[0].rule(), &Rule::MinLength { length: 3 });
        assert_eq!(username.validators[0].message(), "Too short");
        assert_eq!(config["agree"].selected, Some(Value::Bool(true)));
    }

    #[test]
    fn option_maps_and_scalars() {
        let config = parse_json(
            r#"{"color": {"type": "select", "value": {"Red": "r"}}, "go": {"type": "submit", "value": "Go"}}"#,
        )
        .unwrap();
        assert!(matches!(config["color"].value, Some(ConfigValue::Options(_))));
        assert_eq!(config["go"].value, Some(ConfigValue::Scalar(Value::from("Go"))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_json(r#"{"a": {"type": "text", "lable": "A"}}"#).is_err());
    }

    #[test]
    fn documents_with_fieldsets() {
        let document: FormDocument = serde_json::from_str(
            r#"[{"legend": "One", "fields": {"a": {"type": "text"}}}, {"fields": {}}]"#,
        )
        .unwrap();
        let FormDocument::Fieldsets(fieldsets) = document else {
            panic!("expected fieldsets");
        };
        assert_eq!(fieldsets.len(), 2);
        assert_eq!(fieldsets[0].legend.as_deref(), Some("One"));
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let err = load(Path::new("form.toml")).unwrap_err();
        assert!(matches!(err, FormError::UnsupportedFormat { .. }));
    }
}
