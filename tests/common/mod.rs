//! Shared helpers for the integration suites.
#![allow(dead_code)]

use forma::config::{self, FormConfig};
use forma::element::select::{OptionEntry, SelectValues};
use forma::element::Element;
use forma::{FieldFactory, Form, MemoryTokenStore};

pub fn form_config(json: &str) -> FormConfig {
    config::parse_json(json).expect("fixture config should parse")
}

/// Builds a form from a JSON field map with a seeded factory.
pub fn form_from_json(json: &str) -> Form {
    let mut store = MemoryTokenStore::new();
    let mut factory = FieldFactory::with_token_store(&mut store).seeded(11);
    Form::from_config(&form_config(json), &mut factory).expect("fixture form should build")
}

/// `{g1: {x: 1, y: 2}, z: 3}`
pub fn grouped_values() -> SelectValues {
    let mut values = SelectValues::new();
    values.insert("g1".to_string(), OptionEntry::group([("x", 1), ("y", 2)]));
    values.insert("z".to_string(), OptionEntry::scalar(3));
    values
}

pub fn selected_keys(element: &Element) -> Vec<String> {
    match element.kind() {
        forma::ElementKind::Select(select) => select
            .selected_options()
            .into_iter()
            .map(|option| option.key().to_string())
            .collect(),
        other => panic!("expected a select, found {}", other.type_tag()),
    }
}
