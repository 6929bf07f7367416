mod common;

use common::{grouped_values, selected_keys};
use forma::element::select::{select_values, OptionEntry, Select, SelectValues};
use forma::{Element, Value};

#[test]
fn flat_select_marks_single_option() {
    let mut select = Select::new(&select_values([("a", 1), ("b", 2)]), Value::Null);
    select.set_value(2);
    let selected: Vec<_> = select.options().filter(|o| o.is_selected()).map(|o| o.key()).collect();
    assert_eq!(selected, ["b"]);
    assert_eq!(select.value(), &Value::from(2));
}

#[test]
fn grouped_select_marks_option_inside_group() {
    let mut field = Element::select("pick", &grouped_values(), Value::Null);
    field.set_value(2);
    assert_eq!(selected_keys(&field), ["y"]);
}

#[test]
fn string_and_number_compare_loosely() {
    let mut field = Element::select("pick", &select_values([("one", 1), ("two", 2)]), Value::Null);
    field.set_value("2");
    assert_eq!(selected_keys(&field), ["two"]);
    field.set_value(1.0);
    assert_eq!(selected_keys(&field), ["one"]);
}

#[test]
fn reset_deselects_everything() {
    let mut field = Element::select("pick", &grouped_values(), Value::Null);
    field.set_value(3);
    field.reset_value();
    assert!(selected_keys(&field).is_empty());
    assert_eq!(field.value(), Value::Null);
}

#[test]
fn setting_null_is_a_reset() {
    let mut field = Element::select("pick", &grouped_values(), Value::Null);
    field.set_value(1);
    field.set_value(Value::Null);
    assert!(selected_keys(&field).is_empty());
}

#[test]
fn duplicate_values_select_every_match() {
    let mut values = SelectValues::new();
    values.insert("g1".to_string(), OptionEntry::group([("x", 1)]));
    values.insert("g2".to_string(), OptionEntry::group([("w", 1)]));
    let mut field = Element::select("pick", &values, Value::Null);
    field.set_value(1);
    assert_eq!(selected_keys(&field), ["x", "w"]);
}

#[test]
fn mixed_shapes_from_yaml() {
    let values: SelectValues = serde_yaml::from_str(
        r#"
plain: 1
fruit:
  apple: 10
  pear: 11
fancy:
  value: 2
  attributes:
    class: highlight
"#,
    )
    .unwrap();
    let field = Element::select("pick", &values, Value::Null);
    let html = field.render(0, None);
    assert!(html.contains("<optgroup label=\"fruit\">"));
    assert!(html.contains("<option value=\"10\">apple</option>"));
    assert!(html.contains("<option value=\"2\" class=\"highlight\">fancy</option>"));
}

#[test]
fn selected_option_renders_attribute() {
    let mut field = Element::select("color", &select_values([("Red", "r"), ("Blue", "b")]), Value::Null);
    field.set_value("b");
    let html = field.render(0, None);
    assert!(html.contains("<option value=\"b\" selected=\"selected\">Blue</option>"));
    assert!(html.contains("<option value=\"r\">Red</option>"));
}
