use forma::config::FieldConfig;
use forma::tokens::{CAPTCHA_KEY, CSRF_KEY};
use forma::{FieldFactory, Form, MemoryTokenStore, TokenStore};

fn guarded_form(store: &mut MemoryTokenStore, seed: u64) -> Form {
    let mut factory = FieldFactory::with_token_store(store).seeded(seed);
    let mut form = Form::new("/transfer", "post");
    form.add_field(factory.create("token", &FieldConfig::new("csrf")).unwrap())
        .add_field(factory.create("human", &FieldConfig::new("captcha")).unwrap());
    form
}

#[test]
fn csrf_and_captcha_round_trip() {
    let mut store = MemoryTokenStore::new();
    let mut form = guarded_form(&mut store, 1);
    let token = store.get(CSRF_KEY).unwrap();
    let answer = store.get(CAPTCHA_KEY).unwrap();

    form.set_field_values([("token", "forged"), ("human", answer.as_str())]);
    assert!(!form.is_valid());
    assert!(form.get_all_errors().contains_key("token"));
    assert!(!form.get_all_errors().contains_key("human"));

    form.set_field_values([("token", token.as_str()), ("human", answer.as_str())]);
    assert!(form.is_valid());
}

#[test]
fn csrf_token_is_stable_until_cleared() {
    let mut store = MemoryTokenStore::new();
    let mut first = guarded_form(&mut store, 1);
    let token = store.get(CSRF_KEY).unwrap();
    let _second = guarded_form(&mut store, 2);
    assert_eq!(store.get(CSRF_KEY), Some(token.clone()));

    first.clear_tokens(&mut store);
    assert!(store.get(CSRF_KEY).is_none());
    assert!(store.get(CAPTCHA_KEY).is_none());

    let _third = guarded_form(&mut store, 3);
    assert_ne!(store.get(CSRF_KEY), Some(token));
}

#[test]
fn captcha_renders_question_label() {
    let mut store = MemoryTokenStore::new();
    let form = guarded_form(&mut store, 4);
    let html = form.to_string();
    assert!(html.contains("What is "));
    assert!(html.contains("type=\"hidden\" name=\"token\""));
}
