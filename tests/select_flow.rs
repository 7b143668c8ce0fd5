use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;

use chooser::{
    resolve_fallback, ChoiceKeys, ChoiceSummary, JsonFileResolver, Select, SelectConfig,
    SelectEvent, SelectKey,
};

fn countries() -> Vec<Value> {
    vec![
        json!({"id": "fr", "name": "France", "flag": "#0055a4"}),
        json!({"id": "de", "name": "Germany", "flag": "#ffce00"}),
        json!({"id": "ci", "name": "Côte d'Ivoire", "flag": "#f77f00"}),
        json!({"id": "cm", "name": "Cameroon", "flag": "#007a5e"}),
        json!({"id": "ca", "name": "Canada", "flag": "#ff0000"}),
    ]
}

fn config(multiple: bool) -> SelectConfig {
    SelectConfig {
        multiple,
        keys: ChoiceKeys {
            value: "id".into(),
            label: "name".into(),
            color: Some("flag".into()),
        },
        ..SelectConfig::default()
    }
}

fn labels(select: &Select) -> Vec<String> {
    select
        .options()
        .filtered()
        .items()
        .iter()
        .map(|(_, choice)| choice.label().clone())
        .collect()
}

#[test]
fn keyboard_session_in_multiple_mode() {
    let mut select = Select::new(config(true));
    select.set_options(Some(countries()));

    select.filter_input("cote");
    assert!(select.is_open());
    assert_eq!(labels(&select), vec!["Côte d'Ivoire".to_string()]);

    assert!(select.handle_key(SelectKey::Enter).is_ok());
    assert!(!select.is_open());
    assert_eq!(select.filter_term(), "");

    select.filter_input("ca");
    assert!(select.handle_key(SelectKey::Down).is_ok());
    assert_eq!(
        select.options().highlighted().map(|(_, choice)| choice.label().clone()),
        Some("Canada".to_string())
    );
    assert!(select.handle_key(SelectKey::Enter).is_ok());

    assert_eq!(select.value(), json!(["ci", "ca"]));

    let events = select.take_events();
    assert_eq!(events.first(), Some(&SelectEvent::Opened));
    assert!(events.contains(&SelectEvent::Selected(ChoiceSummary {
        label: "Canada".into(),
        value: "ca".into(),
    })));

    assert!(select.handle_key(SelectKey::Backspace).is_ok());
    assert_eq!(select.value(), json!(["ci"]));
    assert_eq!(select.filter_term(), "Canada ");
}

#[test]
fn options_replaced_while_a_value_is_held() {
    let mut select = Select::new(config(false));

    assert!(select.write_value(&json!("de")).is_ok());
    select.set_options(None);
    assert_eq!(select.value(), json!("de"));

    select.set_options(Some(countries()));
    assert_eq!(select.value(), json!("de"));
    assert_eq!(
        select.take_events(),
        vec![SelectEvent::ValueChanged(json!("de"))]
    );

    select.set_options(Some(countries()[..2].to_vec()));
    assert_eq!(select.value(), json!("de"));
    assert!(select.take_events().is_empty());
}

#[tokio::test]
async fn unknown_value_is_resolved_from_a_file() {
    let path = std::env::temp_dir().join(format!(
        "chooser-select-flow-{}.json",
        std::process::id()
    ));
    let written = std::fs::File::create(&path)
        .and_then(|mut file| file.write_all(br#"{"jp": "Japan"}"#));
    assert!(written.is_ok());

    let mut select = Select::new(config(true));
    select.set_options(Some(countries()));
    assert!(select.write_value(&json!(["jp"])).is_ok());
    assert_eq!(select.value(), json!([]));

    let resolver = JsonFileResolver::new(path.clone());
    for request in select.take_fallback_requests() {
        let resolution = resolve_fallback(&resolver, request).await;
        assert!(select.apply_fallback(resolution));
    }

    assert_eq!(select.value(), json!(["jp"]));
    assert_eq!(
        select
            .options()
            .selection()
            .iter()
            .map(|choice| (choice.label().as_str(), choice.inactive()))
            .collect::<Vec<_>>(),
        vec![("Japan", true)]
    );

    let _ = std::fs::remove_file(path);
}
