use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use crate::domain::{FieldSchema, FieldType, FormSchema, ValidationRules};
use crate::form::{FormEngine, SubmitBlocked, SubmitOutcome, SubmitStatus, Touch};

fn mk_schema() -> FormSchema {
    FormSchema {
        id: "form-1".to_string(),
        title: "Feedback".to_string(),
        description: "Tell us".to_string(),
        fields: vec![
            FieldSchema {
                id: "1".to_string(),
                name: "full_name".to_string(),
                label: "Full Name".to_string(),
                kind: FieldType::Text,
                placeholder: None,
                required: true,
                options: Vec::new(),
                order: 0,
                validation: None,
            },
            FieldSchema {
                id: "2".to_string(),
                name: "rating".to_string(),
                label: "Rating".to_string(),
                kind: FieldType::Number,
                placeholder: None,
                required: false,
                options: Vec::new(),
                order: 1,
                validation: Some(ValidationRules {
                    min: Some(1.0),
                    max: Some(10.0),
                    ..Default::default()
                }),
            },
            FieldSchema {
                id: "3".to_string(),
                name: "subscribe".to_string(),
                label: "Subscribe".to_string(),
                kind: FieldType::Switch,
                placeholder: None,
                required: false,
                options: Vec::new(),
                order: 2,
                validation: None,
            },
        ],
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn value_map_tracks_schema_order() {
    let engine = FormEngine::new(mk_schema());
    let keys: Vec<&String> = engine.values().keys().collect();
    assert_eq!(keys, vec!["full_name", "rating", "subscribe"]);
}

#[test]
fn edits_update_a_single_key() {
    let mut engine = FormEngine::new(mk_schema());
    engine.handle_key(&key(KeyCode::Char('Z')));
    assert_eq!(engine.values()["full_name"], json!("Z"));
    assert_eq!(engine.values()["rating"], json!(""));
}

#[test]
fn focus_change_blurs_the_departing_field() {
    let mut engine = FormEngine::new(mk_schema());
    engine.focus_next();
    let first = &engine.fields()[0];
    assert_eq!(first.touch, Touch::Touched);
    // Required and empty, so the blur surfaced the error.
    assert_eq!(first.error.as_deref(), Some("Full Name is required"));
    assert_eq!(engine.focus(), 1);
}

#[test]
fn submit_is_blocked_while_fields_are_invalid() {
    let mut engine = FormEngine::new(mk_schema());
    engine.set_value("rating", &json!("15"));
    let blocked = engine.begin_submit().unwrap_err();
    assert_eq!(blocked, SubmitBlocked::Invalid(2));
    // A blocked attempt touches everything so all errors are visible.
    assert!(
        engine
            .fields()
            .iter()
            .all(|field| field.touch == Touch::Touched)
    );
    assert_eq!(engine.status(), SubmitStatus::Idle);
}

#[test]
fn successful_submit_cycle_resets_values() {
    let mut engine = FormEngine::new(mk_schema());
    engine.set_value("full_name", &json!("Ada"));
    engine.set_value("rating", &json!("7"));

    let payload = engine.begin_submit().unwrap();
    assert_eq!(payload.form_id, "form-1");
    assert_eq!(payload.data["full_name"], json!("Ada"));
    assert_eq!(engine.status(), SubmitStatus::Submitting);

    // No second submission while one is in flight.
    assert_eq!(engine.begin_submit().unwrap_err(), SubmitBlocked::InFlight);

    engine.finish_submit(Ok(()));
    assert_eq!(engine.status(), SubmitStatus::Idle);
    assert_eq!(engine.outcome(), Some(&SubmitOutcome::Success));
    assert_eq!(engine.values()["full_name"], json!(""));
    assert!(engine.fields().iter().all(|f| f.touch == Touch::Untouched));
}

#[test]
fn failed_submit_retains_entered_values() {
    let mut engine = FormEngine::new(mk_schema());
    engine.set_value("full_name", &json!("Ada"));
    let _ = engine.begin_submit().unwrap();
    engine.finish_submit(Err("server fell over".to_string()));

    assert_eq!(
        engine.outcome(),
        Some(&SubmitOutcome::Failed("server fell over".to_string()))
    );
    assert_eq!(engine.values()["full_name"], json!("Ada"));
    // And the user may retry.
    assert!(engine.begin_submit().is_ok());
}

#[test]
fn unnamed_fields_share_the_empty_key() {
    let mut schema = mk_schema();
    schema.fields[0].name = String::new();
    schema.fields[0].required = false;
    let engine = FormEngine::new(schema);
    assert!(engine.values().contains_key(""));
}

#[test]
fn seeding_prepopulates_the_map() {
    let mut engine = FormEngine::new(mk_schema());
    let mut values = crate::domain::ValueMap::new();
    values.insert("full_name".to_string(), json!("Grace"));
    values.insert("subscribe".to_string(), json!(true));
    engine.seed(&values);
    assert_eq!(engine.values()["full_name"], json!("Grace"));
    assert_eq!(engine.values()["subscribe"], json!(true));
}

#[test]
fn builder_round_trip_preserves_order() {
    use crate::form::{FieldDraft, FormBuilder};

    let mut builder = FormBuilder::new();
    builder.set_title("Trip".to_string());
    builder.set_description("Round".to_string());
    for name in ["first", "second", "third"] {
        builder
            .add_field(FieldDraft {
                name: name.to_string(),
                label: name.to_string(),
                kind: Some(FieldType::Text),
                ..Default::default()
            })
            .unwrap();
    }
    let schema = builder.finish().unwrap();
    let engine = FormEngine::new(schema);
    let keys: Vec<&String> = engine.values().keys().collect();
    assert_eq!(keys, vec!["first", "second", "third"]);
    let orders: Vec<usize> = engine.fields().iter().map(|f| f.schema.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}
