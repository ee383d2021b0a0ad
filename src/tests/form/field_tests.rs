use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use crate::domain::{FieldSchema, FieldType};
use crate::form::{FieldInput, FieldState, Touch};

fn mk_field(kind: FieldType) -> FieldState {
    mk_named_field(kind, "answer")
}

fn mk_named_field(kind: FieldType, name: &str) -> FieldState {
    let options = if kind.is_option_backed() {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    } else {
        Vec::new()
    };
    FieldState::from_schema(FieldSchema {
        id: name.to_string(),
        name: name.to_string(),
        label: name.to_string(),
        kind,
        placeholder: None,
        required: false,
        options,
        order: 0,
        validation: None,
    })
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn text_input_edits_buffer() {
    let mut field = mk_field(FieldType::Text);
    assert!(field.handle_key(&key(KeyCode::Char('h'))));
    assert!(field.handle_key(&key(KeyCode::Char('i'))));
    assert_eq!(field.current_value(), json!("hi"));
    assert!(field.handle_key(&key(KeyCode::Backspace)));
    assert_eq!(field.current_value(), json!("h"));
    assert!(field.handle_key(&key(KeyCode::Delete)));
    assert_eq!(field.current_value(), json!(""));
}

#[test]
fn control_chords_are_not_text() {
    let mut field = mk_field(FieldType::Text);
    let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert!(!field.handle_key(&chord));
    assert_eq!(field.current_value(), json!(""));
    assert_eq!(field.touch, Touch::Untouched);
}

#[test]
fn select_cycles_through_sentinel() {
    let mut field = mk_field(FieldType::Select);
    // Starts unselected, submitting the empty sentinel.
    assert_eq!(field.current_value(), json!(""));
    assert!(field.handle_key(&key(KeyCode::Down)));
    assert_eq!(field.current_value(), json!("A"));
    assert!(field.handle_key(&key(KeyCode::Down)));
    assert!(field.handle_key(&key(KeyCode::Down)));
    assert_eq!(field.current_value(), json!("C"));
    // Past the last option wraps back to unselected.
    assert!(field.handle_key(&key(KeyCode::Down)));
    assert_eq!(field.current_value(), json!(""));
    assert!(field.handle_key(&key(KeyCode::Up)));
    assert_eq!(field.current_value(), json!("C"));
}

#[test]
fn multiselect_preserves_toggle_order() {
    let mut field = mk_field(FieldType::MultiSelect);
    assert!(field.toggle_choice("A"));
    assert!(field.toggle_choice("B"));
    assert_eq!(field.current_value(), json!(["A", "B"]));
    assert!(field.toggle_choice("A"));
    assert_eq!(field.current_value(), json!(["B"]));
    assert!(!field.toggle_choice("missing"));
}

#[test]
fn multiselect_space_toggles_at_cursor() {
    let mut field = mk_field(FieldType::MultiSelect);
    assert!(field.handle_key(&key(KeyCode::Char(' '))));
    assert_eq!(field.current_value(), json!(["A"]));
    field.handle_key(&key(KeyCode::Down));
    assert!(field.handle_key(&key(KeyCode::Char(' '))));
    assert_eq!(field.current_value(), json!(["A", "B"]));
}

#[test]
fn toggle_flips_to_the_logical_value() {
    let mut field = mk_field(FieldType::Switch);
    assert_eq!(field.current_value(), json!(false));
    assert!(field.handle_key(&key(KeyCode::Char(' '))));
    assert_eq!(field.current_value(), json!(true));
    assert!(field.handle_key(&key(KeyCode::Left)));
    assert_eq!(field.current_value(), json!(false));
}

#[test]
fn radio_accepts_no_input() {
    let mut field = mk_field(FieldType::Radio);
    assert_eq!(field.input, FieldInput::Static);
    assert!(!field.handle_key(&key(KeyCode::Down)));
    assert!(!field.handle_key(&key(KeyCode::Char(' '))));
    assert_eq!(field.current_value(), Value::Null);
}

#[test]
fn unknown_type_is_inert() {
    let mut field = mk_field(FieldType::Unknown("hologram".to_string()));
    assert_eq!(field.input, FieldInput::Static);
    assert!(!field.handle_key(&key(KeyCode::Char('x'))));
    assert_eq!(field.current_value(), Value::Null);
}

#[test]
fn touch_machine_enters_touched_on_first_edit() {
    let mut field = mk_field(FieldType::Text);
    field.schema.required = true;
    assert_eq!(field.touch, Touch::Untouched);
    assert!(field.error.is_none());

    field.handle_key(&key(KeyCode::Char('a')));
    assert_eq!(field.touch, Touch::Touched);
    assert!(field.error.is_none());

    // Emptying a required field flips it to invalid on the same edit.
    field.handle_key(&key(KeyCode::Backspace));
    assert_eq!(field.error.as_deref(), Some("answer is required"));
}

#[test]
fn blur_touches_and_validates() {
    let mut field = mk_field(FieldType::Text);
    field.schema.required = true;
    field.blur();
    assert_eq!(field.touch, Touch::Touched);
    assert_eq!(field.error.as_deref(), Some("answer is required"));
}

#[test]
fn reset_returns_to_pristine() {
    let mut field = mk_field(FieldType::Text);
    field.schema.required = true;
    field.handle_key(&key(KeyCode::Char('a')));
    field.handle_key(&key(KeyCode::Backspace));
    assert!(field.is_invalid());
    field.reset();
    assert_eq!(field.touch, Touch::Untouched);
    assert!(field.error.is_none());
    assert_eq!(field.current_value(), json!(""));
}

#[test]
fn seed_restores_previous_values() {
    let mut select = mk_field(FieldType::Select);
    select.seed(&json!("B"));
    assert_eq!(select.current_value(), json!("B"));

    let mut multi = mk_field(FieldType::MultiSelect);
    multi.seed(&json!(["C", "A", "bogus"]));
    assert_eq!(multi.current_value(), json!(["C", "A"]));

    let mut toggle = mk_field(FieldType::Checkbox);
    toggle.seed(&json!(true));
    assert_eq!(toggle.current_value(), json!(true));
}
