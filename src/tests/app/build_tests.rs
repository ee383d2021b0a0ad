use serde_json::{Value, json};

use crate::app::build::BuildScreen;
use crate::domain::FieldType;

fn mk_screen_with_metadata() -> BuildScreen {
    let mut screen = BuildScreen::new();
    screen.editor.set_value("title", &json!("Survey"));
    screen
        .editor
        .set_value("description", &json!("Quarterly survey"));
    screen
}

fn stage(screen: &mut BuildScreen, name: &str, tag: &str) {
    screen.editor.set_value("field_name", &json!(name));
    screen.editor.set_value("field_label", &json!(name.to_uppercase()));
    screen.editor.set_value("field_type", &json!(tag));
    screen.stage_field().unwrap();
}

#[test]
fn stage_field_reads_the_editor_values() {
    let mut screen = mk_screen_with_metadata();
    screen.editor.set_value("field_name", &json!("email"));
    screen.editor.set_value("field_label", &json!("Email"));
    screen.editor.set_value("field_type", &json!("email"));
    screen.editor.set_value("field_required", &Value::Bool(true));
    screen.editor.set_value("rule_min", &json!("3"));
    screen.stage_field().unwrap();

    let fields = &screen.builder.draft().fields;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "email");
    assert_eq!(fields[0].kind, FieldType::Email);
    assert!(fields[0].required);
    assert_eq!(fields[0].validation.as_ref().unwrap().min, Some(3.0));

    // Draft inputs are blank again, ready for the next field.
    assert_eq!(screen.editor.values()["field_name"], json!(""));
    assert_eq!(screen.editor.values()["field_required"], json!(false));
    // Form metadata survives.
    assert_eq!(screen.editor.values()["title"], json!("Survey"));
}

#[test]
fn staging_an_incomplete_draft_reports_the_problem() {
    let mut screen = mk_screen_with_metadata();
    screen.editor.set_value("field_name", &json!("lonely"));
    let err = screen.stage_field().unwrap_err();
    assert!(err.contains("name, label, and type"));
    assert!(screen.builder.draft().fields.is_empty());
}

#[test]
fn options_input_splits_on_commas() {
    let mut screen = mk_screen_with_metadata();
    screen.editor.set_value("field_name", &json!("color"));
    screen.editor.set_value("field_label", &json!("Color"));
    screen.editor.set_value("field_type", &json!("select"));
    screen
        .editor
        .set_value("field_options", &json!("red, green ,, blue"));
    screen.stage_field().unwrap();
    assert_eq!(
        screen.builder.draft().fields[0].options,
        vec!["red", "green", "blue"]
    );
}

#[test]
fn load_selected_seeds_the_editor() {
    let mut screen = mk_screen_with_metadata();
    stage(&mut screen, "first", "text");
    stage(&mut screen, "second", "number");

    screen.selected = 1;
    screen.load_selected().unwrap();
    assert_eq!(screen.editor.values()["field_name"], json!("second"));
    assert_eq!(screen.editor.values()["field_type"], json!("number"));
    assert_eq!(screen.builder.editing(), Some(1));
}

#[test]
fn move_selected_follows_the_field() {
    let mut screen = mk_screen_with_metadata();
    stage(&mut screen, "a", "text");
    stage(&mut screen, "b", "text");
    stage(&mut screen, "c", "text");

    screen.selected = 2;
    screen.move_selected(-2).unwrap();
    assert_eq!(screen.selected, 0);
    let names: Vec<&str> = screen
        .builder
        .draft()
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn remove_selected_clamps_the_selection() {
    let mut screen = mk_screen_with_metadata();
    stage(&mut screen, "a", "text");
    stage(&mut screen, "b", "text");

    screen.selected = 1;
    screen.remove_selected().unwrap();
    assert_eq!(screen.selected, 0);
    assert_eq!(screen.builder.draft().fields.len(), 1);
}

#[test]
fn finish_requires_metadata() {
    let mut screen = BuildScreen::new();
    screen.editor.set_value("field_name", &json!("a"));
    screen.editor.set_value("field_label", &json!("A"));
    screen.editor.set_value("field_type", &json!("text"));
    screen.stage_field().unwrap();

    assert!(screen.finish().is_err());

    screen.editor.set_value("title", &json!("Survey"));
    screen.editor.set_value("description", &json!("Quarterly"));
    let schema = screen.finish().unwrap();
    assert_eq!(schema.title, "Survey");
    assert_eq!(schema.fields.len(), 1);
}
