use serde_json::json;

use crate::domain::{FieldSchema, FieldType, FormSchema};

fn mk_form(names: &[&str]) -> FormSchema {
    FormSchema {
        id: "form-1".to_string(),
        title: "Test".to_string(),
        description: "Test form".to_string(),
        fields: names
            .iter()
            .enumerate()
            .map(|(idx, name)| FieldSchema {
                id: (idx + 1).to_string(),
                name: name.to_string(),
                label: name.to_string(),
                kind: FieldType::Text,
                placeholder: None,
                required: false,
                options: Vec::new(),
                order: idx,
                validation: None,
            })
            .collect(),
    }
}

#[test]
fn unknown_type_tags_round_trip() {
    let raw = json!({
        "id": "9",
        "name": "mystery",
        "label": "Mystery",
        "type": "hologram"
    });
    let field: FieldSchema = serde_json::from_value(raw).unwrap();
    assert_eq!(field.kind, FieldType::Unknown("hologram".to_string()));

    let back = serde_json::to_value(&field).unwrap();
    assert_eq!(back["type"], json!("hologram"));
}

#[test]
fn wire_format_uses_camel_case_rules() {
    let raw = json!({
        "id": "3",
        "name": "when",
        "label": "When",
        "type": "date",
        "validation": {"minDate": "2024-01-01", "minSelected": 1, "maxSelected": 4}
    });
    let field: FieldSchema = serde_json::from_value(raw).unwrap();
    let rules = field.validation.as_ref().unwrap();
    assert_eq!(rules.min_date.as_deref(), Some("2024-01-01"));
    assert_eq!(rules.min_selected, Some(1));
    assert_eq!(rules.max_selected, Some(4));
}

#[test]
fn absent_name_defaults_to_empty_string() {
    let raw = json!({"id": "7", "label": "Nameless", "type": "text"});
    let field: FieldSchema = serde_json::from_value(raw).unwrap();
    assert_eq!(field.name, "");
    assert!(!field.required);
}

#[test]
fn field_identity_is_by_id() {
    let mut form = mk_form(&["a", "b"]);
    let mut relabeled = form.fields[0].clone();
    relabeled.label = "completely different".to_string();
    assert_eq!(form.fields[0], relabeled);
    form.fields[1].id = form.fields[0].id.clone();
    assert!(!form.ids_unique());
}

#[test]
fn reindex_restores_contiguous_orders() {
    let mut form = mk_form(&["a", "b", "c", "d"]);
    form.fields.swap(0, 3);
    form.fields.remove(1);
    assert!(!form.orders_contiguous());
    form.reindex();
    assert!(form.orders_contiguous());
    let orders: Vec<usize> = form.fields.iter().map(|field| field.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn text_like_helper_matches_validator_domain() {
    assert!(FieldType::Text.is_text_like());
    assert!(FieldType::Textarea.is_text_like());
    assert!(FieldType::Email.is_text_like());
    assert!(!FieldType::Number.is_text_like());
    assert!(FieldType::Radio.is_option_backed());
    assert!(FieldType::Switch.is_boolean());
}
