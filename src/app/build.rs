//! Builder screen state. The field editor is itself a `FormEngine` over a
//! fixed meta form, so the builder exercises the same input machinery it is
//! building forms for.

use serde_json::Value;

use crate::domain::{FieldSchema, FieldType, FormSchema, ValidationRules};
use crate::form::{FieldDraft, FormBuilder, FormEngine};

const FIELD_TYPE_TAGS: [&str; 11] = [
    "text",
    "textarea",
    "number",
    "email",
    "date",
    "checkbox",
    "switch",
    "select",
    "multiselect",
    "radio",
    "file",
];

const DRAFT_INPUTS: [&str; 10] = [
    "field_name",
    "field_label",
    "field_type",
    "field_required",
    "field_placeholder",
    "field_options",
    "rule_min",
    "rule_max",
    "rule_regex",
    "rule_min_date",
];

pub struct BuildScreen {
    pub builder: FormBuilder,
    pub editor: FormEngine,
    pub selected: usize,
}

impl BuildScreen {
    pub fn new() -> Self {
        Self {
            builder: FormBuilder::new(),
            editor: FormEngine::new(editor_schema()),
            selected: 0,
        }
    }

    /// Commit the staged draft into the builder, clearing the draft inputs on
    /// success. Form title/description travel along on every commit.
    pub fn stage_field(&mut self) -> Result<(), String> {
        self.sync_metadata();
        let draft = self.read_draft();
        self.builder.add_field(draft).map_err(|err| err.to_string())?;
        for name in DRAFT_INPUTS {
            let blank = if name == "field_required" {
                Value::Bool(false)
            } else {
                Value::String(String::new())
            };
            self.editor.set_value(name, &blank);
        }
        self.selected = self.builder.draft().fields.len().saturating_sub(1);
        Ok(())
    }

    /// Load the selected staged field back into the editor for updating.
    pub fn load_selected(&mut self) -> Result<(), String> {
        let draft = self
            .builder
            .edit_field(self.selected)
            .map_err(|err| err.to_string())?;
        self.editor
            .set_value("field_name", &Value::String(draft.name));
        self.editor
            .set_value("field_label", &Value::String(draft.label));
        let tag = draft.kind.map(|kind| kind.as_str().to_string()).unwrap_or_default();
        self.editor.set_value("field_type", &Value::String(tag));
        self.editor
            .set_value("field_required", &Value::Bool(draft.required));
        self.editor.set_value(
            "field_placeholder",
            &Value::String(draft.placeholder.unwrap_or_default()),
        );
        self.editor
            .set_value("field_options", &Value::String(draft.options.join(", ")));
        let rules = draft.validation.unwrap_or_default();
        self.editor.set_value(
            "rule_min",
            &Value::String(rules.min.map(fmt_number).unwrap_or_default()),
        );
        self.editor.set_value(
            "rule_max",
            &Value::String(rules.max.map(fmt_number).unwrap_or_default()),
        );
        self.editor
            .set_value("rule_regex", &Value::String(rules.regex.unwrap_or_default()));
        self.editor.set_value(
            "rule_min_date",
            &Value::String(rules.min_date.unwrap_or_default()),
        );
        Ok(())
    }

    pub fn remove_selected(&mut self) -> Result<(), String> {
        self.builder
            .remove_field(self.selected)
            .map_err(|err| err.to_string())?;
        let len = self.builder.draft().fields.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        Ok(())
    }

    /// Drag-style reorder of the selected staged field.
    pub fn move_selected(&mut self, delta: i32) -> Result<(), String> {
        let len = self.builder.draft().fields.len();
        if len == 0 {
            return Ok(());
        }
        let from = self.selected;
        let to = (from as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
        if from == to {
            return Ok(());
        }
        self.builder
            .move_field(from, to)
            .map_err(|err| err.to_string())?;
        self.selected = to;
        Ok(())
    }

    pub fn select(&mut self, delta: i32) {
        let len = self.builder.draft().fields.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
    }

    /// Finalize the draft into a schema ready to POST.
    pub fn finish(&mut self) -> Result<FormSchema, String> {
        self.sync_metadata();
        self.builder.finish().map_err(|err| err.to_string())
    }

    fn sync_metadata(&mut self) {
        self.builder.set_title(self.text_of("title"));
        self.builder.set_description(self.text_of("description"));
    }

    fn read_draft(&self) -> FieldDraft {
        let rules = ValidationRules {
            min: self.number_of("rule_min"),
            max: self.number_of("rule_max"),
            regex: non_empty(self.text_of("rule_regex")),
            min_date: non_empty(self.text_of("rule_min_date")),
            min_selected: None,
            max_selected: None,
        };
        let options: Vec<String> = self
            .text_of("field_options")
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        let tag = self.text_of("field_type");
        FieldDraft {
            name: self.text_of("field_name"),
            label: self.text_of("field_label"),
            kind: non_empty(tag).map(FieldType::from),
            placeholder: non_empty(self.text_of("field_placeholder")),
            required: self
                .editor
                .values()
                .get("field_required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            options,
            validation: Some(rules).filter(|rules| !rules.is_empty()),
        }
    }

    fn text_of(&self, name: &str) -> String {
        self.editor
            .values()
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn number_of(&self, name: &str) -> Option<f64> {
        self.text_of(name).trim().parse::<f64>().ok()
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn fmt_number(value: f64) -> String {
    format!("{value}")
}

/// The fixed meta form the builder edits itself through.
fn editor_schema() -> FormSchema {
    let mut fields = vec![
        text_field("title", "Form Title", FieldType::Text, true),
        text_field("description", "Description", FieldType::Textarea, true),
        text_field("field_name", "Field Name", FieldType::Text, false),
        text_field("field_label", "Field Label", FieldType::Text, false),
        FieldSchema {
            id: "field_type".into(),
            name: "field_type".into(),
            label: "Field Type".into(),
            kind: FieldType::Select,
            placeholder: None,
            required: false,
            options: FIELD_TYPE_TAGS.iter().map(|tag| tag.to_string()).collect(),
            order: 0,
            validation: None,
        },
        FieldSchema {
            id: "field_required".into(),
            name: "field_required".into(),
            label: "Required".into(),
            kind: FieldType::Checkbox,
            placeholder: None,
            required: false,
            options: Vec::new(),
            order: 0,
            validation: None,
        },
        text_field("field_placeholder", "Placeholder", FieldType::Text, false),
        text_field(
            "field_options",
            "Options (comma-separated)",
            FieldType::Text,
            false,
        ),
        text_field("rule_min", "Minimum", FieldType::Number, false),
        text_field("rule_max", "Maximum", FieldType::Number, false),
        text_field("rule_regex", "Regex", FieldType::Text, false),
        text_field("rule_min_date", "Earliest Date", FieldType::Date, false),
    ];
    for (idx, field) in fields.iter_mut().enumerate() {
        field.order = idx;
    }
    FormSchema {
        id: "builder".into(),
        title: "Create New Form".into(),
        description: "Define the form, stage fields, reorder, save.".into(),
        fields,
    }
}

fn text_field(name: &str, label: &str, kind: FieldType, required: bool) -> FieldSchema {
    FieldSchema {
        id: name.into(),
        name: name.into(),
        label: label.into(),
        kind,
        placeholder: None,
        required,
        options: Vec::new(),
        order: 0,
        validation: None,
    }
}
