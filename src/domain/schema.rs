use serde::{Deserialize, Serialize};

/// Closed enumeration over the field types a form may declare. Unrecognized
/// wire values are preserved in `Unknown` and render as nothing downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Textarea,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    Switch,
    File,
    Radio,
    Unknown(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Switch => "switch",
            FieldType::File => "file",
            FieldType::Radio => "radio",
            FieldType::Unknown(raw) => raw,
        }
    }

    /// Length/regex rules apply to these; values are plain strings.
    pub fn is_text_like(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea | FieldType::Email)
    }

    /// Types whose `options` list is meaningful.
    pub fn is_option_backed(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::MultiSelect | FieldType::Radio
        )
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Switch)
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => FieldType::Text,
            "number" => FieldType::Number,
            "email" => FieldType::Email,
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            "multiselect" => FieldType::MultiSelect,
            "date" => FieldType::Date,
            "checkbox" => FieldType::Checkbox,
            "switch" => FieldType::Switch,
            "file" => FieldType::File,
            "radio" => FieldType::Radio,
            _ => FieldType::Unknown(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.as_str().to_string()
    }
}

/// Optional constraint bundle attached to a field. `min`/`max` are character
/// bounds for text-like types and value bounds for `number`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selected: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selected: Option<usize>,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        self == &ValidationRules::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub id: String,
    /// Submission map key. An absent name is tolerated and keys the value
    /// under the empty string.
    #[serde(default)]
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

impl PartialEq for FieldSchema {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl FormSchema {
    /// Renumber every field's `order` to match its sequence position. The
    /// sequence itself is authoritative; this is the single reorder primitive
    /// invoked after any structural change.
    pub fn reindex(&mut self) {
        for (idx, field) in self.fields.iter_mut().enumerate() {
            field.order = idx;
        }
    }

    /// `order` values form the contiguous range `[0, fields.len())` in
    /// sequence position.
    pub fn orders_contiguous(&self) -> bool {
        self.fields
            .iter()
            .enumerate()
            .all(|(idx, field)| field.order == idx)
    }

    pub fn ids_unique(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.fields.iter().all(|field| seen.insert(&field.id))
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}
