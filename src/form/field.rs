use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use crate::domain::{FieldSchema, FieldType, validate_field};

/// Interactive input state for one field, a closed union over the declared
/// field type. Types without an interactive rendering (`radio` and anything
/// unrecognized) collapse to `Static`, which accepts no input and renders as
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    Select {
        options: Vec<String>,
        /// `None` is the prepended "unselected" sentinel.
        selected: Option<usize>,
    },
    MultiSelect {
        options: Vec<String>,
        /// Chosen options in toggle order: appended on check, filtered out on
        /// uncheck.
        chosen: Vec<String>,
        cursor: usize,
    },
    Toggle(bool),
    Static,
}

/// Per-field lifecycle: validation only surfaces once the user has touched
/// the field through an edit or a blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Touch {
    #[default]
    Untouched,
    Touched,
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub schema: FieldSchema,
    pub input: FieldInput,
    pub touch: Touch,
    pub error: Option<String>,
}

impl FieldState {
    pub fn from_schema(schema: FieldSchema) -> Self {
        let input = match &schema.kind {
            FieldType::Text
            | FieldType::Number
            | FieldType::Email
            | FieldType::Textarea
            | FieldType::Date
            | FieldType::File => FieldInput::Text(String::new()),
            FieldType::Select => FieldInput::Select {
                options: schema.options.clone(),
                selected: None,
            },
            FieldType::MultiSelect => FieldInput::MultiSelect {
                options: schema.options.clone(),
                chosen: Vec::new(),
                cursor: 0,
            },
            FieldType::Checkbox | FieldType::Switch => FieldInput::Toggle(false),
            FieldType::Radio | FieldType::Unknown(_) => FieldInput::Static,
        };
        Self {
            schema,
            input,
            touch: Touch::Untouched,
            error: None,
        }
    }

    /// The value this field would contribute to the submission map right now.
    pub fn current_value(&self) -> Value {
        match &self.input {
            FieldInput::Text(buffer) => Value::String(buffer.clone()),
            FieldInput::Select { options, selected } => Value::String(
                selected
                    .and_then(|idx| options.get(idx).cloned())
                    .unwrap_or_default(),
            ),
            FieldInput::MultiSelect { chosen, .. } => {
                Value::Array(chosen.iter().cloned().map(Value::String).collect())
            }
            FieldInput::Toggle(flag) => Value::Bool(*flag),
            FieldInput::Static => Value::Null,
        }
    }

    /// Route a key press into the input. Returns true when the value changed,
    /// in which case the field has been re-validated.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let edited = match &mut self.input {
            FieldInput::Text(buffer) => match key.code {
                KeyCode::Char(ch) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        return false;
                    }
                    buffer.push(ch);
                    true
                }
                KeyCode::Backspace => buffer.pop().is_some(),
                KeyCode::Delete => {
                    let had_content = !buffer.is_empty();
                    buffer.clear();
                    had_content
                }
                _ => false,
            },
            FieldInput::Select { options, selected } => match key.code {
                KeyCode::Up | KeyCode::Left => {
                    *selected = match *selected {
                        None => options.len().checked_sub(1),
                        Some(0) => None,
                        Some(idx) => Some(idx - 1),
                    };
                    true
                }
                KeyCode::Down | KeyCode::Right => {
                    *selected = match *selected {
                        None if options.is_empty() => None,
                        None => Some(0),
                        Some(idx) if idx + 1 < options.len() => Some(idx + 1),
                        Some(_) => None,
                    };
                    true
                }
                _ => false,
            },
            FieldInput::MultiSelect {
                options,
                chosen,
                cursor,
            } => match key.code {
                KeyCode::Up => {
                    if *cursor > 0 {
                        *cursor -= 1;
                    }
                    false
                }
                KeyCode::Down => {
                    if *cursor + 1 < options.len() {
                        *cursor += 1;
                    }
                    false
                }
                KeyCode::Char(' ') => {
                    if let Some(option) = options.get(*cursor) {
                        toggle_option(chosen, option);
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            },
            FieldInput::Toggle(flag) => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    *flag = !*flag;
                    true
                }
                _ => false,
            },
            FieldInput::Static => false,
        };
        if edited {
            self.after_edit();
        }
        edited
    }

    /// Toggle a multiselect option by name; appends on add, filters on remove.
    pub fn toggle_choice(&mut self, option: &str) -> bool {
        let FieldInput::MultiSelect {
            options, chosen, ..
        } = &mut self.input
        else {
            return false;
        };
        if !options.iter().any(|candidate| candidate == option) {
            return false;
        }
        toggle_option(chosen, option);
        self.after_edit();
        true
    }

    /// Re-seed the input from a previously entered value (preview flows).
    pub fn seed(&mut self, value: &Value) {
        match (&mut self.input, value) {
            (FieldInput::Text(buffer), Value::String(text)) => *buffer = text.clone(),
            (FieldInput::Text(buffer), Value::Number(num)) => *buffer = num.to_string(),
            (FieldInput::Select { options, selected }, Value::String(text)) => {
                *selected = options.iter().position(|option| option == text);
            }
            (FieldInput::MultiSelect { options, chosen, .. }, Value::Array(items)) => {
                chosen.clear();
                for item in items.iter().filter_map(Value::as_str) {
                    if options.iter().any(|option| option == item) {
                        chosen.push(item.to_string());
                    }
                }
            }
            (FieldInput::Toggle(flag), Value::Bool(value)) => *flag = *value,
            _ => {}
        }
    }

    pub fn blur(&mut self) {
        self.touch = Touch::Touched;
        self.revalidate();
    }

    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Clear the entered value and return the field to its pristine state.
    pub fn reset(&mut self) {
        match &mut self.input {
            FieldInput::Text(buffer) => buffer.clear(),
            FieldInput::Select { selected, .. } => *selected = None,
            FieldInput::MultiSelect { chosen, cursor, .. } => {
                chosen.clear();
                *cursor = 0;
            }
            FieldInput::Toggle(flag) => *flag = false,
            FieldInput::Static => {}
        }
        self.touch = Touch::Untouched;
        self.error = None;
    }

    fn after_edit(&mut self) {
        self.touch = Touch::Touched;
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.error = validate_field(&self.current_value(), &self.schema);
    }
}

fn toggle_option(chosen: &mut Vec<String>, option: &str) {
    if let Some(idx) = chosen.iter().position(|entry| entry == option) {
        chosen.remove(idx);
    } else {
        chosen.push(option.to_string());
    }
}
