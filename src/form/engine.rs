//! Live session over one form fill: per-field input state, the aggregate
//! value map, and the whole-form submit lifecycle.

use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::domain::{FormSchema, SubmissionPayload, ValueMap};

use super::field::FieldState;

/// Whole-form submit machine. While `Submitting`, further submit attempts are
/// rejected so no two submissions for the same fill are in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A submission is already in flight.
    InFlight,
    /// This many fields are invalid; submit is gated on validation.
    Invalid(usize),
}

#[derive(Debug)]
pub struct FormEngine {
    schema: FormSchema,
    fields: Vec<FieldState>,
    values: ValueMap,
    focus: usize,
    status: SubmitStatus,
    outcome: Option<SubmitOutcome>,
}

impl FormEngine {
    /// Takes ownership of the schema; it is immutable for the life of the
    /// fill.
    pub fn new(schema: FormSchema) -> Self {
        let fields: Vec<FieldState> = schema
            .fields
            .iter()
            .cloned()
            .map(FieldState::from_schema)
            .collect();
        let mut values = ValueMap::new();
        for field in &fields {
            values.insert(field.schema.name.clone(), field.current_value());
        }
        Self {
            schema,
            fields,
            values,
            focus: 0,
            status: SubmitStatus::Idle,
            outcome: None,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&FieldState> {
        self.fields.get(self.focus)
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    pub fn clear_outcome(&mut self) {
        self.outcome = None;
    }

    /// Route a key press to the focused field; on a value change, the field is
    /// re-validated and its single entry in the value map is updated.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };
        if field.handle_key(key) {
            self.sync_focused();
            true
        } else {
            false
        }
    }

    /// Leaving a field is its blur event.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.blur_focused();
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.blur_focused();
        self.focus = if self.focus == 0 {
            self.fields.len() - 1
        } else {
            self.focus - 1
        };
    }

    /// Programmatic single-field update by name.
    pub fn set_value(&mut self, name: &str, value: &Value) -> bool {
        let Some(idx) = self.fields.iter().position(|f| f.schema.name == name) else {
            return false;
        };
        let field = &mut self.fields[idx];
        field.seed(value);
        field.blur();
        let key = field.schema.name.clone();
        let current = field.current_value();
        self.values.insert(key, current);
        true
    }

    pub fn blur_field(&mut self, name: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.schema.name == name) {
            Some(field) => {
                field.blur();
                true
            }
            None => false,
        }
    }

    pub fn error_count(&self) -> usize {
        self.fields.iter().filter(|field| field.is_invalid()).count()
    }

    /// Touch every field and re-run validation, returning the invalid count.
    pub fn touch_all_and_validate(&mut self) -> usize {
        for field in &mut self.fields {
            field.blur();
        }
        self.error_count()
    }

    /// Explicit submit request. Blocked while a submission is in flight or
    /// while any field fails validation; a blocked attempt touches every
    /// field so all errors are visible.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitBlocked> {
        if self.status == SubmitStatus::Submitting {
            return Err(SubmitBlocked::InFlight);
        }
        let invalid = self.touch_all_and_validate();
        if invalid > 0 {
            return Err(SubmitBlocked::Invalid(invalid));
        }
        self.status = SubmitStatus::Submitting;
        self.outcome = None;
        Ok(SubmissionPayload {
            form_id: self.schema.id.clone(),
            data: self.values.clone(),
        })
    }

    /// Success resets the fill; failure keeps entered values for a retry.
    pub fn finish_submit(&mut self, result: Result<(), String>) {
        self.status = SubmitStatus::Idle;
        match result {
            Ok(()) => {
                self.reset();
                self.outcome = Some(SubmitOutcome::Success);
            }
            Err(message) => {
                self.outcome = Some(SubmitOutcome::Failed(message));
            }
        }
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.reset();
        }
        self.focus = 0;
        self.sync_all();
    }

    /// Pre-populate from an existing value map (previewing a submission).
    pub fn seed(&mut self, values: &ValueMap) {
        for field in &mut self.fields {
            if let Some(value) = values.get(&field.schema.name) {
                field.seed(value);
            }
        }
        self.sync_all();
    }

    fn blur_focused(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.blur();
        }
    }

    fn sync_focused(&mut self) {
        if let Some(field) = self.fields.get(self.focus) {
            self.values
                .insert(field.schema.name.clone(), field.current_value());
        }
    }

    fn sync_all(&mut self) {
        self.values.clear();
        for field in &self.fields {
            self.values
                .insert(field.schema.name.clone(), field.current_value());
        }
    }
}
