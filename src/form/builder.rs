//! Interactive construction of a form schema: staged field drafts, edit in
//! place, removal, and drag-style reordering. Every structural change ends in
//! one `reindex` pass so `order` stays contiguous and zero-based.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{FieldSchema, FieldType, FormSchema, ValidationRules};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("fill in the field name, label, and type")]
    IncompleteField,
    #[error("a field named '{0}' already exists")]
    DuplicateName(String),
    #[error("no field at position {0}")]
    NoSuchField(usize),
    #[error("fill in the form title and description and add at least one field")]
    IncompleteForm,
}

/// Everything the builder UI collects before a field is committed.
#[derive(Debug, Clone, Default)]
pub struct FieldDraft {
    pub name: String,
    pub label: String,
    pub kind: Option<FieldType>,
    pub placeholder: Option<String>,
    pub required: bool,
    pub options: Vec<String>,
    pub validation: Option<ValidationRules>,
}

impl FieldDraft {
    pub fn from_field(field: &FieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            kind: Some(field.kind.clone()),
            placeholder: field.placeholder.clone(),
            required: field.required,
            options: field.options.clone(),
            validation: field.validation.clone(),
        }
    }
}

#[derive(Debug)]
pub struct FormBuilder {
    draft: FormSchema,
    next_field_id: usize,
    editing: Option<usize>,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            draft: FormSchema {
                id: Uuid::new_v4().to_string(),
                title: String::new(),
                description: String::new(),
                fields: Vec::new(),
            },
            next_field_id: 1,
            editing: None,
        }
    }

    pub fn draft(&self) -> &FormSchema {
        &self.draft
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Commit a staged draft: appends a new field, or replaces the one opened
    /// with `edit_field`. Field ids come from a monotonic counter so removal
    /// never frees an id for reuse.
    pub fn add_field(&mut self, draft: FieldDraft) -> Result<(), BuilderError> {
        if draft.name.is_empty() || draft.label.is_empty() {
            return Err(BuilderError::IncompleteField);
        }
        let Some(kind) = draft.kind else {
            return Err(BuilderError::IncompleteField);
        };
        let clash = self.draft.fields.iter().enumerate().any(|(idx, field)| {
            field.name == draft.name && Some(idx) != self.editing
        });
        if clash {
            return Err(BuilderError::DuplicateName(draft.name));
        }

        let validation = draft.validation.filter(|rules| !rules.is_empty());
        match self.editing.take() {
            Some(idx) => {
                let Some(existing) = self.draft.fields.get_mut(idx) else {
                    return Err(BuilderError::NoSuchField(idx));
                };
                existing.name = draft.name;
                existing.label = draft.label;
                existing.kind = kind;
                existing.placeholder = draft.placeholder;
                existing.required = draft.required;
                existing.options = draft.options;
                existing.validation = validation;
            }
            None => {
                let field = FieldSchema {
                    id: self.next_field_id.to_string(),
                    name: draft.name,
                    label: draft.label,
                    kind,
                    placeholder: draft.placeholder,
                    required: draft.required,
                    options: draft.options,
                    order: self.draft.fields.len(),
                    validation,
                };
                self.next_field_id += 1;
                self.draft.fields.push(field);
            }
        }
        self.draft.reindex();
        Ok(())
    }

    /// Open an existing field for editing and hand back its draft.
    pub fn edit_field(&mut self, index: usize) -> Result<FieldDraft, BuilderError> {
        let field = self
            .draft
            .fields
            .get(index)
            .ok_or(BuilderError::NoSuchField(index))?;
        self.editing = Some(index);
        Ok(FieldDraft::from_field(field))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn remove_field(&mut self, index: usize) -> Result<(), BuilderError> {
        if index >= self.draft.fields.len() {
            return Err(BuilderError::NoSuchField(index));
        }
        self.draft.fields.remove(index);
        self.editing = None;
        self.draft.reindex();
        Ok(())
    }

    /// Drag semantics: lift the field at `from` and splice it in at `to`,
    /// preserving the dropped position verbatim.
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        let len = self.draft.fields.len();
        if from >= len {
            return Err(BuilderError::NoSuchField(from));
        }
        if to >= len {
            return Err(BuilderError::NoSuchField(to));
        }
        if from != to {
            let field = self.draft.fields.remove(from);
            self.draft.fields.insert(to, field);
        }
        self.draft.reindex();
        Ok(())
    }

    /// Finalize the draft. The result is a complete schema ready to hand to a
    /// `FormEngine` or POST to the collaborator.
    pub fn finish(&self) -> Result<FormSchema, BuilderError> {
        if self.draft.title.is_empty()
            || self.draft.description.is_empty()
            || self.draft.fields.is_empty()
        {
            return Err(BuilderError::IncompleteForm);
        }
        Ok(self.draft.clone())
    }
}
