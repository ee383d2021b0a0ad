#![deny(rust_2018_idioms)]

pub mod api;
pub mod app;
pub mod domain;
pub mod form;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use app::{DynaForm, UiOptions};

pub mod prelude {
    pub use super::api::{ApiError, FormsClient, QueryCache, SubmissionsKey};
    pub use super::domain::{
        FieldSchema, FieldType, FormSchema, SortOrder, Submission, SubmissionPayload,
        ValidationRules, validate_field,
    };
    pub use super::form::{FieldInput, FieldState, FormBuilder, FormEngine};
    pub use super::{DynaForm, UiOptions};
}
