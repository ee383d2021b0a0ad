mod builder;
mod engine;
mod field;

pub use builder::{BuilderError, FieldDraft, FormBuilder};
pub use engine::{FormEngine, SubmitBlocked, SubmitOutcome, SubmitStatus};
pub use field::{FieldInput, FieldState, Touch};
