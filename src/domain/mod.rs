mod schema;
mod submission;
mod validate;

pub use schema::{FieldSchema, FieldType, FormSchema, ValidationRules};
pub use submission::{
    Pagination, SortOrder, Submission, SubmissionPage, SubmissionPayload, ValueMap,
};
pub use validate::validate_field;
