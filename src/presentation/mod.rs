pub(crate) mod fields;
mod view;

pub use view::{BodyView, ChromeContext, SubmissionDetailView, draw};
