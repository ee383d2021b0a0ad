mod cache;
mod client;

pub use cache::{QueryCache, QueryKey, QueryPayload, QueryTicket, SubmissionsKey};
pub use client::{ApiError, FormsClient};

#[cfg(test)]
pub(crate) use client::parse_forms_listing;
