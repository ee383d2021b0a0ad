//! Blocking client for the forms collaborator service. This is the only
//! network boundary in the crate: transport and non-2xx statuses become
//! `ApiError`, which callers turn into user-facing banner text.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{FieldSchema, FormSchema, Submission, SubmissionPage, SubmissionPayload};

use super::cache::SubmissionsKey;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// GET responses arrive wrapped as `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Clone)]
pub struct FormsClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl FormsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The server keys its listing by arbitrary identifiers; flatten it to a
    /// plain list preserving the server-side order.
    pub fn list_forms(&self) -> Result<Vec<FormSchema>, ApiError> {
        tracing::debug!(base_url = %self.base_url, "fetching form listing");
        let body: Value = self.get("/forms")?;
        parse_forms_listing(body)
    }

    pub fn get_form(&self, id: &str) -> Result<FormSchema, ApiError> {
        tracing::debug!(%id, "fetching form schema");
        let envelope: Envelope<FormSchema> = self.get(&format!("/forms/{id}"))?;
        Ok(envelope.data)
    }

    pub fn create_form(
        &self,
        title: &str,
        description: &str,
        fields: &[FieldSchema],
    ) -> Result<FormSchema, ApiError> {
        tracing::debug!(%title, field_count = fields.len(), "creating form");
        let body = serde_json::json!({
            "title": title,
            "description": description,
            "fields": fields,
        });
        self.post("/forms", &body)
    }

    pub fn submit(&self, payload: &SubmissionPayload) -> Result<Submission, ApiError> {
        tracing::debug!(form_id = %payload.form_id, "submitting entry");
        self.post("/submissions", payload)
    }

    pub fn list_submissions(&self, key: &SubmissionsKey) -> Result<SubmissionPage, ApiError> {
        tracing::debug!(form_id = %key.form_id, page = key.page, "fetching submissions page");
        let url = format!("{}/submissions", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[
                ("formId", key.form_id.as_str()),
                ("page", &key.page.to_string()),
                ("limit", &key.limit.to_string()),
                ("sortBy", key.sort_by.as_str()),
                ("sortOrder", key.sort_order.as_str()),
            ])
            .send()?;
        let envelope: Envelope<SubmissionPage> = decode(response)?;
        Ok(envelope.data)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(url).send()?;
        decode(response)
    }

    fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(url).json(body).send()?;
        decode(response)
    }
}

/// Success is an HTTP 2xx status, checked explicitly.
fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .ok()
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| status.to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json()?)
}

pub(crate) fn parse_forms_listing(body: Value) -> Result<Vec<FormSchema>, ApiError> {
    let envelope: Envelope<IndexMap<String, FormSchema>> = serde_json::from_value(body)?;
    Ok(envelope.data.into_values().collect())
}
