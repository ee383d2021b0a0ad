//! Detached request threads for the blocking client. Each request carries the
//! ticket it was started with; the main loop redeems tickets against the
//! `QueryCache`, which is where superseded responses get discarded.

use std::sync::mpsc::Sender;
use std::thread;

use crate::api::{ApiError, FormsClient, QueryTicket, SubmissionsKey};
use crate::domain::{FormSchema, Submission, SubmissionPage, SubmissionPayload};

#[derive(Debug)]
pub enum ApiEvent {
    Forms(QueryTicket, Result<Vec<FormSchema>, ApiError>),
    Form(QueryTicket, Result<FormSchema, ApiError>),
    Submissions(QueryTicket, Result<SubmissionPage, ApiError>),
    FormCreated(Result<FormSchema, ApiError>),
    SubmissionAccepted {
        form_id: String,
        result: Result<Submission, ApiError>,
    },
}

pub struct ApiWorker {
    client: FormsClient,
    events: Sender<ApiEvent>,
}

impl ApiWorker {
    pub fn new(client: FormsClient, events: Sender<ApiEvent>) -> Self {
        Self { client, events }
    }

    pub fn fetch_forms(&self, ticket: QueryTicket) {
        self.dispatch(move |client| ApiEvent::Forms(ticket, client.list_forms()));
    }

    pub fn fetch_form(&self, ticket: QueryTicket, id: String) {
        self.dispatch(move |client| ApiEvent::Form(ticket, client.get_form(&id)));
    }

    pub fn fetch_submissions(&self, ticket: QueryTicket, key: SubmissionsKey) {
        self.dispatch(move |client| ApiEvent::Submissions(ticket, client.list_submissions(&key)));
    }

    pub fn create_form(&self, schema: FormSchema) {
        self.dispatch(move |client| {
            ApiEvent::FormCreated(client.create_form(
                &schema.title,
                &schema.description,
                &schema.fields,
            ))
        });
    }

    pub fn submit(&self, payload: SubmissionPayload) {
        self.dispatch(move |client| {
            let form_id = payload.form_id.clone();
            ApiEvent::SubmissionAccepted {
                form_id,
                result: client.submit(&payload),
            }
        });
    }

    fn dispatch<F>(&self, job: F)
    where
        F: FnOnce(&FormsClient) -> ApiEvent + Send + 'static,
    {
        let client = self.client.clone();
        let events = self.events.clone();
        thread::spawn(move || {
            let event = job(&client);
            if events.send(event).is_err() {
                tracing::debug!("dropping api event: receiver gone");
            }
        });
    }
}
