//! Explicitly passed query cache with defined invalidation keys. Each logical
//! key carries a generation counter: starting a new request for a key
//! supersedes any request already in flight for it, and a superseded
//! response's ticket no longer matches, so the stale payload is discarded
//! instead of overwriting the current view.

use std::collections::HashMap;

use crate::domain::{FormSchema, SortOrder, SubmissionPage};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionsKey {
    pub form_id: String,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl SubmissionsKey {
    pub fn first_page(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            page: 1,
            limit: 10,
            sort_by: "createdAt".to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Forms,
    Form(String),
    Submissions(SubmissionsKey),
}

/// Proof of a started request; redeemed against the cache when the response
/// arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    key: QueryKey,
    generation: u64,
}

impl QueryTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

#[derive(Debug, Clone)]
pub enum QueryPayload {
    Forms(Vec<FormSchema>),
    Form(FormSchema),
    Submissions(SubmissionPage),
}

#[derive(Debug, Default)]
pub struct QueryCache {
    generations: HashMap<QueryKey, u64>,
    forms: Option<Vec<FormSchema>>,
    form_by_id: HashMap<String, FormSchema>,
    submissions: HashMap<SubmissionsKey, SubmissionPage>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request for `key`. Any ticket issued earlier for the same
    /// key is superseded from this point on.
    pub fn begin(&mut self, key: QueryKey) -> QueryTicket {
        let generation = self.generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        QueryTicket {
            key,
            generation: *generation,
        }
    }

    /// Store a response if its ticket is still current. Returns false (and
    /// drops the payload) when the request was superseded or invalidated in
    /// the meantime.
    pub fn accept(&mut self, ticket: &QueryTicket, payload: QueryPayload) -> bool {
        if self.generations.get(&ticket.key) != Some(&ticket.generation) {
            return false;
        }
        match (&ticket.key, payload) {
            (QueryKey::Forms, QueryPayload::Forms(forms)) => {
                for form in &forms {
                    self.form_by_id.insert(form.id.clone(), form.clone());
                }
                self.forms = Some(forms);
            }
            (QueryKey::Form(_), QueryPayload::Form(form)) => {
                self.form_by_id.insert(form.id.clone(), form);
            }
            (QueryKey::Submissions(key), QueryPayload::Submissions(page)) => {
                self.submissions.insert(key.clone(), page);
            }
            _ => return false,
        }
        true
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.generations.get(&ticket.key) == Some(&ticket.generation)
    }

    pub fn forms(&self) -> Option<&[FormSchema]> {
        self.forms.as_deref()
    }

    pub fn form(&self, id: &str) -> Option<&FormSchema> {
        self.form_by_id.get(id)
    }

    pub fn submissions(&self, key: &SubmissionsKey) -> Option<&SubmissionPage> {
        self.submissions.get(key)
    }

    /// Drop every cached submissions page for a form and supersede any page
    /// fetch in flight for it. Run after a successful submission.
    pub fn invalidate_submissions(&mut self, form_id: &str) {
        self.submissions.retain(|key, _| key.form_id != form_id);
        for (key, generation) in self.generations.iter_mut() {
            if let QueryKey::Submissions(sub_key) = key {
                if sub_key.form_id == form_id {
                    *generation += 1;
                }
            }
        }
    }

    /// Drop the cached listing (and supersede a listing fetch in flight).
    /// Run after creating a form.
    pub fn invalidate_forms(&mut self) {
        self.forms = None;
        if let Some(generation) = self.generations.get_mut(&QueryKey::Forms) {
            *generation += 1;
        }
    }

    pub fn invalidate_form(&mut self, id: &str) {
        self.form_by_id.remove(id);
        if let Some(generation) = self.generations.get_mut(&QueryKey::Form(id.to_string())) {
            *generation += 1;
        }
    }
}
