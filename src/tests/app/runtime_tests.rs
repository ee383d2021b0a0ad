use std::time::Duration;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use crate::api::{QueryKey, QueryPayload, SubmissionsKey};
use crate::app::{ApiEvent, App, UiOptions};
use crate::domain::{
    FieldSchema, FieldType, FormSchema, Pagination, Submission, SubmissionPage, ValueMap,
};

fn mk_form() -> FormSchema {
    FormSchema {
        id: "f1".to_string(),
        title: "Feedback".to_string(),
        description: "Tell us".to_string(),
        fields: vec![FieldSchema {
            id: "1".to_string(),
            name: "full_name".to_string(),
            label: "Full Name".to_string(),
            kind: FieldType::Text,
            placeholder: None,
            required: false,
            options: Vec::new(),
            order: 0,
            validation: None,
        }],
    }
}

fn mk_submission(data: ValueMap) -> Submission {
    Submission {
        id: "sub-1".to_string(),
        created_at: Utc::now(),
        data,
    }
}

fn mk_app() -> App {
    let options = UiOptions {
        return_delay: Duration::from_millis(0),
        ..UiOptions::default()
    };
    App::new("http://127.0.0.1:1".to_string(), None, options)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn accepted_submission() -> ApiEvent {
    ApiEvent::SubmissionAccepted {
        form_id: "f1".to_string(),
        result: Ok(mk_submission(ValueMap::new())),
    }
}

#[test]
fn due_return_delay_fires_back_to_overview() {
    let mut app = mk_app();
    app.open_fill(mk_form());
    app.apply_api_event(accepted_submission());
    assert!(app.return_pending());

    app.fire_pending_return();
    assert!(app.on_overview());
}

#[test]
fn leaving_the_fill_view_cancels_the_return_delay() {
    let mut app = mk_app();
    app.open_fill(mk_form());
    app.apply_api_event(accepted_submission());
    assert!(app.return_pending());

    // Going back by hand tears down the fill view along with its timer.
    app.handle_key(key(KeyCode::Esc));
    assert!(app.on_overview());
    assert!(!app.return_pending());

    // A later tick has nothing left to fire.
    app.fire_pending_return();
    assert!(app.on_overview());
}

#[test]
fn enter_opens_a_seeded_submission_detail() {
    let mut app = mk_app();
    app.open_submissions("f1".to_string());

    let ticket = app.cache_mut().begin(QueryKey::Form("f1".to_string()));
    app.cache_mut().accept(&ticket, QueryPayload::Form(mk_form()));

    let mut data = ValueMap::new();
    data.insert("full_name".to_string(), json!("Ada"));
    let page = SubmissionPage {
        submissions: vec![mk_submission(data)],
        pagination: Pagination {
            page: 1,
            total_pages: 1,
            total_count: 1,
            limit: 10,
        },
    };
    let subs_key = SubmissionsKey::first_page("f1");
    let ticket = app.cache_mut().begin(QueryKey::Submissions(subs_key));
    app.cache_mut().accept(&ticket, QueryPayload::Submissions(page));

    app.handle_key(key(KeyCode::Enter));
    let detail = app.submission_detail().expect("detail should be open");
    assert_eq!(detail.submission.id, "sub-1");
    let preview = detail.preview.as_ref().expect("schema is cached");
    assert_eq!(preview.values()["full_name"], json!("Ada"));

    // First Esc closes the detail, staying on the submissions screen.
    app.handle_key(key(KeyCode::Esc));
    assert!(app.submission_detail().is_none());
    assert!(!app.on_overview());

    // Second Esc leaves the screen.
    app.handle_key(key(KeyCode::Esc));
    assert!(app.on_overview());
}

#[test]
fn detail_without_a_cached_schema_still_opens() {
    let mut app = mk_app();
    app.open_submissions("f1".to_string());

    let mut data = ValueMap::new();
    data.insert("full_name".to_string(), json!("Grace"));
    let page = SubmissionPage {
        submissions: vec![mk_submission(data)],
        pagination: Pagination {
            page: 1,
            total_pages: 1,
            total_count: 1,
            limit: 10,
        },
    };
    let subs_key = SubmissionsKey::first_page("f1");
    let ticket = app.cache_mut().begin(QueryKey::Submissions(subs_key));
    app.cache_mut().accept(&ticket, QueryPayload::Submissions(page));

    app.handle_key(key(KeyCode::Enter));
    let detail = app.submission_detail().expect("detail should be open");
    assert!(detail.preview.is_none());
    assert_eq!(detail.submission.data["full_name"], json!("Grace"));
}
