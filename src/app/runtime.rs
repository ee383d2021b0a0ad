//! Synchronous event loop over the four screens: overview, fill, build,
//! submissions. All validation and rendering runs on event dispatch; only
//! HTTP requests leave this thread, and their responses re-enter through the
//! query cache so superseded fetches never touch the view.

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::{FormsClient, QueryCache, QueryKey, QueryPayload, SubmissionsKey};
use crate::domain::{FormSchema, Submission};
use crate::form::{FormEngine, SubmitBlocked};
use crate::presentation::{self, BodyView, ChromeContext, SubmissionDetailView};

use super::build::BuildScreen;
use super::options::UiOptions;
use super::status::StatusLine;
use super::terminal::TerminalSession;
use super::worker::{ApiEvent, ApiWorker};

enum Screen {
    Overview {
        selected: usize,
    },
    Fill {
        form_id: String,
        /// Absent until the schema arrives; the view renders a safe empty
        /// state in the meantime.
        engine: Option<FormEngine>,
        /// Scheduled return to the overview after a successful submission.
        /// Dropped with the screen, so tearing down the view cancels it.
        pending_return: Option<Instant>,
    },
    Build(BuildScreen),
    Submissions {
        key: SubmissionsKey,
        selected: usize,
        /// Opened row, overlaying the list until dismissed.
        detail: Option<SubmissionDetail>,
    },
}

/// One submission opened from the list. The preview is the form engine seeded
/// with the stored values, present whenever the schema is cached.
pub(crate) struct SubmissionDetail {
    pub(crate) submission: Submission,
    pub(crate) preview: Option<FormEngine>,
}

pub(crate) struct App {
    options: UiOptions,
    cache: QueryCache,
    worker: ApiWorker,
    events: Receiver<ApiEvent>,
    status: StatusLine,
    screen: Screen,
    should_quit: bool,
}

impl App {
    pub fn new(base_url: String, form_id: Option<String>, options: UiOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = ApiWorker::new(FormsClient::new(base_url), tx);
        let screen = match form_id {
            Some(form_id) => Screen::Fill {
                form_id,
                engine: None,
                pending_return: None,
            },
            None => Screen::Overview { selected: 0 },
        };
        Self {
            options,
            cache: QueryCache::new(),
            worker,
            events: rx,
            status: StatusLine::new(),
            screen,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        match &self.screen {
            Screen::Fill { form_id, .. } => {
                let id = form_id.clone();
                self.request_form(id);
            }
            _ => self.request_forms(),
        }

        let mut terminal = TerminalSession::open()?;
        while !self.should_quit {
            self.drain_api_events();
            self.fire_pending_return();
            terminal.draw(|frame| {
                presentation::draw(frame, self.body_view(), self.chrome());
            })?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
                Event::Resize(width, height) => terminal.resize(width, height)?,
                _ => {}
            }
        }
        Ok(())
    }

    // --- request plumbing -------------------------------------------------

    fn request_forms(&mut self) {
        let ticket = self.cache.begin(QueryKey::Forms);
        self.worker.fetch_forms(ticket);
        self.status.loading("forms");
    }

    fn request_form(&mut self, id: String) {
        let ticket = self.cache.begin(QueryKey::Form(id.clone()));
        self.worker.fetch_form(ticket, id);
        self.status.loading("form");
    }

    fn request_submissions(&mut self, key: SubmissionsKey) {
        let ticket = self.cache.begin(QueryKey::Submissions(key.clone()));
        self.worker.fetch_submissions(ticket, key);
        self.status.loading("submissions");
    }

    fn drain_api_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_api_event(event);
        }
    }

    pub(crate) fn apply_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Forms(ticket, result) => match result {
                Ok(forms) => {
                    if self.cache.accept(&ticket, QueryPayload::Forms(forms)) {
                        self.status.ready();
                    }
                }
                Err(error) => {
                    if self.cache.is_current(&ticket) {
                        self.status.set_raw(format!("Failed to load forms: {error}"));
                    }
                }
            },
            ApiEvent::Form(ticket, result) => match result {
                Ok(form) => {
                    let accepted = self.cache.accept(&ticket, QueryPayload::Form(form.clone()));
                    if accepted {
                        self.install_schema(form);
                        self.status.ready();
                    }
                }
                Err(error) => {
                    if self.cache.is_current(&ticket) {
                        self.status.set_raw(format!("Failed to load form: {error}"));
                    }
                }
            },
            ApiEvent::Submissions(ticket, result) => match result {
                Ok(page) => {
                    if self.cache.accept(&ticket, QueryPayload::Submissions(page)) {
                        self.status.ready();
                    }
                }
                Err(error) => {
                    if self.cache.is_current(&ticket) {
                        self.status
                            .set_raw(format!("Failed to load submissions: {error}"));
                    }
                }
            },
            ApiEvent::FormCreated(result) => match result {
                Ok(form) => {
                    self.cache.invalidate_forms();
                    self.status.set_raw(format!("Created form '{}'", form.title));
                    self.goto_overview();
                }
                Err(error) => {
                    self.status.set_raw(format!("Failed to save form: {error}"));
                }
            },
            ApiEvent::SubmissionAccepted { form_id, result } => {
                self.cache.invalidate_submissions(&form_id);
                let delay = self.options.return_delay;
                if let Screen::Fill {
                    form_id: current,
                    engine: Some(engine),
                    pending_return,
                } = &mut self.screen
                {
                    if *current == form_id {
                        match result {
                            Ok(_) => {
                                engine.finish_submit(Ok(()));
                                *pending_return = Some(Instant::now() + delay);
                                self.status.set_raw("Form submitted successfully!");
                            }
                            Err(error) => {
                                engine.finish_submit(Err(error.to_string()));
                                self.status.set_raw("Failed to submit form");
                            }
                        }
                    }
                }
            }
        }
    }

    /// Hand an arriving schema to a fill view still waiting for it.
    fn install_schema(&mut self, form: FormSchema) {
        if let Screen::Fill {
            form_id,
            engine: engine @ None,
            ..
        } = &mut self.screen
        {
            if *form_id == form.id {
                *engine = Some(FormEngine::new(form));
            }
        }
    }

    pub(crate) fn fire_pending_return(&mut self) {
        let due = match &self.screen {
            Screen::Fill {
                pending_return: Some(due),
                ..
            } => Some(*due),
            _ => None,
        };
        if due.is_some_and(|due| Instant::now() >= due) {
            self.goto_overview();
        }
    }

    // --- navigation -------------------------------------------------------

    fn goto_overview(&mut self) {
        self.screen = Screen::Overview { selected: 0 };
        self.request_forms();
    }

    pub(crate) fn open_fill(&mut self, form: FormSchema) {
        self.screen = Screen::Fill {
            form_id: form.id.clone(),
            engine: Some(FormEngine::new(form)),
            pending_return: None,
        };
        self.status.ready();
    }

    pub(crate) fn open_submissions(&mut self, form_id: String) {
        let mut key = SubmissionsKey::first_page(form_id);
        key.limit = self.options.page_size;
        self.request_submissions(key.clone());
        self.screen = Screen::Submissions {
            key,
            selected: 0,
            detail: None,
        };
    }

    // --- input ------------------------------------------------------------

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        match &mut self.screen {
            Screen::Overview { .. } => self.handle_overview_key(key),
            Screen::Fill { .. } => self.handle_fill_key(key),
            Screen::Build(_) => self.handle_build_key(key),
            Screen::Submissions { .. } => self.handle_submissions_key(key),
        }
    }

    fn handle_overview_key(&mut self, key: KeyEvent) {
        let form_count = self.cache.forms().map_or(0, |forms| forms.len());
        let Screen::Overview { selected } = &mut self.screen else {
            return;
        };
        match key.code {
            KeyCode::Up => *selected = selected.saturating_sub(1),
            KeyCode::Down => {
                if *selected + 1 < form_count {
                    *selected += 1;
                }
            }
            KeyCode::Enter => {
                let picked = self
                    .cache
                    .forms()
                    .and_then(|forms| forms.get(*selected))
                    .cloned();
                if let Some(form) = picked {
                    self.open_fill(form);
                }
            }
            KeyCode::Char('s') => {
                let picked = self
                    .cache
                    .forms()
                    .and_then(|forms| forms.get(*selected))
                    .map(|form| form.id.clone());
                if let Some(form_id) = picked {
                    self.open_submissions(form_id);
                }
            }
            KeyCode::Char('b') => {
                self.screen = Screen::Build(BuildScreen::new());
                self.status.set_raw("Building a new form");
            }
            KeyCode::Char('r') => self.request_forms(),
            _ => {}
        }
    }

    fn handle_fill_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc {
            self.goto_overview();
            return;
        }
        let Screen::Fill {
            engine: Some(engine),
            ..
        } = &mut self.screen
        else {
            return;
        };
        if ctrl && key.code == KeyCode::Char('s') {
            match engine.begin_submit() {
                Ok(payload) => {
                    self.worker.submit(payload);
                    self.status.submitting();
                }
                Err(SubmitBlocked::InFlight) => {
                    self.status.set_raw("A submission is already in flight");
                }
                Err(SubmitBlocked::Invalid(count)) => self.status.blocked(count),
            }
            return;
        }
        match key.code {
            KeyCode::Tab => engine.focus_next(),
            KeyCode::BackTab => engine.focus_prev(),
            _ => {
                if engine.handle_key(&key) {
                    let label = engine
                        .focused_field()
                        .map(|field| field.schema.label.clone())
                        .unwrap_or_default();
                    self.status.editing(&label);
                }
            }
        }
    }

    fn handle_build_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.goto_overview();
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let outcome: Option<Result<String, String>> = {
            let Screen::Build(build) = &mut self.screen else {
                return;
            };
            if ctrl {
                match key.code {
                    KeyCode::Char('a') => Some(
                        build
                            .stage_field()
                            .map(|()| "Field staged".to_string()),
                    ),
                    KeyCode::Char('e') => Some(
                        build
                            .load_selected()
                            .map(|()| "Editing staged field".to_string()),
                    ),
                    KeyCode::Char('d') => Some(
                        build
                            .remove_selected()
                            .map(|()| "Field removed".to_string()),
                    ),
                    KeyCode::Up => Some(build.move_selected(-1).map(|()| String::new())),
                    KeyCode::Down => Some(build.move_selected(1).map(|()| String::new())),
                    KeyCode::Char('n') => {
                        build.select(1);
                        None
                    }
                    KeyCode::Char('p') => {
                        build.select(-1);
                        None
                    }
                    KeyCode::Char('s') => match build.finish() {
                        Ok(schema) => {
                            self.worker.create_form(schema);
                            Some(Ok("Saving form…".to_string()))
                        }
                        Err(message) => Some(Err(message)),
                    },
                    _ => None,
                }
            } else {
                match key.code {
                    KeyCode::Tab => {
                        build.editor.focus_next();
                        None
                    }
                    KeyCode::BackTab => {
                        build.editor.focus_prev();
                        None
                    }
                    _ => {
                        build.editor.handle_key(&key);
                        None
                    }
                }
            }
        };
        match outcome {
            Some(Ok(message)) if !message.is_empty() => self.status.set_raw(message),
            Some(Err(message)) => self.status.set_raw(message),
            _ => {}
        }
    }

    fn handle_submissions_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            let Screen::Submissions { detail, .. } = &mut self.screen else {
                return;
            };
            // Esc dismisses an open detail before it leaves the screen.
            if detail.is_some() {
                *detail = None;
            } else {
                self.goto_overview();
            }
            return;
        }
        let requery: Option<SubmissionsKey> = {
            let Screen::Submissions {
                key: query,
                selected,
                detail,
            } = &mut self.screen
            else {
                return;
            };
            if detail.is_some() {
                return;
            }
            let page = self.cache.submissions(query);
            match key.code {
                KeyCode::Enter => {
                    let picked = page
                        .and_then(|page| page.submissions.get(*selected))
                        .cloned();
                    if let Some(submission) = picked {
                        let preview = self.cache.form(&query.form_id).cloned().map(|schema| {
                            let mut engine = FormEngine::new(schema);
                            engine.seed(&submission.data);
                            engine
                        });
                        *detail = Some(SubmissionDetail {
                            submission,
                            preview,
                        });
                    }
                    None
                }
                KeyCode::Up => {
                    *selected = selected.saturating_sub(1);
                    None
                }
                KeyCode::Down => {
                    let rows = page.map_or(0, |page| page.submissions.len());
                    if *selected + 1 < rows {
                        *selected += 1;
                    }
                    None
                }
                KeyCode::Left if query.page > 1 => {
                    let mut next = query.clone();
                    next.page -= 1;
                    Some(next)
                }
                KeyCode::Right => {
                    let more = page.is_none_or(|page| query.page < page.pagination.total_pages);
                    if more {
                        let mut next = query.clone();
                        next.page += 1;
                        Some(next)
                    } else {
                        None
                    }
                }
                KeyCode::Char('o') => {
                    let mut next = query.clone();
                    next.sort_order = next.sort_order.flipped();
                    next.page = 1;
                    Some(next)
                }
                KeyCode::Char('r') => Some(query.clone()),
                _ => None,
            }
        };
        if let Some(next) = requery {
            self.request_submissions(next.clone());
            self.screen = Screen::Submissions {
                key: next,
                selected: 0,
                detail: None,
            };
        }
    }

    // --- view -------------------------------------------------------------

    fn body_view(&self) -> BodyView<'_> {
        match &self.screen {
            Screen::Overview { selected } => BodyView::Overview {
                forms: self.cache.forms(),
                selected: *selected,
            },
            Screen::Fill { engine, .. } => BodyView::Fill {
                engine: engine.as_ref(),
            },
            Screen::Build(build) => BodyView::Build {
                editor: &build.editor,
                staged: build.builder.draft(),
                selected: build.selected,
            },
            Screen::Submissions {
                key,
                selected,
                detail,
            } => BodyView::Submissions {
                schema: self.cache.form(&key.form_id),
                page: self.cache.submissions(key),
                key,
                selected: *selected,
                detail: detail.as_ref().map(|detail| SubmissionDetailView {
                    submission: &detail.submission,
                    preview: detail.preview.as_ref(),
                }),
            },
        }
    }

    fn chrome(&self) -> ChromeContext<'_> {
        let help = match &self.screen {
            Screen::Overview { .. } => {
                "Enter fill • s submissions • b build • r refresh • Ctrl+Q quit"
            }
            Screen::Fill { .. } => "Tab/Shift+Tab fields • Ctrl+S submit • Esc back",
            Screen::Build(_) => {
                "Ctrl+A stage • Ctrl+E edit • Ctrl+D delete • Ctrl+↑/↓ move • Ctrl+S save • Esc back"
            }
            Screen::Submissions { detail: Some(_), .. } => "Esc close",
            Screen::Submissions { .. } => {
                "Enter view • ←/→ page • o sort order • r refresh • Esc back"
            }
        };
        ChromeContext {
            status: self.status.message(),
            help,
        }
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn cache_mut(&mut self) -> &mut QueryCache {
        &mut self.cache
    }

    pub(crate) fn on_overview(&self) -> bool {
        matches!(self.screen, Screen::Overview { .. })
    }

    pub(crate) fn return_pending(&self) -> bool {
        matches!(
            self.screen,
            Screen::Fill {
                pending_return: Some(_),
                ..
            }
        )
    }

    pub(crate) fn submission_detail(&self) -> Option<&SubmissionDetail> {
        match &self.screen {
            Screen::Submissions { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}
