use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::api::SubmissionsKey;
use crate::domain::{FormSchema, Submission, SubmissionPage};
use crate::form::{FormEngine, SubmitOutcome};

use super::fields::render_fields;

pub struct ChromeContext<'a> {
    pub status: &'a str,
    pub help: &'a str,
}

/// One opened submission: the stored record plus, when the form schema is
/// cached, a read-only engine seeded with its values.
pub struct SubmissionDetailView<'a> {
    pub submission: &'a Submission,
    pub preview: Option<&'a FormEngine>,
}

pub enum BodyView<'a> {
    Overview {
        forms: Option<&'a [FormSchema]>,
        selected: usize,
    },
    Fill {
        engine: Option<&'a FormEngine>,
    },
    Build {
        editor: &'a FormEngine,
        staged: &'a FormSchema,
        selected: usize,
    },
    Submissions {
        schema: Option<&'a FormSchema>,
        page: Option<&'a SubmissionPage>,
        key: &'a SubmissionsKey,
        selected: usize,
        detail: Option<SubmissionDetailView<'a>>,
    },
}

pub fn draw(frame: &mut Frame<'_>, body: BodyView<'_>, chrome: ChromeContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(3)])
        .split(frame.area());

    match body {
        BodyView::Overview { forms, selected } => render_overview(frame, chunks[0], forms, selected),
        BodyView::Fill { engine } => render_fill(frame, chunks[0], engine),
        BodyView::Build {
            editor,
            staged,
            selected,
        } => render_build(frame, chunks[0], editor, staged, selected),
        BodyView::Submissions {
            schema,
            page,
            key,
            selected,
            detail,
        } => match detail {
            Some(detail) => render_submission_detail(frame, chunks[0], &detail),
            None => render_submissions(frame, chunks[0], schema, page, key, selected),
        },
    }

    render_footer(frame, chunks[1], &chrome);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, chrome: &ChromeContext<'_>) {
    let lines = vec![
        Line::from(Span::raw(chrome.status.to_string())),
        Line::from(Span::styled(
            chrome.help.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_overview(
    frame: &mut Frame<'_>,
    area: Rect,
    forms: Option<&[FormSchema]>,
    selected: usize,
) {
    let block = Block::default().title("Forms").borders(Borders::ALL);
    let Some(forms) = forms else {
        frame.render_widget(Paragraph::new("Loading forms…").block(block), area);
        return;
    };
    if forms.is_empty() {
        frame.render_widget(
            Paragraph::new("No forms yet. Press 'b' to build one.").block(block),
            area,
        );
        return;
    }
    let items: Vec<ListItem<'_>> = forms
        .iter()
        .map(|form| {
            let meta = format!("{} field(s)", form.fields.len());
            ListItem::new(vec![
                Line::from(Span::styled(
                    form.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {} ({})", form.description, meta),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(selected.min(forms.len() - 1)));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_fill(frame: &mut Frame<'_>, area: Rect, engine: Option<&FormEngine>) {
    // Navigating here without a schema is a safe empty state, not an error.
    let Some(engine) = engine else {
        let empty = Paragraph::new("No form loaded.")
            .block(Block::default().title("Fill").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let banner_height = if engine.outcome().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(3),
        ])
        .split(area);

    let schema = engine.schema();
    let description = textwrap::wrap(&schema.description, area.width.saturating_sub(2) as usize)
        .first()
        .map(|line| line.to_string())
        .unwrap_or_default();
    let header = Paragraph::new(description)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(schema.title.clone())
                .borders(Borders::ALL),
        );
    frame.render_widget(header, chunks[0]);

    if let Some(outcome) = engine.outcome() {
        let (text, color) = match outcome {
            SubmitOutcome::Success => ("Form submitted successfully!".to_string(), Color::Green),
            SubmitOutcome::Failed(message) => (format!("✗ {message}"), Color::Red),
        };
        let banner = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(banner, chunks[1]);
    }

    render_fields(frame, chunks[2], engine, "Fields");
}

fn render_build(
    frame: &mut Frame<'_>,
    area: Rect,
    editor: &FormEngine,
    staged: &FormSchema,
    selected: usize,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_fields(frame, columns[0], editor, "Form Editor");

    let block = Block::default()
        .title(format!("Staged Fields ({})", staged.fields.len()))
        .borders(Borders::ALL);
    if staged.fields.is_empty() {
        frame.render_widget(Paragraph::new("No fields staged yet").block(block), columns[1]);
        return;
    }
    let items: Vec<ListItem<'_>> = staged
        .fields
        .iter()
        .map(|field| {
            let required = if field.required { " (Required)" } else { "" };
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{}. {}", field.order, field.label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("   {}{}", field.kind.as_str(), required),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(selected.min(staged.fields.len() - 1)));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("⋮⋮");
    frame.render_stateful_widget(list, columns[1], &mut state);
}

fn render_submissions(
    frame: &mut Frame<'_>,
    area: Rect,
    schema: Option<&FormSchema>,
    page: Option<&SubmissionPage>,
    key: &SubmissionsKey,
    selected: usize,
) {
    let title = schema
        .map(|schema| format!("Submissions: {}", schema.title))
        .unwrap_or_else(|| "Submissions".to_string());
    let block = Block::default().title(title).borders(Borders::ALL);

    let Some(page) = page else {
        frame.render_widget(Paragraph::new("Loading submissions…").block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    if page.submissions.is_empty() {
        frame.render_widget(Paragraph::new("No submissions yet").block(block), chunks[0]);
    } else {
        let budget = area.width.saturating_sub(6) as usize;
        let items: Vec<ListItem<'_>> = page
            .submissions
            .iter()
            .map(|submission| {
                let when = submission.created_at.format("%Y-%m-%d %H:%M");
                let summary = summarize_values(submission, budget);
                ListItem::new(vec![
                    Line::from(Span::styled(
                        format!("{when}  #{}", submission.id),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {summary}"),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default();
        state.select(Some(selected.min(page.submissions.len() - 1)));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("» ");
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    let pager = format!(
        "Page {} of {} • {} total • sort {} {}",
        page.pagination.page,
        page.pagination.total_pages,
        page.pagination.total_count,
        key.sort_by,
        key.sort_order.as_str(),
    );
    frame.render_widget(
        Paragraph::new(pager).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

fn render_submission_detail(frame: &mut Frame<'_>, area: Rect, detail: &SubmissionDetailView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let when = detail.submission.created_at.format("%Y-%m-%d %H:%M:%S");
    let header = Paragraph::new(vec![
        Line::from(Span::raw(format!("Submitted {when}"))),
        Line::from(Span::styled(
            format!("#{}", detail.submission.id),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().title("Submission").borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    match detail.preview {
        Some(engine) => render_fields(frame, chunks[1], engine, "Values"),
        // Schema not cached: fall back to raw name/value rows.
        None => {
            let items: Vec<ListItem<'_>> = detail
                .submission
                .data
                .iter()
                .map(|(name, value)| {
                    let rendered = match value {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    ListItem::new(format!("{name}: {rendered}"))
                })
                .collect();
            let list =
                List::new(items).block(Block::default().title("Values").borders(Borders::ALL));
            frame.render_widget(list, chunks[1]);
        }
    }
}

fn summarize_values(submission: &Submission, budget: usize) -> String {
    let mut summary = String::new();
    for (name, value) in &submission.data {
        let rendered = match value {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let entry = if summary.is_empty() {
            format!("{name}={rendered}")
        } else {
            format!(", {name}={rendered}")
        };
        if summary.width() + entry.width() > budget {
            summary.push('…');
            break;
        }
        summary.push_str(&entry);
    }
    summary
}
