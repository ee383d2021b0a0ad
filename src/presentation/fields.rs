//! Field list rendering: one block of lines per field, dispatched on the
//! field's input variant. Unknown-typed fields contribute no lines at all.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::form::{FieldInput, FieldState, FormEngine, Touch};

pub fn render_fields(frame: &mut Frame<'_>, area: Rect, engine: &FormEngine, title: &str) {
    if engine.fields().is_empty() {
        let placeholder = List::new([ListItem::new("This form has no fields")])
            .block(Block::default().title(title.to_string()).borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let width = area.width.saturating_sub(4);
    let items: Vec<ListItem<'_>> = engine
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| ListItem::new(field_lines(field, idx == engine.focus(), width)))
        .collect();

    let mut state = ListState::default();
    state.select(Some(engine.focus()));

    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);
}

/// Lines for one field: label (with required marker), a value panel per input
/// variant, and the error underneath once the field has been touched.
pub(crate) fn field_lines(field: &FieldState, focused: bool, width: u16) -> Vec<Line<'static>> {
    if matches!(field.input, FieldInput::Static) {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut label = field.schema.label.clone();
    if field.schema.required {
        label.push_str(" *");
    }
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(label, label_style)));

    match &field.input {
        FieldInput::Text(buffer) => lines.push(text_panel(field, buffer, focused, width)),
        FieldInput::Select { options, selected } => {
            let shown = selected
                .and_then(|idx| options.get(idx).cloned())
                .unwrap_or_else(|| "(none)".to_string());
            lines.push(Line::from(Span::raw(format!("  ‹ {shown} ›"))));
        }
        FieldInput::MultiSelect {
            options,
            chosen,
            cursor,
        } => {
            for (idx, option) in options.iter().enumerate() {
                let mark = if chosen.iter().any(|entry| entry == option) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let pointer = if focused && idx == *cursor { "›" } else { " " };
                lines.push(Line::from(Span::raw(format!("  {pointer}{mark} {option}"))));
            }
            if options.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  (no options declared)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        FieldInput::Toggle(flag) => {
            let shown = if *flag { "[on]" } else { "[off]" };
            lines.push(Line::from(Span::raw(format!("  {shown}"))));
        }
        FieldInput::Static => unreachable!("filtered above"),
    }

    if field.touch == Touch::Touched {
        if let Some(error) = &field.error {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {error}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines
}

fn text_panel(field: &FieldState, buffer: &str, focused: bool, width: u16) -> Line<'static> {
    let budget = width.saturating_sub(4) as usize;
    if buffer.is_empty() && !focused {
        let hint = field
            .schema
            .placeholder
            .clone()
            .unwrap_or_else(|| "(empty)".to_string());
        return Line::from(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let shown = clip_tail(buffer, budget);
    let mut spans = vec![Span::raw(format!("  {shown}"))];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

/// Keep the end of the buffer visible when it exceeds the panel width.
fn clip_tail(buffer: &str, budget: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    if buffer.width() <= budget {
        return buffer.to_string();
    }
    let mut clipped: String = buffer.chars().rev().collect::<String>();
    let mut taken = String::new();
    let mut used = 0usize;
    for ch in clipped.drain(..) {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget.saturating_sub(1) {
            break;
        }
        used += w;
        taken.push(ch);
    }
    let mut tail: String = taken.chars().rev().collect();
    tail.insert(0, '…');
    tail
}
