use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{draw_help_bar, draw_title_bar, error_line, field_line};
use crate::app::{App, QuestionField, QuestionFormState};
use crate::models::QuestionType;
use crate::utils::letter_label;

pub fn draw_question_form(f: &mut Frame, app: &App) {
    let Some(state) = app.question_form.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = if state.is_editing() {
        "Edit Question"
    } else {
        "New Question"
    };
    draw_title_bar(f, chunks[0], title);

    let width = chunks[1].width.saturating_sub(22) as usize;
    let mut lines = Vec::new();
    if let Some(error) = &state.error {
        lines.push(error_line(error));
        lines.push(Line::from(""));
    }

    lines.push(kind_line(state));
    lines.push(plain_field(state, QuestionField::Points, width));
    lines.push(plain_field(state, QuestionField::Text, width));
    lines.push(plain_field(state, QuestionField::AssociatedText, width));
    lines.push(plain_field(state, QuestionField::Category, width));

    if state.form.kind == QuestionType::MultipleChoice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Alternatives (Ctrl+K marks the correct one)",
            Style::default().fg(Color::DarkGray),
        )));
        for (i, _) in state.form.alternatives.iter().enumerate() {
            lines.push(alternative_field(state, i, width));
        }
    }

    lines.push(Line::from(""));
    lines.push(plain_field(state, QuestionField::Explanation, width));
    lines.push(plain_field(state, QuestionField::CreatedBy, width));

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Question details"),
    );
    f.render_widget(body, chunks[1]);

    draw_help_bar(
        f,
        chunks[2],
        &[
            ("Tab/↑↓", "Field"),
            ("←/→", "Cycle type"),
            ("Ctrl+N", "Add alt"),
            ("Ctrl+D", "Remove alt"),
            ("Ctrl+K", "Correct"),
            ("Ctrl+S", "Save"),
            ("Esc", "Cancel"),
        ],
    );
}

fn kind_line(state: &QuestionFormState) -> Line<'static> {
    let focused = state.focus == QuestionField::Kind;
    let value = if focused {
        format!("< {} >", state.form.kind.label())
    } else {
        state.form.kind.label().to_string()
    };
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(
            format!("{:<16}", QuestionField::Kind.label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, style),
    ])
}

fn plain_field(state: &QuestionFormState, field: QuestionField, width: usize) -> Line<'static> {
    let value = match field {
        QuestionField::Points => &state.form.points,
        QuestionField::Text => &state.form.text,
        QuestionField::AssociatedText => &state.form.associated_text,
        QuestionField::Category => &state.form.category,
        QuestionField::Explanation => &state.form.explanation,
        QuestionField::CreatedBy => &state.form.created_by,
        QuestionField::Kind | QuestionField::Alternative(_) => return Line::from(""),
    };
    field_line(field.label(), value, state.focus == field, state.cursor, width)
}

fn alternative_field(state: &QuestionFormState, index: usize, width: usize) -> Line<'static> {
    let correct = state.form.correct_answer == Some(index);
    let marker = if correct { "*" } else { " " };
    let label = format!("  {} {})", marker, letter_label(index));
    let value = state
        .form
        .alternatives
        .get(index)
        .map(String::as_str)
        .unwrap_or("");

    let mut line = field_line(
        &label,
        value,
        state.focus == QuestionField::Alternative(index),
        state.cursor,
        width,
    );
    if correct && let Some(first) = line.spans.first_mut() {
        first.style = Style::default().fg(Color::Green);
    }
    line
}
