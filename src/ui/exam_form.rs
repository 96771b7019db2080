use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{draw_help_bar, draw_title_bar, error_line, field_line};
use crate::app::{App, ExamField, ExamFormState};

pub fn draw_exam_form(f: &mut Frame, app: &App) {
    let Some(state) = app.exam_form.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = if state.is_editing() {
        "Edit Exam"
    } else {
        "New Exam"
    };
    draw_title_bar(f, chunks[0], title);

    let width = chunks[1].width.saturating_sub(20) as usize;
    let mut lines = Vec::new();
    if let Some(error) = &state.error {
        lines.push(error_line(error));
        lines.push(Line::from(""));
    }
    for field in ExamField::ORDER {
        lines.push(form_field_line(state, field, width));
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Exam details"),
    );
    f.render_widget(body, chunks[1]);

    draw_help_bar(
        f,
        chunks[2],
        &[
            ("Tab/↑↓", "Field"),
            ("←/→", "Cycle type"),
            ("Ctrl+S", "Save"),
            ("Esc", "Cancel"),
        ],
    );
}

fn form_field_line(state: &ExamFormState, field: ExamField, width: usize) -> Line<'static> {
    let focused = state.focus == field;

    let value = match field {
        ExamField::Title => &state.form.title,
        ExamField::Duration => &state.form.duration,
        ExamField::TotalPoints => &state.form.total_points,
        ExamField::Description => &state.form.description,
        ExamField::Instructions => &state.form.instructions,
        ExamField::Kind => {
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
            return Line::from(vec![
                Span::styled(
                    format!("{:<16}", field.label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(value, style),
            ]);
        }
    };
    field_line(field.label(), value, focused, state.cursor, width)
}
