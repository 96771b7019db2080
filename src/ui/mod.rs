use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, PendingDelete};
use crate::router::View;
use crate::utils::{input_window, truncate_string};

mod exam_detail;
mod exam_form;
mod exam_list;
mod question_form;

pub use exam_detail::draw_exam_detail;
pub use exam_form::draw_exam_form;
pub use exam_list::draw_exam_list;
pub use question_form::draw_question_form;

pub fn draw(f: &mut Frame, app: &App) {
    match app.router.view {
        View::List => draw_exam_list(f, app),
        View::Detail => draw_exam_detail(f, app),
        View::ExamForm => draw_exam_form(f, app),
        View::QuestionForm => draw_question_form(f, app),
    }

    if let Some(pending) = &app.pending_delete {
        draw_delete_confirmation(f, pending);
    }
}

pub(crate) fn format_iso_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn format_millis_date(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Teacher-of-keys help bar: alternating highlighted key and plain action.
pub(crate) fn help_line(entries: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in entries {
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::from(format!(" {}  ", action)));
    }
    Line::from(spans)
}

pub(crate) fn draw_help_bar(f: &mut Frame, area: Rect, entries: &[(&str, &str)]) {
    let help = Paragraph::new(vec![help_line(entries)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

pub(crate) fn draw_title_bar(f: &mut Frame, area: Rect, title: &str) {
    let bar = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}

pub(crate) fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    ))
}

/// One form field as a single line. The focused field shows a cursor cell
/// and scrolls horizontally when the value outgrows the width.
pub(crate) fn field_line(
    label: &str,
    value: &str,
    focused: bool,
    cursor: usize,
    width: usize,
) -> Line<'static> {
    let label_span = Span::styled(
        format!("{:<16}", label),
        Style::default().fg(Color::DarkGray),
    );

    if !focused {
        return Line::from(vec![
            label_span,
            Span::from(truncate_string(value, width.max(4))),
        ]);
    }

    let (visible, offset) = input_window(value, cursor, width.max(4));
    let chars: Vec<char> = visible.chars().collect();
    let before: String = chars[..offset].iter().collect();
    let at: String = chars
        .get(offset)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = chars.get(offset + 1..).unwrap_or(&[]).iter().collect();

    let focused_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        label_span,
        Span::styled(before, focused_style),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::styled(after, focused_style),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_delete_confirmation(f: &mut Frame, pending: &PendingDelete) {
    let message = match pending {
        PendingDelete::Exam { title, .. } => {
            let title = if title.is_empty() {
                "Untitled exam".to_string()
            } else {
                truncate_string(title, 40)
            };
            format!("Delete exam \"{}\" and its questions?", title)
        }
        PendingDelete::Question { .. } => "Delete this question?".to_string(),
    };

    let area = centered_rect((message.len() as u16 + 6).max(30), 5, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(message),
        Line::from(""),
        help_line(&[("y", "Delete"), ("n", "Cancel")]),
    ];
    let popup = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm")
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(popup, area);
}
