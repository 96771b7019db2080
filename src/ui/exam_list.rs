use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::{draw_help_bar, draw_title_bar, error_line, format_iso_date, help_line};
use crate::app::App;
use crate::models::{Exam, ExamKind};
use crate::utils::truncate_string;

pub(crate) fn format_exam_item(exam: &Exam, question_count: usize) -> String {
    let title = if exam.title.is_empty() {
        "Untitled exam"
    } else {
        &exam.title
    };
    let mut item = truncate_string(title, 40);

    if exam.kind != ExamKind::Unset {
        item.push_str(&format!(" [{}]", exam.kind.label()));
    }
    if let Some(category) = &exam.duration {
        item.push_str(&format!(" ({})", category));
    }
    item.push_str(&format!(" - {} questions", question_count));
    if let Some(created) = &exam.created_at {
        item.push_str(&format!(" - {}", format_iso_date(created)));
    }

    item
}

pub fn draw_exam_list(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_title_bar(f, chunks[0], "Exam Manager v0.1.0");

    if let Some(error) = &app.load_error {
        let lines = vec![
            error_line(error),
            Line::from(""),
            help_line(&[("r", "Retry")]),
        ];
        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(panel, chunks[1]);
    } else if app.exams.is_empty() {
        let empty = Paragraph::new("No exams yet - press n to create the first one")
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(Block::default().borders(Borders::ALL).title("Exams"));
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .exams
            .iter()
            .enumerate()
            .map(|(i, exam)| {
                let count = app.question_counts.get(&exam.id).copied().unwrap_or(0);
                let style = if i == app.exam_cursor {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format_exam_item(exam, count)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Exams"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_widget(list, chunks[1]);
    }

    draw_help_bar(
        f,
        chunks[2],
        &[
            ("↑/↓", "Navigate"),
            ("Enter", "View"),
            ("e", "Edit"),
            ("n", "New"),
            ("d", "Delete"),
            ("r", "Reload"),
            ("q", "Quit"),
        ],
    );
}
