use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::{draw_help_bar, error_line, format_iso_date, format_millis_date, help_line};
use crate::app::App;
use crate::models::{Exam, Question, QuestionType};
use crate::router::DetailMode;
use crate::utils::{letter_label, truncate_string};

pub fn draw_exam_detail(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    if let Some(error) = &app.load_error {
        let lines = vec![
            error_line(error),
            Line::from(""),
            help_line(&[("r", "Retry"), ("Esc", "Back")]),
        ];
        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(panel, chunks[1]);
        draw_help_bar(f, chunks[2], &[("r", "Retry"), ("Esc", "Back")]);
        return;
    }

    let detail = app.detail.as_ref();
    let exam = detail.and_then(|d| d.exam.as_ref());

    let Some(exam) = exam else {
        let missing = Paragraph::new("Exam not found")
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(missing, chunks[1]);
        draw_help_bar(f, chunks[2], &[("Esc", "Back")]);
        return;
    };

    let questions: &[Question] = detail.map(|d| d.questions.as_slice()).unwrap_or(&[]);

    let header = Paragraph::new(exam_header_lines(exam, questions.len()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Exam"));
    f.render_widget(header, chunks[0]);

    if questions.is_empty() {
        let hint = if app.router.mode == DetailMode::Edit {
            "No questions yet - press n to create the first one"
        } else {
            "No questions yet"
        };
        let empty = Paragraph::new(hint)
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(Block::default().borders(Borders::ALL).title("Questions"));
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| question_item(q, i, i == app.question_cursor))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Questions"));
        f.render_widget(list, chunks[1]);
    }

    if app.router.mode == DetailMode::Edit {
        draw_help_bar(
            f,
            chunks[2],
            &[
                ("↑/↓", "Select"),
                ("Enter", "Edit question"),
                ("n", "New question"),
                ("d", "Delete question"),
                ("e", "Edit exam"),
                ("Esc", "Back"),
            ],
        );
    } else {
        draw_help_bar(f, chunks[2], &[("↑/↓", "Scroll"), ("Esc", "Back")]);
    }
}

fn exam_header_lines(exam: &Exam, question_count: usize) -> Vec<Line<'static>> {
    let title = if exam.title.is_empty() {
        "Untitled exam".to_string()
    } else {
        exam.title.clone()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ({} questions)", question_count),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    if !exam.description.is_empty() {
        lines.push(Line::from(exam.description.clone()));
    }

    let mut facts = vec![format!("Type: {}", exam.kind.label())];
    if let Some(category) = &exam.duration {
        facts.push(format!("Category: {}", category));
    }
    if let Some(points) = exam.total_points {
        facts.push(format!("Total points: {}", points));
    }
    lines.push(Line::from(facts.join("   ")));

    let mut dates = Vec::new();
    if let Some(created) = &exam.created_at {
        dates.push(format!("Created: {}", format_iso_date(created)));
    }
    if let Some(updated) = &exam.updated_at {
        dates.push(format!("Updated: {}", format_iso_date(updated)));
    }
    if !dates.is_empty() {
        lines.push(Line::from(Span::styled(
            dates.join("   "),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if !exam.instructions.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_string(&exam.instructions, 100),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

/// Renders one question with its alternatives. The correct option is picked
/// jointly from the stored index and the alternatives sequence; legacy
/// letter-keyed records resolve their letter to a position first.
fn question_item(question: &Question, index: usize, selected: bool) -> ListItem<'static> {
    let marker_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut heading = format!("Question {} [{}]", index + 1, question.kind.label());
    if let Some(points) = question.points {
        heading.push_str(&format!(" ({} pts)", points));
    }
    if let Some(created) = question.created_at {
        heading.push_str(&format!(" - added {}", format_millis_date(created)));
    }

    let mut lines = vec![
        Line::from(Span::styled(heading, marker_style)),
        Line::from(format!(
            "  {}",
            truncate_string(question.display_text(), 100)
        )),
    ];

    let correct = question.correct_answer.as_ref().and_then(|r| r.index());

    if let Some(options) = &question.options {
        // Legacy record: letter-keyed map, shown in its natural key order.
        for (i, (key, value)) in options.iter().enumerate() {
            lines.push(alternative_line(
                key.to_uppercase(),
                value.clone(),
                correct == Some(i),
            ));
        }
    } else if question.kind == QuestionType::MultipleChoice
        && let Some(alternatives) = &question.alternatives
    {
        for (i, alt) in alternatives.iter().enumerate() {
            lines.push(alternative_line(
                letter_label(i).to_string(),
                alt.clone(),
                correct == Some(i),
            ));
        }
    }

    if let Some(explanation) = question
        .explanation
        .as_deref()
        .or(question.comment.as_deref())
        && !explanation.is_empty()
    {
        lines.push(Line::from(Span::styled(
            format!("  Explanation: {}", truncate_string(explanation, 90)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn alternative_line(label: String, text: String, correct: bool) -> Line<'static> {
    if correct {
        Line::from(Span::styled(
            format!("    {}) {} *", label, text),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(format!("    {}) {}", label, text))
    }
}
