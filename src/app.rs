use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rusqlite::Connection;

use crate::forms::{ExamForm, QuestionForm};
use crate::logger;
use crate::models::{Exam, Question, QuestionType};
use crate::router::{self, DetailMode, NavEvent, Router, View};
use crate::store::{self, StoreError};
use crate::utils::{delete_char_before, insert_char};

/// Everything the detail screen needs. `exam` is None when the id no longer
/// resolves (deleted elsewhere).
#[derive(Debug, Default)]
pub struct DetailData {
    pub exam: Option<Exam>,
    pub questions: Vec<Question>,
}

/// Armed by the delete key, resolved by the confirmation popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Exam { id: String, title: String },
    Question { exam_id: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamField {
    Title,
    Kind,
    Duration,
    TotalPoints,
    Description,
    Instructions,
}

impl ExamField {
    pub const ORDER: [ExamField; 6] = [
        ExamField::Title,
        ExamField::Kind,
        ExamField::Duration,
        ExamField::TotalPoints,
        ExamField::Description,
        ExamField::Instructions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExamField::Title => "Title",
            ExamField::Kind => "Type",
            ExamField::Duration => "Category",
            ExamField::TotalPoints => "Total points",
            ExamField::Description => "Description",
            ExamField::Instructions => "Instructions",
        }
    }
}

#[derive(Debug)]
pub struct ExamFormState {
    /// Some means the save goes through the update path.
    pub exam_id: Option<String>,
    pub original: Option<Exam>,
    pub form: ExamForm,
    pub focus: ExamField,
    pub cursor: usize,
    pub error: Option<String>,
}

impl ExamFormState {
    pub fn create() -> Self {
        ExamFormState {
            exam_id: None,
            original: None,
            form: ExamForm::default(),
            focus: ExamField::Title,
            cursor: 0,
            error: None,
        }
    }

    pub fn edit(exam_id: String, original: Option<Exam>) -> Self {
        let form = original
            .as_ref()
            .map(ExamForm::from_record)
            .unwrap_or_default();
        let cursor = form.title.chars().count();
        ExamFormState {
            exam_id: Some(exam_id),
            original,
            form,
            focus: ExamField::Title,
            cursor,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.exam_id.is_some()
    }

    pub fn focused_text(&self) -> Option<&String> {
        match self.focus {
            ExamField::Title => Some(&self.form.title),
            ExamField::Kind => None,
            ExamField::Duration => Some(&self.form.duration),
            ExamField::TotalPoints => Some(&self.form.total_points),
            ExamField::Description => Some(&self.form.description),
            ExamField::Instructions => Some(&self.form.instructions),
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            ExamField::Title => Some(&mut self.form.title),
            ExamField::Kind => None,
            ExamField::Duration => Some(&mut self.form.duration),
            ExamField::TotalPoints => Some(&mut self.form.total_points),
            ExamField::Description => Some(&mut self.form.description),
            ExamField::Instructions => Some(&mut self.form.instructions),
        }
    }

    fn reset_cursor(&mut self) {
        self.cursor = self
            .focused_text()
            .map(|text| text.chars().count())
            .unwrap_or(0);
    }

    fn focus_step(&mut self, forward: bool) {
        let order = ExamField::ORDER;
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
        self.reset_cursor();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => self.focus_step(true),
            KeyCode::BackTab | KeyCode::Up => self.focus_step(false),
            KeyCode::Left => {
                if self.focus == ExamField::Kind {
                    self.form.kind = self.form.kind.cycle();
                } else if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                if self.focus == ExamField::Kind {
                    self.form.kind = self.form.kind.cycle();
                } else {
                    let len = self.focused_text().map(|t| t.chars().count()).unwrap_or(0);
                    if self.cursor < len {
                        self.cursor += 1;
                    }
                }
            }
            KeyCode::Backspace => {
                let cursor = self.cursor;
                if let Some(text) = self.focused_text_mut() {
                    self.cursor = delete_char_before(text, cursor);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let cursor = self.cursor;
                if let Some(text) = self.focused_text_mut() {
                    self.cursor = insert_char(text, cursor, c);
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    Kind,
    Points,
    Text,
    AssociatedText,
    Category,
    Alternative(usize),
    Explanation,
    CreatedBy,
}

impl QuestionField {
    pub fn label(self) -> &'static str {
        match self {
            QuestionField::Kind => "Type",
            QuestionField::Points => "Points",
            QuestionField::Text => "Text",
            QuestionField::AssociatedText => "Associated text",
            QuestionField::Category => "Category",
            QuestionField::Alternative(_) => "Alternative",
            QuestionField::Explanation => "Explanation",
            QuestionField::CreatedBy => "Created by",
        }
    }
}

#[derive(Debug)]
pub struct QuestionFormState {
    pub exam_id: String,
    /// Some means the save goes through the update path.
    pub original: Option<Question>,
    pub form: QuestionForm,
    pub focus: QuestionField,
    pub cursor: usize,
    pub error: Option<String>,
}

impl QuestionFormState {
    pub fn create(exam_id: String) -> Self {
        QuestionFormState {
            exam_id,
            original: None,
            form: QuestionForm::default(),
            focus: QuestionField::Text,
            cursor: 0,
            error: None,
        }
    }

    pub fn edit(exam_id: String, question: Question) -> Self {
        let form = QuestionForm::from_record(&question);
        let cursor = form.text.chars().count();
        QuestionFormState {
            exam_id,
            original: Some(question),
            form,
            focus: QuestionField::Text,
            cursor,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.original.is_some()
    }

    /// Focusable fields for the current type; alternatives only exist for
    /// multiple choice.
    pub fn field_order(&self) -> Vec<QuestionField> {
        let mut fields = vec![
            QuestionField::Kind,
            QuestionField::Points,
            QuestionField::Text,
            QuestionField::AssociatedText,
            QuestionField::Category,
        ];
        if self.form.kind == QuestionType::MultipleChoice {
            for i in 0..self.form.alternatives.len() {
                fields.push(QuestionField::Alternative(i));
            }
        }
        fields.push(QuestionField::Explanation);
        fields.push(QuestionField::CreatedBy);
        fields
    }

    pub fn focused_text(&self) -> Option<&String> {
        match self.focus {
            QuestionField::Kind => None,
            QuestionField::Points => Some(&self.form.points),
            QuestionField::Text => Some(&self.form.text),
            QuestionField::AssociatedText => Some(&self.form.associated_text),
            QuestionField::Category => Some(&self.form.category),
            QuestionField::Alternative(i) => self.form.alternatives.get(i),
            QuestionField::Explanation => Some(&self.form.explanation),
            QuestionField::CreatedBy => Some(&self.form.created_by),
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            QuestionField::Kind => None,
            QuestionField::Points => Some(&mut self.form.points),
            QuestionField::Text => Some(&mut self.form.text),
            QuestionField::AssociatedText => Some(&mut self.form.associated_text),
            QuestionField::Category => Some(&mut self.form.category),
            QuestionField::Alternative(i) => self.form.alternatives.get_mut(i),
            QuestionField::Explanation => Some(&mut self.form.explanation),
            QuestionField::CreatedBy => Some(&mut self.form.created_by),
        }
    }

    fn reset_cursor(&mut self) {
        self.cursor = self
            .focused_text()
            .map(|text| text.chars().count())
            .unwrap_or(0);
    }

    fn focus_step(&mut self, forward: bool) {
        let order = self.field_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
        self.reset_cursor();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => {
                    if self.form.kind == QuestionType::MultipleChoice {
                        self.form.add_alternative();
                    }
                }
                KeyCode::Char('d') => {
                    if let QuestionField::Alternative(i) = self.focus {
                        self.form.remove_alternative(i);
                        if i >= self.form.alternatives.len() {
                            self.focus =
                                QuestionField::Alternative(self.form.alternatives.len() - 1);
                        }
                        self.reset_cursor();
                    }
                }
                KeyCode::Char('k') => {
                    if let QuestionField::Alternative(i) = self.focus {
                        self.form.correct_answer = Some(i);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => self.focus_step(true),
            KeyCode::BackTab | KeyCode::Up => self.focus_step(false),
            KeyCode::Left | KeyCode::Right if self.focus == QuestionField::Kind => {
                self.form.kind = self.form.kind.cycle();
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let len = self.focused_text().map(|t| t.chars().count()).unwrap_or(0);
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Backspace => {
                let cursor = self.cursor;
                if let Some(text) = self.focused_text_mut() {
                    self.cursor = delete_char_before(text, cursor);
                }
            }
            KeyCode::Char(c) => {
                let cursor = self.cursor;
                if let Some(text) = self.focused_text_mut() {
                    self.cursor = insert_char(text, cursor, c);
                }
            }
            _ => {}
        }
    }
}

/// Application state: the router plus whatever the active view needs.
/// All persistence runs synchronously inside the key handlers, so a view is
/// never torn down with a call still in flight.
pub struct App {
    pub router: Router,
    pub exams: Vec<Exam>,
    pub question_counts: HashMap<String, usize>,
    pub exam_cursor: usize,
    pub detail: Option<DetailData>,
    pub question_cursor: usize,
    pub exam_form: Option<ExamFormState>,
    pub question_form: Option<QuestionFormState>,
    /// Read failure shown by the active view; retried manually.
    pub load_error: Option<String>,
    pub pending_delete: Option<PendingDelete>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        App {
            router: Router::new(),
            exams: Vec::new(),
            question_counts: HashMap::new(),
            exam_cursor: 0,
            detail: None,
            question_cursor: 0,
            exam_form: None,
            question_form: None,
            load_error: None,
            pending_delete: None,
            should_quit: false,
        }
    }

    /// Feeds an event through the router; on acceptance the target view's
    /// data is (re)loaded. Undefined transitions are logged and ignored.
    pub fn navigate(&mut self, conn: &Connection, event: NavEvent) {
        match router::transition(&self.router, event) {
            Ok(next) => {
                self.router = next;
                self.on_enter(conn);
            }
            Err(err) => logger::log(&format!("router: {}", err)),
        }
    }

    fn on_enter(&mut self, conn: &Connection) {
        match self.router.view {
            View::List => {
                self.detail = None;
                self.exam_form = None;
                self.question_form = None;
                self.load_exams(conn);
            }
            View::Detail => {
                self.exam_form = None;
                self.question_form = None;
                self.load_detail(conn);
            }
            View::ExamForm => self.mount_exam_form(conn),
            View::QuestionForm => self.mount_question_form(),
        }
    }

    pub fn load_exams(&mut self, conn: &Connection) {
        match fetch_exams(conn) {
            Ok((exams, counts)) => {
                self.exams = exams;
                self.question_counts = counts;
                self.load_error = None;
                if self.exam_cursor >= self.exams.len() {
                    self.exam_cursor = self.exams.len().saturating_sub(1);
                }
            }
            Err(err) => self.load_error = Some(format!("Failed to load exams: {}", err)),
        }
    }

    pub fn load_detail(&mut self, conn: &Connection) {
        let Some(exam_id) = self.router.exam_id.clone() else {
            return;
        };
        match fetch_detail(conn, &exam_id) {
            Ok(data) => {
                if self.question_cursor >= data.questions.len() {
                    self.question_cursor = data.questions.len().saturating_sub(1);
                }
                self.detail = Some(data);
                self.load_error = None;
            }
            Err(err) => self.load_error = Some(format!("Failed to load exam: {}", err)),
        }
    }

    fn mount_exam_form(&mut self, conn: &Connection) {
        let state = match self.router.exam_id.clone() {
            None => ExamFormState::create(),
            Some(id) => match store::exam::get_exam(conn, &id) {
                Ok(found) => ExamFormState::edit(id, found),
                Err(err) => {
                    let mut state = ExamFormState::edit(id, None);
                    state.error = Some(format!("Failed to load exam: {}", err));
                    state
                }
            },
        };
        self.exam_form = Some(state);
    }

    fn mount_question_form(&mut self) {
        let exam_id = self.router.exam_id.clone().unwrap_or_default();
        let state = match self.router.question.clone() {
            Some(question) => QuestionFormState::edit(exam_id, question),
            None => QuestionFormState::create(exam_id),
        };
        self.question_form = Some(state);
    }

    pub fn handle_key(&mut self, conn: &Connection, key: KeyEvent) {
        if self.pending_delete.is_some() {
            self.handle_confirm_key(conn, key);
            return;
        }
        match self.router.view {
            View::List => self.handle_list_key(conn, key),
            View::Detail => self.handle_detail_key(conn, key),
            View::ExamForm => self.handle_exam_form_key(conn, key),
            View::QuestionForm => self.handle_question_form_key(conn, key),
        }
    }

    fn handle_confirm_key(&mut self, conn: &Connection, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.confirm_pending_delete(conn),
            KeyCode::Char('n') | KeyCode::Esc => self.pending_delete = None,
            _ => {}
        }
    }

    fn confirm_pending_delete(&mut self, conn: &Connection) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let result = match &pending {
            PendingDelete::Exam { id, .. } => store::exam::delete_exam(conn, id),
            PendingDelete::Question { exam_id, id } => {
                store::question::delete_question(conn, exam_id, id)
            }
        };
        match result {
            Ok(()) => {
                match &pending {
                    PendingDelete::Exam { id, .. } => {
                        logger::log(&format!("store: exam {} deleted", id));
                        self.load_exams(conn);
                    }
                    PendingDelete::Question { id, .. } => {
                        logger::log(&format!("store: question {} deleted", id));
                        self.load_detail(conn);
                    }
                };
            }
            Err(err) => self.load_error = Some(format!("Failed to delete: {}", err)),
        }
    }

    fn handle_list_key(&mut self, conn: &Connection, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => {
                if self.exam_cursor > 0 {
                    self.exam_cursor -= 1;
                }
            }
            KeyCode::Down => {
                if self.exam_cursor < self.exams.len().saturating_sub(1) {
                    self.exam_cursor += 1;
                }
            }
            KeyCode::Enter => self.select_exam(conn, DetailMode::View),
            KeyCode::Char('e') => self.select_exam(conn, DetailMode::Edit),
            KeyCode::Char('n') => self.navigate(conn, NavEvent::CreateExam),
            KeyCode::Char('d') => {
                if let Some(exam) = self.exams.get(self.exam_cursor) {
                    self.pending_delete = Some(PendingDelete::Exam {
                        id: exam.id.clone(),
                        title: exam.title.clone(),
                    });
                }
            }
            KeyCode::Char('r') => self.load_exams(conn),
            _ => {}
        }
    }

    fn select_exam(&mut self, conn: &Connection, mode: DetailMode) {
        if let Some(exam) = self.exams.get(self.exam_cursor) {
            let exam_id = exam.id.clone();
            self.navigate(conn, NavEvent::SelectExam { exam_id, mode });
        }
    }

    fn handle_detail_key(&mut self, conn: &Connection, key: KeyEvent) {
        let question_total = self
            .detail
            .as_ref()
            .map(|d| d.questions.len())
            .unwrap_or(0);

        match key.code {
            KeyCode::Esc => self.navigate(conn, NavEvent::BackToList),
            KeyCode::Up => {
                if self.question_cursor > 0 {
                    self.question_cursor -= 1;
                }
            }
            KeyCode::Down => {
                if self.question_cursor < question_total.saturating_sub(1) {
                    self.question_cursor += 1;
                }
            }
            KeyCode::Char('r') => self.load_detail(conn),
            _ if self.router.mode != DetailMode::Edit => {}
            KeyCode::Char('e') => {
                let exam_id = self
                    .detail
                    .as_ref()
                    .and_then(|d| d.exam.as_ref())
                    .map(|exam| exam.id.clone());
                if let Some(exam_id) = exam_id {
                    self.navigate(conn, NavEvent::EditExam { exam_id });
                }
            }
            KeyCode::Char('n') => {
                if let Some(exam_id) = self.router.exam_id.clone() {
                    self.navigate(conn, NavEvent::CreateQuestion { exam_id });
                }
            }
            KeyCode::Enter => {
                let selected = self
                    .detail
                    .as_ref()
                    .and_then(|d| d.questions.get(self.question_cursor))
                    .cloned();
                if let (Some(exam_id), Some(question)) = (self.router.exam_id.clone(), selected) {
                    self.navigate(conn, NavEvent::EditQuestion { exam_id, question });
                }
            }
            KeyCode::Char('d') => {
                let selected = self
                    .detail
                    .as_ref()
                    .and_then(|d| d.questions.get(self.question_cursor))
                    .map(|q| q.id.clone());
                if let (Some(exam_id), Some(id)) = (self.router.exam_id.clone(), selected) {
                    self.pending_delete = Some(PendingDelete::Question { exam_id, id });
                }
            }
            _ => {}
        }
    }

    fn handle_exam_form_key(&mut self, conn: &Connection, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.navigate(conn, NavEvent::BackToList);
            return;
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.save_exam_form(conn);
            return;
        }
        if let Some(state) = self.exam_form.as_mut() {
            state.handle_key(key);
        }
    }

    fn handle_question_form_key(&mut self, conn: &Connection, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.navigate(conn, NavEvent::BackToDetail);
            return;
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.save_question_form(conn);
            return;
        }
        if let Some(state) = self.question_form.as_mut() {
            state.handle_key(key);
        }
    }

    /// Validates, writes, and navigates back to the list. A write failure
    /// leaves the form populated so the user can resubmit.
    pub fn save_exam_form(&mut self, conn: &Connection) {
        let outcome = {
            let Some(state) = self.exam_form.as_mut() else {
                return;
            };
            if let Err(err) = state.form.validate() {
                state.error = Some(err.to_string());
                return;
            }
            let record = state.form.to_record(state.original.as_ref());
            match &state.exam_id {
                Some(id) => serde_json::to_value(&record)
                    .map_err(StoreError::from)
                    .and_then(|fields| store::exam::update_exam(conn, id, &fields)),
                None => store::exam::create_exam(conn, &record).map(|_| ()),
            }
        };
        match outcome {
            Ok(()) => {
                logger::log("store: exam saved");
                self.navigate(conn, NavEvent::ExamSaved);
            }
            Err(err) => {
                if let Some(state) = self.exam_form.as_mut() {
                    state.error = Some(format!("Failed to save exam: {}", err));
                }
            }
        }
    }

    /// Same cycle for questions; navigates back to the detail screen.
    pub fn save_question_form(&mut self, conn: &Connection) {
        let outcome = {
            let Some(state) = self.question_form.as_mut() else {
                return;
            };
            if let Err(err) = state.form.validate() {
                state.error = Some(err.to_string());
                return;
            }
            let record = state.form.to_record(state.original.as_ref());
            match &state.original {
                Some(original) => serde_json::to_value(&record)
                    .map_err(StoreError::from)
                    .and_then(|fields| {
                        store::question::update_question(conn, &state.exam_id, &original.id, &fields)
                    }),
                None => store::question::create_question(conn, &state.exam_id, &record).map(|_| ()),
            }
        };
        match outcome {
            Ok(()) => {
                logger::log("store: question saved");
                self.navigate(conn, NavEvent::QuestionSaved);
            }
            Err(err) => {
                if let Some(state) = self.question_form.as_mut() {
                    state.error = Some(format!("Failed to save question: {}", err));
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_exams(conn: &Connection) -> store::Result<(Vec<Exam>, HashMap<String, usize>)> {
    let exams = store::exam::list_exams(conn)?;
    let mut counts = HashMap::new();
    for exam in &exams {
        counts.insert(
            exam.id.clone(),
            store::question::question_count(conn, &exam.id)?,
        );
    }
    Ok((exams, counts))
}

fn fetch_detail(conn: &Connection, exam_id: &str) -> store::Result<DetailData> {
    let exam = store::exam::get_exam(conn, exam_id)?;
    let questions = store::question::list_questions(conn, exam_id)?;
    Ok(DetailData { exam, questions })
}
