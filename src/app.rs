//! Application state and logic.

use crate::config::Config;
use crate::latex::{self, MathRenderer, PlainTextMath};
use crate::loader;
use crate::models::{Confidence, StudyMode};
use crate::session::{AnswerCheck, SessionController};
use crate::store::CardStore;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct App {
    pub config: Config,
    pub store: CardStore,
    pub session: SessionController,
    pub view: View,
    /// Cursor in the load screen's file list.
    pub selected_file: usize,
    /// Cursor in the mode menu.
    pub selected_mode: usize,
    /// Path prompt open on the load screen.
    pub editing: bool,
    pub input_buffer: String,
    /// Typed answer in quiz mode.
    pub quiz_input: String,
    /// Result of the last quiz answer check, for coloring the answer pane.
    pub last_check: Option<AnswerCheck>,
    pub message: Option<String>,
    pub show_help: bool,
    renderer: Option<Box<dyn MathRenderer>>,
    runtime: tokio::runtime::Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// File loading screen.
    Load,
    /// Study mode menu.
    ModeSelect,
    /// Active session; shows the completion summary once the index passes
    /// the last card.
    Study,
}

impl App {
    pub fn new(initial_files: &[PathBuf]) -> anyhow::Result<Self> {
        let config = Config::load();
        let runtime = tokio::runtime::Runtime::new()?;

        let mut app = Self {
            config,
            store: CardStore::new(),
            session: SessionController::new(),
            view: View::Load,
            selected_file: 0,
            selected_mode: 0,
            editing: false,
            input_buffer: String::new(),
            quiz_input: String::new(),
            last_check: None,
            message: None,
            show_help: false,
            renderer: Some(Box::new(PlainTextMath)),
            runtime,
        };

        if !initial_files.is_empty() {
            app.load_files(initial_files.to_vec());
        }
        Ok(app)
    }

    /// Load a batch of card files. The store is updated only after the whole
    /// batch has been read; files that yield no cards are dropped silently.
    pub fn load_files(&mut self, paths: Vec<PathBuf>) {
        let results = self.runtime.block_on(loader::load_batch(&paths));

        let mut added = 0;
        let mut cards = 0;
        let mut failed = 0;
        for result in results {
            match result {
                Ok(file) => {
                    if let Some(entry) = self.store.add_parsed(file.name, file.cards) {
                        cards += entry.count;
                        added += 1;
                    } else {
                        debug!("file yielded no cards, skipped");
                    }
                }
                Err(err) => {
                    warn!(error = %err, "skipping unreadable file");
                    failed += 1;
                }
            }
        }

        self.message = Some(if failed > 0 {
            format!("Added {added} file(s), {cards} cards ({failed} unreadable)")
        } else {
            format!("Added {added} file(s), {cards} cards")
        });
    }

    /// True when a plain `q` should quit rather than be treated as input.
    pub fn can_quit(&self) -> bool {
        !self.editing && !(self.view == View::Study && self.session.awaiting_answer())
    }

    /// Current card's question, math-rendered for display.
    pub fn question_text(&self) -> String {
        match self.store.card(self.session.index()) {
            Some(card) => latex::render_math(&card.question, self.renderer.as_deref()),
            None => String::new(),
        }
    }

    /// Current card's answer, math-rendered for display.
    pub fn answer_text(&self) -> String {
        match self.store.card(self.session.index()) {
            Some(card) => latex::render_math(&card.answer, self.renderer.as_deref()),
            None => String::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.editing {
            self.handle_prompt_key(key);
            return;
        }

        match self.view {
            View::Load => self.handle_load_key(key),
            View::ModeSelect => self.handle_mode_key(key),
            View::Study => self.handle_study_key(key),
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editing = false;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                let paths: Vec<PathBuf> = self
                    .input_buffer
                    .split_whitespace()
                    .map(PathBuf::from)
                    .collect();
                self.editing = false;
                self.input_buffer.clear();
                if !paths.is_empty() {
                    self.load_files(paths);
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn handle_load_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => {
                self.editing = true;
                self.input_buffer.clear();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.store.files().is_empty() {
                    self.selected_file =
                        (self.selected_file + 1).min(self.store.files().len() - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_file = self.selected_file.saturating_sub(1);
            }
            KeyCode::Char('d') | KeyCode::Char('x') => self.remove_selected_file(),
            KeyCode::Char('c') => {
                self.store.clear();
                self.selected_file = 0;
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => {
                if self.store.is_empty() {
                    self.message = Some("Load at least one card file first".to_string());
                } else {
                    self.selected_mode = 0;
                    self.view = View::ModeSelect;
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn remove_selected_file(&mut self) {
        if self.store.files().is_empty() {
            return;
        }
        self.store.remove_file(self.selected_file);
        if self.selected_file >= self.store.files().len() && !self.store.files().is_empty() {
            self.selected_file = self.store.files().len() - 1;
        }
    }

    fn handle_mode_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected_mode = (self.selected_mode + 1).min(StudyMode::ALL.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_mode = self.selected_mode.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.start_mode(StudyMode::ALL[self.selected_mode]);
            }
            KeyCode::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                self.selected_mode = idx;
                self.start_mode(StudyMode::ALL[idx]);
            }
            KeyCode::Esc => self.view = View::Load,
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn start_mode(&mut self, mode: StudyMode) {
        if self.store.is_empty() {
            return;
        }
        self.session.start_mode(mode, &mut self.store);
        self.quiz_input.clear();
        self.last_check = None;
        self.view = View::Study;
    }

    fn handle_study_key(&mut self, key: KeyEvent) {
        if self.session.is_complete() {
            self.handle_complete_key(key);
            return;
        }

        // The quiz answer box captures typing until the answer is submitted.
        if self.session.awaiting_answer() {
            match key.code {
                KeyCode::Enter if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.last_check = self.session.check_answer(&self.quiz_input, &self.store);
                }
                KeyCode::Esc => self.go_back(),
                KeyCode::Backspace => {
                    self.quiz_input.pop();
                }
                KeyCode::Char(c) => self.quiz_input.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.session.flip(),
            KeyCode::Left => {
                self.session.prev();
                self.next_card_reset();
            }
            KeyCode::Right => {
                if self.session.flipped() {
                    self.rate(Confidence::Good);
                } else {
                    self.session.next();
                    self.next_card_reset();
                }
            }
            KeyCode::Char(c @ '1'..='4') => {
                if self.session.flipped() {
                    if let Some(confidence) = Confidence::from_key(c) {
                        self.rate(confidence);
                    }
                }
            }
            KeyCode::Char('s') => {
                self.session.shuffle_now(&mut self.store);
                self.next_card_reset();
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_complete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter | KeyCode::Esc => self.go_back(),
            KeyCode::Char('u') => self.go_to_upload(),
            _ => {}
        }
    }

    fn rate(&mut self, confidence: Confidence) {
        self.session.rate(confidence);
        self.next_card_reset();
    }

    /// Per-card presentation state cleared whenever the current card changes.
    fn next_card_reset(&mut self) {
        self.quiz_input.clear();
        self.last_check = None;
    }

    /// Back to the mode menu, discarding the session.
    pub fn go_back(&mut self) {
        self.session.reset();
        self.next_card_reset();
        self.view = View::ModeSelect;
    }

    /// Back to the load screen, discarding the session and all loaded files.
    pub fn go_to_upload(&mut self) {
        self.session.reset();
        self.next_card_reset();
        self.store.clear();
        self.selected_file = 0;
        self.view = View::Load;
    }

    fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggle();
        if let Err(err) = self.config.save() {
            warn!(error = %err, "failed to persist theme");
        }
        self.message = Some(format!("Theme: {}", self.config.theme));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn app_with_cards(text: &str) -> App {
        let mut app = App::new(&[]).unwrap();
        app.store.add_file("deck.csv", text);
        app
    }

    #[test]
    fn test_start_gated_on_cards() {
        let mut app = App::new(&[]).unwrap();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view, View::Load);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_load_to_mode_select_to_study() {
        let mut app = app_with_cards("q,a");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view, View::ModeSelect);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view, View::Study);
        assert_eq!(app.session.mode(), Some(StudyMode::Sequential));
    }

    #[test]
    fn test_digit_starts_mode() {
        let mut app = app_with_cards("q,a");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.session.mode(), Some(StudyMode::Quiz));
    }

    #[test]
    fn test_space_flips_and_digit_rates() {
        let mut app = app_with_cards("q,a\nr,b");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.session.flipped());
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.session.stats().easy, 1);
        assert_eq!(app.session.index(), 1);
    }

    #[test]
    fn test_digit_ignored_when_not_flipped() {
        let mut app = app_with_cards("q,a");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.session.stats().again, 0);
        assert_eq!(app.session.index(), 0);
    }

    #[test]
    fn test_right_rates_good_when_flipped() {
        let mut app = app_with_cards("q,a\nr,b");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.session.index(), 1);
        assert_eq!(app.session.stats().good, 0);

        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.session.stats().good, 1);
        assert!(app.session.is_complete());
    }

    #[test]
    fn test_quiz_typing_and_ctrl_enter_submit() {
        let mut app = app_with_cards("capital,paris");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Char('3')));

        for c in "paris".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.quiz_input, "paris");
        assert!(!app.session.flipped());

        app.handle_key(ctrl(KeyCode::Enter));
        assert!(app.session.flipped());
        let check = app.last_check.unwrap();
        assert_eq!(check.score, 1.0);
    }

    #[test]
    fn test_quiz_input_captures_shortcut_chars() {
        let mut app = app_with_cards("q,a");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Char('3')));

        // 's' and 't' are text here, not shuffle/theme.
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('t')));
        assert_eq!(app.quiz_input, "st");
        assert!(!app.can_quit());
    }

    #[test]
    fn test_escape_returns_to_mode_select() {
        let mut app = app_with_cards("q,a");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view, View::ModeSelect);
        assert!(!app.session.is_active());
    }

    #[test]
    fn test_completion_restart_and_upload() {
        let mut app = app_with_cards("q,a");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Char('3')));
        assert!(app.session.is_complete());

        app.handle_key(key(KeyCode::Char('u')));
        assert_eq!(app.view, View::Load);
        assert!(app.store.is_empty());
        assert!(!app.session.is_active());
    }

    #[test]
    fn test_remove_and_clear_files() {
        let mut app = App::new(&[]).unwrap();
        app.store.add_file("one.csv", "a,b");
        app.store.add_file("two.csv", "c,d");

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.store.files().len(), 1);
        assert_eq!(app.store.files()[0].name, "one.csv");

        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_prompt_escape_cancels() {
        let mut app = App::new(&[]).unwrap();
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.editing);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.editing);
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn test_math_rendered_card_text() {
        let mut app = app_with_cards("area of circle?,$\\pi r^2$");
        app.view = View::ModeSelect;
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.answer_text(), "π r^2");
    }
}
