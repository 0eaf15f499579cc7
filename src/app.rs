use crate::config::Config;
use crate::generator::QuestionItem;
use crate::session::answer::{self, AnswerEvent};
use crate::session::quiz::{QuizSettings, QuizState};
use crate::session::result::QuizResult;
use crate::store::json_store::JsonStore;
use crate::store::schema::{HistoryData, SCHEMA_VERSION};

/// The three screens, visited strictly in order. Results loops back to
/// Upload only through `restart`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Upload,
    Quiz,
    Results,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub settings: QuizSettings,
    pub quiz: Option<QuizState>,
    pub last_result: Option<QuizResult>,
    pub history: Vec<QuizResult>,
    pub store: Option<JsonStore>,
    pub processing: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store = JsonStore::new().ok();
        let history = store
            .as_ref()
            .map(|s| s.load_history().quizzes)
            .unwrap_or_default();
        Self::build(config, store, history)
    }

    /// Session logic without touching the filesystem. Used by tests and by
    /// callers that handle persistence themselves.
    #[allow(dead_code)]
    pub fn without_store(config: Config) -> Self {
        Self::build(config, None, Vec::new())
    }

    fn build(config: Config, store: Option<JsonStore>, history: Vec<QuizResult>) -> Self {
        let settings = QuizSettings {
            question_count: config.question_count,
            mode: config.quiz_mode(),
        };
        Self {
            screen: AppScreen::Upload,
            config,
            settings,
            quiz: None,
            last_result: None,
            history,
            store,
            processing: false,
        }
    }

    /// Guard for the single-generation-in-flight rule. Returns false when a
    /// generation is already pending or the app is past the upload screen.
    pub fn begin_processing(&mut self) -> bool {
        if self.processing || self.screen != AppScreen::Upload {
            return false;
        }
        self.processing = true;
        true
    }

    pub fn cancel_processing(&mut self) {
        self.processing = false;
    }

    /// Upload to Quiz: fires only when generation produced a non-empty list.
    pub fn start_quiz(&mut self, questions: Vec<QuestionItem>) {
        self.processing = false;
        if self.screen != AppScreen::Upload || questions.is_empty() {
            return;
        }
        self.quiz = Some(QuizState::new(questions, self.settings));
        self.screen = AppScreen::Quiz;
    }

    pub fn answer(&mut self, option: usize) -> Option<AnswerEvent> {
        let quiz = self.quiz.as_mut()?;
        let event = answer::process_answer(quiz, option);
        if quiz.is_finished() {
            self.finish_quiz();
        }
        event
    }

    /// Immediate mode: the caller signals the feedback interval is over.
    pub fn confirm(&mut self) {
        let Some(ref mut quiz) = self.quiz else {
            return;
        };
        if answer::process_confirm(quiz) && quiz.is_finished() {
            self.finish_quiz();
        }
    }

    fn finish_quiz(&mut self) {
        let Some(ref quiz) = self.quiz else {
            return;
        };
        let result = QuizResult::from_quiz(quiz);

        self.history.push(result.clone());
        let cap = self.config.history_size;
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
        self.save_history();

        self.last_result = Some(result);
        self.screen = AppScreen::Results;
    }

    fn save_history(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save_history(&HistoryData {
                schema_version: SCHEMA_VERSION,
                quizzes: self.history.clone(),
            });
        }
    }

    /// Results to Upload: clear everything back to configured defaults.
    pub fn restart(&mut self) {
        self.quiz = None;
        self.last_result = None;
        self.processing = false;
        self.settings = QuizSettings {
            question_count: self.config.question_count,
            mode: self.config.quiz_mode(),
        };
        self.screen = AppScreen::Upload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Difficulty;
    use crate::session::quiz::QuizMode;

    fn item(id: u32) -> QuestionItem {
        QuestionItem {
            id,
            question: format!("Question {id}?"),
            options: vec![
                "right".to_string(),
                "wrong a".to_string(),
                "wrong b".to_string(),
                "wrong c".to_string(),
            ],
            correct_answer: 0,
            explanation: "because".to_string(),
            difficulty: Difficulty::Easy,
        }
    }

    fn app(mode: &str) -> App {
        let mut config = Config::default();
        config.mode = mode.to_string();
        config.question_count = 5;
        App::without_store(config)
    }

    #[test]
    fn starts_on_upload_screen() {
        let app = app("end");
        assert_eq!(app.screen, AppScreen::Upload);
        assert!(app.quiz.is_none());
    }

    #[test]
    fn empty_generation_does_not_start_quiz() {
        let mut app = app("end");
        app.start_quiz(Vec::new());
        assert_eq!(app.screen, AppScreen::Upload);
    }

    #[test]
    fn processing_guard_blocks_reentry() {
        let mut app = app("end");
        assert!(app.begin_processing());
        assert!(!app.begin_processing());
        app.start_quiz(vec![item(1), item(2)]);
        assert!(!app.processing);
        // Past the upload screen now, so a new upload is refused too.
        assert!(!app.begin_processing());
    }

    #[test]
    fn end_mode_full_run_reaches_results() {
        let mut app = app("end");
        app.start_quiz(vec![item(1), item(2)]);
        assert_eq!(app.screen, AppScreen::Quiz);

        app.answer(0);
        assert_eq!(app.screen, AppScreen::Quiz);
        app.answer(1);
        assert_eq!(app.screen, AppScreen::Results);

        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.correct, 1);
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn immediate_mode_needs_confirm_to_finish() {
        let mut app = app("immediate");
        app.start_quiz(vec![item(1), item(2)]);

        app.answer(0);
        assert_eq!(app.screen, AppScreen::Quiz);
        app.confirm();
        app.answer(0);
        // Final answer recorded but not yet confirmed: still on the quiz.
        assert_eq!(app.screen, AppScreen::Quiz);
        app.confirm();
        assert_eq!(app.screen, AppScreen::Results);
    }

    #[test]
    fn restart_resets_to_upload_defaults() {
        let mut app = app("end");
        app.start_quiz(vec![item(1)]);
        app.answer(0);
        assert_eq!(app.screen, AppScreen::Results);

        app.restart();
        assert_eq!(app.screen, AppScreen::Upload);
        assert!(app.quiz.is_none());
        assert!(app.last_result.is_none());
        assert_eq!(app.settings.question_count, 5);
        assert_eq!(app.settings.mode, QuizMode::End);
        // History survives a restart; it is persistent state, not session state.
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn history_is_capped() {
        let mut app = app("end");
        app.config.history_size = 2;
        for _ in 0..3 {
            app.restart();
            app.start_quiz(vec![item(1)]);
            app.answer(0);
        }
        assert_eq!(app.history.len(), 2);
    }
}
