use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::generator::QuestionItem;

pub const MIN_QUESTIONS: usize = 5;
pub const MAX_QUESTIONS: usize = 30;

/// When answer feedback is shown: after each answer (with an explicit
/// confirmation before moving on) or all at once on the results screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Immediate,
    End,
}

impl QuizMode {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "immediate" => Some(QuizMode::Immediate),
            "end" => Some(QuizMode::End),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Immediate => "immediate",
            QuizMode::End => "end",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QuizSettings {
    pub question_count: usize,
    pub mode: QuizMode,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            mode: QuizMode::End,
        }
    }
}

/// One quiz in progress. `current` moves forward one question at a time and
/// never past the last index; `answers` maps question index to the chosen
/// option index, one entry per answered question.
pub struct QuizState {
    pub questions: Vec<QuestionItem>,
    pub settings: QuizSettings,
    pub current: usize,
    pub answers: BTreeMap<usize, usize>,
    pub awaiting_confirm: bool,
    pub started_at: Instant,
    pub finished_at: Option<Instant>,
}

impl QuizState {
    pub fn new(questions: Vec<QuestionItem>, settings: QuizSettings) -> Self {
        Self {
            questions,
            settings,
            current: 0,
            answers: BTreeMap::new(),
            awaiting_confirm: false,
            started_at: Instant::now(),
            finished_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn current_question(&self) -> &QuestionItem {
        &self.questions[self.current]
    }

    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    #[allow(dead_code)]
    pub fn answered_current(&self) -> bool {
        self.answers.contains_key(&self.current)
    }

    pub fn correct_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|&(&index, &option)| self.questions[index].correct_answer == option)
            .count()
    }

    #[allow(dead_code)]
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.len() as f64 / self.questions.len() as f64
    }

    pub fn elapsed_secs(&self) -> f64 {
        match self.finished_at {
            Some(end) => end.duration_since(self.started_at).as_secs_f64(),
            None => self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Difficulty;

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

    #[test]
    fn new_quiz_starts_at_zero() {
        let quiz = QuizState::new(vec![item(1), item(2)], QuizSettings::default());
        assert_eq!(quiz.current, 0);
        assert!(quiz.answers.is_empty());
        assert!(!quiz.is_finished());
        assert_eq!(quiz.progress(), 0.0);
    }

    #[test]
    fn correct_count_compares_against_correct_answer() {
        let mut quiz = QuizState::new(vec![item(1), item(2)], QuizSettings::default());
        quiz.answers.insert(0, 0);
        quiz.answers.insert(1, 2);
        assert_eq!(quiz.correct_count(), 1);
    }

    #[test]
    fn mode_keys_round_trip() {
        for key in ["immediate", "end"] {
            assert_eq!(QuizMode::from_key(key).unwrap().as_str(), key);
        }
        assert!(QuizMode::from_key("deferred").is_none());
    }
}
