use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::Difficulty;
use crate::session::quiz::QuizState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResult {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub score_percent: f64,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub by_difficulty: Vec<DifficultyTally>,
}

fn default_mode() -> String {
    "end".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DifficultyTally {
    pub difficulty: Difficulty,
    pub correct: usize,
    pub total: usize,
}

impl QuizResult {
    pub fn from_quiz(quiz: &QuizState) -> Self {
        let total = quiz.len();
        let correct = quiz.correct_count();
        let score_percent = if total > 0 {
            correct as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let by_difficulty = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            .into_iter()
            .map(|difficulty| tally(quiz, difficulty))
            .filter(|t| t.total > 0)
            .collect();

        Self {
            total,
            correct,
            incorrect: total - correct,
            score_percent,
            elapsed_secs: quiz.elapsed_secs(),
            timestamp: Utc::now(),
            mode: quiz.settings.mode.as_str().to_string(),
            by_difficulty,
        }
    }
}

fn tally(quiz: &QuizState, difficulty: Difficulty) -> DifficultyTally {
    let mut total = 0;
    let mut correct = 0;
    for (index, question) in quiz.questions.iter().enumerate() {
        if question.difficulty != difficulty {
            continue;
        }
        total += 1;
        if quiz.answer_for(index) == Some(question.correct_answer) {
            correct += 1;
        }
    }
    DifficultyTally {
        difficulty,
        correct,
        total,
    }
}
