use serde::{Deserialize, Serialize};

use crate::session::result::QuizResult;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Default)]
pub struct HistoryData {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub quizzes: Vec<QuizResult>,
}
