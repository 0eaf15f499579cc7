use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::Provider;
use crate::generator::balancer::BalanceStrategy;
use crate::session::quiz::{MAX_QUESTIONS, MIN_QUESTIONS, QuizMode};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_question_count() -> usize {
    10
}
fn default_mode() -> String {
    "end".to_string()
}
fn default_strategy() -> String {
    "first-n".to_string()
}
fn default_provider() -> String {
    "local".to_string()
}
fn default_history_size() -> usize {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            mode: default_mode(),
            strategy: default_strategy(),
            provider: default_provider(),
            api_key: None,
            history_size: default_history_size(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown keys to their defaults.
    /// Call after deserialization and after applying CLI overrides.
    pub fn validate(&mut self) {
        self.question_count = self.question_count.clamp(MIN_QUESTIONS, MAX_QUESTIONS);
        if QuizMode::from_key(&self.mode).is_none() {
            self.mode = default_mode();
        }
        if BalanceStrategy::from_key(&self.strategy).is_none() {
            self.strategy = default_strategy();
        }
        if Provider::from_key(&self.provider).is_none() {
            self.provider = default_provider();
        }
        self.history_size = self.history_size.clamp(1, 1000);
    }

    pub fn quiz_mode(&self) -> QuizMode {
        QuizMode::from_key(&self.mode).unwrap_or(QuizMode::End)
    }

    pub fn balance_strategy(&self) -> BalanceStrategy {
        BalanceStrategy::from_key(&self.strategy).unwrap_or(BalanceStrategy::FirstN)
    }

    pub fn provider(&self) -> Provider {
        Provider::from_key(&self.provider).unwrap_or(Provider::Local)
    }
}
