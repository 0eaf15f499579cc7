pub mod analyzer;
pub mod balancer;
pub mod chunker;
pub mod pipeline;
pub mod remote;
pub mod simple;
pub mod synthesizer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum trimmed document length accepted by any generator backend.
pub const MIN_CONTENT_LEN: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A finished multiple-choice question. `correct_answer` always indexes
/// `options`; the pipeline emits it as 0 (correct option first) and any
/// display-order shuffling happens at the presentation boundary, which must
/// remap the index itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionItem {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    pub difficulty: Difficulty,
}

impl QuestionItem {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(
        "the document is too short to build a quiz from ({len} characters, need at least {MIN_CONTENT_LEN}); try a longer document"
    )]
    InsufficientContent { len: usize },
    #[error("no questions could be generated from this document")]
    Empty,
    #[error("remote backend failed: {0}")]
    Remote(String),
}

/// Which backend produces the questions. Anything other than `Local` needs an
/// API key and degrades to the local pipeline on any failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Local,
    OpenAi,
    Anthropic,
    Gemini,
}

impl Provider {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "local" => Some(Provider::Local),
            "openai" => Some(Provider::OpenAi),
            "anthropic" => Some(Provider::Anthropic),
            "gemini" => Some(Provider::Gemini),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        }
    }
}

/// Explicit, per-instance generator configuration. Constructed once by the
/// caller and handed to `Generator::new`; never held in process-wide state.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub strategy: balancer::BalanceStrategy,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Local,
            api_key: None,
            strategy: balancer::BalanceStrategy::FirstN,
            seed: None,
        }
    }
}

pub trait QuestionSource {
    fn generate(&mut self, text: &str, count: usize)
    -> Result<Vec<QuestionItem>, GenerateError>;
}

/// Dispatching generator: tries the configured remote backend first (if any)
/// and falls back to the local pipeline on its `Err` variant. Remote failures
/// are logged, never surfaced.
pub struct Generator {
    local: pipeline::LocalGenerator,
    remote: Option<remote::RemoteGenerator>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let remote = match (config.provider, config.api_key) {
            (Provider::Local, _) | (_, None) => None,
            (provider, Some(key)) => Some(remote::RemoteGenerator::new(provider, key)),
        };
        let local = match config.seed {
            Some(seed) => pipeline::LocalGenerator::seeded(config.strategy, seed),
            None => pipeline::LocalGenerator::new(config.strategy),
        };
        Self { local, remote }
    }
}

impl QuestionSource for Generator {
    fn generate(
        &mut self,
        text: &str,
        count: usize,
    ) -> Result<Vec<QuestionItem>, GenerateError> {
        let trimmed = require_min_content(text)?;

        if let Some(ref mut remote) = self.remote {
            match remote.generate(trimmed, count) {
                Ok(items) => return Ok(items),
                Err(err) => {
                    log::warn!("remote generation failed, falling back to local pipeline: {err}");
                }
            }
        }

        self.local.generate(trimmed, count)
    }
}

/// Shared precondition: trims the input and rejects documents under
/// `MIN_CONTENT_LEN` characters.
pub(crate) fn require_min_content(text: &str) -> Result<&str, GenerateError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < MIN_CONTENT_LEN {
        return Err(GenerateError::InsufficientContent { len });
    }
    Ok(trimmed)
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when
/// anything was cut.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
