use serde::Deserialize;

use crate::generator::{GenerateError, Provider, QuestionItem, QuestionSource};

/// Only the leading slice of the document is sent to the backend.
const PROMPT_CONTEXT_CHARS: usize = 4000;
#[cfg(feature = "network")]
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[cfg(feature = "network")]
const OPENAI_MODEL: &str = "gpt-4o-mini";
#[cfg(feature = "network")]
const ANTHROPIC_MODEL: &str = "claude-haiku-4-5";
#[cfg(feature = "network")]
const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Remote question backend behind the same generate contract as the local
/// pipeline. Every failure mode collapses into `GenerateError::Remote`; the
/// dispatching `Generator` recovers from that locally, so nothing here may
/// panic or hang past the request timeout.
pub struct RemoteGenerator {
    provider: Provider,
    api_key: String,
}

#[derive(Deserialize)]
struct RemoteResponse {
    questions: Vec<QuestionItem>,
}

impl RemoteGenerator {
    pub fn new(provider: Provider, api_key: String) -> Self {
        Self { provider, api_key }
    }
}

impl QuestionSource for RemoteGenerator {
    fn generate(
        &mut self,
        text: &str,
        count: usize,
    ) -> Result<Vec<QuestionItem>, GenerateError> {
        let prompt = build_prompt(text, count);
        let raw = dispatch(self.provider, &self.api_key, &prompt)?;
        parse_questions(&raw, count)
    }
}

fn build_prompt(text: &str, count: usize) -> String {
    let context: String = text.chars().take(PROMPT_CONTEXT_CHARS).collect();
    format!(
        "Generate a multiple-choice quiz from the document below. Respond with ONLY a \
         JSON object of the form {{\"questions\": [...]}} containing exactly {count} \
         questions. Each question object must have: \"id\" (positive number), \
         \"question\" (string), \"options\" (array of exactly 4 strings), \
         \"correct_answer\" (number, index into options), \"explanation\" (string), \
         and \"difficulty\" (one of \"easy\", \"medium\", \"hard\").\n\nDocument:\n{context}"
    )
}

/// Strict response validation. A malformed or miscounted payload is a backend
/// failure, not something to repair; repairing would blur the compatibility
/// line between the remote and local backends.
fn parse_questions(raw: &str, count: usize) -> Result<Vec<QuestionItem>, GenerateError> {
    let body = strip_code_fence(raw);
    let parsed: RemoteResponse = serde_json::from_str(body)
        .map_err(|e| GenerateError::Remote(format!("malformed response JSON: {e}")))?;

    let questions = parsed.questions;
    if questions.len() != count {
        return Err(GenerateError::Remote(format!(
            "expected {count} questions, got {}",
            questions.len()
        )));
    }
    for q in &questions {
        if q.options.len() != 4 {
            return Err(GenerateError::Remote(format!(
                "question {} has {} options",
                q.id,
                q.options.len()
            )));
        }
        if q.correct_answer >= q.options.len() {
            return Err(GenerateError::Remote(format!(
                "question {} has out-of-range correct_answer {}",
                q.id, q.correct_answer
            )));
        }
        if q.question.trim().is_empty() {
            return Err(GenerateError::Remote(format!(
                "question {} has empty question text",
                q.id
            )));
        }
    }
    Ok(questions)
}

/// Models often wrap JSON in a markdown fence despite instructions.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(feature = "network")]
fn dispatch(provider: Provider, api_key: &str, prompt: &str) -> Result<String, GenerateError> {
    use serde_json::{Value, json};

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| GenerateError::Remote(format!("client setup failed: {e}")))?;

    let request = match provider {
        Provider::OpenAi => client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&json!({
                "model": OPENAI_MODEL,
                "messages": [{"role": "user", "content": prompt}],
            })),
        Provider::Anthropic => client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": ANTHROPIC_MODEL,
                "max_tokens": 4096,
                "messages": [{"role": "user", "content": prompt}],
            })),
        Provider::Gemini => client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent?key={api_key}"
            ))
            .json(&json!({
                "contents": [{"parts": [{"text": prompt}]}],
            })),
        Provider::Local => {
            return Err(GenerateError::Remote(
                "local provider has no remote endpoint".to_string(),
            ));
        }
    };

    let response = request
        .send()
        .map_err(|e| GenerateError::Remote(format!("request failed: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(GenerateError::Remote(format!("http status {status}")));
    }
    let body: Value = response
        .json()
        .map_err(|e| GenerateError::Remote(format!("unreadable response body: {e}")))?;

    let content = match provider {
        Provider::OpenAi => body["choices"][0]["message"]["content"].as_str(),
        Provider::Anthropic => body["content"][0]["text"].as_str(),
        Provider::Gemini => body["candidates"][0]["content"]["parts"][0]["text"].as_str(),
        Provider::Local => None,
    };
    content
        .map(|s| s.to_string())
        .ok_or_else(|| GenerateError::Remote("response missing text content".to_string()))
}

#[cfg(not(feature = "network"))]
fn dispatch(_provider: Provider, _api_key: &str, _prompt: &str) -> Result<String, GenerateError> {
    Err(GenerateError::Remote(
        "built without network support".to_string(),
    ))
}
