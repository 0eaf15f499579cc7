use std::sync::LazyLock;

use regex::Regex;

use crate::generator::Difficulty;
use crate::generator::chunker::{Chunk, split_sentences};

pub const MAX_KEY_TERMS: usize = 5;
pub const MAX_CONCEPTS: usize = 3;
pub const MAX_FACTS: usize = 3;
/// Sentences must exceed this length to qualify as extracted facts.
const MIN_FACT_LEN: usize = 30;

/// Meta-words whose presence marks a sentence as concept-bearing.
const CONCEPT_WORDS: &[&str] = &[
    "concept",
    "principle",
    "theory",
    "method",
    "approach",
    "strategy",
    "technique",
];

/// Copular/stative verbs that mark a sentence as a factual statement.
const STATIVE_VERBS: &[&str] = &[
    "is",
    "are",
    "was",
    "were",
    "has",
    "have",
    "contains",
    "shows",
    "indicates",
    "demonstrates",
];

// The three complexity-indicator families. Occurrence counts across all
// three drive the difficulty classification: >= 3 hard, >= 1 medium.
const CONNECTIVES: &[&str] = &[
    "however",
    "furthermore",
    "therefore",
    "moreover",
    "consequently",
    "nevertheless",
    "nonetheless",
    "whereas",
    "although",
];
const ANALYTICAL_WORDS: &[&str] = &[
    "analysis",
    "synthesis",
    "evaluation",
    "hypothesis",
    "methodology",
    "framework",
    "paradigm",
    "criteria",
];
const INFERENTIAL_VERBS: &[&str] = &[
    "implies",
    "suggests",
    "demonstrates",
    "indicates",
    "infers",
    "concludes",
    "predicts",
];

const HARD_THRESHOLD: usize = 3;
const MEDIUM_THRESHOLD: usize = 1;

static CAPITALIZED_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)*\b").unwrap());

/// Per-chunk features feeding the synthesizer. Derived purely from the chunk
/// content; analyzing the same chunk twice yields identical results.
#[derive(Clone, Debug)]
pub struct AnalyzedChunk {
    pub content: String,
    pub key_terms: Vec<String>,
    pub concepts: Vec<String>,
    pub facts: Vec<String>,
    pub difficulty: Difficulty,
}

pub fn analyze(chunk: &Chunk) -> AnalyzedChunk {
    let content = &chunk.content;
    let tokens = tokenize(content);

    let capitalized: Vec<String> = CAPITALIZED_PHRASE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut key_terms: Vec<String> = Vec::new();
    for term in &capitalized {
        if term.chars().count() > 3 && !key_terms.contains(term) {
            key_terms.push(term.clone());
            if key_terms.len() == MAX_KEY_TERMS {
                break;
            }
        }
    }

    // Meta-word hits in text order first, then capitalized phrases.
    let mut concepts: Vec<String> = Vec::new();
    for token in &tokens {
        if CONCEPT_WORDS.contains(&token.as_str()) && !concepts.contains(token) {
            concepts.push(token.clone());
            if concepts.len() == MAX_CONCEPTS {
                break;
            }
        }
    }
    for phrase in &capitalized {
        if concepts.len() == MAX_CONCEPTS {
            break;
        }
        if !concepts.contains(phrase) {
            concepts.push(phrase.clone());
        }
    }

    let facts: Vec<String> = split_sentences(content)
        .into_iter()
        .filter(|s| s.text.chars().count() > MIN_FACT_LEN)
        .filter(|s| {
            tokenize(&s.text)
                .iter()
                .any(|t| STATIVE_VERBS.contains(&t.as_str()))
        })
        .take(MAX_FACTS)
        .map(|s| s.text)
        .collect();

    let score = tokens
        .iter()
        .filter(|t| {
            CONNECTIVES.contains(&t.as_str())
                || ANALYTICAL_WORDS.contains(&t.as_str())
                || INFERENTIAL_VERBS.contains(&t.as_str())
        })
        .count();
    let difficulty = classify(score);

    AnalyzedChunk {
        content: content.clone(),
        key_terms,
        concepts,
        facts,
        difficulty,
    }
}

fn classify(score: usize) -> Difficulty {
    if score >= HARD_THRESHOLD {
        Difficulty::Hard
    } else if score >= MEDIUM_THRESHOLD {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}
