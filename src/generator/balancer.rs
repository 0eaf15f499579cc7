use std::collections::HashSet;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::generator::QuestionItem;
use crate::generator::analyzer::AnalyzedChunk;
use crate::generator::synthesizer::Synthesizer;

/// How an over-long draft is cut down to the requested count. Both variants
/// existed as historical behaviors of the pipeline; the choice is explicit
/// configuration, not an implementation guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceStrategy {
    /// Keep the first N items in synthesis order.
    FirstN,
    /// Target a 40% easy / 40% medium / 20% hard mix before truncating.
    DifficultyQuota,
}

impl BalanceStrategy {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "first-n" => Some(BalanceStrategy::FirstN),
            "difficulty-quota" => Some(BalanceStrategy::DifficultyQuota),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn as_str(self) -> &'static str {
        match self {
            BalanceStrategy::FirstN => "first-n",
            BalanceStrategy::DifficultyQuota => "difficulty-quota",
        }
    }
}

/// Reconcile a draft item list against the requested count. Always returns
/// exactly `requested` items.
///
/// Shortfalls are topped up by drawing extra items from random chunks until
/// either the count is met or no chunk yields anything new, then padded with
/// the fixed filler item. Excess is truncated per the strategy.
pub fn balance(
    mut items: Vec<QuestionItem>,
    requested: usize,
    strategy: BalanceStrategy,
    chunks: &[AnalyzedChunk],
    synth: &mut Synthesizer,
    rng: &mut SmallRng,
) -> Vec<QuestionItem> {
    if items.len() < requested {
        top_up(&mut items, requested, chunks, synth, rng);
        while items.len() < requested {
            items.push(synth.filler_item());
        }
    }

    if items.len() > requested {
        items = match strategy {
            BalanceStrategy::FirstN => {
                items.truncate(requested);
                items
            }
            BalanceStrategy::DifficultyQuota => quota_truncate(items, requested),
        };
    }

    items
}

fn item_key(item: &QuestionItem) -> String {
    format!("{}\u{1f}{}", item.question, item.correct_option())
}

/// Bounded retry loop: each attempt draws a random chunk and keeps the first
/// of its candidate items not already present. Consecutive misses across the
/// whole chunk pool abort the loop so it cannot spin forever on a
/// repetitive document.
fn top_up(
    items: &mut Vec<QuestionItem>,
    requested: usize,
    chunks: &[AnalyzedChunk],
    synth: &mut Synthesizer,
    rng: &mut SmallRng,
) {
    if chunks.is_empty() {
        return;
    }

    let mut seen: HashSet<String> = items.iter().map(item_key).collect();
    let miss_budget = (chunks.len() * 4).max(16);
    let mut misses = 0;

    while items.len() < requested && misses < miss_budget {
        let chunk = &chunks[rng.gen_range(0..chunks.len())];
        let fresh = synth
            .chunk_candidates(chunk)
            .into_iter()
            .find(|item| !seen.contains(&item_key(item)));
        match fresh {
            Some(item) => {
                seen.insert(item_key(&item));
                items.push(item);
                misses = 0;
            }
            None => misses += 1,
        }
    }
}

/// Slice per-difficulty buckets to 40/40/20 quotas, then backfill from the
/// leftovers in synthesis order until the count is met.
fn quota_truncate(items: Vec<QuestionItem>, requested: usize) -> Vec<QuestionItem> {
    use crate::generator::Difficulty;

    let easy_quota = requested * 2 / 5;
    let medium_quota = requested * 2 / 5;
    let hard_quota = requested - easy_quota - medium_quota;

    let mut selected: Vec<QuestionItem> = Vec::with_capacity(requested);
    let mut leftovers: Vec<QuestionItem> = Vec::new();
    let mut taken = [0usize; 3];
    let quotas = [easy_quota, medium_quota, hard_quota];

    for item in items {
        let bucket = match item.difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        };
        if taken[bucket] < quotas[bucket] {
            taken[bucket] += 1;
            selected.push(item);
        } else {
            leftovers.push(item);
        }
    }

    for item in leftovers {
        if selected.len() >= requested {
            break;
        }
        selected.push(item);
    }
    selected.truncate(requested);
    selected
}
