use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::generator::analyzer::{self, AnalyzedChunk};
use crate::generator::balancer::{self, BalanceStrategy};
use crate::generator::synthesizer::Synthesizer;
use crate::generator::{
    GenerateError, QuestionItem, QuestionSource, chunker, require_min_content, simple,
};

/// The local rule-based pipeline: chunk, analyze, synthesize, balance, with
/// the simplified generator as a fallback when the pipeline yields nothing.
pub struct LocalGenerator {
    rng: SmallRng,
    strategy: BalanceStrategy,
}

impl LocalGenerator {
    pub fn new(strategy: BalanceStrategy) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            strategy,
        }
    }

    /// Seeded variant for reproducible runs; with a fixed seed the full
    /// output, distractor order included, is deterministic.
    pub fn seeded(strategy: BalanceStrategy, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            strategy,
        }
    }
}

impl QuestionSource for LocalGenerator {
    fn generate(
        &mut self,
        text: &str,
        count: usize,
    ) -> Result<Vec<QuestionItem>, GenerateError> {
        let trimmed = require_min_content(text)?;

        let chunks = chunker::chunk(trimmed);
        let items = if chunks.is_empty() {
            log::debug!("no usable chunks, using the simplified generator");
            simple::generate(trimmed, count)
        } else {
            let analyzed: Vec<AnalyzedChunk> = chunks.iter().map(analyzer::analyze).collect();
            let mut synth = Synthesizer::new(SmallRng::from_rng(&mut self.rng).unwrap());
            let drafted = synth.synthesize(&analyzed, count);
            if drafted.is_empty() {
                log::debug!("synthesis drafted nothing, using the simplified generator");
                simple::generate(trimmed, count)
            } else {
                let mut balance_rng = SmallRng::from_rng(&mut self.rng).unwrap();
                balancer::balance(
                    drafted,
                    count,
                    self.strategy,
                    &analyzed,
                    &mut synth,
                    &mut balance_rng,
                )
            }
        };

        // Hard postcondition. The balancer and the simplified generator both
        // pad to the exact count, so this is unreachable in practice.
        if items.len() != count {
            return Err(GenerateError::Empty);
        }
        Ok(items)
    }
}
