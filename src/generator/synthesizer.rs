use rand::Rng;
use rand::rngs::SmallRng;

use crate::generator::analyzer::AnalyzedChunk;
use crate::generator::chunker::split_sentences;
use crate::generator::{Difficulty, QuestionItem, excerpt};

/// Correct options and excerpts are cut to roughly this length.
const MAX_OPTION_LEN: usize = 100;
const DISTRACTORS_PER_ITEM: usize = 3;

// Fixed distractor pools, one per item category. Three entries are sampled
// per item; sampling is the pipeline's only source of run-to-run
// nondeterminism and is driven entirely by the injected rng.
const CONCEPT_DISTRACTORS: &[&str] = &[
    "It is mentioned only as a counterexample",
    "The document argues against this idea entirely",
    "It is defined as an unrelated historical term",
    "The document defers this topic to external sources",
];
const FACT_DISTRACTORS: &[&str] = &[
    "The document explicitly denies this claim",
    "This figure is quoted from a different source",
    "The opposite relationship is described",
    "No supporting evidence appears in the text",
];
const TERM_DISTRACTOR_TEMPLATES: &[&str] = &[
    "{} is never mentioned in the document",
    "{} is dismissed as irrelevant to the topic",
    "{} appears only in passing, without significance",
    "{} is introduced and immediately refuted",
];
const INFERENCE_DISTRACTORS: &[&str] = &[
    "No conclusion can be drawn from the passage",
    "The passage contradicts its own premises",
    "The conclusion is stated outright rather than implied",
    "The passage is purely descriptive, with no reasoning",
];
// The generic fallback uses these three verbatim, in order.
const GENERIC_DISTRACTORS: &[&str] = &[
    "This information is not found in the document",
    "The document states the opposite",
    "This topic is unrelated to the document",
];

pub const FILLER_QUESTION: &str =
    "Based on the document content, what is a key point mentioned?";

/// Turns analyzed chunks into question items. Holds the run-scoped id
/// counter and the seedable rng used for distractor sampling.
pub struct Synthesizer {
    rng: SmallRng,
    next_id: u32,
}

impl Synthesizer {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng, next_id: 1 }
    }

    /// Build up to `requested` items, spreading the quota over the chunks:
    /// `requested / min(chunks, requested)` each, remainder to the first
    /// chunks, one extra apiece. Stops early once `requested` items exist.
    pub fn synthesize(
        &mut self,
        chunks: &[AnalyzedChunk],
        requested: usize,
    ) -> Vec<QuestionItem> {
        if chunks.is_empty() || requested == 0 {
            return Vec::new();
        }

        let active = chunks.len().min(requested);
        let base = requested / active;
        let remainder = requested % active;

        let mut items = Vec::with_capacity(requested);
        for (i, chunk) in chunks.iter().enumerate() {
            if items.len() >= requested {
                break;
            }
            let quota = (base + usize::from(i < remainder)).min(requested - items.len());
            self.chunk_items(chunk, quota, &mut items);
        }
        items
    }

    /// All items this chunk can currently template, feature-driven first and
    /// one generic excerpt item last. Used by the balancer's top-up loop.
    pub fn chunk_candidates(&mut self, chunk: &AnalyzedChunk) -> Vec<QuestionItem> {
        let mut items = Vec::new();
        if !chunk.concepts.is_empty() {
            items.push(self.concept_item(chunk));
        }
        if !chunk.facts.is_empty() {
            items.push(self.fact_item(chunk));
        }
        if !chunk.key_terms.is_empty() {
            items.push(self.term_item(chunk));
        }
        if chunk.difficulty == Difficulty::Hard {
            items.push(self.inference_item(chunk));
        }
        items.push(self.generic_item(chunk));
        items
    }

    fn chunk_items(&mut self, chunk: &AnalyzedChunk, quota: usize, out: &mut Vec<QuestionItem>) {
        let mut produced = 0;
        if produced < quota && !chunk.concepts.is_empty() {
            out.push(self.concept_item(chunk));
            produced += 1;
        }
        if produced < quota && !chunk.facts.is_empty() {
            out.push(self.fact_item(chunk));
            produced += 1;
        }
        if produced < quota && !chunk.key_terms.is_empty() {
            out.push(self.term_item(chunk));
            produced += 1;
        }
        if produced < quota && chunk.difficulty == Difficulty::Hard {
            out.push(self.inference_item(chunk));
            produced += 1;
        }
        while produced < quota {
            out.push(self.generic_item(chunk));
            produced += 1;
        }
    }

    fn concept_item(&mut self, chunk: &AnalyzedChunk) -> QuestionItem {
        let concept = &chunk.concepts[0];
        let needle = concept.to_lowercase();
        let correct = split_sentences(&chunk.content)
            .into_iter()
            .find(|s| s.text.to_lowercase().contains(&needle))
            .map(|s| excerpt(&s.text, MAX_OPTION_LEN))
            .unwrap_or_else(|| format!("The document discusses {concept} as a central idea"));

        let distractors = self.pick_distractors(CONCEPT_DISTRACTORS);
        self.make_item(
            format!("What does the document state about '{concept}'?"),
            correct,
            distractors,
            format!("The passage addresses '{concept}' directly."),
            chunk.difficulty,
        )
    }

    fn fact_item(&mut self, chunk: &AnalyzedChunk) -> QuestionItem {
        let correct = excerpt(&chunk.facts[0], MAX_OPTION_LEN);
        let distractors = self.pick_distractors(FACT_DISTRACTORS);
        self.make_item(
            "Which of the following statements is supported by the document?".to_string(),
            correct,
            distractors,
            "This statement appears in the analyzed passage.".to_string(),
            chunk.difficulty,
        )
    }

    fn term_item(&mut self, chunk: &AnalyzedChunk) -> QuestionItem {
        let term = chunk.key_terms[0].clone();
        let pool: Vec<String> = TERM_DISTRACTOR_TEMPLATES
            .iter()
            .map(|t| t.replace("{}", &term))
            .collect();
        let distractors = self.pick_distractors_owned(&pool);
        self.make_item(
            format!("Which statement about '{term}' is accurate?"),
            format!("{term} is a significant term mentioned in the document"),
            distractors,
            format!("'{term}' appears in the passage as a highlighted term."),
            chunk.difficulty,
        )
    }

    fn inference_item(&mut self, chunk: &AnalyzedChunk) -> QuestionItem {
        let distractors = self.pick_distractors(INFERENCE_DISTRACTORS);
        self.make_item(
            "What can be inferred from this passage?".to_string(),
            "A logical conclusion follows from the relationships the passage describes"
                .to_string(),
            distractors,
            "The connective structure of the passage supports this conclusion.".to_string(),
            chunk.difficulty,
        )
    }

    fn generic_item(&mut self, chunk: &AnalyzedChunk) -> QuestionItem {
        self.make_item(
            "Which excerpt appears in the document?".to_string(),
            excerpt(&chunk.content, MAX_OPTION_LEN),
            GENERIC_DISTRACTORS.iter().map(|s| s.to_string()).collect(),
            "The correct option is taken verbatim from the document.".to_string(),
            chunk.difficulty,
        )
    }

    /// Content-independent padding item used when real synthesis is
    /// exhausted and an exact count must still be met.
    pub fn filler_item(&mut self) -> QuestionItem {
        self.make_item(
            FILLER_QUESTION.to_string(),
            "The document presents information on its stated subject".to_string(),
            GENERIC_DISTRACTORS.iter().map(|s| s.to_string()).collect(),
            "Generic review item covering the document as a whole.".to_string(),
            Difficulty::Easy,
        )
    }

    fn make_item(
        &mut self,
        question: String,
        correct: String,
        distractors: Vec<String>,
        explanation: String,
        difficulty: Difficulty,
    ) -> QuestionItem {
        let id = self.next_id;
        self.next_id += 1;

        let mut options = Vec::with_capacity(1 + distractors.len());
        options.push(correct);
        options.extend(distractors);

        QuestionItem {
            id,
            question,
            options,
            // Correct option first by construction; consumers shuffle and
            // remap at the presentation boundary.
            correct_answer: 0,
            explanation,
            difficulty,
        }
    }

    fn pick_distractors(&mut self, pool: &[&str]) -> Vec<String> {
        let owned: Vec<String> = pool.iter().map(|s| s.to_string()).collect();
        self.pick_distractors_owned(&owned)
    }

    /// Sample three distinct pool entries via a partial Fisher-Yates pass.
    fn pick_distractors_owned(&mut self, pool: &[String]) -> Vec<String> {
        let mut indices: Vec<usize> = (0..pool.len()).collect();
        for i in 0..DISTRACTORS_PER_ITEM.min(indices.len()) {
            let j = self.rng.gen_range(i..indices.len());
            indices.swap(i, j);
        }
        indices
            .into_iter()
            .take(DISTRACTORS_PER_ITEM)
            .map(|i| pool[i].clone())
            .collect()
    }
}
