use crate::generator::chunker::split_sentences;
use crate::generator::{Difficulty, QuestionItem, excerpt};

const MIN_SENTENCE_LEN: usize = 20;
const MAX_OPTION_LEN: usize = 100;

const SENTENCE_QUESTION: &str = "What does the document state about this topic?";
const PAD_QUESTION: &str = "Which best describes the document overall?";

const DISTRACTORS: &[&str] = &[
    "The document does not mention this",
    "The document claims the opposite",
    "This detail comes from a different source",
];

/// Last-resort generator: one question per usable sentence, padded with a
/// fixed generic item until `count` is reached. Infallible by construction;
/// the main pipeline falls back here when it produces nothing.
pub fn generate(text: &str, count: usize) -> Vec<QuestionItem> {
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .map(|s| s.text)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_LEN)
        .collect();

    let mut items: Vec<QuestionItem> = sentences
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, sentence)| QuestionItem {
            id: (i + 1) as u32,
            question: SENTENCE_QUESTION.to_string(),
            options: options_with(excerpt(sentence, MAX_OPTION_LEN)),
            correct_answer: 0,
            explanation: "This sentence is taken directly from the document.".to_string(),
            difficulty: Difficulty::Medium,
        })
        .collect();

    while items.len() < count {
        items.push(QuestionItem {
            id: (items.len() + 1) as u32,
            question: PAD_QUESTION.to_string(),
            options: options_with(
                "It presents information on its stated subject".to_string(),
            ),
            correct_answer: 0,
            explanation: "Generic item used when the document yields too few sentences."
                .to_string(),
            difficulty: Difficulty::Easy,
        });
    }

    items
}

fn options_with(correct: String) -> Vec<String> {
    let mut options = Vec::with_capacity(4);
    options.push(correct);
    options.extend(DISTRACTORS.iter().map(|s| s.to_string()));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_question_per_sentence_up_to_count() {
        let text = "The first sentence carries enough length. The second sentence also \
                    qualifies here. The third one rounds it out nicely.";
        let items = generate(text, 5);
        assert_eq!(items.len(), 5);
        assert_eq!(
            items
                .iter()
                .filter(|i| i.question == SENTENCE_QUESTION)
                .count(),
            3
        );
        assert_eq!(
            items
                .iter()
                .filter(|i| i.question == PAD_QUESTION)
                .count(),
            2
        );
    }

    #[test]
    fn sentence_items_are_medium_pads_are_easy() {
        let text = "A single qualifying sentence sits here on its own.";
        let items = generate(text, 5);
        assert_eq!(items[0].difficulty, Difficulty::Medium);
        assert!(items[1..].iter().all(|i| i.difficulty == Difficulty::Easy));
    }

    #[test]
    fn no_sentences_still_meets_count() {
        let items = generate("tiny. a. b.", 5);
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.question == PAD_QUESTION));
    }

    #[test]
    fn excess_sentences_truncate_to_count() {
        let text: String = (0..10)
            .map(|i| format!("Sentence number {i} is comfortably long enough. "))
            .collect();
        let items = generate(&text, 6);
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|i| i.question == SENTENCE_QUESTION));
    }

    #[test]
    fn items_are_well_formed() {
        let items = generate("A single qualifying sentence sits here on its own.", 7);
        for item in &items {
            assert_eq!(item.options.len(), 4);
            assert_eq!(item.correct_answer, 0);
            assert!(item.id > 0);
        }
    }
}
