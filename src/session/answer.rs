use crate::session::quiz::{QuizMode, QuizState};

/// Emitted when an answer is actually recorded. Re-answering an already
/// answered question yields nothing.
#[derive(Clone, Copy, Debug)]
pub struct AnswerEvent {
    pub index: usize,
    #[allow(dead_code)]
    pub option: usize,
    pub correct: bool,
}

/// Record an answer for the current question. The first recorded answer per
/// index is final in both modes. In End mode the quiz advances (or finishes)
/// immediately; in Immediate mode the advance waits for `process_confirm`,
/// giving the caller a feedback interval.
pub fn process_answer(quiz: &mut QuizState, option: usize) -> Option<AnswerEvent> {
    if quiz.is_finished() || quiz.awaiting_confirm {
        return None;
    }
    if option >= quiz.current_question().options.len() {
        return None;
    }
    let index = quiz.current;
    if quiz.answers.contains_key(&index) {
        return None;
    }

    let correct = quiz.questions[index].correct_answer == option;
    quiz.answers.insert(index, option);

    match quiz.settings.mode {
        QuizMode::End => advance(quiz),
        QuizMode::Immediate => quiz.awaiting_confirm = true,
    }

    Some(AnswerEvent {
        index,
        option,
        correct,
    })
}

/// Immediate mode only: perform the advance deferred by `process_answer`.
/// Returns false when there is nothing to confirm.
pub fn process_confirm(quiz: &mut QuizState) -> bool {
    if quiz.settings.mode != QuizMode::Immediate || !quiz.awaiting_confirm {
        return false;
    }
    quiz.awaiting_confirm = false;
    advance(quiz);
    true
}

fn advance(quiz: &mut QuizState) {
    if quiz.current + 1 < quiz.questions.len() {
        quiz.current += 1;
    } else {
        quiz.finished_at = Some(std::time::Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Difficulty, QuestionItem};
    use crate::session::quiz::QuizSettings;

    fn item(id: u32) -> QuestionItem {
        QuestionItem {
            id,
            question: format!("Question {id}?"),
            options: vec![
                "right".to_string(),
                "wrong a".to_string(),
                "wrong b".to_string(),
                "wrong c".to_string(),
            ],
            correct_answer: 0,
            explanation: "because".to_string(),
            difficulty: Difficulty::Medium,
        }
    }

    fn quiz(mode: QuizMode, count: usize) -> QuizState {
        let questions = (1..=count as u32).map(item).collect();
        QuizState::new(
            questions,
            QuizSettings {
                question_count: count,
                mode,
            },
        )
    }

    #[test]
    fn end_mode_advances_on_each_answer() {
        let mut quiz = quiz(QuizMode::End, 2);

        let event = process_answer(&mut quiz, 0).unwrap();
        assert!(event.correct);
        assert_eq!(quiz.current, 1);
        assert!(!quiz.is_finished());

        let event = process_answer(&mut quiz, 1).unwrap();
        assert!(!event.correct);
        assert_eq!(quiz.answer_for(0), Some(0));
        assert_eq!(quiz.answer_for(1), Some(1));
        // Last answer finishes the quiz; the index never passes the end.
        assert_eq!(quiz.current, 1);
        assert!(quiz.is_finished());
    }

    #[test]
    fn immediate_mode_defers_advance_until_confirm() {
        let mut quiz = quiz(QuizMode::Immediate, 2);

        process_answer(&mut quiz, 0).unwrap();
        assert_eq!(quiz.current, 0);
        assert!(quiz.awaiting_confirm);

        assert!(process_confirm(&mut quiz));
        assert_eq!(quiz.current, 1);
        assert!(!quiz.awaiting_confirm);

        process_answer(&mut quiz, 2).unwrap();
        assert!(!quiz.is_finished());
        assert!(process_confirm(&mut quiz));
        assert!(quiz.is_finished());
    }

    #[test]
    fn first_answer_is_final() {
        let mut quiz = quiz(QuizMode::Immediate, 2);

        process_answer(&mut quiz, 3).unwrap();
        process_confirm(&mut quiz);
        // Back on index 1 now; index 0 is settled.
        assert_eq!(quiz.answer_for(0), Some(3));

        let mut quiz = quiz_end_answered();
        assert!(process_answer(&mut quiz, 2).is_none());
        assert_eq!(quiz.answer_for(0), Some(1));
    }

    // End-mode quiz where index 0 is already answered but not advanced,
    // as if a caller replayed an answer for the same index.
    fn quiz_end_answered() -> QuizState {
        let mut q = quiz(QuizMode::End, 2);
        q.answers.insert(0, 1);
        q
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut quiz = quiz(QuizMode::End, 2);
        assert!(process_answer(&mut quiz, 4).is_none());
        assert!(quiz.answers.is_empty());
        assert_eq!(quiz.current, 0);
    }

    #[test]
    fn confirm_is_noop_in_end_mode() {
        let mut quiz = quiz(QuizMode::End, 2);
        assert!(!process_confirm(&mut quiz));
        process_answer(&mut quiz, 0);
        assert!(!process_confirm(&mut quiz));
    }

    #[test]
    fn answers_ignored_after_finish() {
        let mut quiz = quiz(QuizMode::End, 1);
        process_answer(&mut quiz, 0).unwrap();
        assert!(quiz.is_finished());
        assert!(process_answer(&mut quiz, 1).is_none());
        assert_eq!(quiz.answers.len(), 1);
    }

    #[test]
    fn answer_keys_stay_in_bounds() {
        let mut quiz = quiz(QuizMode::End, 3);
        for option in [0, 2, 1] {
            process_answer(&mut quiz, option);
        }
        assert!(quiz.answers.keys().all(|&k| k < quiz.len()));
        assert_eq!(quiz.answers.len(), 3);
    }
}
