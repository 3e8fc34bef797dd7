use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use lesson_core::answer::Verdict;
use lesson_core::model::{Question, QuestionId, QuizResult, percentage};

use super::progress::QuizProgress;
use super::state::{Answer, Feedback, QuestionState, SubmittedAnswer};
use crate::error::QuizError;

/// Where a session stands. Loading happens before a session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active { index: usize },
    Complete,
}

/// One submission that changed validator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerAttempt {
    pub answer: SubmittedAnswer,
    pub verdict: Verdict,
}

/// Answer history for one question of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question_id: QuestionId,
    pub attempts: Vec<AnswerAttempt>,
    pub correct: bool,
}

/// In-memory quiz run over a fixed, ordered question list.
///
/// The caller drives it with explicit [`QuizSession::submit_answer`] and
/// [`QuizSession::advance`] calls; any delay between the two is up to the
/// presentation layer.
pub struct QuizSession {
    questions: Vec<Question>,
    index: usize,
    score: u32,
    state: Option<QuestionState>,
    history: Vec<QuestionRecord>,
    rng: StdRng,
}

impl QuizSession {
    /// Start a session over `questions`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if no questions are provided, or
    /// `QuizError::Question` if any question is malformed.
    pub fn start(questions: Vec<Question>) -> Result<Self, QuizError> {
        Self::start_with_rng(questions, StdRng::from_rng(&mut rand::rng()))
    }

    /// Start a session with a caller-provided RNG for story shuffles.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::start`].
    pub fn start_with_rng(questions: Vec<Question>, rng: StdRng) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        questions.iter().try_for_each(Question::validate)?;

        let mut session = Self {
            history: Vec::with_capacity(questions.len()),
            questions,
            index: 0,
            score: 0,
            state: None,
            rng,
        };
        session.restart();
        Ok(session)
    }

    fn restart(&mut self) {
        self.index = 0;
        self.score = 0;
        self.history = self
            .questions
            .iter()
            .map(|q| QuestionRecord {
                question_id: q.id.clone(),
                attempts: Vec::new(),
                correct: false,
            })
            .collect();
        self.state = Some(QuestionState::for_question(&self.questions[0], &mut self.rng));
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_complete() {
            SessionPhase::Complete
        } else {
            SessionPhase::Active { index: self.index }
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Position in `[0, total]`; `total` means complete.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Validator state of the current question; `None` once complete.
    #[must_use]
    pub fn current_state(&self) -> Option<&QuestionState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[QuestionRecord] {
        &self.history
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total();
        let answered = u32::try_from(self.index).unwrap_or(u32::MAX);
        QuizProgress {
            current: (self.index + 1).min(total),
            total,
            score: self.score,
            percent: percentage(answered, u32::try_from(total).unwrap_or(u32::MAX)),
        }
    }

    /// Submit an answer to the current question.
    ///
    /// A correct answer scores exactly one point, however many wrong attempts
    /// came before it. Wrong options stay disabled for this question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the last question,
    /// `QuizError::AnswerMismatch` if the answer does not fit the question kind,
    /// and `QuizError::Answer` for out-of-range input or a question that is
    /// already answered.
    pub fn submit_answer(&mut self, answer: Answer) -> Result<Feedback, QuizError> {
        let Some(state) = self.state.as_mut() else {
            return Err(QuizError::Completed);
        };
        let submission = state.submit(answer)?;
        let resolved = state.is_resolved();

        let record = &mut self.history[self.index];
        if let Some((answer, verdict)) = submission.record {
            record.attempts.push(AnswerAttempt { answer, verdict });
        }
        if resolved && !record.correct {
            record.correct = true;
            self.score += 1;
        }
        Ok(submission.feedback)
    }

    /// Assign a 1-based position to a story line of the current question.
    ///
    /// Returns the display index of the line that lost the position, if any.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AnswerMismatch` if the current question is not a
    /// story, or `QuizError::Answer` for out-of-range input.
    pub fn assign_position(
        &mut self,
        line: usize,
        position: Option<usize>,
    ) -> Result<Option<usize>, QuizError> {
        let kind = self.current_question().map_or("unknown", Question::kind_name);
        match self.state.as_mut() {
            Some(QuestionState::Story(story)) => Ok(story.assign(line, position)?),
            Some(_) => Err(QuizError::AnswerMismatch {
                kind,
                answer: "position",
            }),
            None => Err(QuizError::Completed),
        }
    }

    /// Move to the next question, or to `Complete` after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAnswered` before a correct submission, or
    /// `QuizError::Completed` if the session is already complete.
    pub fn advance(&mut self) -> Result<SessionPhase, QuizError> {
        let Some(state) = self.state.as_ref() else {
            return Err(QuizError::Completed);
        };
        if !state.is_resolved() {
            return Err(QuizError::NotAnswered);
        }

        self.index += 1;
        self.state = self
            .questions
            .get(self.index)
            .map(|q| QuestionState::for_question(q, &mut self.rng));
        Ok(self.phase())
    }

    /// Final score, available once every question is answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotComplete` before the session completes.
    pub fn results(&self) -> Result<QuizResult, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::NotComplete);
        }
        let total = u32::try_from(self.total()).unwrap_or(u32::MAX);
        Ok(QuizResult::new(self.score, total))
    }

    /// Back to the first question with a zero score, keeping the question list.
    pub fn reset(&mut self) {
        self.restart();
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("index", &self.index)
            .field("score", &self.score)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use lesson_core::answer::{AnswerError, LineStatus};
    use lesson_core::model::{
        Blank, ChoiceQuestion, FillBlankQuestion, Level, MultiBlankQuestion, QuestionKind,
        StoryQuestion,
    };

    fn question(id: &str, kind: QuestionKind) -> Question {
        Question {
            id: QuestionId::new(id),
            level: Level::new(1).unwrap(),
            prompt: format!("prompt {id}"),
            kind,
        }
    }

    fn choice(id: &str, options: usize, correct: usize) -> Question {
        question(
            id,
            QuestionKind::MultipleChoice(ChoiceQuestion {
                options: (0..options).map(|i| format!("opt {i}")).collect(),
                correct_answer_index: correct,
            }),
        )
    }

    fn fill_blank(id: &str) -> Question {
        question(
            id,
            QuestionKind::FillBlank(FillBlankQuestion {
                sentence: "I {{blank}} home".into(),
                options: vec!["go".into(), "goes".into()],
                correct_answer_index: 0,
            }),
        )
    }

    fn three_blanks(id: &str) -> Question {
        let blank = |name: &str, correct: usize| Blank {
            blank_id: name.to_string(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_answer_index: correct,
        };
        question(
            id,
            QuestionKind::MultipleBlanks(MultiBlankQuestion {
                paragraph: "{{b1}} {{b2}} {{b3}}".into(),
                blanks: vec![blank("b1", 2), blank("b2", 0), blank("b3", 1)],
            }),
        )
    }

    fn story(id: &str, lines: usize) -> Question {
        question(
            id,
            QuestionKind::StorySequence(StoryQuestion {
                lines: (0..lines).map(|i| format!("line {i}")).collect(),
                title: None,
            }),
        )
    }

    fn session(questions: Vec<Question>) -> QuizSession {
        QuizSession::start_with_rng(questions, StdRng::seed_from_u64(11)).unwrap()
    }

    /// 1-based positions that put every displayed line in canonical order.
    fn identity_positions(session: &QuizSession) -> Vec<usize> {
        match session.current_state() {
            Some(QuestionState::Story(state)) => state
                .lines()
                .iter()
                .map(|line| line.original_index + 1)
                .collect(),
            other => panic!("expected story state, got {other:?}"),
        }
    }

    #[test]
    fn empty_question_list_is_invalid_input() {
        let err = QuizSession::start(Vec::new()).unwrap_err();
        assert_eq!(err, QuizError::Empty);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn malformed_question_is_rejected_at_start() {
        let err = QuizSession::start(vec![choice("q1", 2, 5)]).unwrap_err();
        assert!(matches!(err, QuizError::Question(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn wrong_attempts_do_not_reduce_score() {
        let mut quiz = session(vec![choice("q1", 4, 3), fill_blank("q2")]);

        assert_eq!(
            quiz.submit_answer(Answer::Option(0)).unwrap(),
            Feedback::Incorrect { repeated: false }
        );
        assert_eq!(
            quiz.submit_answer(Answer::Option(1)).unwrap(),
            Feedback::Incorrect { repeated: false }
        );
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.submit_answer(Answer::Option(3)).unwrap(), Feedback::Correct);
        assert_eq!(quiz.score(), 1);

        let record = &quiz.history()[0];
        assert!(record.correct);
        assert_eq!(record.attempts.len(), 3);
        assert_eq!(record.attempts[2].verdict, Verdict::Correct);
    }

    #[test]
    fn disabled_option_rejection_is_idempotent() {
        let mut quiz = session(vec![choice("q1", 3, 2)]);
        quiz.submit_answer(Answer::Option(0)).unwrap();
        let state_before = quiz.current_state().cloned();

        let again = quiz.submit_answer(Answer::Option(0)).unwrap();
        assert_eq!(again, Feedback::Incorrect { repeated: true });
        assert_eq!(quiz.current_state().cloned(), state_before);
        assert_eq!(quiz.history()[0].attempts.len(), 1);
        match quiz.current_state() {
            Some(QuestionState::Choice(state)) => assert!(state.is_disabled(0)),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn question_scores_once() {
        let mut quiz = session(vec![choice("q1", 2, 1), choice("q2", 2, 0)]);
        quiz.submit_answer(Answer::Option(1)).unwrap();
        let err = quiz.submit_answer(Answer::Option(1)).unwrap_err();
        assert_eq!(err, QuizError::Answer(AnswerError::AlreadyResolved));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn advance_requires_correct_answer() {
        let mut quiz = session(vec![choice("q1", 2, 1)]);
        let err = quiz.advance().unwrap_err();
        assert_eq!(err, QuizError::NotAnswered);
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        quiz.submit_answer(Answer::Option(0)).unwrap();
        assert_eq!(quiz.advance(), Err(QuizError::NotAnswered));
        assert_eq!(quiz.phase(), SessionPhase::Active { index: 0 });
    }

    #[test]
    fn results_only_after_completion() {
        let mut quiz = session(vec![choice("q1", 2, 1), choice("q2", 2, 0)]);
        assert_eq!(quiz.results(), Err(QuizError::NotComplete));

        quiz.submit_answer(Answer::Option(1)).unwrap();
        assert_eq!(quiz.advance().unwrap(), SessionPhase::Active { index: 1 });
        quiz.submit_answer(Answer::Option(1)).unwrap();
        quiz.submit_answer(Answer::Option(0)).unwrap();
        assert_eq!(quiz.advance().unwrap(), SessionPhase::Complete);

        assert_eq!(quiz.index(), 2);
        assert!(quiz.current_question().is_none());
        let result = quiz.results().unwrap();
        assert_eq!((result.score(), result.total()), (2, 2));
        assert_eq!(result.percentage(), 100);

        assert_eq!(quiz.advance(), Err(QuizError::Completed));
        assert_eq!(quiz.submit_answer(Answer::Option(0)), Err(QuizError::Completed));
    }

    #[test]
    fn multi_blank_scores_only_when_last_blank_is_filled() {
        let mut quiz = session(vec![three_blanks("q1")]);

        assert_eq!(
            quiz.submit_answer(Answer::Option(0)).unwrap(),
            Feedback::Incorrect { repeated: false }
        );
        assert_eq!(
            quiz.submit_answer(Answer::Option(2)).unwrap(),
            Feedback::BlankFilled { blank: 0, next: 1 }
        );
        assert_eq!(
            quiz.submit_answer(Answer::Option(0)).unwrap(),
            Feedback::BlankFilled { blank: 1, next: 2 }
        );
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.advance(), Err(QuizError::NotAnswered));

        assert_eq!(quiz.submit_answer(Answer::Option(1)).unwrap(), Feedback::Correct);
        assert_eq!(quiz.score(), 1);

        let last = quiz.history()[0].attempts.last().unwrap();
        assert_eq!(last.answer, SubmittedAnswer::Sequence(vec![2, 0, 1]));
        match quiz.current_state() {
            Some(QuestionState::MultiBlank(state)) => {
                assert_eq!(state.answers(), &[Some(2), Some(0), Some(1)]);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn story_transposition_then_fix() {
        let mut quiz = session(vec![story("q1", 4)]);
        let correct = identity_positions(&quiz);

        let mut swapped = correct.clone();
        swapped.swap(0, 2);
        match quiz.submit_answer(Answer::Order(swapped)).unwrap() {
            Feedback::OrderIncorrect { statuses } => {
                let wrong: Vec<usize> = statuses
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| **s == LineStatus::Incorrect)
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(wrong, vec![0, 2]);
            }
            other => panic!("unexpected feedback {other:?}"),
        }
        assert_eq!(quiz.score(), 0);

        // Fix the two wrong lines one by one, then submit what is on screen.
        quiz.assign_position(0, Some(correct[0])).unwrap();
        quiz.assign_position(2, Some(correct[2])).unwrap();
        assert_eq!(quiz.submit_answer(Answer::CurrentOrder).unwrap(), Feedback::Correct);
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn story_rejects_non_permutation_without_side_effects() {
        let mut quiz = session(vec![story("q1", 3)]);
        let err = quiz.submit_answer(Answer::Order(vec![1, 1, 2])).unwrap_err();
        assert_eq!(err, QuizError::Answer(AnswerError::InvalidOrder { len: 3 }));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = quiz.submit_answer(Answer::CurrentOrder).unwrap_err();
        assert_eq!(err, QuizError::Answer(AnswerError::Unassigned));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(quiz.history()[0].attempts.is_empty());
    }

    #[test]
    fn answer_shape_must_match_question_kind() {
        let mut quiz = session(vec![choice("q1", 2, 0), story("q2", 2)]);
        let err = quiz.submit_answer(Answer::Order(vec![1, 2])).unwrap_err();
        assert!(matches!(err, QuizError::AnswerMismatch { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(
            quiz.assign_position(0, Some(1)),
            Err(QuizError::AnswerMismatch { .. })
        ));

        quiz.submit_answer(Answer::Option(0)).unwrap();
        quiz.advance().unwrap();
        assert!(matches!(
            quiz.submit_answer(Answer::Option(0)),
            Err(QuizError::AnswerMismatch { .. })
        ));
    }

    #[test]
    fn reset_restarts_with_same_questions() {
        let mut quiz = session(vec![choice("q1", 3, 2), choice("q2", 2, 1)]);
        quiz.submit_answer(Answer::Option(0)).unwrap();
        quiz.submit_answer(Answer::Option(2)).unwrap();
        quiz.advance().unwrap();

        quiz.reset();
        assert_eq!(quiz.phase(), SessionPhase::Active { index: 0 });
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.total(), 2);
        assert!(quiz.history().iter().all(|r| r.attempts.is_empty() && !r.correct));
        match quiz.current_state() {
            Some(QuestionState::Choice(state)) => assert!(!state.is_disabled(0)),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn score_is_monotonic_and_bounded() {
        let questions = vec![
            choice("q1", 3, 1),
            fill_blank("q2"),
            three_blanks("q3"),
            story("q4", 3),
        ];
        let mut quiz = session(questions);
        let mut last_score = 0;

        while !quiz.is_complete() {
            let feedback = match quiz.current_state() {
                Some(QuestionState::Story(_)) => {
                    let order = identity_positions(&quiz);
                    quiz.submit_answer(Answer::Order(order)).unwrap()
                }
                _ => {
                    // Walk options in order until the question resolves.
                    let mut option = 0;
                    loop {
                        let feedback = quiz.submit_answer(Answer::Option(option)).unwrap();
                        assert!(quiz.score() >= last_score);
                        last_score = quiz.score();
                        match feedback {
                            Feedback::Correct => break feedback,
                            Feedback::BlankFilled { .. } => option = 0,
                            _ => option += 1,
                        }
                    }
                }
            };
            assert!(feedback.is_correct());
            assert!(quiz.score() >= last_score);
            last_score = quiz.score();
            quiz.advance().unwrap();
        }

        let result = quiz.results().unwrap();
        assert_eq!(result.score(), 4);
        assert!(result.score() <= result.total());
    }

    #[test]
    fn progress_tracks_position_and_score() {
        let mut quiz = session(vec![choice("q1", 2, 0), choice("q2", 2, 0)]);
        let start = quiz.progress();
        assert_eq!((start.current, start.total, start.score, start.percent), (1, 2, 0, 0));

        quiz.submit_answer(Answer::Option(0)).unwrap();
        quiz.advance().unwrap();
        let mid = quiz.progress();
        assert_eq!((mid.current, mid.score, mid.percent), (2, 1, 50));
    }
}
