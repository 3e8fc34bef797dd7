use std::sync::Arc;

use content::{ContentConfig, ContentStore, InMemorySource};
use lesson_core::model::{Level, PerformanceTier};
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{Answer, ErrorKind, Feedback, QuestionState, QuizError, QuizService, SessionPhase};

const QUIZ: &str = r#"{
    "metadata": { "title": "Sentences" },
    "items": [
        {"id":"q1","level":3,"type":"multiple-choice","question":"Pick the letter",
         "options":["a","b","c"],"correctAnswerIndex":2},
        {"id":"q2","level":3,"type":"fill-blank","question":"Complete",
         "sentence":"I {{blank}} home","options":["go","goes"],"correctAnswerIndex":0},
        {"id":"q3","level":3,"type":"multiple-blanks","question":"Fill the paragraph",
         "paragraph":"{{b1}} and {{b2}}",
         "blanks":[
            {"blankId":"b1","options":["x","y"],"correctAnswerIndex":1},
            {"blankId":"b2","options":["x","y"],"correctAnswerIndex":0}
         ]},
        {"id":"q4","level":3,"type":"story-sequence","question":"Order the story",
         "lines":["first","second","third"]}
    ]
}"#;

fn service() -> QuizService {
    let source = InMemorySource::new();
    source.insert("quizzes/level-3-quiz-1.json", QUIZ).unwrap();
    source.insert("quizzes/level-3-quiz-2.json", "[]").unwrap();
    let store = ContentStore::new(
        Arc::new(source),
        ContentConfig::default().with_max_quizzes_per_level(3),
    );
    QuizService::new(Arc::new(store))
}

#[tokio::test]
async fn lists_quizzes_of_a_level() {
    let quizzes = service().available(Level::new(3).unwrap()).await;
    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0].title, "Sentences");
    assert_eq!(quizzes[0].question_count, 4);
    assert_eq!(quizzes[1].title, "Quiz 2");
}

#[tokio::test]
async fn empty_or_missing_quiz_cannot_start() {
    let quizzes = service();
    let level = Level::new(3).unwrap();
    for number in [2, 3] {
        let err = quizzes.start(level, number).await.unwrap_err();
        assert_eq!(err, QuizError::Empty);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}

#[tokio::test]
async fn full_run_with_mistakes_still_scores_every_question() {
    let mut session = service()
        .start_with_rng(Level::new(3).unwrap(), 1, StdRng::seed_from_u64(5))
        .await
        .unwrap();

    // q1: two wrong picks, then the right one.
    assert!(!session.submit_answer(Answer::Option(0)).unwrap().is_correct());
    assert!(!session.submit_answer(Answer::Option(1)).unwrap().is_correct());
    assert_eq!(session.submit_answer(Answer::Option(2)).unwrap(), Feedback::Correct);
    session.advance().unwrap();

    // q2
    assert_eq!(session.submit_answer(Answer::Option(0)).unwrap(), Feedback::Correct);
    session.advance().unwrap();

    // q3
    assert_eq!(
        session.submit_answer(Answer::Option(1)).unwrap(),
        Feedback::BlankFilled { blank: 0, next: 1 }
    );
    assert_eq!(session.submit_answer(Answer::Option(0)).unwrap(), Feedback::Correct);
    session.advance().unwrap();

    // q4: place every line where it belongs.
    let order: Vec<usize> = match session.current_state() {
        Some(QuestionState::Story(story)) => {
            story.lines().iter().map(|l| l.original_index + 1).collect()
        }
        other => panic!("expected story, got {other:?}"),
    };
    assert_eq!(session.submit_answer(Answer::Order(order)).unwrap(), Feedback::Correct);
    assert_eq!(session.advance().unwrap(), SessionPhase::Complete);

    let result = session.results().unwrap();
    assert_eq!(result.score(), 4);
    assert_eq!(result.total(), 4);
    assert_eq!(result.percentage(), 100);
    // Fewer than seven correct answers is always keep-learning, whatever the percentage.
    assert_eq!(result.tier(), PerformanceTier::KeepLearning);
}
