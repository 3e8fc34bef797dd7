//! Interactive loops that forward terminal input to the services.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, Lines};

use lesson_core::model::{Level, QuestionKind, QuizResult};
use services::{Answer, Feedback, PracticeService, QuestionState, QuizSession};

use crate::render;

type PlayResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Cosmetic pauses between quiz steps. Never part of the session state.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    enabled: bool,
}

impl Pacing {
    pub const BLANK_FILLED: Duration = Duration::from_millis(500);
    pub const BEFORE_ADVANCE: Duration = Duration::from_millis(1000);
    pub const STORY_SOLVED: Duration = Duration::from_millis(2000);

    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    async fn pause(self, delay: Duration) {
        if self.enabled {
            tokio::time::sleep(delay).await;
        }
    }
}

/// One parsed line of quiz input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Quit,
    Submit(Answer),
    Place { line: usize, position: Option<usize> },
}

fn parse_number(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a number from 1, got `{raw}`")),
    }
}

fn parse_action(input: &str, state: &QuestionState) -> Result<Action, String> {
    let input = input.trim();
    if input == "q" || input == "quit" {
        return Ok(Action::Quit);
    }
    match state {
        QuestionState::Choice(_) | QuestionState::MultiBlank(_) => {
            let index = parse_number(input)? - 1;
            let disabled = match state {
                QuestionState::Choice(choice) => choice.is_disabled(index),
                QuestionState::MultiBlank(blanks) => blanks.is_disabled(index),
                QuestionState::Story(_) => false,
            };
            if disabled {
                return Err(format!("option {} was already tried", index + 1));
            }
            Ok(Action::Submit(Answer::Option(index)))
        }
        QuestionState::Story(_) => {
            let mut parts = input.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some("submit" | "s"), None, _) => Ok(Action::Submit(Answer::CurrentOrder)),
                (Some("order"), Some(_), _) => {
                    let positions = input
                        .split_whitespace()
                        .skip(1)
                        .map(parse_number)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Action::Submit(Answer::Order(positions)))
                }
                (Some(line), Some("-"), None) => Ok(Action::Place {
                    line: parse_number(line)? - 1,
                    position: None,
                }),
                (Some(line), Some(position), None) => Ok(Action::Place {
                    line: parse_number(line)? - 1,
                    position: Some(parse_number(position)?),
                }),
                _ => Err("expected `<line> <position>`, `<line> -`, `order ...` or `submit`".into()),
            }
        }
    }
}

/// Runs a session to completion. Returns `None` if the learner quits early.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written.
pub async fn run_quiz<R, W>(
    session: &mut QuizSession,
    input: &mut Lines<R>,
    out: &mut W,
    pacing: Pacing,
) -> PlayResult<Option<QuizResult>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        let (Some(question), Some(state)) = (session.current_question(), session.current_state())
        else {
            break;
        };
        let is_story = matches!(question.kind, QuestionKind::StorySequence(_));
        writeln!(out, "\n{}", render::progress(&session.progress()))?;
        writeln!(out, "{}", render::question(question, state))?;
        out.flush()?;

        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        let action = match parse_action(&line, state) {
            Ok(action) => action,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match action {
            Action::Quit => return Ok(None),
            Action::Place { line, position } => {
                if let Err(err) = session.assign_position(line, position) {
                    writeln!(out, "{err}")?;
                }
            }
            Action::Submit(answer) => {
                let feedback = match session.submit_answer(answer) {
                    Ok(feedback) => feedback,
                    Err(err) => {
                        log::debug!("[QUIZ] rejected answer: {err}");
                        writeln!(out, "{err}")?;
                        continue;
                    }
                };
                writeln!(out, "{}", render::feedback(&feedback))?;
                match feedback {
                    Feedback::Correct => {
                        if is_story {
                            if let (Some(question), Some(state)) =
                                (session.current_question(), session.current_state())
                            {
                                writeln!(out, "{}", render::question(question, state))?;
                            }
                            pacing.pause(Pacing::STORY_SOLVED).await;
                        } else {
                            pacing.pause(Pacing::BEFORE_ADVANCE).await;
                        }
                        session.advance()?;
                    }
                    Feedback::BlankFilled { .. } => pacing.pause(Pacing::BLANK_FILLED).await,
                    Feedback::Incorrect { .. } | Feedback::OrderIncorrect { .. } => {}
                }
            }
        }
    }

    let result = session.results()?;
    log::info!(
        "[QUIZ] finished score:{}/{} tier:{}",
        result.score(),
        result.total(),
        result.tier()
    );
    writeln!(out, "\n{}", render::results(&result))?;
    Ok(Some(result))
}

/// Random practice: shows batches of unread items until the level is done or
/// the learner quits.
///
/// Returns how many items were marked read.
///
/// # Errors
///
/// Returns an error if the terminal cannot be used or progress cannot be stored.
pub async fn run_practice<R, W>(
    practice: &PracticeService,
    level: Level,
    input: &mut Lines<R>,
    out: &mut W,
) -> PlayResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut marked = 0;
    loop {
        let batch = practice.random_batch(level).await?;
        if batch.is_empty() {
            writeln!(out, "Level {level} finished: every item is marked read.")?;
            return Ok(marked);
        }
        writeln!(out, "\nNew batch of {} items.", batch.len())?;
        for item in &batch {
            write!(out, "\n{}", render::lesson_detail(item))?;
            writeln!(out, "Enter marks it read, `s` skips, `q` quits.")?;
            out.flush()?;

            let Some(line) = input.next_line().await? else {
                return Ok(marked);
            };
            match line.trim() {
                "q" | "quit" => return Ok(marked),
                "s" | "skip" => {}
                _ => {
                    if practice.mark_as_read(level, &item.id).await? {
                        marked += 1;
                    }
                }
            }
        }
    }
}
