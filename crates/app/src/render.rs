//! Plain-text views of quiz, lesson and scan state.
//!
//! Everything here is a pure function of the state it is handed, so the
//! interactive loop only decides *when* to print.

use std::fmt::Write as _;

use content::ScanReport;
use lesson_core::answer::LineStatus;
use lesson_core::model::{
    LessonGroupMetadata, LessonItem, MultiBlankQuestion, Question, QuestionKind, QuizResult,
    StoryQuestion,
};
use services::{Feedback, QuestionState, QuizProgress, QuizSummary};

/// Overlays a combining long stroke on every character.
#[must_use]
pub fn strike(text: &str) -> String {
    text.chars().flat_map(|c| [c, '\u{0336}']).collect()
}

#[must_use]
pub fn progress(progress: &QuizProgress) -> String {
    const WIDTH: usize = 20;
    let filled = (progress.percent as usize * WIDTH) / 100;
    format!(
        "[{}{}] question {}/{}  score {}",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled.min(WIDTH)),
        progress.current,
        progress.total,
        progress.score
    )
}

/// Prompt, body and input hint for the current question.
#[must_use]
pub fn question(question: &Question, state: &QuestionState) -> String {
    let mut out = format!("{}\n", question.prompt);
    match (&question.kind, state) {
        (QuestionKind::MultipleChoice(q), QuestionState::Choice(choice)) => {
            options(&mut out, &q.options, |i| choice.is_disabled(i));
            out.push_str("Type an option number.");
        }
        (QuestionKind::FillBlank(q), QuestionState::Choice(choice)) => {
            let _ = writeln!(out, "  {}", q.display_sentence());
            options(&mut out, &q.options, |i| choice.is_disabled(i));
            out.push_str("Type an option number.");
        }
        (QuestionKind::MultipleBlanks(q), QuestionState::MultiBlank(blanks)) => {
            multi_blank(&mut out, q, blanks);
        }
        (QuestionKind::StorySequence(q), QuestionState::Story(story)) => {
            story_lines(&mut out, q, story);
        }
        _ => out.push_str("(this question cannot be shown)"),
    }
    out
}

fn options(out: &mut String, options: &[String], disabled: impl Fn(usize) -> bool) {
    for (index, option) in options.iter().enumerate() {
        if disabled(index) {
            let _ = writeln!(out, "  {}) {}", index + 1, strike(option));
        } else {
            let _ = writeln!(out, "  {}) {option}", index + 1);
        }
    }
}

fn multi_blank(
    out: &mut String,
    question: &MultiBlankQuestion,
    state: &lesson_core::answer::MultiBlankState,
) {
    let _ = writeln!(out, "  {}", state.display_paragraph(question));
    if state.is_complete() {
        return;
    }
    let cursor = state.cursor();
    let _ = writeln!(out, "Blank {} of {}:", cursor + 1, state.blank_count());
    if let Some(blank) = question.blanks.get(cursor) {
        options(out, &blank.options, |i| state.is_disabled(i));
    }
    out.push_str("Type an option number.");
}

fn story_lines(
    out: &mut String,
    question: &StoryQuestion,
    state: &lesson_core::answer::StoryState,
) {
    if let Some(title) = &question.title {
        let _ = writeln!(out, "  {title}");
    }
    if state.is_solved() {
        for line in state.display_lines() {
            let _ = writeln!(out, "  {}. {}", line.original_index + 1, line.text);
        }
        return;
    }
    for (index, line) in state.lines().iter().enumerate() {
        let position = line
            .position
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let mark = match state.line_status(index) {
            LineStatus::Correct => " ok",
            LineStatus::Incorrect => " x",
            LineStatus::Pending => "",
        };
        let _ = writeln!(out, "  {}) [{position}] {}{mark}", index + 1, line.text);
    }
    out.push_str(
        "Type `<line> <position>` to place a line, `<line> -` to clear it, \
         `order <p1> <p2> ...` for every line at once, or `submit`.",
    );
}

#[must_use]
pub fn feedback(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Correct => "Correct!".to_string(),
        Feedback::Incorrect { repeated: true } => "You already tried that one.".to_string(),
        Feedback::Incorrect { repeated: false } => "Not quite, try again.".to_string(),
        Feedback::BlankFilled { next, .. } => format!("Correct! On to blank {}.", next + 1),
        Feedback::OrderIncorrect { statuses } => {
            let wrong = statuses
                .iter()
                .filter(|s| **s == LineStatus::Incorrect)
                .count();
            format!("{wrong} line(s) are out of place.")
        }
    }
}

#[must_use]
pub fn results(result: &QuizResult) -> String {
    format!(
        "Quiz complete: {}/{} ({}%)\n{}: {}",
        result.score(),
        result.total(),
        result.percentage(),
        result.tier(),
        result.message()
    )
}

#[must_use]
pub fn quiz_summary(summary: &QuizSummary) -> String {
    format!(
        "  quiz {}: {} ({} questions)",
        summary.number, summary.title, summary.question_count
    )
}

#[must_use]
pub fn lesson_group(meta: &LessonGroupMetadata) -> String {
    match &meta.description {
        Some(description) => format!(
            "  lesson {}: {} ({} items) - {description}",
            meta.lesson_number, meta.title, meta.item_count
        ),
        None => format!(
            "  lesson {}: {} ({} items)",
            meta.lesson_number, meta.title, meta.item_count
        ),
    }
}

#[must_use]
pub fn lesson_line(item: &LessonItem) -> String {
    format!("  [{}] {} {}", item.id, item.kind.label(), item.display_content())
}

#[must_use]
pub fn lesson_detail(item: &LessonItem) -> String {
    let mut out = format!("{} ({})\n", item.id, item.kind.label());
    if let Some(title) = &item.title {
        let _ = writeln!(out, "  {title}");
    }
    let _ = writeln!(out, "  {}", item.native);
    let _ = writeln!(out, "  {}", item.transliteration);
    if let Some(meaning) = &item.meaning {
        let _ = writeln!(out, "  meaning: {meaning}");
    }
    if !item.audio_src.is_empty() {
        let _ = writeln!(out, "  audio: {}", item.audio_src);
    }
    out
}

#[must_use]
pub fn scan_report(report: &ScanReport) -> String {
    let mut out = String::new();
    for file in &report.invalid {
        let _ = writeln!(
            out,
            "invalid {}:{}:{}: {}",
            file.path.display(),
            file.line,
            file.column,
            file.message
        );
    }
    let _ = write!(
        out,
        "{} files checked, {} valid, {} invalid",
        report.total(),
        report.valid.len(),
        report.invalid.len()
    );
    out
}
