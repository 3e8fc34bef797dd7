/// Progress of a running quiz, for a progress bar and score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based number of the question on screen.
    pub current: usize,
    pub total: usize,
    pub score: u32,
    /// Share of questions already passed, rounded.
    pub percent: u32,
}
