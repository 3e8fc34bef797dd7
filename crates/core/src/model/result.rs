use serde::{Deserialize, Serialize};
use std::fmt;

/// Encouragement tier shown on the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceTier {
    Excellent,
    Great,
    Good,
    KeepLearning,
}

impl PerformanceTier {
    /// Classifies a raw score; the first matching inclusive lower bound wins.
    #[must_use]
    pub fn classify(score: u32) -> Self {
        if score >= 13 {
            PerformanceTier::Excellent
        } else if score >= 10 {
            PerformanceTier::Great
        } else if score >= 7 {
            PerformanceTier::Good
        } else {
            PerformanceTier::KeepLearning
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "excellent",
            PerformanceTier::Great => "great",
            PerformanceTier::Good => "good",
            PerformanceTier::KeepLearning => "keep-learning",
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Outstanding! You have mastered this level.",
            PerformanceTier::Great => "Great job! You're almost there.",
            PerformanceTier::Good => "Good work! A little more practice will help.",
            PerformanceTier::KeepLearning => "Keep practicing, every attempt makes you better.",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final summary of a completed quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    score: u32,
    total: u32,
}

impl QuizResult {
    /// Creates a result, clamping `score` to `total`.
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score: score.min(total),
            total,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Rounded percentage; an empty quiz scores 0%.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total)
    }

    #[must_use]
    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::classify(self.score)
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.tier().message()
    }
}

/// `round(score / total * 100)` with halves rounded up; 0 when `total == 0`.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = u64::from(score) * 100;
    let total = u64::from(total);
    let rounded = (scaled * 2 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
