use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level must be between {min} and {max}, got {got}")]
    OutOfRange { got: i64, min: u8, max: u8 },

    #[error("level is not a number: {raw}")]
    NotANumber { raw: String },
}

/// Difficulty level of a lesson or quiz, from 1 (letters) to 5 (stories).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a validated level.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` if `value` is outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, LevelError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LevelError::OutOfRange {
                got: i64::from(value),
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The first level, where new learners start.
    pub const FIRST: Level = Level(Self::MIN);

    /// Every level in ascending order.
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN..=Self::MAX).map(Level)
    }

    /// Human-readable title shown on the level page.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.0 {
            1 => "Alphabet Recognition",
            2 => "Words",
            3 => "Short Sentences",
            4 => "Paragraphs",
            _ => "Stories",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.trim().parse().map_err(|_| LevelError::NotANumber {
            raw: s.to_string(),
        })?;
        let value = u8::try_from(raw).map_err(|_| LevelError::OutOfRange {
            got: raw,
            min: Self::MIN,
            max: Self::MAX,
        })?;
        Self::new(value)
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({})", self.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
