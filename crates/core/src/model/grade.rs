use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter band shown on the quiz results screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a percentage onto a grade band.
    ///
    /// Total over `u8`: anything above 100 saturates to `A`.
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Short encouragement line for the results header.
    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            Self::A => "Excellent work!",
            Self::B => "Great job!",
            Self::C => "Good effort.",
            Self::D => "Keep studying.",
            Self::F => "Don't give up, try again.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// `round(100 * part / whole)`, rounding halves up; `0` when `whole` is zero.
#[must_use]
pub fn percentage(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole);
    let rounded = (part * 200 + whole) / (whole * 2);
    u8::try_from(rounded).unwrap_or(100)
}
