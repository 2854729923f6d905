//! Board results in standard notation.

use crate::{Color, Score};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a result code is not one of `*`, `1-0`, `0-1`, `1/2-1/2`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown result code: '{0}'")]
pub struct ResultParseError(pub String);

/// Outcome of a single board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatchResult {
    /// Not played yet, or in progress.
    #[default]
    Pending,
    WhiteWin,
    BlackWin,
    Draw,
}

impl MatchResult {
    /// Returns true for any result other than [`MatchResult::Pending`].
    #[inline]
    pub const fn is_decided(self) -> bool {
        !matches!(self, MatchResult::Pending)
    }

    /// Points earned by the given side, or `None` while pending.
    pub const fn points_for(self, color: Color) -> Option<Score> {
        match (self, color) {
            (MatchResult::Pending, _) => None,
            (MatchResult::Draw, _) => Some(Score::HALF),
            (MatchResult::WhiteWin, Color::White) | (MatchResult::BlackWin, Color::Black) => {
                Some(Score::ONE)
            }
            _ => Some(Score::ZERO),
        }
    }

    /// The winning side, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            MatchResult::WhiteWin => Some(Color::White),
            MatchResult::BlackWin => Some(Color::Black),
            _ => None,
        }
    }

    /// Standard notation for the result.
    pub const fn notation(self) -> &'static str {
        match self {
            MatchResult::Pending => "*",
            MatchResult::WhiteWin => "1-0",
            MatchResult::BlackWin => "0-1",
            MatchResult::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

impl FromStr for MatchResult {
    type Err = ResultParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "*" => Ok(MatchResult::Pending),
            "1-0" => Ok(MatchResult::WhiteWin),
            "0-1" => Ok(MatchResult::BlackWin),
            "1/2-1/2" | "½-½" => Ok(MatchResult::Draw),
            other => Err(ResultParseError(other.to_string())),
        }
    }
}

impl TryFrom<String> for MatchResult {
    type Error = ResultParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchResult> for String {
    fn from(result: MatchResult) -> Self {
        result.notation().to_string()
    }
}
