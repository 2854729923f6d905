//! Registered participants and their running counters.

use crate::{ParticipantId, Score};
use serde::{Deserialize, Serialize};

/// Tiebreak values derived from the completed-match history.
///
/// Values are exact multiples of 0.25 and therefore exactly representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiebreaks {
    pub buchholz: f64,
    pub buchholz_cut1: f64,
    pub sonneborn_berger: f64,
    pub progressive_score: f64,
}

/// A participant as registered in a tournament.
///
/// Score, win and bye fields belong to the score ledger; tiebreak fields to
/// the tiebreak calculator. `confirmed` and `paid` are owned by registration
/// and never touched by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub black_wins: u32,
    /// Running "games played" counter, +0.5 for each decided game.
    #[serde(default)]
    pub games_played: Score,
    /// Rounds in which this participant received a bye.
    #[serde(default)]
    pub bye_rounds: Vec<u32>,
    #[serde(default)]
    pub tiebreaks: Tiebreaks,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub paid: bool,
}

impl Participant {
    /// Creates a participant with zeroed counters.
    pub fn new(id: impl Into<ParticipantId>) -> Self {
        Participant {
            id: id.into(),
            score: Score::ZERO,
            wins: 0,
            black_wins: 0,
            games_played: Score::ZERO,
            bye_rounds: Vec::new(),
            tiebreaks: Tiebreaks::default(),
            confirmed: false,
            paid: false,
        }
    }

    /// Sets the current score.
    pub fn with_score(mut self, score: Score) -> Self {
        self.score = score;
        self
    }

    /// Number of byes received so far.
    pub fn byes(&self) -> u32 {
        self.bye_rounds.len() as u32
    }

    /// Returns true if a bye was awarded in `round`.
    pub fn had_bye_in(&self, round: u32) -> bool {
        self.bye_rounds.contains(&round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_participant_is_zeroed() {
        let p = Participant::new("alice");
        assert_eq!(p.score, Score::ZERO);
        assert_eq!(p.byes(), 0);
        assert!(!p.confirmed);
        assert_eq!(p.tiebreaks, Tiebreaks::default());
    }

    #[test]
    fn deserialize_with_defaults() {
        let p: Participant = serde_json::from_str(r#"{"id":"bob","score":1.5}"#).unwrap();
        assert_eq!(p.id, ParticipantId::from("bob"));
        assert_eq!(p.score, Score::from_halves(3));
        assert_eq!(p.wins, 0);
        assert!(p.bye_rounds.is_empty());
    }

    #[test]
    fn bye_rounds_count() {
        let mut p = Participant::new("carol");
        p.bye_rounds.push(2);
        assert_eq!(p.byes(), 1);
        assert!(p.had_bye_in(2));
        assert!(!p.had_bye_in(1));
    }
}
