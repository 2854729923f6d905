//! Applying board results to participants' running counters.
//!
//! Recording a result first reverts whatever the board previously
//! contributed, so calling [`apply_result`] again with the same or a
//! corrected result always leaves the counters consistent.

use crate::pairing::BYE_POINTS;
use serde::Serialize;
use swiss_core::{Color, Match, MatchResult, Participant, ParticipantId, ResultParseError, Score};
use thiserror::Error;

/// Errors raised while applying a result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown result code: '{0}'")]
    UnknownResult(String),

    #[error("participant {0} is not registered in this tournament")]
    UnknownParticipant(ParticipantId),

    #[error("participant {0} is paired against itself")]
    SelfPairing(ParticipantId),

    #[error("the counters of {0} would leave their valid range")]
    CounterOutOfRange(ParticipantId),
}

impl From<ResultParseError> for LedgerError {
    fn from(e: ResultParseError) -> Self {
        LedgerError::UnknownResult(e.0)
    }
}

/// Change to one participant's counters. Scores are in half-points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideDelta {
    pub score: i32,
    pub wins: i32,
    pub black_wins: i32,
    pub games_played: i32,
    pub byes: i32,
}

impl SideDelta {
    /// Returns true if nothing changes.
    pub fn is_zero(&self) -> bool {
        *self == SideDelta::default()
    }

    /// The delta that undoes this one.
    pub fn inverse(self) -> Self {
        SideDelta {
            score: -self.score,
            wins: -self.wins,
            black_wins: -self.black_wins,
            games_played: -self.games_played,
            byes: -self.byes,
        }
    }

    fn plus(self, other: SideDelta) -> Self {
        SideDelta {
            score: self.score + other.score,
            wins: self.wins + other.wins,
            black_wins: self.black_wins + other.black_wins,
            games_played: self.games_played + other.games_played,
            byes: self.byes + other.byes,
        }
    }

    /// Contribution of `result` to the participant playing `color`.
    fn for_side(result: MatchResult, color: Color) -> Self {
        let Some(points) = result.points_for(color) else {
            return SideDelta::default();
        };
        let won = result.winner() == Some(color);
        SideDelta {
            score: points.halves() as i32,
            wins: i32::from(won),
            black_wins: i32::from(won && color == Color::Black),
            games_played: 1,
            byes: 0,
        }
    }
}

/// Net change produced by recording a result on a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDelta {
    pub white: SideDelta,
    pub black: SideDelta,
}

impl ScoreDelta {
    /// The change a result makes from a blank board.
    pub fn for_result(result: MatchResult) -> Self {
        ScoreDelta {
            white: SideDelta::for_side(result, Color::White),
            black: SideDelta::for_side(result, Color::Black),
        }
    }

    /// Returns true if neither side changes.
    pub fn is_zero(&self) -> bool {
        self.white.is_zero() && self.black.is_zero()
    }

    /// The delta that undoes this one.
    pub fn inverse(self) -> Self {
        ScoreDelta {
            white: self.white.inverse(),
            black: self.black.inverse(),
        }
    }

    fn plus(self, other: ScoreDelta) -> Self {
        ScoreDelta {
            white: self.white.plus(other.white),
            black: self.black.plus(other.black),
        }
    }
}

/// Counters of a participant after a delta, computed before committing.
struct Counters {
    score: Score,
    wins: u32,
    black_wins: u32,
    games_played: Score,
}

impl Counters {
    fn after(participant: &Participant, delta: &SideDelta) -> Option<Self> {
        Some(Counters {
            score: participant.score.checked_add_halves(delta.score)?,
            wins: participant.wins.checked_add_signed(delta.wins)?,
            black_wins: participant.black_wins.checked_add_signed(delta.black_wins)?,
            games_played: participant.games_played.checked_add_halves(delta.games_played)?,
        })
    }

    fn commit(self, participant: &mut Participant) {
        participant.score = self.score;
        participant.wins = self.wins;
        participant.black_wins = self.black_wins;
        participant.games_played = self.games_played;
    }
}

/// Records `result` on `game` and updates both participants.
///
/// A repeated result is a no-op returning a zero delta. A different
/// result reverts the previous one before applying the new one. Nothing is
/// modified when an error is returned.
///
/// # Errors
///
/// Returns [`LedgerError::SelfPairing`] for a board with the same
/// participant on both sides, [`LedgerError::UnknownParticipant`] if either
/// side is missing from `participants`, and
/// [`LedgerError::CounterOutOfRange`] when the stored counters do not
/// contain the result being reverted or would overflow.
pub fn apply_result(
    game: &mut Match,
    result: MatchResult,
    participants: &mut [Participant],
) -> Result<ScoreDelta, LedgerError> {
    if game.result == result {
        return Ok(ScoreDelta::default());
    }
    if game.white == game.black {
        return Err(LedgerError::SelfPairing(game.white.clone()));
    }

    let white = position_of(participants, &game.white)?;
    let black = position_of(participants, &game.black)?;

    let delta = ScoreDelta::for_result(game.result)
        .inverse()
        .plus(ScoreDelta::for_result(result));

    let white_after = Counters::after(&participants[white], &delta.white)
        .ok_or_else(|| LedgerError::CounterOutOfRange(game.white.clone()))?;
    let black_after = Counters::after(&participants[black], &delta.black)
        .ok_or_else(|| LedgerError::CounterOutOfRange(game.black.clone()))?;

    white_after.commit(&mut participants[white]);
    black_after.commit(&mut participants[black]);

    tracing::debug!(
        round = game.round,
        board = game.board,
        previous = %game.result,
        result = %result,
        "result applied"
    );
    game.result = result;

    Ok(delta)
}

/// Parses `code` in standard notation and applies it.
///
/// # Errors
///
/// Returns [`LedgerError::UnknownResult`] for an unrecognised code, plus
/// everything [`apply_result`] can return.
pub fn apply_result_code(
    game: &mut Match,
    code: &str,
    participants: &mut [Participant],
) -> Result<ScoreDelta, LedgerError> {
    let result: MatchResult = code.parse()?;
    apply_result(game, result, participants)
}

/// Awards the bye of `round` to `participant`.
///
/// Awarding the same round twice changes nothing.
///
/// # Errors
///
/// Returns [`LedgerError::CounterOutOfRange`] if the score would overflow;
/// the participant is left untouched.
pub fn apply_bye(participant: &mut Participant, round: u32) -> Result<SideDelta, LedgerError> {
    if participant.had_bye_in(round) {
        return Ok(SideDelta::default());
    }
    let delta = SideDelta {
        score: BYE_POINTS.halves() as i32,
        byes: 1,
        ..SideDelta::default()
    };
    participant.score = participant
        .score
        .checked_add_halves(delta.score)
        .ok_or_else(|| LedgerError::CounterOutOfRange(participant.id.clone()))?;
    participant.bye_rounds.push(round);
    tracing::debug!(participant = %participant.id, round, "bye awarded");
    Ok(delta)
}

fn position_of(participants: &[Participant], id: &ParticipantId) -> Result<usize, LedgerError> {
    participants
        .iter()
        .position(|p| &p.id == id)
        .ok_or_else(|| LedgerError::UnknownParticipant(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiss_core::TournamentId;

    fn setup() -> (Match, Vec<Participant>) {
        let game = Match::new(TournamentId::from("t"), 1, 1, "w".into(), "b".into());
        (game, vec![Participant::new("w"), Participant::new("b")])
    }

    #[test]
    fn white_win() {
        let (mut game, mut ps) = setup();
        let delta = apply_result(&mut game, MatchResult::WhiteWin, &mut ps).unwrap();

        assert_eq!(delta.white.score, 2);
        assert_eq!(delta.white.wins, 1);
        assert_eq!(delta.black.score, 0);
        assert_eq!(ps[0].score, Score::ONE);
        assert_eq!(ps[0].wins, 1);
        assert_eq!(ps[0].games_played, Score::HALF);
        assert_eq!(ps[1].games_played, Score::HALF);
        assert_eq!(game.result, MatchResult::WhiteWin);
    }

    #[test]
    fn black_win_counts_black_wins() {
        let (mut game, mut ps) = setup();
        apply_result(&mut game, MatchResult::BlackWin, &mut ps).unwrap();

        assert_eq!(ps[1].score, Score::ONE);
        assert_eq!(ps[1].wins, 1);
        assert_eq!(ps[1].black_wins, 1);
        assert_eq!(ps[0].score, Score::ZERO);
    }

    #[test]
    fn same_result_twice_is_noop() {
        let (mut game, mut ps) = setup();
        apply_result(&mut game, MatchResult::Draw, &mut ps).unwrap();
        let before = ps.clone();

        let delta = apply_result(&mut game, MatchResult::Draw, &mut ps).unwrap();
        assert!(delta.is_zero());
        assert_eq!(ps, before);
    }

    #[test]
    fn correction_from_white_win_to_draw() {
        let (mut game, mut ps) = setup();
        apply_result(&mut game, MatchResult::WhiteWin, &mut ps).unwrap();
        let delta = apply_result(&mut game, MatchResult::Draw, &mut ps).unwrap();

        assert_eq!(delta.white.score, -1);
        assert_eq!(delta.white.wins, -1);
        assert_eq!(delta.black.score, 1);
        assert_eq!(ps[0].score, Score::HALF);
        assert_eq!(ps[1].score, Score::HALF);
        assert_eq!(ps[0].wins, 0);
        assert_eq!(ps[0].games_played, Score::HALF);
    }

    #[test]
    fn back_to_pending_reverts_everything() {
        let (mut game, mut ps) = setup();
        let blank = ps.clone();
        apply_result(&mut game, MatchResult::BlackWin, &mut ps).unwrap();
        apply_result(&mut game, MatchResult::Pending, &mut ps).unwrap();
        assert_eq!(ps, blank);
    }

    #[test]
    fn cycle_restores_state() {
        let (mut game, mut ps) = setup();
        apply_result(&mut game, MatchResult::WhiteWin, &mut ps).unwrap();
        let after_first = ps.clone();
        apply_result(&mut game, MatchResult::BlackWin, &mut ps).unwrap();
        apply_result(&mut game, MatchResult::WhiteWin, &mut ps).unwrap();
        assert_eq!(ps, after_first);
    }

    #[test]
    fn unknown_participant_leaves_state_untouched() {
        let (mut game, _) = setup();
        let mut ps = vec![Participant::new("w")];
        let before = ps.clone();

        assert_eq!(
            apply_result(&mut game, MatchResult::WhiteWin, &mut ps),
            Err(LedgerError::UnknownParticipant("b".into()))
        );
        assert_eq!(ps, before);
        assert_eq!(game.result, MatchResult::Pending);
    }

    #[test]
    fn underflow_is_rejected_atomically() {
        let (mut game, mut ps) = setup();
        // Board claims a white win that the counters never saw.
        game.result = MatchResult::WhiteWin;
        let before = ps.clone();

        assert_eq!(
            apply_result(&mut game, MatchResult::BlackWin, &mut ps),
            Err(LedgerError::CounterOutOfRange("w".into()))
        );
        assert_eq!(ps, before);
    }

    #[test]
    fn self_pairing_rejected() {
        let mut game = Match::new(TournamentId::from("t"), 1, 1, "w".into(), "w".into());
        let mut ps = vec![Participant::new("w")];
        assert_eq!(
            apply_result(&mut game, MatchResult::Draw, &mut ps),
            Err(LedgerError::SelfPairing("w".into()))
        );
    }

    #[test]
    fn result_code_parsing() {
        let (mut game, mut ps) = setup();
        apply_result_code(&mut game, "1/2-1/2", &mut ps).unwrap();
        assert_eq!(ps[0].score, Score::HALF);
        assert_eq!(
            apply_result_code(&mut game, "white", &mut ps),
            Err(LedgerError::UnknownResult("white".to_string()))
        );
    }

    #[test]
    fn bye_awarded_once_per_round() {
        let mut p = Participant::new("solo");
        let first = apply_bye(&mut p, 3).unwrap();
        assert_eq!(first.score, 2);
        assert_eq!(first.byes, 1);
        assert!(apply_bye(&mut p, 3).unwrap().is_zero());
        assert_eq!(p.score, Score::ONE);
        assert_eq!(p.byes(), 1);
    }

    #[test]
    fn bye_at_score_ceiling_is_rejected() {
        let mut p = Participant::new("top").with_score(Score::from_halves(u32::MAX));
        let before = p.clone();
        assert_eq!(
            apply_bye(&mut p, 1),
            Err(LedgerError::CounterOutOfRange("top".into()))
        );
        assert_eq!(p, before);
    }

    #[test]
    fn result_at_score_ceiling_is_rejected() {
        let (mut game, mut ps) = setup();
        ps[0].score = Score::from_halves(u32::MAX);
        let before = ps.clone();
        assert_eq!(
            apply_result(&mut game, MatchResult::WhiteWin, &mut ps),
            Err(LedgerError::CounterOutOfRange("w".into()))
        );
        assert_eq!(ps, before);
        assert_eq!(game.result, MatchResult::Pending);
    }

    #[test]
    fn delta_inverse() {
        let delta = ScoreDelta::for_result(MatchResult::BlackWin);
        assert!(delta.plus(delta.inverse()).is_zero());
    }
}
