//! Tournament status transitions and round gating.
//!
//! ```text
//! Registration ──► Active ──► Completed
//!      │             │
//!      └──────┬──────┘
//!             ▼
//!         Cancelled
//! ```

use swiss_core::{Match, Tournament, TournamentStatus};
use thiserror::Error;

/// Errors raised by lifecycle checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("round {round} still has {pending} undecided board(s)")]
    RoundNotReady { round: u32, pending: usize },

    #[error("tournament has not started yet")]
    NotStarted,

    #[error("all {rounds} rounds have been played")]
    RoundLimitExceeded { rounds: u32 },

    #[error("tournament is {0}")]
    TournamentClosed(TournamentStatus),
}

/// A granted request to pair the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAdvance {
    /// The round that may now be paired.
    pub round: u32,
    /// True if this call moved the tournament out of registration.
    pub activated: bool,
}

/// Grants pairing of the next round and advances `current_round`.
///
/// A tournament in registration becomes active. When the configured number
/// of rounds has been played the tournament is marked completed instead and
/// [`LifecycleError::RoundLimitExceeded`] is returned. Any other error leaves
/// the tournament unchanged.
///
/// # Errors
///
/// - [`LifecycleError::TournamentClosed`] for completed or cancelled tournaments
/// - [`LifecycleError::RoundNotReady`] while the current round has pending boards
/// - [`LifecycleError::RoundLimitExceeded`] once every round has been paired
pub fn request_pairing(
    tournament: &mut Tournament,
    matches: &[Match],
) -> Result<RoundAdvance, LifecycleError> {
    if tournament.status.is_terminal() {
        return Err(LifecycleError::TournamentClosed(tournament.status));
    }
    ensure_round_decided(tournament, matches)?;

    let activated = tournament.status == TournamentStatus::Registration;
    let next = tournament.current_round + 1;
    if next > tournament.rounds {
        tournament.status = TournamentStatus::Completed;
        tracing::info!(tournament = %tournament.id, rounds = tournament.rounds, "tournament completed");
        return Err(LifecycleError::RoundLimitExceeded {
            rounds: tournament.rounds,
        });
    }

    tournament.status = TournamentStatus::Active;
    tournament.current_round = next;
    tracing::info!(tournament = %tournament.id, round = next, activated, "round advanced");

    Ok(RoundAdvance {
        round: next,
        activated,
    })
}

/// Checks that results may be recorded.
///
/// # Errors
///
/// Returns [`LifecycleError::TournamentClosed`] for terminal tournaments and
/// [`LifecycleError::NotStarted`] during registration.
pub fn ensure_accepts_results(tournament: &Tournament) -> Result<(), LifecycleError> {
    match tournament.status {
        TournamentStatus::Active => Ok(()),
        TournamentStatus::Registration => Err(LifecycleError::NotStarted),
        status => Err(LifecycleError::TournamentClosed(status)),
    }
}

/// Cancels a tournament that has not completed.
///
/// # Errors
///
/// Returns [`LifecycleError::TournamentClosed`] if it already ended.
pub fn cancel(tournament: &mut Tournament) -> Result<(), LifecycleError> {
    if !tournament.status.can_transition_to(TournamentStatus::Cancelled) {
        return Err(LifecycleError::TournamentClosed(tournament.status));
    }
    tournament.status = TournamentStatus::Cancelled;
    tracing::info!(tournament = %tournament.id, "tournament cancelled");
    Ok(())
}

/// Ends an active tournament early once its current round is decided.
///
/// # Errors
///
/// Returns [`LifecycleError::NotStarted`] during registration,
/// [`LifecycleError::TournamentClosed`] if it already ended, and
/// [`LifecycleError::RoundNotReady`] while boards are pending.
pub fn complete(tournament: &mut Tournament, matches: &[Match]) -> Result<(), LifecycleError> {
    ensure_accepts_results(tournament)?;
    ensure_round_decided(tournament, matches)?;
    tournament.status = TournamentStatus::Completed;
    tracing::info!(tournament = %tournament.id, round = tournament.current_round, "tournament completed early");
    Ok(())
}

fn ensure_round_decided(tournament: &Tournament, matches: &[Match]) -> Result<(), LifecycleError> {
    let round = tournament.current_round;
    if round == 0 {
        return Ok(());
    }
    let pending = matches
        .iter()
        .filter(|m| m.tournament == tournament.id && m.round == round && !m.result.is_decided())
        .count();
    if pending > 0 {
        return Err(LifecycleError::RoundNotReady { round, pending });
    }
    Ok(())
}
