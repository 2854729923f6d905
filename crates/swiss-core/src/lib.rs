//! Core types for Swiss chess tournaments.
//!
//! This crate provides the data model shared by the pairing and scoring
//! crates:
//! - [`ParticipantId`] and [`TournamentId`] for opaque identities
//! - [`Score`] for exact half-point arithmetic
//! - [`Color`] and [`MatchResult`] for board outcomes
//! - [`Participant`], [`Match`] and [`Tournament`] records
//! - [`ParticipantSnapshot`], the pairing engine's input

mod color;
mod id;
mod participant;
mod result;
mod round;
mod score;
mod snapshot;
mod tournament;

pub use color::Color;
pub use id::{ParticipantId, TournamentId};
pub use participant::{Participant, Tiebreaks};
pub use result::{MatchResult, ResultParseError};
pub use round::{validate_round, Match, MatchError};
pub use score::{Score, ScoreError};
pub use snapshot::ParticipantSnapshot;
pub use tournament::{RegistrationError, Tournament, TournamentStatus};
