//! Swiss-system tournament engine.
//!
//! This crate provides:
//! - [`SwissPairing`] - Score-group pairing behind the [`PairingSystem`] trait
//! - [`apply_result`] - Idempotent, correctable result bookkeeping
//! - [`recompute`] - Buchholz, Buchholz Cut-1, Sonneborn-Berger and progressive score
//! - [`standings`] - Ranking by score and a configurable tiebreak order
//! - [`request_pairing`] - Round gating and tournament status transitions
//!
//! # Architecture
//!
//! Every function works on plain values from `swiss-core`. Pairing consumes
//! [`ParticipantSnapshot`](swiss_core::ParticipantSnapshot)s rebuilt from the
//! match history, so it never reads or writes stored participants. Tiebreaks
//! are recomputed from decided boards on every call.
//!
//! # Example
//!
//! ```
//! use swiss_core::{Participant, ParticipantSnapshot, Tournament};
//! use swiss_engine::{generate_pairings, request_pairing};
//!
//! let mut tournament = Tournament::new("spring-open", "Spring Open", 5);
//! for id in ["alice", "bob", "carol"] {
//!     tournament.register(Participant::new(id)).unwrap();
//! }
//!
//! let advance = request_pairing(&mut tournament, &[]).unwrap();
//! let snapshots = ParticipantSnapshot::build_all(&tournament, &[]);
//! let round = generate_pairings(snapshots, advance.round).unwrap();
//!
//! assert_eq!(round.pairings.len(), 1);
//! assert!(round.bye.is_some());
//! ```

mod ledger;
mod lifecycle;
mod pairing;
mod standings;
mod tiebreak;

pub use ledger::{apply_bye, apply_result, apply_result_code, LedgerError, ScoreDelta, SideDelta};
pub use lifecycle::{
    cancel, complete, ensure_accepts_results, request_pairing, LifecycleError, RoundAdvance,
};
pub use pairing::{
    generate_pairings, Bye, Pairing, PairingError, PairingSystem, RematchPolicy, RoundPairings,
    SwissPairing, BYE_POINTS,
};
pub use standings::{standings, Standing, Tiebreak};
pub use tiebreak::recompute;
