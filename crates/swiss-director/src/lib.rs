//! Tournament director for Swiss-system events.
//!
//! Wires the pairing engine, score ledger and tiebreak calculator to an
//! in-memory [`TournamentStore`] with one lock per tournament, and loads its
//! settings from [`DirectorConfig`].

pub mod config;
pub mod director;
pub mod state;
pub mod store;

pub use config::{ConfigError, DirectorConfig, PairingConfig, StandingsConfig};
pub use director::{Director, DirectorError};
pub use store::{RecordHandle, StoreError, TournamentRecord, TournamentStore};
