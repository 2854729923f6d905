//! Tournament orchestration on top of the store.
//!
//! Every operation locks one tournament, works on a clone of its record
//! and commits the clone only when the whole operation succeeded.

use crate::config::{ConfigError, DirectorConfig};
use crate::store::{lock, RecordHandle, StoreError, TournamentRecord, TournamentStore};
use swiss_core::{
    validate_round, MatchError, Participant, ParticipantId, ParticipantSnapshot, RegistrationError,
    Tournament, TournamentId,
};
use swiss_engine::{
    apply_bye, apply_result_code, cancel, complete, ensure_accepts_results, recompute,
    request_pairing, standings, LedgerError, LifecycleError, PairingError, PairingSystem,
    RoundPairings, ScoreDelta, Standing, SwissPairing, Tiebreak,
};
use thiserror::Error;

/// Errors surfaced by director operations.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("round {round} has no board {board}")]
    MatchNotFound { round: u32, board: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DirectorError {
    /// Returns true for errors a tournament operator must act on.
    pub fn is_operator_visible(&self) -> bool {
        matches!(
            self,
            DirectorError::Pairing(PairingError::UnpairablePlayer { .. })
                | DirectorError::Lifecycle(LifecycleError::RoundLimitExceeded { .. })
        )
    }
}

/// Runs tournaments held in a [`TournamentStore`].
#[derive(Debug, Clone)]
pub struct Director {
    store: TournamentStore,
    pairing: SwissPairing,
    tiebreaks: Vec<Tiebreak>,
}

impl Director {
    /// Creates a director with an empty store.
    pub fn new(config: &DirectorConfig) -> Self {
        Self::with_store(config, TournamentStore::new())
    }

    /// Creates a director over an existing store.
    pub fn with_store(config: &DirectorConfig, store: TournamentStore) -> Self {
        Director {
            store,
            pairing: config.pairing_system(),
            tiebreaks: config.standings.tiebreaks.clone(),
        }
    }

    pub fn store(&self) -> &TournamentStore {
        &self.store
    }

    /// Creates a tournament in registration with a fresh id.
    pub fn create_tournament(&self, name: &str, rounds: u32) -> Result<TournamentId, DirectorError> {
        let id = TournamentId::new(uuid::Uuid::new_v4().to_string());
        let tournament = Tournament::new(id.clone(), name, rounds);
        self.store.insert(TournamentRecord::new(tournament))?;
        tracing::info!(tournament = %id, name, rounds, "tournament created");
        Ok(id)
    }

    /// Adds an existing record, e.g. one read from a state file.
    pub fn import(&self, record: TournamentRecord) -> Result<TournamentId, DirectorError> {
        let id = record.tournament.id.clone();
        self.store.insert(record)?;
        Ok(id)
    }

    /// A copy of the stored record.
    pub fn export(&self, id: &TournamentId) -> Result<TournamentRecord, DirectorError> {
        self.store
            .snapshot(id)?
            .ok_or_else(|| DirectorError::TournamentNotFound(id.clone()))
    }

    /// Registers a participant.
    pub fn register(&self, id: &TournamentId, participant: ParticipantId) -> Result<(), DirectorError> {
        self.update(id, |record| {
            record.tournament.register(Participant::new(participant.clone()))?;
            tracing::info!(tournament = %id, participant = %participant, "participant registered");
            Ok(())
        })
    }

    /// Removes a participant before the first round.
    pub fn withdraw(
        &self,
        id: &TournamentId,
        participant: &ParticipantId,
    ) -> Result<Participant, DirectorError> {
        self.update(id, |record| {
            let removed = record.tournament.remove_participant(participant)?;
            tracing::info!(tournament = %id, participant = %participant, "participant withdrawn");
            Ok(removed)
        })
    }

    /// Pairs the next round, stores its boards and awards the bye.
    ///
    /// When every round has been played the tournament is stored as
    /// completed and [`LifecycleError::RoundLimitExceeded`] is returned.
    pub fn pair_next_round(&self, id: &TournamentId) -> Result<RoundPairings, DirectorError> {
        let handle = self.handle(id)?;
        let mut record = lock(&handle)?;
        let mut work = record.clone();

        let advance = match request_pairing(&mut work.tournament, &work.matches) {
            Ok(advance) => advance,
            Err(e @ LifecycleError::RoundLimitExceeded { .. }) => {
                record.commit(work);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshots = ParticipantSnapshot::build_all(&work.tournament, &work.matches);
        let pairings = self.pairing.generate_pairings(snapshots, advance.round)?;
        let boards = pairings.to_matches(&work.tournament.id);
        validate_round(&boards)?;

        if let Some(bye) = &pairings.bye {
            if let Some(participant) = work.tournament.participant_mut(&bye.participant) {
                apply_bye(participant, pairings.round)?;
            }
        }
        work.matches.extend(boards);
        work.tournament.participants = recompute(&work.tournament, &work.matches);

        for p in pairings.forced_rematches() {
            tracing::warn!(
                tournament = %id,
                round = pairings.round,
                board = p.board,
                white = %p.white,
                black = %p.black,
                "forced rematch"
            );
        }
        tracing::info!(
            tournament = %id,
            round = pairings.round,
            boards = pairings.pairings.len(),
            bye = pairings.bye.is_some(),
            "round paired"
        );

        record.commit(work);
        Ok(pairings)
    }

    /// Records or corrects the result of one board.
    pub fn record_result(
        &self,
        id: &TournamentId,
        round: u32,
        board: u32,
        code: &str,
    ) -> Result<ScoreDelta, DirectorError> {
        self.update(id, |record| {
            ensure_accepts_results(&record.tournament)?;
            let TournamentRecord {
                tournament,
                matches,
                ..
            } = record;

            let game = matches
                .iter_mut()
                .find(|m| m.round == round && m.board == board)
                .ok_or(DirectorError::MatchNotFound { round, board })?;
            let delta = apply_result_code(game, code, &mut tournament.participants)?;

            let updated = recompute(tournament, matches);
            tournament.participants = updated;
            tracing::info!(tournament = %id, round, board, code, "result recorded");
            Ok(delta)
        })
    }

    /// Current standings under the configured tiebreak order.
    pub fn standings(&self, id: &TournamentId) -> Result<Vec<Standing>, DirectorError> {
        let record = self.export(id)?;
        Ok(standings(&record.tournament.participants, &self.tiebreaks))
    }

    /// Cancels a tournament.
    pub fn cancel(&self, id: &TournamentId) -> Result<(), DirectorError> {
        self.update(id, |record| Ok(cancel(&mut record.tournament)?))
    }

    /// Finishes an active tournament after its current round.
    pub fn complete(&self, id: &TournamentId) -> Result<(), DirectorError> {
        self.update(id, |record| {
            Ok(complete(&mut record.tournament, &record.matches)?)
        })
    }

    fn handle(&self, id: &TournamentId) -> Result<RecordHandle, DirectorError> {
        self.store
            .get(id)?
            .ok_or_else(|| DirectorError::TournamentNotFound(id.clone()))
    }

    fn update<T>(
        &self,
        id: &TournamentId,
        operation: impl FnOnce(&mut TournamentRecord) -> Result<T, DirectorError>,
    ) -> Result<T, DirectorError> {
        let handle = self.handle(id)?;
        let mut record = lock(&handle)?;
        let mut work = record.clone();
        let value = operation(&mut work)?;
        record.commit(work);
        Ok(value)
    }
}
