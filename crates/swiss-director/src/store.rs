//! In-memory tournament store.
//!
//! Each tournament lives behind its own lock so that operations on one
//! tournament are serialized while different tournaments proceed
//! independently. The outer map lock is held only for lookups.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use swiss_core::{Match, Tournament, TournamentId};
use thiserror::Error;

/// Shared handle to one tournament record.
pub type RecordHandle = Arc<Mutex<TournamentRecord>>;

/// Errors raised by the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("tournament store lock poisoned")]
    Poisoned,

    #[error("tournament {0} already exists")]
    AlreadyExists(TournamentId),
}

/// Everything stored for one tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub tournament: Tournament,
    #[serde(default)]
    pub matches: Vec<Match>,
    /// Bumped on every successful commit.
    #[serde(default)]
    pub version: u64,
}

impl TournamentRecord {
    /// Wraps a tournament with no matches.
    pub fn new(tournament: Tournament) -> Self {
        TournamentRecord {
            tournament,
            matches: Vec::new(),
            version: 0,
        }
    }

    /// Replaces this record with `next` and bumps the version.
    pub fn commit(&mut self, mut next: TournamentRecord) {
        next.version = self.version + 1;
        *self = next;
    }

    /// Matches of `round`, in board order.
    pub fn round_matches(&self, round: u32) -> Vec<&Match> {
        let mut boards: Vec<&Match> = self.matches.iter().filter(|m| m.round == round).collect();
        boards.sort_by_key(|m| m.board);
        boards
    }
}

/// Thread-safe collection of tournament records.
#[derive(Debug, Clone, Default)]
pub struct TournamentStore {
    records: Arc<Mutex<HashMap<TournamentId, RecordHandle>>>,
}

impl TournamentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record under its tournament id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is taken.
    pub fn insert(&self, record: TournamentRecord) -> Result<RecordHandle, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let id = record.tournament.id.clone();
        if records.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        let handle = Arc::new(Mutex::new(record));
        records.insert(id, Arc::clone(&handle));
        Ok(handle)
    }

    /// Returns the handle of a tournament, if stored.
    pub fn get(&self, id: &TournamentId) -> Result<Option<RecordHandle>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    /// Ids of all stored tournaments, sorted.
    pub fn ids(&self) -> Result<Vec<TournamentId>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let mut ids: Vec<TournamentId> = records.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    /// A detached copy of a record, for work outside the lock.
    pub fn snapshot(&self, id: &TournamentId) -> Result<Option<TournamentRecord>, StoreError> {
        let Some(handle) = self.get(id)? else {
            return Ok(None);
        };
        let record = lock(&handle)?;
        Ok(Some(record.clone()))
    }
}

/// Locks one record.
pub fn lock(handle: &RecordHandle) -> Result<MutexGuard<'_, TournamentRecord>, StoreError> {
    handle.lock().map_err(|_| StoreError::Poisoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn record(id: &str) -> TournamentRecord {
        TournamentRecord::new(Tournament::new(id, "Test", 3))
    }

    #[test]
    fn insert_and_get() {
        let store = TournamentStore::new();
        store.insert(record("a")).unwrap();

        let handle = store.get(&"a".into()).unwrap().unwrap();
        assert_eq!(lock(&handle).unwrap().tournament.name, "Test");
        assert!(store.get(&"b".into()).unwrap().is_none());
    }

    #[test]
    fn duplicate_insert_rejected() {
        let store = TournamentStore::new();
        store.insert(record("a")).unwrap();
        assert_eq!(
            store.insert(record("a")).unwrap_err(),
            StoreError::AlreadyExists("a".into())
        );
    }

    #[test]
    fn ids_are_sorted() {
        let store = TournamentStore::new();
        for id in ["c", "a", "b"] {
            store.insert(record(id)).unwrap();
        }
        let ids: Vec<String> = store
            .ids()
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn commit_bumps_version() {
        let mut current = record("a");
        let mut next = current.clone();
        next.tournament.name = "Renamed".to_string();
        current.commit(next);
        assert_eq!(current.version, 1);
        assert_eq!(current.tournament.name, "Renamed");
    }

    #[test]
    fn concurrent_commits_serialize_per_tournament() {
        let store = TournamentStore::new();
        store.insert(record("a")).unwrap();
        let id = TournamentId::from("a");

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let id = id.clone();
                thread::spawn(move || {
                    let handle = store.get(&id).unwrap().unwrap();
                    let mut current = lock(&handle).unwrap();
                    let next = current.clone();
                    current.commit(next);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.snapshot(&id).unwrap().unwrap().version, 8);
    }

    #[test]
    fn round_matches_in_board_order() {
        let mut r = record("a");
        for board in [2, 1] {
            r.matches.push(Match::new("a".into(), 1, board, "x".into(), "y".into()));
        }
        r.matches.push(Match::new("a".into(), 2, 1, "x".into(), "y".into()));

        let boards: Vec<u32> = r.round_matches(1).iter().map(|m| m.board).collect();
        assert_eq!(boards, vec![1, 2]);
    }

    #[test]
    fn record_json_defaults() {
        let json = r#"{"tournament":{"id":"t","rounds":3}}"#;
        let r: TournamentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.version, 0);
        assert!(r.matches.is_empty());
        assert_eq!(r.tournament.current_round, 0);
    }
}
