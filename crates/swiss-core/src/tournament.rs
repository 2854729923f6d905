//! Tournament state and participant registration.

use crate::{Participant, ParticipantId, TournamentId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while registering or removing participants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("registration is closed (tournament is {0})")]
    RegistrationClosed(TournamentStatus),

    #[error("participant {0} is already registered")]
    AlreadyRegistered(ParticipantId),

    #[error("participant {0} is not registered")]
    NotFound(ParticipantId),

    #[error("participant id must not be blank")]
    InvalidId,
}

/// Where a tournament is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    #[default]
    Registration,
    Active,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Returns true for `Completed` and `Cancelled`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    ///
    /// Status only moves forward; `Cancelled` is reachable from any
    /// non-terminal state.
    pub const fn can_transition_to(self, next: TournamentStatus) -> bool {
        use TournamentStatus::*;
        matches!(
            (self, next),
            (Registration, Active)
                | (Registration, Cancelled)
                | (Active, Completed)
                | (Active, Cancelled)
        )
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TournamentStatus::Registration => "registration",
            TournamentStatus::Active => "active",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A Swiss tournament.
///
/// `participants` keeps registration order, which doubles as seeding order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: TournamentStatus,
    /// Configured number of rounds.
    pub rounds: u32,
    /// Last paired round, 0 before the first pairing.
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Tournament {
    /// Creates a tournament in registration with no participants.
    pub fn new(id: impl Into<TournamentId>, name: impl Into<String>, rounds: u32) -> Self {
        Tournament {
            id: id.into(),
            name: name.into(),
            status: TournamentStatus::Registration,
            rounds,
            current_round: 0,
            participants: Vec::new(),
        }
    }

    /// Looks up a participant by id.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Looks up a participant by id for mutation.
    pub fn participant_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.id == id)
    }

    /// Adds a participant at the end of the seeding order.
    pub fn register(&mut self, participant: Participant) -> Result<(), RegistrationError> {
        if self.status != TournamentStatus::Registration {
            return Err(RegistrationError::RegistrationClosed(self.status));
        }
        if !participant.id.is_valid() {
            return Err(RegistrationError::InvalidId);
        }
        if self.participant(&participant.id).is_some() {
            return Err(RegistrationError::AlreadyRegistered(participant.id));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Removes a participant. Only allowed during registration.
    pub fn remove_participant(
        &mut self,
        id: &ParticipantId,
    ) -> Result<Participant, RegistrationError> {
        if self.status != TournamentStatus::Registration {
            return Err(RegistrationError::RegistrationClosed(self.status));
        }
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| RegistrationError::NotFound(id.clone()))?;
        Ok(self.participants.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        use TournamentStatus::*;
        assert!(Registration.can_transition_to(Active));
        assert!(Registration.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        assert!(!Active.can_transition_to(Registration));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Active));
        assert!(Completed.is_terminal());
        assert!(!Active.is_terminal());
    }

    #[test]
    fn register_and_remove() {
        let mut t = Tournament::new("t1", "Club Open", 5);
        t.register(Participant::new("alice")).unwrap();
        t.register(Participant::new("bob")).unwrap();
        assert_eq!(
            t.register(Participant::new("alice")),
            Err(RegistrationError::AlreadyRegistered("alice".into()))
        );

        let removed = t.remove_participant(&"alice".into()).unwrap();
        assert_eq!(removed.id, ParticipantId::from("alice"));
        assert_eq!(t.participants.len(), 1);
        assert_eq!(
            t.remove_participant(&"zoe".into()),
            Err(RegistrationError::NotFound("zoe".into()))
        );
    }

    #[test]
    fn registration_closed_after_start() {
        let mut t = Tournament::new("t1", "Club Open", 5);
        t.register(Participant::new("alice")).unwrap();
        t.status = TournamentStatus::Active;
        assert_eq!(
            t.register(Participant::new("bob")),
            Err(RegistrationError::RegistrationClosed(TournamentStatus::Active))
        );
        assert_eq!(
            t.remove_participant(&"alice".into()),
            Err(RegistrationError::RegistrationClosed(TournamentStatus::Active))
        );
    }

    #[test]
    fn blank_id_rejected() {
        let mut t = Tournament::new("t1", "Club Open", 5);
        assert_eq!(
            t.register(Participant::new(" ")),
            Err(RegistrationError::InvalidId)
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TournamentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
