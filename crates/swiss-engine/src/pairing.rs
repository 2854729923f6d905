//! Swiss-system round pairing.
//!
//! Participants are grouped by score and paired inside their group,
//! avoiding earlier opponents where possible. Odd groups float their last
//! member into the next lower group; an odd field gives one bye per round.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use swiss_core::{Color, Match, ParticipantId, ParticipantSnapshot, Score, TournamentId};
use thiserror::Error;

/// Points awarded for a bye.
pub const BYE_POINTS: Score = Score::ONE;

/// Errors that can occur while pairing a round.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("round numbers start at 1")]
    InvalidRound,

    #[error("at least 2 participants are needed to pair a round, found {found}")]
    InsufficientParticipants { found: usize },

    #[error("participant {participant} cannot be paired and the bye is already taken")]
    UnpairablePlayer { participant: ParticipantId },

    #[error("{first} and {second} would have to meet again")]
    RematchRequired {
        first: ParticipantId,
        second: ParticipantId,
    },
}

/// What to do when a participant's only remaining option is a past opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RematchPolicy {
    /// Pair them anyway and flag the board as a forced rematch.
    #[default]
    Allow,
    /// Fail with [`PairingError::RematchRequired`].
    Reject,
}

/// One board of a generated round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub board: u32,
    pub white: ParticipantId,
    pub black: ParticipantId,
    /// True when the two participants had already met.
    pub forced_rematch: bool,
}

/// The participant sitting out a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bye {
    pub participant: ParticipantId,
    pub points: Score,
}

/// Output of a pairing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairings {
    pub round: u32,
    pub pairings: Vec<Pairing>,
    pub bye: Option<Bye>,
}

impl RoundPairings {
    /// Converts the boards into pending matches of `tournament`.
    pub fn to_matches(&self, tournament: &TournamentId) -> Vec<Match> {
        self.pairings
            .iter()
            .map(|p| {
                let mut m = Match::new(
                    tournament.clone(),
                    self.round,
                    p.board,
                    p.white.clone(),
                    p.black.clone(),
                );
                m.forced_rematch = p.forced_rematch;
                m
            })
            .collect()
    }

    /// Boards that repeat an earlier pairing.
    pub fn forced_rematches(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.iter().filter(|p| p.forced_rematch)
    }

    /// Every participant placed this round, boards first, bye last.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.pairings
            .iter()
            .flat_map(|p| [&p.white, &p.black])
            .chain(self.bye.iter().map(|b| &b.participant))
    }
}

/// A pairing system turns participant snapshots into the boards of a round.
pub trait PairingSystem {
    /// Pairs `round` from the given snapshots.
    ///
    /// Input order is the seeding order used to break score ties.
    fn generate_pairings(
        &self,
        participants: Vec<ParticipantSnapshot>,
        round: u32,
    ) -> Result<RoundPairings, PairingError>;
}

/// Score-group Swiss pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwissPairing {
    pub rematch_policy: RematchPolicy,
}

impl SwissPairing {
    /// Creates a pairing system with the given rematch policy.
    pub const fn new(rematch_policy: RematchPolicy) -> Self {
        SwissPairing { rematch_policy }
    }
}

/// Pairs a round with the default Swiss settings.
pub fn generate_pairings(
    participants: Vec<ParticipantSnapshot>,
    round: u32,
) -> Result<RoundPairings, PairingError> {
    SwissPairing::default().generate_pairings(participants, round)
}

impl PairingSystem for SwissPairing {
    fn generate_pairings(
        &self,
        participants: Vec<ParticipantSnapshot>,
        round: u32,
    ) -> Result<RoundPairings, PairingError> {
        if round == 0 {
            return Err(PairingError::InvalidRound);
        }

        let mut pool: Vec<ParticipantSnapshot> = participants
            .into_iter()
            .filter(|p| p.id.is_valid())
            .collect();
        if pool.len() < 2 {
            return Err(PairingError::InsufficientParticipants { found: pool.len() });
        }

        // Stable: equal scores keep seeding order.
        pool.sort_by(|a, b| b.score.cmp(&a.score));

        let mut bye = None;
        if pool.len() % 2 == 1 {
            let index = match pool.iter().rposition(|p| p.byes == 0) {
                Some(index) => index,
                None => {
                    tracing::warn!(round, "every participant already had a bye");
                    pool.len() - 1
                }
            };
            let recipient = pool.remove(index);
            tracing::debug!(round, participant = %recipient.id, "bye assigned");
            bye = Some(Bye {
                participant: recipient.id,
                points: BYE_POINTS,
            });
        }

        let mut groups = score_groups(pool);
        let mut pairings: Vec<Pairing> = Vec::new();

        for gi in 0..groups.len() {
            let mut group = std::mem::take(&mut groups[gi]);
            let has_lower = gi + 1 < groups.len();
            tracing::debug!(round, group = gi, size = group.len(), "pairing score group");

            if group.len() % 2 == 1 && has_lower {
                if let Some(floater) = group.pop_back() {
                    tracing::debug!(round, participant = %floater.id, "floating down");
                    groups[gi + 1].push_front(floater);
                }
            }

            while group.len() >= 2 {
                let Some(mut first) = group.pop_front() else {
                    break;
                };
                let (index, forced) = match group
                    .iter()
                    .position(|second| !first.has_played(&second.id) && !second.has_played(&first.id))
                {
                    Some(index) => (index, false),
                    None => {
                        if self.rematch_policy == RematchPolicy::Reject {
                            return Err(PairingError::RematchRequired {
                                first: first.id,
                                second: group[0].id.clone(),
                            });
                        }
                        tracing::warn!(
                            round,
                            first = %first.id,
                            second = %group[0].id,
                            "no fresh opponent left in score group, forcing rematch"
                        );
                        (0, true)
                    }
                };
                let Some(mut second) = group.remove(index) else {
                    break;
                };

                let first_color = first_player_color(&first, &second);
                let (white, black) = match first_color {
                    Color::White => (first.id.clone(), second.id.clone()),
                    Color::Black => (second.id.clone(), first.id.clone()),
                };
                first.record_game(second.id.clone(), first_color);
                second.record_game(first.id.clone(), first_color.opposite());

                pairings.push(Pairing {
                    board: pairings.len() as u32 + 1,
                    white,
                    black,
                    forced_rematch: forced,
                });
            }

            if let Some(leftover) = group.pop_front() {
                if has_lower {
                    tracing::debug!(round, participant = %leftover.id, "floating leftover down");
                    groups[gi + 1].push_front(leftover);
                } else if bye.is_none() {
                    tracing::warn!(round, participant = %leftover.id, "leftover takes the bye");
                    bye = Some(Bye {
                        participant: leftover.id,
                        points: BYE_POINTS,
                    });
                } else {
                    tracing::error!(round, participant = %leftover.id, "participant left unpaired");
                    return Err(PairingError::UnpairablePlayer {
                        participant: leftover.id,
                    });
                }
            }
        }

        Ok(RoundPairings {
            round,
            pairings,
            bye,
        })
    }
}

/// Splits a score-sorted pool into groups of equal score, highest first.
fn score_groups(pool: Vec<ParticipantSnapshot>) -> Vec<VecDeque<ParticipantSnapshot>> {
    let mut groups: Vec<VecDeque<ParticipantSnapshot>> = Vec::new();
    for p in pool {
        match groups.last_mut() {
            Some(group) if group.front().map(|f| f.score) == Some(p.score) => group.push_back(p),
            _ => groups.push(VecDeque::from([p])),
        }
    }
    groups
}

/// Color for `first` when paired with `second`.
///
/// Fewer whites gets white; on a tie the one who did not just play white
/// gets it; otherwise the higher-placed `first` takes white.
fn first_player_color(first: &ParticipantSnapshot, second: &ParticipantSnapshot) -> Color {
    use std::cmp::Ordering;

    match first.white_count().cmp(&second.white_count()) {
        Ordering::Less => Color::White,
        Ordering::Greater => Color::Black,
        Ordering::Equal => {
            let first_just_white = first.last_color() == Some(Color::White);
            let second_just_white = second.last_color() == Some(Color::White);
            match (first_just_white, second_just_white) {
                (true, false) => Color::Black,
                _ => Color::White,
            }
        }
    }
}
