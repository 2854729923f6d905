//! Tiebreak calculation.
//!
//! Tiebreaks are always recomputed from the full list of decided boards,
//! never patched incrementally, so repeated result corrections cannot make
//! them drift. All sums are taken in exact integer units (half-points, or
//! quarter-points for Sonneborn-Berger) and converted once at the end.
//!
//! Buchholz uses each opponent's current score rather than the score they
//! had when the game was played.

use crate::pairing::BYE_POINTS;
use std::collections::{BTreeMap, HashMap};
use swiss_core::{Color, Match, Participant, ParticipantId, Score, Tiebreaks, Tournament};

/// History of one participant gathered from decided boards.
#[derive(Default)]
struct History {
    /// Opponent index (if registered) and points scored against them.
    games: Vec<(Option<usize>, Score)>,
    /// Half-points earned per round, byes included.
    round_points: BTreeMap<u32, u32>,
    wins: u32,
    black_wins: u32,
}

/// Recomputes tiebreaks and win counters for every participant.
///
/// Only decided boards of `tournament` are used; pending boards and boards
/// of other tournaments are ignored. The output keeps registration order
/// and is a pure function of its inputs.
pub fn recompute(tournament: &Tournament, completed: &[Match]) -> Vec<Participant> {
    let index: HashMap<&ParticipantId, usize> = tournament
        .participants
        .iter()
        .enumerate()
        .map(|(i, p)| (&p.id, i))
        .collect();

    let mut histories: Vec<History> = tournament
        .participants
        .iter()
        .map(|_| History::default())
        .collect();

    let mut decided: Vec<&Match> = completed
        .iter()
        .filter(|m| m.tournament == tournament.id && m.result.is_decided())
        .collect();
    decided.sort_by_key(|m| (m.round, m.board));

    for m in &decided {
        for color in Color::BOTH {
            let side = index.get(m.player(color)).copied();
            let opponent = index.get(m.player(color.opposite())).copied();
            let (Some(side), Some(points)) = (side, m.result.points_for(color)) else {
                continue;
            };
            let history = &mut histories[side];
            history.games.push((opponent, points));
            *history.round_points.entry(m.round).or_default() += points.halves();
            if m.result.winner() == Some(color) {
                history.wins += 1;
                if color == Color::Black {
                    history.black_wins += 1;
                }
            }
        }
    }

    for (participant, history) in tournament.participants.iter().zip(histories.iter_mut()) {
        for &round in &participant.bye_rounds {
            *history.round_points.entry(round).or_default() += BYE_POINTS.halves();
        }
    }

    tournament
        .participants
        .iter()
        .zip(&histories)
        .map(|(participant, history)| {
            let mut updated = participant.clone();
            updated.tiebreaks = tiebreaks_for(history, &tournament.participants);
            updated.wins = history.wins;
            updated.black_wins = history.black_wins;
            updated.games_played = Score::from_halves(history.games.len() as u32);
            tracing::debug!(
                participant = %updated.id,
                buchholz = updated.tiebreaks.buchholz,
                buchholz_cut1 = updated.tiebreaks.buchholz_cut1,
                sonneborn_berger = updated.tiebreaks.sonneborn_berger,
                progressive = updated.tiebreaks.progressive_score,
                "tiebreaks recomputed"
            );
            updated
        })
        .collect()
}

fn tiebreaks_for(history: &History, participants: &[Participant]) -> Tiebreaks {
    let opponent_halves: Vec<u64> = history
        .games
        .iter()
        .map(|(opponent, _)| opponent.map_or(0, |i| u64::from(participants[i].score.halves())))
        .collect();

    let buchholz: u64 = opponent_halves.iter().sum();
    let buchholz_cut1 = match opponent_halves.iter().min() {
        Some(lowest) if opponent_halves.len() >= 2 => buchholz - lowest,
        _ => buchholz,
    };

    let sonneborn_berger_quarters: u64 = opponent_halves
        .iter()
        .zip(&history.games)
        .map(|(opp, (_, points))| opp * u64::from(points.halves()))
        .sum();

    Tiebreaks {
        buchholz: halves_to_points(buchholz),
        buchholz_cut1: halves_to_points(buchholz_cut1),
        sonneborn_berger: sonneborn_berger_quarters as f64 / 4.0,
        progressive_score: halves_to_points(progressive_halves(&history.round_points)),
    }
}

/// Sum of the running total after each round up to the last scored round.
///
/// Rounds without a recorded result add nothing to the running total but
/// still contribute it to the sum.
fn progressive_halves(round_points: &BTreeMap<u32, u32>) -> u64 {
    let Some(&last) = round_points.keys().next_back() else {
        return 0;
    };
    let mut running = 0u64;
    let mut progressive = 0u64;
    for round in 1..=last {
        running += u64::from(round_points.get(&round).copied().unwrap_or(0));
        progressive += running;
    }
    progressive
}

fn halves_to_points(halves: u64) -> f64 {
    halves as f64 / 2.0
}
