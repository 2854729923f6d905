//! Ranking participants by score and tiebreaks.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use swiss_core::{Participant, ParticipantId, Score, Tiebreaks};

/// A tiebreak criterion, compared in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tiebreak {
    BuchholzCut1,
    Buchholz,
    SonnebornBerger,
    ProgressiveScore,
    Wins,
    BlackWins,
}

impl Tiebreak {
    /// Order used when none is configured.
    pub const DEFAULT_ORDER: [Tiebreak; 6] = [
        Tiebreak::BuchholzCut1,
        Tiebreak::Buchholz,
        Tiebreak::SonnebornBerger,
        Tiebreak::ProgressiveScore,
        Tiebreak::Wins,
        Tiebreak::BlackWins,
    ];

    /// The criterion's value for `participant`.
    pub fn value(self, participant: &Participant) -> f64 {
        let t = &participant.tiebreaks;
        match self {
            Tiebreak::BuchholzCut1 => t.buchholz_cut1,
            Tiebreak::Buchholz => t.buchholz,
            Tiebreak::SonnebornBerger => t.sonneborn_berger,
            Tiebreak::ProgressiveScore => t.progressive_score,
            Tiebreak::Wins => f64::from(participant.wins),
            Tiebreak::BlackWins => f64::from(participant.black_wins),
        }
    }
}

/// One line of the standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based rank; participants with identical keys share a rank.
    pub rank: u32,
    pub participant: ParticipantId,
    pub score: Score,
    pub tiebreaks: Tiebreaks,
    pub wins: u32,
    pub black_wins: u32,
}

/// Orders participants by score, then `order`, then registration order.
pub fn standings(participants: &[Participant], order: &[Tiebreak]) -> Vec<Standing> {
    let compare = |a: &Participant, b: &Participant| -> Ordering {
        b.score.cmp(&a.score).then_with(|| {
            order
                .iter()
                .map(|t| t.value(b).total_cmp(&t.value(a)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    };

    let mut ranked: Vec<&Participant> = participants.iter().collect();
    ranked.sort_by(|a, b| compare(*a, *b));

    let mut table: Vec<Standing> = Vec::with_capacity(ranked.len());
    for (i, &p) in ranked.iter().enumerate() {
        let rank = match i.checked_sub(1).map(|prev| ranked[prev]) {
            Some(prev) if compare(prev, p).is_eq() => table[i - 1].rank,
            _ => i as u32 + 1,
        };
        table.push(Standing {
            rank,
            participant: p.id.clone(),
            score: p.score,
            tiebreaks: p.tiebreaks,
            wins: p.wins,
            black_wins: p.black_wins,
        });
    }
    table
}
