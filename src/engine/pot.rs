use tracing::warn;

use crate::core::HandScore;

use super::action::AwardPayload;
use super::hand_state::HandState;
use super::ranker::HandRanker;
use super::seat::{Chips, Seat};

/// One layer of the pot: chips contested together, and the seats that can
/// win them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotLayer {
    pub amount: Chips,
    /// Non-folded seats that contributed at least this layer's level.
    pub eligible: Vec<usize>,
}

/// Layer the seats' whole-hand contributions into pots.
///
/// Each distinct contribution level, lowest first, forms one layer: the
/// increment over the previous level times the number of seats that put in
/// at least that much. Folded seats inflate the layers they contributed to
/// but are never eligible to win them. The layer amounts always sum to the
/// sum of every seat's contribution.
pub fn pot_layers(seats: &[Seat]) -> Vec<PotLayer> {
    let mut levels: Vec<Chips> = seats
        .iter()
        .filter(|s| s.total_bet > 0)
        .map(|s| s.total_bet)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut layers = Vec::with_capacity(levels.len());
    let mut prev_level = 0;
    for &level in &levels {
        let increment = level - prev_level;
        let contributors = seats.iter().filter(|s| s.total_bet >= level).count() as Chips;
        let eligible = seats
            .iter()
            .filter(|s| s.total_bet >= level && s.in_hand())
            .map(|s| s.id)
            .collect();
        layers.push(PotLayer {
            amount: increment * contributors,
            eligible,
        });
        prev_level = level;
    }
    layers
}

/// Pay out every layer of the pot at showdown.
///
/// A layer with one eligible seat is returned to it outright, no
/// evaluation. Otherwise the eligible seats' hands (two hole cards plus
/// the board) are ranked and the layer splits evenly among the tied best.
/// Indivisible remainder chips go to the tied winner seated closest
/// clockwise to the dealer's left, so split payouts are deterministic.
pub(crate) fn settle(state: &HandState, ranker: &dyn HandRanker) -> Vec<AwardPayload> {
    let n = state.seats.len();
    let first_from_dealer = |seat: usize| (seat + n - (state.dealer_idx + 1) % n) % n;

    let mut awards = Vec::new();
    for layer in pot_layers(&state.seats) {
        if layer.eligible.is_empty() {
            // Only reachable through a corrupted state; the chips have no
            // owner and the layer is dropped.
            warn!(amount = layer.amount, "pot layer with no eligible seat");
            continue;
        }
        if layer.eligible.len() == 1 {
            awards.push(AwardPayload {
                seat: layer.eligible[0],
                amount: layer.amount,
                score: None,
            });
            continue;
        }

        let scores: Vec<HandScore> = layer
            .eligible
            .iter()
            .map(|&seat| {
                let mut cards = state.seats[seat].hole_cards.clone();
                cards.extend_from_slice(&state.community);
                ranker.score(&cards)
            })
            .collect();

        let mut winners: Vec<(usize, HandScore)> = ranker
            .best(&scores)
            .into_iter()
            .map(|i| (layer.eligible[i], scores[i]))
            .collect();
        winners.sort_by_key(|&(seat, _)| first_from_dealer(seat));

        let share = layer.amount / winners.len() as Chips;
        let remainder = layer.amount % winners.len() as Chips;
        for (i, (seat, score)) in winners.into_iter().enumerate() {
            let amount = if i == 0 { share + remainder } else { share };
            awards.push(AwardPayload {
                seat,
                amount,
                score: Some(score),
            });
        }
    }
    awards
}
