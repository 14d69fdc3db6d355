use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{rng, Rng};
use tracing::{instrument, trace};

use crate::engine::action::PlayerAction;
use crate::engine::hand_state::HandState;
use crate::engine::seat::Chips;

use super::Actor;

/// An actor that mixes folds, calls, and raises by configured weights.
///
/// The fold and call probabilities are looked up by the number of full
/// raises this street, so later entries describe behavior under more
/// pressure; the last entry repeats for anything deeper.
#[derive(Debug, Clone)]
pub struct RandomActor {
    name: String,
    percent_fold: Vec<f64>,
    percent_call: Vec<f64>,
}

impl RandomActor {
    pub fn new(name: impl Into<String>, percent_fold: Vec<f64>, percent_call: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            percent_fold,
            percent_call,
        }
    }
}

impl Default for RandomActor {
    fn default() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let idx = COUNTER.fetch_add(1, Ordering::Relaxed);
        RandomActor::new(
            format!("RandomActor-{idx}"),
            vec![0.25, 0.30, 0.50],
            vec![0.50, 0.60, 0.45],
        )
    }
}

impl RandomActor {
    fn weight(table: &[f64], raise_count: u8) -> f64 {
        let idx = (raise_count as usize).min(table.len().saturating_sub(1));
        table.get(idx).copied().unwrap_or(1.0)
    }
}

impl Actor for RandomActor {
    #[instrument(level = "trace", skip(self, state), fields(actor = %self.name))]
    fn act(&mut self, _id: u128, state: &HandState) -> PlayerAction {
        let Some(seat) = state.current_seat() else {
            return PlayerAction::Check;
        };
        let deficit = state.call_deficit();
        let mut rng = rng();

        let percent_fold = Self::weight(&self.percent_fold, state.raise_count);
        let percent_call = Self::weight(&self.percent_call, state.raise_count);

        // The smallest legal raise total, unless that already puts the
        // seat all in.
        let min_total = (state.highest_bet + state.min_raise).min(seat.current_bet + seat.stack);
        // Cap the sizing at roughly what a pot sized bet could win back,
        // to keep early streets from degenerating into constant shoves.
        let pot_cap = (state.num_can_bet() as Chips + 1) * state.pot.max(state.big_blind);
        let max_total = (seat.current_bet + seat.stack).min(pot_cap).max(min_total);

        let action = if deficit > 0 && rng.random_bool(percent_fold) {
            PlayerAction::Fold
        } else if rng.random_bool(percent_call) {
            if deficit > 0 {
                PlayerAction::Call
            } else {
                PlayerAction::Check
            }
        } else {
            let total = if max_total > min_total {
                rng.random_range(min_total..=max_total)
            } else {
                min_total
            };
            let amount = total - seat.current_bet;
            if deficit > 0 {
                PlayerAction::Raise(amount)
            } else {
                PlayerAction::Bet(amount)
            }
        };

        trace!(?action, raise_count = state.raise_count, deficit, "random actor decision");
        action
    }

    fn name(&self) -> &str {
        &self.name
    }
}
