use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::action::PlayerAction;
use crate::engine::hand_state::HandState;

use super::Actor;

/// An actor that gives up on any pressure: folds to a bet, checks when
/// folding would cost nothing.
#[derive(Debug, Clone)]
pub struct FoldingActor {
    name: String,
}

impl FoldingActor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for FoldingActor {
    fn default() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let idx = COUNTER.fetch_add(1, Ordering::Relaxed);
        FoldingActor::new(format!("FoldingActor-{idx}"))
    }
}

impl Actor for FoldingActor {
    fn act(&mut self, _id: u128, state: &HandState) -> PlayerAction {
        if state.call_deficit() > 0 {
            PlayerAction::Fold
        } else {
            PlayerAction::Check
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::hand_state::HandStateBuilder;

    #[test]
    fn test_folds_facing_a_bet() {
        let state = HandStateBuilder::new()
            .seats_with_stack(3, 100)
            .blinds(10, 5)
            .build_with_rng(&mut StdRng::seed_from_u64(2))
            .unwrap();

        let mut actor = FoldingActor::default();
        assert_eq!(PlayerAction::Fold, actor.act(0, &state));
    }
}
