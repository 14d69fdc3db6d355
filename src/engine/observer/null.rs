use super::{Observer, ObserverError};
use crate::engine::action::TableEvent;
use crate::engine::hand_state::HandState;

/// An observer that discards everything. Useful where an observer is
/// required but the stream is not wanted.
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(
        &mut self,
        _id: u128,
        _state: &HandState,
        _event: &TableEvent,
    ) -> Result<(), ObserverError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::hand_state::HandStateBuilder;

    #[test]
    fn test_null_observer_accepts_events() {
        let state = HandStateBuilder::new()
            .seats_with_stack(2, 100)
            .blinds(10, 5)
            .build_with_rng(&mut StdRng::seed_from_u64(1))
            .unwrap();
        let event = TableEvent::HandStart {
            dealer_idx: 0,
            small_blind: 5,
            big_blind: 10,
        };

        assert!(NullObserver.on_event(state.id, &state, &event).is_ok());
    }
}
