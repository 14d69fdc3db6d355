use std::cell::RefCell;
use std::rc::Rc;

use super::{Observer, ObserverError};
use crate::engine::action::TableEvent;
use crate::engine::hand_state::HandState;

/// One observed moment: the event and the snapshot it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: u128,
    pub state: HandState,
    pub event: TableEvent,
}

/// An observer that appends every event to shared storage, for tests and
/// hand replays. Grab a handle to the storage before handing the observer
/// to a driver.
#[derive(Default)]
pub struct VecObserver {
    records: Rc<RefCell<Vec<EventRecord>>>,
}

impl VecObserver {
    pub fn get_storage(&self) -> Rc<RefCell<Vec<EventRecord>>> {
        self.records.clone()
    }
}

impl Observer for VecObserver {
    fn on_event(
        &mut self,
        id: u128,
        state: &HandState,
        event: &TableEvent,
    ) -> Result<(), ObserverError> {
        self.records.borrow_mut().push(EventRecord {
            id,
            state: state.clone(),
            event: event.clone(),
        });
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
    fn test_vec_observer_records_in_order() {
        let state = HandStateBuilder::new()
            .seats_with_stack(2, 100)
            .blinds(10, 5)
            .build_with_rng(&mut StdRng::seed_from_u64(1))
            .unwrap();

        let mut observer = VecObserver::default();
        let storage = observer.get_storage();

        for event in state.opening_events() {
            observer.on_event(state.id, &state, &event).unwrap();
        }

        let records = storage.borrow();
        assert_eq!(3, records.len());
        assert!(matches!(records[0].event, TableEvent::HandStart { .. }));
        assert_eq!(state.id, records[0].id);
    }
}
