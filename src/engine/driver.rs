use tracing::{error, instrument, trace, warn};

use super::action::{ActionRequest, PlayerAction, RejectedActionPayload, TableEvent};
use super::actor::Actor;
use super::errors::{EngineFault, HandDriverError};
use super::hand_state::{ActionOutcome, HandState, Street};
use super::observer::Observer;
use super::ranker::{HandRanker, StandardRanker};

/// Drives one table's hand from the first action to the payout.
///
/// The driver is the serialization point the engine relies on: it asks the
/// actor for the seat in turn, applies the answer, and forwards every
/// event (with a state snapshot) to the observers, one action at a time.
/// An actor whose action is rejected is folded on its behalf, so a
/// misbehaving bot cannot stall the table. Callers enforcing a decision
/// deadline use [`HandDriver::synthesize_fold`] the same way.
pub struct HandDriver {
    pub state: HandState,
    actors: Vec<Box<dyn Actor>>,
    observers: Vec<Box<dyn Observer>>,
    ranker: Box<dyn HandRanker>,
    panic_on_observer_error: bool,
    started: bool,
}

impl std::fmt::Debug for HandDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandDriver")
            .field("state", &self.state)
            .field("actors", &self.actors.len())
            .field("observers", &self.observers.len())
            .field("panic_on_observer_error", &self.panic_on_observer_error)
            .field("started", &self.started)
            .finish()
    }
}

impl HandDriver {
    /// Run the hand to completion.
    #[instrument(level = "debug", skip(self), fields(hand_id = self.state.id))]
    pub fn run(&mut self) {
        self.emit_opening();
        while !self.state.is_complete() {
            self.step();
        }
    }

    /// Advance by one decision: one actor action, or the showdown
    /// settlement once betting is done.
    pub fn step(&mut self) {
        self.emit_opening();
        match self.state.street {
            Street::HandOver => {}
            Street::Showdown => self.resolve(),
            _ => self.run_actor_turn(),
        }
    }

    /// Fold on behalf of a seat. A no-op if that seat does not hold the
    /// turn, so it is always safe to call from a deadline timer.
    pub fn synthesize_fold(&mut self, seat: usize) {
        self.apply(ActionRequest {
            seat,
            action: PlayerAction::Fold,
        });
    }

    fn run_actor_turn(&mut self) {
        let Some(seat) = self.state.to_act else {
            // A betting street with nobody to act is a broken invariant.
            let mut events = Vec::new();
            self.state.abort(EngineFault::NoEligibleActor, &mut events);
            self.emit_all(&events);
            return;
        };
        let action = self.actors[seat].act(self.state.id, &self.state);
        self.apply(ActionRequest { seat, action });
    }

    fn apply(&mut self, req: ActionRequest) {
        match self.state.apply_action(&req) {
            Ok(ActionOutcome::Applied { state, events }) => {
                self.state = state;
                self.emit_all(&events);
            }
            Ok(ActionOutcome::Stale) => {
                trace!(seat = req.seat, "stale action ignored");
            }
            Err(reason) => {
                warn!(seat = req.seat, action = %req.action, %reason, "action rejected, folding the seat");
                self.emit(&TableEvent::Rejected(RejectedActionPayload {
                    seat: req.seat,
                    action: req.action,
                    reason,
                }));
                // Folds are always legal for the seat in turn, so this
                // cannot reject again.
                if req.action != PlayerAction::Fold {
                    self.apply(ActionRequest {
                        seat: req.seat,
                        action: PlayerAction::Fold,
                    });
                }
            }
        }
    }

    fn resolve(&mut self) {
        match self.state.resolve_showdown(self.ranker.as_ref()) {
            Ok(settlement) => {
                self.state = settlement.state;
                let mut events: Vec<TableEvent> = settlement
                    .awards
                    .into_iter()
                    .map(TableEvent::Award)
                    .collect();
                events.push(TableEvent::HandComplete);
                self.emit_all(&events);
            }
            Err(fault) => {
                error!(%fault, "showdown settlement failed");
                let mut events = Vec::new();
                self.state.abort(fault, &mut events);
                self.emit_all(&events);
            }
        }
    }

    fn emit_opening(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let events = self.state.opening_events();
        self.emit_all(&events);
    }

    fn emit_all(&mut self, events: &[TableEvent]) {
        for event in events {
            self.emit(event);
        }
    }

    fn emit(&mut self, event: &TableEvent) {
        let id = self.state.id;
        let state = &self.state;
        let mut failed = Vec::new();
        for (idx, observer) in self.observers.iter_mut().enumerate() {
            if let Err(observer_error) = observer.on_event(id, state, event) {
                if self.panic_on_observer_error {
                    panic!("observer error: {observer_error}");
                }
                warn!(%observer_error, "dropping failing observer");
                failed.push(idx);
            }
        }
        for idx in failed.into_iter().rev() {
            self.observers.remove(idx);
        }
    }
}

/// Builder for a [`HandDriver`]. A hand state and a full table of actors
/// (one per seat, including empty seats) are required; observers and the
/// ranker are optional.
pub struct HandDriverBuilder {
    state: Option<HandState>,
    actors: Option<Vec<Box<dyn Actor>>>,
    observers: Vec<Box<dyn Observer>>,
    ranker: Option<Box<dyn HandRanker>>,
    panic_on_observer_error: bool,
}

impl Default for HandDriverBuilder {
    fn default() -> Self {
        Self {
            state: None,
            actors: None,
            observers: vec![],
            ranker: None,
            panic_on_observer_error: true,
        }
    }
}

impl HandDriverBuilder {
    pub fn hand_state(mut self, state: HandState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn actors(mut self, actors: Vec<Box<dyn Actor>>) -> Self {
        self.actors = Some(actors);
        self
    }

    pub fn observers(mut self, observers: Vec<Box<dyn Observer>>) -> Self {
        self.observers = observers;
        self
    }

    /// Replace the built-in evaluator.
    pub fn ranker(mut self, ranker: Box<dyn HandRanker>) -> Self {
        self.ranker = Some(ranker);
        self
    }

    /// Whether an observer error panics. Defaults to true; when false a
    /// failing observer is dropped from the stream and logged.
    pub fn panic_on_observer_error(mut self, panic_on_observer_error: bool) -> Self {
        self.panic_on_observer_error = panic_on_observer_error;
        self
    }

    pub fn build(self) -> Result<HandDriver, HandDriverError> {
        let state = self.state.ok_or(HandDriverError::NeedHandState)?;
        let actors = self.actors.ok_or(HandDriverError::NeedActors)?;
        if actors.len() != state.seats.len() {
            return Err(HandDriverError::ActorCountMismatch {
                seats: state.seats.len(),
                actors: actors.len(),
            });
        }

        Ok(HandDriver {
            state,
            actors,
            observers: self.observers,
            ranker: self.ranker.unwrap_or_else(|| Box::new(StandardRanker)),
            panic_on_observer_error: self.panic_on_observer_error,
            started: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::actor::{CallingActor, FoldingActor, RandomActor};
    use crate::engine::hand_state::HandStateBuilder;
    use crate::engine::observer::VecObserver;
    use crate::engine::seat::Chips;

    fn seeded_state(stacks: Vec<Chips>, seed: u64) -> HandState {
        HandStateBuilder::new()
            .stacks(stacks)
            .blinds(10, 5)
            .dealer_idx(0)
            .build_with_rng(&mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    fn boxed_actors<A: Actor + Default + 'static>(n: usize) -> Vec<Box<dyn Actor>> {
        (0..n)
            .map(|_| Box::<A>::default() as Box<dyn Actor>)
            .collect()
    }

    #[test]
    fn test_builder_requires_state_and_actors() {
        assert_eq!(
            HandDriverError::NeedHandState,
            HandDriverBuilder::default().build().unwrap_err()
        );
        assert_eq!(
            HandDriverError::NeedActors,
            HandDriverBuilder::default()
                .hand_state(seeded_state(vec![100; 2], 1))
                .build()
                .unwrap_err()
        );
        assert_eq!(
            HandDriverError::ActorCountMismatch {
                seats: 3,
                actors: 2
            },
            HandDriverBuilder::default()
                .hand_state(seeded_state(vec![100; 3], 1))
                .actors(boxed_actors::<CallingActor>(2))
                .build()
                .unwrap_err()
        );
    }

    #[test_log::test]
    fn test_calling_table_checks_down_to_showdown() {
        let mut driver = HandDriverBuilder::default()
            .hand_state(seeded_state(vec![100; 4], 420))
            .actors(boxed_actors::<CallingActor>(4))
            .build()
            .unwrap();

        driver.run();

        let state = &driver.state;
        assert!(state.is_complete());
        assert!(state.fault.is_none());
        assert_eq!(5, state.community.len());
        assert_eq!(0, state.pot);
        // Everyone put in the big blind; the pot went back out whole.
        let winnings: Chips = state.seats.iter().map(|s| s.winnings).sum();
        assert_eq!(40, winnings);
        let stacks: Chips = state.seats.iter().map(|s| s.stack).sum();
        assert_eq!(400, stacks);
    }

    #[test_log::test]
    fn test_folding_table_hands_the_blinds_to_the_big_blind() {
        let mut driver = HandDriverBuilder::default()
            .hand_state(seeded_state(vec![100, 100], 420))
            .actors(boxed_actors::<FoldingActor>(2))
            .build()
            .unwrap();

        driver.run();

        let state = &driver.state;
        assert!(state.is_complete());
        // Heads-up the dealer is the small blind; it folds to the bet.
        assert_eq!(15, state.seats[1].winnings);
        assert_eq!(105, state.seats[1].stack);
        assert_eq!(95, state.seats[0].stack);
    }

    #[test_log::test]
    fn test_random_tables_always_complete_and_conserve_chips() {
        for seed in 0..10 {
            let state = seeded_state(vec![500; 5], seed);
            let total: Chips = state.seats.iter().map(|s| s.stack).sum::<Chips>() + state.pot;

            let mut driver = HandDriverBuilder::default()
                .hand_state(state)
                .actors(boxed_actors::<RandomActor>(5))
                .build()
                .unwrap();
            driver.run();

            let state = &driver.state;
            assert!(state.is_complete(), "seed {seed}");
            assert!(state.fault.is_none(), "seed {seed}");
            assert_eq!(0, state.pot, "seed {seed}");
            let after: Chips = state.seats.iter().map(|s| s.stack).sum();
            assert_eq!(total, after, "seed {seed}");
        }
    }

    /// An actor that always answers with an illegal undersized bet.
    struct BadBetActor;

    impl Actor for BadBetActor {
        fn act(&mut self, _id: u128, _state: &HandState) -> PlayerAction {
            PlayerAction::Bet(3)
        }

        fn name(&self) -> &str {
            "BadBetActor"
        }
    }

    #[test]
    fn test_rejected_actions_fold_the_seat() {
        let observer = VecObserver::default();
        let storage = observer.get_storage();

        let mut driver = HandDriverBuilder::default()
            .hand_state(seeded_state(vec![100; 3], 7))
            .actors(vec![
                Box::new(BadBetActor),
                Box::new(BadBetActor),
                Box::new(BadBetActor),
            ])
            .observers(vec![Box::new(observer)])
            .build()
            .unwrap();

        driver.run();

        assert!(driver.state.is_complete());
        let records = storage.borrow();
        let rejected = records
            .iter()
            .filter(|r| matches!(r.event, TableEvent::Rejected(_)))
            .count();
        assert!(rejected >= 2, "got {rejected} rejections");
        // The big blind inherits the pot once both others are folded out.
        assert_eq!(15, driver.state.seats[2].winnings);
    }

    #[test]
    fn test_observer_sees_the_whole_stream_in_order() {
        let observer = VecObserver::default();
        let storage = observer.get_storage();

        let mut driver = HandDriverBuilder::default()
            .hand_state(seeded_state(vec![100; 3], 11))
            .actors(boxed_actors::<CallingActor>(3))
            .observers(vec![Box::new(observer)])
            .build()
            .unwrap();
        driver.run();

        let records = storage.borrow();
        assert!(matches!(records[0].event, TableEvent::HandStart { .. }));
        assert!(matches!(
            records.last().unwrap().event,
            TableEvent::HandComplete
        ));
        assert!(records
            .iter()
            .any(|r| matches!(r.event, TableEvent::Played(_))));
        assert!(records
            .iter()
            .any(|r| matches!(r.event, TableEvent::Award(_))));
        // Each record carries the snapshot the event produced.
        assert!(records
            .iter()
            .all(|r| r.id == driver.state.id));
    }

    #[test]
    fn test_synthesize_fold_enforces_a_deadline() {
        let mut driver = HandDriverBuilder::default()
            .hand_state(seeded_state(vec![100; 3], 13))
            .actors(boxed_actors::<CallingActor>(3))
            .build()
            .unwrap();

        let seat = driver.state.to_act.unwrap();
        driver.synthesize_fold(seat);
        assert!(driver.state.seats[seat].folded);

        // A stale deadline for a seat no longer in turn changes nothing.
        driver.synthesize_fold(seat);
        assert!(driver.state.seats[seat].folded);
    }
}
