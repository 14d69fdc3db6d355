use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::action::PlayerAction;
use crate::engine::hand_state::HandState;

use super::Actor;

/// An actor that always continues: calls any bet, checks when free.
#[derive(Debug, Clone)]
pub struct CallingActor {
    name: String,
}

impl CallingActor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for CallingActor {
    fn default() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let idx = COUNTER.fetch_add(1, Ordering::Relaxed);
        CallingActor::new(format!("CallingActor-{idx}"))
    }
}

impl Actor for CallingActor {
    fn act(&mut self, _id: u128, state: &HandState) -> PlayerAction {
        if state.call_deficit() > 0 {
            PlayerAction::Call
        } else {
            PlayerAction::Check
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
