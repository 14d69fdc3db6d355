//! `Observer`s receive the engine's state output: every accepted action,
//! street advance, and payout, each paired with a full snapshot of the
//! hand. UIs, telemetry, and bot bookkeeping all attach here; the engine
//! itself has no idea who is listening.
mod null;
mod vec;

use thiserror::Error;

use super::action::TableEvent;
use super::hand_state::HandState;

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("unable to record the event")]
    RecordFailed,
}

pub trait Observer {
    /// Called after every event with the snapshot the event produced.
    fn on_event(
        &mut self,
        id: u128,
        state: &HandState,
        event: &TableEvent,
    ) -> Result<(), ObserverError>;
}

pub use null::NullObserver;
pub use vec::{EventRecord, VecObserver};
