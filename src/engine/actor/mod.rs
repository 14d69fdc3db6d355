//! `Actor`s supply the decisions at the table: bots, or adapters feeding
//! in human input. An actor only ever sees a state snapshot and answers
//! with one action; scheduling, think time, and deadlines live with the
//! caller, not here.
mod calling;
mod folding;
mod random;

use super::action::PlayerAction;
use super::hand_state::HandState;

/// The decision interface the driver calls for the seat in turn.
///
/// Actors must own their state; the driver keeps one boxed actor per seat,
/// so single threaded tables need no locking.
pub trait Actor {
    /// Decide an action for the seat currently holding the turn.
    fn act(&mut self, id: u128, state: &HandState) -> PlayerAction;

    fn name(&self) -> &str;
}

pub use calling::CallingActor;
pub use folding::FoldingActor;
pub use random::RandomActor;
