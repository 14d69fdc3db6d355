use thiserror::Error;

use super::hand_state::Street;
use super::seat::Chips;

/// Why a player action was refused.
///
/// A rejection never changes the hand: the state is untouched, the turn is
/// not consumed, and the caller may retry with a legal action.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("seat {0} is not at this table")]
    UnknownSeat(usize),

    #[error("cannot check while facing a bet")]
    CheckFacingBet,

    #[error("there is no outstanding bet to call")]
    NothingToCall,

    #[error("bet amount must be greater than zero")]
    ZeroBet,

    #[error("bet of {amount} exceeds the remaining stack of {stack}")]
    BetExceedsStack { amount: Chips, stack: Chips },

    #[error("raise to {total} is below the minimum total of {minimum}")]
    RaiseBelowMinimum { total: Chips, minimum: Chips },
}

/// A structural inconsistency inside the engine.
///
/// These indicate a programming or data corruption bug, never a game
/// situation. The current hand is force-terminated with the fault recorded
/// on the state; the process (and the table) carries on, and a fresh hand
/// can be started cleanly.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineFault {
    #[error("deck exhausted while dealing the {street}")]
    DeckExhausted { street: Street },

    #[error("no eligible seat found to act")]
    NoEligibleActor,

    #[error("hand is not at showdown")]
    NotAtShowdown,
}

/// Errors from building a `HandDriver`.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HandDriverError {
    #[error("builder needs a hand state")]
    NeedHandState,

    #[error("builder needs actors")]
    NeedActors,

    #[error("expected {seats} actors to match the seats, got {actors}")]
    ActorCountMismatch { seats: usize, actors: usize },
}
