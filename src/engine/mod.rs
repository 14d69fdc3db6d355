//! The hand progression engine.
//!
//! A hand lives in a [`HandState`]: seats, board, pot, and the betting
//! round bookkeeping. It is advanced one validated action at a time through
//! [`HandState::apply_action`], which never mutates its input; showdowns
//! are settled through [`HandState::resolve_showdown`] with a
//! [`HandRanker`]. The [`HandDriver`] serializes a full hand for a table of
//! [`actor::Actor`]s and streams every state change to
//! [`observer::Observer`]s.
pub mod actor;
pub mod observer;

mod action;
mod driver;
mod errors;
mod hand_state;
mod position;
mod pot;
mod ranker;
mod seat;

pub use action::{
    ActionRequest, AwardPayload, ForcedBetKind, ForcedBetPayload, PlayedActionPayload,
    PlayerAction, RejectedActionPayload, TableEvent,
};
pub use driver::{HandDriver, HandDriverBuilder};
pub use errors::{EngineFault, HandDriverError, Rejection};
pub use hand_state::{
    next_dealer_idx, ActionOutcome, HandState, HandStateBuilder, HandStateBuilderError,
    Settlement, Street, MAX_SEATS,
};
pub use position::Position;
pub use pot::{pot_layers, PotLayer};
pub use ranker::{HandRanker, StandardRanker};
pub use seat::{Chips, Seat};
