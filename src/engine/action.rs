use core::fmt;

use crate::core::{Card, HandScore};

use super::errors::{EngineFault, Rejection};
use super::hand_state::Street;
use super::seat::Chips;

/// What a player asks to do on their turn.
///
/// `Bet` and `Raise` carry the chips moved from the stack by this action,
/// not the resulting total; they validate identically and exist separately
/// only so callers can express intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
    Fold,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Check => write!(f, "check"),
            PlayerAction::Call => write!(f, "call"),
            PlayerAction::Bet(amount) => write!(f, "bet {amount}"),
            PlayerAction::Raise(amount) => write!(f, "raise {amount}"),
            PlayerAction::Fold => write!(f, "fold"),
        }
    }
}

/// An action addressed to the engine on behalf of a specific seat.
///
/// The engine re-validates the addressing at application time: if the
/// declared seat no longer holds the turn the request is a stale no-op,
/// which is all the cancellation a late (e.g. timed-out bot) action needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub seat: usize,
    pub action: PlayerAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForcedBetKind {
    SmallBlind,
    BigBlind,
}

/// A blind the seat was forced to post. `posted` is what actually moved,
/// which is less than the blind when the stack could not cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForcedBetPayload {
    pub seat: usize,
    pub kind: ForcedBetKind,
    pub posted: Chips,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayedActionPayload {
    pub seat: usize,
    pub action: PlayerAction,
    pub street: Street,
    pub pot: Chips,
    pub highest_bet: Chips,
    pub min_raise: Chips,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectedActionPayload {
    pub seat: usize,
    pub action: PlayerAction,
    pub reason: Rejection,
}

/// A pot (or pot layer) paid to a seat. `score` is present only when the
/// award was decided by hand evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AwardPayload {
    pub seat: usize,
    pub amount: Chips,
    pub score: Option<HandScore>,
}

/// Everything observable that can happen at the table. Observers receive
/// each event together with a full state snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableEvent {
    HandStart {
        dealer_idx: usize,
        small_blind: Chips,
        big_blind: Chips,
    },
    ForcedBet(ForcedBetPayload),
    /// A player action was accepted and applied.
    Played(PlayedActionPayload),
    /// A player action was refused. No `Played` event follows; the same
    /// seat is still to act.
    Rejected(RejectedActionPayload),
    StreetAdvance(Street),
    CommunityDealt(Card),
    Award(AwardPayload),
    /// The hand was force-terminated by a structural fault.
    Aborted(EngineFault),
    HandComplete,
}
