use crate::core::Card;

use super::position::Position;

/// Chip amounts are integral. Splitting a pot can therefore leave a
/// remainder, which the payout logic assigns by an explicit rule.
pub type Chips = u32;

/// One seat's view of the hand in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    /// Stable identifier; equals the seat's index at the table.
    pub id: usize,
    /// Chips behind, not yet wagered.
    pub stack: Chips,
    /// Empty for seats that were not dealt in, two cards otherwise.
    pub hole_cards: Vec<Card>,
    /// Chips committed on the current street.
    pub current_bet: Chips,
    /// Chips committed across the whole hand.
    pub total_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    /// Whether the seat has voluntarily acted this street. Posting a blind
    /// does not count, which is what gives the big blind its preflop
    /// option.
    pub has_acted: bool,
    pub position: Option<Position>,
    /// Chips paid out to this seat at the end of the hand.
    pub winnings: Chips,
}

impl Seat {
    pub(crate) fn new(id: usize, stack: Chips) -> Self {
        Seat {
            id,
            stack,
            hole_cards: Vec::with_capacity(2),
            current_bet: 0,
            total_bet: 0,
            folded: false,
            all_in: false,
            is_dealer: false,
            is_small_blind: false,
            is_big_blind: false,
            has_acted: false,
            position: None,
            winnings: 0,
        }
    }

    /// Still contending for the pot: dealt in and not folded.
    pub fn in_hand(&self) -> bool {
        !self.folded && !self.hole_cards.is_empty()
    }

    /// Able to take a betting action: contending and not all in.
    pub fn can_act(&self) -> bool {
        self.in_hand() && !self.all_in
    }

    /// Move up to `amount` chips from the stack into the bet, capped at
    /// what the seat has. Returns the chips actually moved; the seat is
    /// all in when the stack empties.
    pub(crate) fn commit(&mut self, amount: Chips) -> Chips {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.current_bet += moved;
        self.total_bet += moved;
        if self.stack == 0 {
            self.all_in = true;
        }
        moved
    }

    /// Reset the per-street fields when a new street opens.
    pub(crate) fn begin_street(&mut self) {
        self.current_bet = 0;
        self.has_acted = false;
    }
}
