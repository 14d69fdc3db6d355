use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use super::card::{Card, Suit, Value};

/// An ordered sequence of cards, consumed from the front.
///
/// A freshly built deck holds the 52 distinct cards. It is never refilled;
/// a new hand builds a new deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The full 52 card deck in suit-then-value order.
    pub fn new() -> Self {
        let mut cards = VecDeque::with_capacity(52);
        for suit in Suit::ALL {
            for value in Value::ALL {
                cards.push_back(Card::new(value, suit));
            }
        }
        Deck { cards }
    }

    /// A deck holding exactly the given cards, front first.
    ///
    /// Only useful for setting up known deals in tests.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Deck {
            cards: cards.into_iter().collect(),
        }
    }

    /// Uniformly permute the remaining cards.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Take the next card off the front, if any remain.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}
