use core::fmt;

use thiserror::Error;

/// Card suits.
///
/// The discriminant is used as a bit index by the hand scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    /// All four suits, in discriminant order.
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
}

/// Card values, two low to ace high.
///
/// The discriminant is used as a bit index by the hand scorer, so `Ace`
/// must stay the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Value {
    /// All thirteen values, two through ace.
    pub const ALL: [Value; 13] = [
        Value::Two,
        Value::Three,
        Value::Four,
        Value::Five,
        Value::Six,
        Value::Seven,
        Value::Eight,
        Value::Nine,
        Value::Ten,
        Value::Jack,
        Value::Queen,
        Value::King,
        Value::Ace,
    ];

    fn to_char(self) -> char {
        match self {
            Value::Two => '2',
            Value::Three => '3',
            Value::Four => '4',
            Value::Five => '5',
            Value::Six => '6',
            Value::Seven => '7',
            Value::Eight => '8',
            Value::Nine => '9',
            Value::Ten => 'T',
            Value::Jack => 'J',
            Value::Queen => 'Q',
            Value::King => 'K',
            Value::Ace => 'A',
        }
    }
}

/// Errors from parsing a two character card string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card strings are exactly two characters, got {0}")]
    BadLength(usize),

    #[error("unknown card value {0:?}")]
    UnknownValue(char),

    #[error("unknown card suit {0:?}")]
    UnknownSuit(char),
}

impl TryFrom<char> for Value {
    type Error = CardParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '2' => Ok(Value::Two),
            '3' => Ok(Value::Three),
            '4' => Ok(Value::Four),
            '5' => Ok(Value::Five),
            '6' => Ok(Value::Six),
            '7' => Ok(Value::Seven),
            '8' => Ok(Value::Eight),
            '9' => Ok(Value::Nine),
            'T' | 't' => Ok(Value::Ten),
            'J' | 'j' => Ok(Value::Jack),
            'Q' | 'q' => Ok(Value::Queen),
            'K' | 'k' => Ok(Value::King),
            'A' | 'a' => Ok(Value::Ace),
            _ => Err(CardParseError::UnknownValue(c)),
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = CardParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'c' | 'C' => Ok(Suit::Club),
            'd' | 'D' => Ok(Suit::Diamond),
            'h' | 'H' => Ok(Suit::Heart),
            's' | 'S' => Ok(Suit::Spade),
            _ => Err(CardParseError::UnknownSuit(c)),
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Suit::Club => 'c',
            Suit::Diamond => 'd',
            Suit::Heart => 'h',
            Suit::Spade => 's',
        };
        write!(f, "{c}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A single playing card. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    pub const fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }
}

impl fmt::Display for Card {
    /// Renders as the usual short form, e.g. `Ah`, `Td`, `7c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suit)
    }
}

impl TryFrom<&str> for Card {
    type Error = CardParseError;

    /// Parses the short form, e.g. `"Ah"`, `"td"`.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        let value_char = chars
            .next()
            .ok_or(CardParseError::BadLength(s.chars().count()))?;
        let suit_char = chars
            .next()
            .ok_or(CardParseError::BadLength(s.chars().count()))?;
        if chars.next().is_some() {
            return Err(CardParseError::BadLength(s.chars().count()));
        }

        Ok(Card::new(
            Value::try_from(value_char)?,
            Suit::try_from(suit_char)?,
        ))
    }
}
