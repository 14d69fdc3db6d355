use core::fmt;

/// A positional label for a seat, assigned by offset from the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    UnderTheGunPlusOne,
    UnderTheGunPlusTwo,
    Lojack,
    Hijack,
    Cutoff,
}

impl Position {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::UnderTheGunPlusOne => "UTG+1",
            Position::UnderTheGunPlusTwo => "UTG+2",
            Position::Lojack => "LJ",
            Position::Hijack => "HJ",
            Position::Cutoff => "CO",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Heads-up has no separate small blind seat: the dealer posts it.
const HEADS_UP: [Position; 2] = [Position::Button, Position::BigBlind];

const SIX_MAX: [Position; 6] = [
    Position::Button,
    Position::SmallBlind,
    Position::BigBlind,
    Position::UnderTheGun,
    Position::Hijack,
    Position::Cutoff,
];

const NINE_MAX: [Position; 9] = [
    Position::Button,
    Position::SmallBlind,
    Position::BigBlind,
    Position::UnderTheGun,
    Position::UnderTheGunPlusOne,
    Position::UnderTheGunPlusTwo,
    Position::Lojack,
    Position::Hijack,
    Position::Cutoff,
];

/// The label template for a table with `live_seats` seats still holding
/// chips: heads-up, the 6-max template, or the 9-max template.
pub(crate) fn template(live_seats: usize) -> &'static [Position] {
    if live_seats == 2 {
        &HEADS_UP
    } else if live_seats <= 6 {
        &SIX_MAX
    } else {
        &NINE_MAX
    }
}

/// The label for the live seat `offset` positions clockwise from the
/// dealer. `None` once the template runs out (only possible when the seat
/// count is outside 2..=9).
pub(crate) fn assign(live_seats: usize, offset: usize) -> Option<Position> {
    template(live_seats).get(offset).copied()
}
