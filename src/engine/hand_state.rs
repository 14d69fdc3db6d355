use core::fmt;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, error, trace};

use crate::core::{Card, Deck};

use super::action::{
    ActionRequest, AwardPayload, ForcedBetKind, ForcedBetPayload, PlayedActionPayload,
    PlayerAction, TableEvent,
};
use super::errors::{EngineFault, Rejection};
use super::position;
use super::pot;
use super::ranker::HandRanker;
use super::seat::{Chips, Seat};

/// The largest table the positional templates cover.
pub const MAX_SEATS: usize = 9;

/// Errors that can occur when building a `HandState`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandStateBuilderError {
    #[error("stacks are required")]
    MissingStacks,

    #[error("big_blind is required")]
    MissingBigBlind,

    #[error("seat count must be between 2 and {max}, got {actual}", max = MAX_SEATS)]
    InvalidSeatCount { actual: usize },

    #[error("dealer_idx {dealer_idx} must be less than the seat count {seats}")]
    InvalidDealerIndex { dealer_idx: usize, seats: usize },

    #[error("dealer seat {0} has no chips")]
    DealerSeatUnfunded(usize),

    #[error("big_blind must be positive")]
    ZeroBigBlind,

    #[error("small_blind {small} must not exceed big_blind {big}")]
    SmallBlindAboveBig { small: Chips, big: Chips },

    #[error("at least 2 seats must have positive stacks")]
    InsufficientFundedSeats,
}

/// Builder for a ready-to-play `HandState`.
///
/// `build` validates the table, shuffles (unless a deck was supplied),
/// deals hole cards, assigns positions, and posts the blinds, returning a
/// hand at preflop with the turn on the first seat to act.
///
/// # Example
///
/// ```
/// use holdem_table::engine::{HandStateBuilder, Street};
///
/// let state = HandStateBuilder::new()
///     .seats_with_stack(3, 1_000)
///     .blinds(10, 5)
///     .dealer_idx(0)
///     .build()
///     .unwrap();
///
/// assert_eq!(Street::Preflop, state.street);
/// assert_eq!(15, state.pot);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HandStateBuilder {
    stacks: Option<Vec<Chips>>,
    big_blind: Option<Chips>,
    small_blind: Option<Chips>,
    dealer_idx: Option<usize>,
    deck: Option<Deck>,
}

impl HandStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stack for every seat. Required.
    pub fn stacks(mut self, stacks: Vec<Chips>) -> Self {
        self.stacks = Some(stacks);
        self
    }

    /// Convenience: `n` seats, each with `stack` chips.
    pub fn seats_with_stack(mut self, n: usize, stack: Chips) -> Self {
        self.stacks = Some(vec![stack; n]);
        self
    }

    /// Set the big blind. Required.
    pub fn big_blind(mut self, big_blind: Chips) -> Self {
        self.big_blind = Some(big_blind);
        self
    }

    /// Set the small blind. Defaults to half the big blind.
    pub fn small_blind(mut self, small_blind: Chips) -> Self {
        self.small_blind = Some(small_blind);
        self
    }

    /// Convenience: both blinds at once.
    pub fn blinds(mut self, big_blind: Chips, small_blind: Chips) -> Self {
        self.big_blind = Some(big_blind);
        self.small_blind = Some(small_blind);
        self
    }

    /// Set the dealer seat. Defaults to 0. Must hold chips.
    pub fn dealer_idx(mut self, dealer_idx: usize) -> Self {
        self.dealer_idx = Some(dealer_idx);
        self
    }

    /// Supply a deck instead of shuffling a fresh one. The deck is used
    /// as-is, front first, so tests can rig exact deals.
    pub fn deck(mut self, deck: Deck) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Validate and start the hand, shuffling with the thread rng.
    pub fn build(self) -> Result<HandState, HandStateBuilderError> {
        let mut rng = rand::rng();
        self.build_with_rng(&mut rng)
    }

    /// Validate and start the hand using the given rng for the shuffle and
    /// the hand id.
    pub fn build_with_rng<R: Rng + ?Sized>(
        self,
        rng: &mut R,
    ) -> Result<HandState, HandStateBuilderError> {
        let stacks = self.stacks.ok_or(HandStateBuilderError::MissingStacks)?;
        let big_blind = self
            .big_blind
            .ok_or(HandStateBuilderError::MissingBigBlind)?;

        let num_seats = stacks.len();
        if !(2..=MAX_SEATS).contains(&num_seats) {
            return Err(HandStateBuilderError::InvalidSeatCount { actual: num_seats });
        }

        if big_blind == 0 {
            return Err(HandStateBuilderError::ZeroBigBlind);
        }

        let small_blind = self.small_blind.unwrap_or(big_blind / 2);
        if small_blind > big_blind {
            return Err(HandStateBuilderError::SmallBlindAboveBig {
                small: small_blind,
                big: big_blind,
            });
        }

        let dealer_idx = self.dealer_idx.unwrap_or(0);
        if dealer_idx >= num_seats {
            return Err(HandStateBuilderError::InvalidDealerIndex {
                dealer_idx,
                seats: num_seats,
            });
        }
        if stacks[dealer_idx] == 0 {
            return Err(HandStateBuilderError::DealerSeatUnfunded(dealer_idx));
        }

        if stacks.iter().filter(|&&s| s > 0).count() < 2 {
            return Err(HandStateBuilderError::InsufficientFundedSeats);
        }

        let deck = self.deck.unwrap_or_else(|| {
            let mut deck = Deck::new();
            deck.shuffle(rng);
            deck
        });

        let seats = stacks
            .iter()
            .enumerate()
            .map(|(id, &stack)| Seat::new(id, stack))
            .collect();

        let mut state = HandState {
            id: rng.random::<u128>(),
            seats,
            community: Vec::with_capacity(5),
            pot: 0,
            street: Street::Preflop,
            to_act: None,
            dealer_idx,
            small_blind,
            big_blind,
            highest_bet: 0,
            min_raise: big_blind,
            last_aggressor: None,
            closing_idx: None,
            raise_count: 0,
            fault: None,
            deck,
        };
        state.start();
        Ok(state)
    }
}

/// The phase of the hand. A closed set; everything that branches on it
/// matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    HandOver,
}

impl Street {
    pub fn next(&self) -> Street {
        match *self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River => Street::Showdown,
            Street::Showdown => Street::HandOver,
            Street::HandOver => Street::HandOver,
        }
    }

    /// The betting streets, where one seat holds the turn.
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            Street::Preflop | Street::Flop | Street::Turn | Street::River
        )
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "preflop"),
            Street::Flop => write!(f, "flop"),
            Street::Turn => write!(f, "turn"),
            Street::River => write!(f, "river"),
            Street::Showdown => write!(f, "showdown"),
            Street::HandOver => write!(f, "hand over"),
        }
    }
}

/// The result of applying an action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action was accepted. `state` is the successor; `events` is what
    /// happened, in order, including any street advances or payout the
    /// action triggered.
    Applied {
        state: HandState,
        events: Vec<TableEvent>,
    },
    /// The declared seat no longer holds the turn. Nothing happened and
    /// nothing needs to: late actions cancel themselves.
    Stale,
}

/// A settled showdown: the terminal state plus the itemized pot awards.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub state: HandState,
    pub awards: Vec<AwardPayload>,
}

/// The dealer seat for the hand after one dealt with `prev` on the button:
/// the next seat clockwise still holding chips.
pub fn next_dealer_idx(prev: usize, stacks: &[Chips]) -> Option<usize> {
    let n = stacks.len();
    if n == 0 {
        return None;
    }
    (1..=n).map(|o| (prev + o) % n).find(|&i| stacks[i] > 0)
}

/// The complete state of one hand.
///
/// Mutation happens only through [`HandState::apply_action`] and
/// [`HandState::resolve_showdown`], both of which leave `self` untouched
/// and return a successor. Snapshots of this struct are the engine's state
/// output; the undealt deck is withheld from serialization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandState {
    pub id: u128,
    pub seats: Vec<Seat>,
    pub community: Vec<Card>,
    /// Chips already moved out of the seats. `Σ stack + pot` is invariant
    /// until the payout drains the pot into the winners' stacks.
    pub pot: Chips,
    pub street: Street,
    /// The seat holding the turn. `Some` exactly while `street` is a
    /// betting street and the hand has not faulted.
    pub to_act: Option<usize>,
    pub dealer_idx: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// The highest per-seat street total so far.
    pub highest_bet: Chips,
    /// The smallest amount by which the next raise must exceed
    /// `highest_bet`.
    pub min_raise: Chips,
    /// The seat that made the last full bet or raise this street.
    pub last_aggressor: Option<usize>,
    /// Where the action closes with nothing outstanding: the big blind
    /// preflop, the first seat to act postflop, and the seat before the
    /// raiser after a full raise.
    pub closing_idx: Option<usize>,
    /// Full raises this street.
    pub raise_count: u8,
    /// Set when the hand was force-terminated by a structural fault.
    pub fault: Option<EngineFault>,
    #[cfg_attr(feature = "serde", serde(skip))]
    deck: Deck,
}

impl HandState {
    /// Seats still contending for the pot.
    pub fn num_contenders(&self) -> usize {
        self.seats.iter().filter(|s| s.in_hand()).count()
    }

    /// Seats still able to take a betting action.
    pub fn num_can_bet(&self) -> usize {
        self.seats.iter().filter(|s| s.can_act()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.street == Street::HandOver
    }

    pub fn current_seat(&self) -> Option<&Seat> {
        self.to_act.map(|idx| &self.seats[idx])
    }

    /// What the seat in turn must add to call, zero when checking is open.
    pub fn call_deficit(&self) -> Chips {
        self.current_seat()
            .map(|s| self.highest_bet.saturating_sub(s.current_bet))
            .unwrap_or(0)
    }

    /// Events describing the deal and blind posting of a freshly built
    /// hand. Meaningful only before any action has been applied.
    pub fn opening_events(&self) -> Vec<TableEvent> {
        let mut events = vec![TableEvent::HandStart {
            dealer_idx: self.dealer_idx,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
        }];
        if let Some(sb) = self.seats.iter().find(|s| s.is_small_blind) {
            events.push(TableEvent::ForcedBet(ForcedBetPayload {
                seat: sb.id,
                kind: ForcedBetKind::SmallBlind,
                posted: sb.total_bet,
            }));
        }
        if let Some(bb) = self.seats.iter().find(|s| s.is_big_blind) {
            events.push(TableEvent::ForcedBet(ForcedBetPayload {
                seat: bb.id,
                kind: ForcedBetKind::BigBlind,
                posted: bb.total_bet,
            }));
        }
        // Blinds can leave everyone all in, in which case the board was
        // already run out.
        for &card in &self.community {
            events.push(TableEvent::CommunityDealt(card));
        }
        if self.street != Street::Preflop {
            events.push(TableEvent::StreetAdvance(self.street));
        }
        events
    }

    /// Apply one player action as a pure transition.
    ///
    /// A request from a seat that does not hold the turn is a stale no-op.
    /// An illegal action is rejected without consuming the turn. Everything
    /// the accepted action triggered (street advances, board cards, an
    /// early payout) is folded into the returned successor and its events.
    pub fn apply_action(&self, req: &ActionRequest) -> Result<ActionOutcome, Rejection> {
        if req.seat >= self.seats.len() {
            return Err(Rejection::UnknownSeat(req.seat));
        }

        let idx = match self.to_act {
            Some(idx) if idx == req.seat && self.street.is_betting() => idx,
            _ => return Ok(ActionOutcome::Stale),
        };

        self.validate(idx, &req.action)?;

        let mut next = self.clone();
        let mut events = Vec::new();

        next.commit_action(idx, &req.action);
        trace!(seat = idx, action = %req.action, street = %next.street, "applied action");
        events.push(TableEvent::Played(PlayedActionPayload {
            seat: idx,
            action: req.action,
            street: next.street,
            pot: next.pot,
            highest_bet: next.highest_bet,
            min_raise: next.min_raise,
        }));

        next.progress(idx, &mut events);

        Ok(ActionOutcome::Applied {
            state: next,
            events,
        })
    }

    /// Settle a multi-way showdown: layer the pot, evaluate the eligible
    /// hands through `ranker`, and pay every layer. The successor is at
    /// `HandOver` with the pot drained.
    pub fn resolve_showdown(&self, ranker: &dyn HandRanker) -> Result<Settlement, EngineFault> {
        if self.street != Street::Showdown {
            return Err(EngineFault::NotAtShowdown);
        }

        let awards = pot::settle(self, ranker);

        let mut state = self.clone();
        for award in &awards {
            state.seats[award.seat].stack += award.amount;
            state.seats[award.seat].winnings += award.amount;
        }
        state.pot = 0;
        state.street = Street::HandOver;
        state.to_act = None;
        state.closing_idx = None;

        Ok(Settlement { state, awards })
    }

    fn validate(&self, idx: usize, action: &PlayerAction) -> Result<(), Rejection> {
        let seat = &self.seats[idx];
        match *action {
            PlayerAction::Check => {
                if seat.current_bet != self.highest_bet {
                    return Err(Rejection::CheckFacingBet);
                }
            }
            PlayerAction::Call => {
                if self.highest_bet <= seat.current_bet {
                    return Err(Rejection::NothingToCall);
                }
            }
            PlayerAction::Bet(amount) | PlayerAction::Raise(amount) => {
                if amount == 0 {
                    return Err(Rejection::ZeroBet);
                }
                if amount > seat.stack {
                    return Err(Rejection::BetExceedsStack {
                        amount,
                        stack: seat.stack,
                    });
                }
                let total = seat.current_bet + amount;
                let minimum = self.highest_bet + self.min_raise;
                // Going all in below the minimum is always allowed.
                if amount != seat.stack && total < minimum {
                    return Err(Rejection::RaiseBelowMinimum { total, minimum });
                }
            }
            PlayerAction::Fold => {}
        }
        Ok(())
    }

    fn commit_action(&mut self, idx: usize, action: &PlayerAction) {
        match *action {
            PlayerAction::Check => {
                self.seats[idx].has_acted = true;
            }
            PlayerAction::Call => {
                let deficit = self.highest_bet - self.seats[idx].current_bet;
                let moved = self.seats[idx].commit(deficit);
                self.pot += moved;
                self.seats[idx].has_acted = true;
            }
            PlayerAction::Bet(amount) | PlayerAction::Raise(amount) => {
                let prev_highest = self.highest_bet;
                let moved = self.seats[idx].commit(amount);
                self.pot += moved;
                self.seats[idx].has_acted = true;

                let total = self.seats[idx].current_bet;
                if total > prev_highest {
                    self.highest_bet = total;
                    let raise_size = total - prev_highest;
                    if raise_size >= self.min_raise {
                        // A full raise moves the goalposts and reopens the
                        // street; an all-in under-raise leaves them where
                        // the last full raise put them.
                        self.min_raise = raise_size;
                        self.last_aggressor = Some(idx);
                        self.closing_idx = self.prev_can_act_before(idx);
                        self.raise_count = self.raise_count.saturating_add(1);
                    }
                }
            }
            PlayerAction::Fold => {
                self.seats[idx].folded = true;
                self.seats[idx].has_acted = true;
            }
        }
    }

    /// After a committed action: hand an early pot to a lone survivor,
    /// advance streets when the round closed, or pass the turn.
    fn progress(&mut self, acted_idx: usize, events: &mut Vec<TableEvent>) {
        if self.num_contenders() <= 1 {
            self.award_to_survivor(events);
            return;
        }

        if self.betting_round_complete() {
            self.advance_after_round(events);
            return;
        }

        match self.next_can_act_after(acted_idx) {
            Some(next_idx) => self.to_act = Some(next_idx),
            None => self.abort(EngineFault::NoEligibleActor, events),
        }
    }

    /// The round is closed once every seat that could still act has acted
    /// this street and matches the highest bet. Vacuously true when nobody
    /// can act (everyone is all in or folded). The big blind's preflop
    /// option falls out of `has_acted`: posting the blind does not set it.
    fn betting_round_complete(&self) -> bool {
        self.seats
            .iter()
            .filter(|s| s.can_act())
            .all(|s| s.has_acted && s.current_bet == self.highest_bet)
    }

    fn advance_after_round(&mut self, events: &mut Vec<TableEvent>) {
        loop {
            if self.street == Street::River {
                self.enter_showdown(events);
                return;
            }

            let street = self.street.next();
            self.street = street;
            for seat in &mut self.seats {
                seat.begin_street();
            }
            self.highest_bet = 0;
            self.min_raise = self.big_blind;
            self.last_aggressor = None;
            self.raise_count = 0;

            debug!(street = %street, "street advance");
            events.push(TableEvent::StreetAdvance(street));

            if let Err(fault) = self.deal_street(street, events) {
                self.abort(fault, events);
                return;
            }

            // With fewer than two seats able to bet there is no betting
            // round to have; keep dealing toward showdown.
            if self.num_can_bet() >= 2 {
                match self.next_can_act_after(self.dealer_idx) {
                    Some(first) => {
                        self.to_act = Some(first);
                        self.closing_idx = Some(first);
                    }
                    None => self.abort(EngineFault::NoEligibleActor, events),
                }
                return;
            }
            self.to_act = None;
            self.closing_idx = None;
        }
    }

    /// Burn one, then deal the street's board cards.
    fn deal_street(
        &mut self,
        street: Street,
        events: &mut Vec<TableEvent>,
    ) -> Result<(), EngineFault> {
        let count = match street {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            _ => 0,
        };
        if count == 0 {
            return Ok(());
        }

        self.deck
            .deal()
            .ok_or(EngineFault::DeckExhausted { street })?;
        for _ in 0..count {
            let card = self
                .deck
                .deal()
                .ok_or(EngineFault::DeckExhausted { street })?;
            self.community.push(card);
            events.push(TableEvent::CommunityDealt(card));
        }
        Ok(())
    }

    fn enter_showdown(&mut self, events: &mut Vec<TableEvent>) {
        for seat in &mut self.seats {
            seat.current_bet = 0;
        }
        self.street = Street::Showdown;
        self.to_act = None;
        self.closing_idx = None;
        self.highest_bet = 0;
        self.last_aggressor = None;
        debug!("street advance to showdown");
        events.push(TableEvent::StreetAdvance(Street::Showdown));
    }

    /// One contender left: the whole pot is theirs, no evaluation needed.
    fn award_to_survivor(&mut self, events: &mut Vec<TableEvent>) {
        if let Some(idx) = self.seats.iter().position(|s| s.in_hand()) {
            let amount = self.pot;
            self.seats[idx].stack += amount;
            self.seats[idx].winnings += amount;
            self.pot = 0;
            events.push(TableEvent::Award(AwardPayload {
                seat: idx,
                amount,
                score: None,
            }));
        }
        self.finish(events);
    }

    fn finish(&mut self, events: &mut Vec<TableEvent>) {
        for seat in &mut self.seats {
            seat.current_bet = 0;
        }
        self.street = Street::HandOver;
        self.to_act = None;
        self.closing_idx = None;
        events.push(TableEvent::HandComplete);
    }

    pub(crate) fn abort(&mut self, fault: EngineFault, events: &mut Vec<TableEvent>) {
        error!(%fault, hand_id = self.id, "hand force-terminated");
        self.fault = Some(fault);
        self.street = Street::HandOver;
        self.to_act = None;
        self.closing_idx = None;
        events.push(TableEvent::Aborted(fault));
    }

    fn next_can_act_after(&self, idx: usize) -> Option<usize> {
        let n = self.seats.len();
        (1..=n)
            .map(|offset| (idx + offset) % n)
            .find(|&i| self.seats[i].can_act())
    }

    fn prev_can_act_before(&self, idx: usize) -> Option<usize> {
        let n = self.seats.len();
        (1..=n)
            .map(|offset| (idx + n - offset) % n)
            .find(|&i| self.seats[i].can_act())
    }

    /// Deal, assign positions, and post blinds. Called once from the
    /// builder on a fresh state.
    fn start(&mut self) {
        let n = self.seats.len();
        // Ring of funded seats clockwise from the dealer; ring[0] is the
        // dealer itself.
        let ring: Vec<usize> = (0..n)
            .map(|offset| (self.dealer_idx + offset) % n)
            .filter(|&i| self.seats[i].stack > 0)
            .collect();
        let live = ring.len();

        for (offset, &i) in ring.iter().enumerate() {
            self.seats[i].position = position::assign(live, offset);
        }
        self.seats[self.dealer_idx].is_dealer = true;

        // Heads-up the dealer posts the small blind.
        let (sb_idx, bb_idx) = if live == 2 {
            (ring[0], ring[1])
        } else {
            (ring[1], ring[2])
        };
        self.seats[sb_idx].is_small_blind = true;
        self.seats[bb_idx].is_big_blind = true;

        // Two cards each, one per pass, starting left of the dealer.
        for _ in 0..2 {
            for &i in ring.iter().cycle().skip(1).take(live) {
                match self.deck.deal() {
                    Some(card) => self.seats[i].hole_cards.push(card),
                    None => {
                        self.abort(
                            EngineFault::DeckExhausted {
                                street: Street::Preflop,
                            },
                            &mut Vec::new(),
                        );
                        return;
                    }
                }
            }
        }

        let sb_posted = self.seats[sb_idx].commit(self.small_blind);
        self.pot += sb_posted;
        let bb_posted = self.seats[bb_idx].commit(self.big_blind);
        self.pot += bb_posted;

        // The big blind amount anchors the betting even when the blind
        // seat could not fully cover it, and the big blind seat counts as
        // the opening aggressor so an unraised round still closes on it.
        self.highest_bet = self.big_blind;
        self.min_raise = self.big_blind;
        self.last_aggressor = Some(bb_idx);
        self.closing_idx = Some(bb_idx);

        self.to_act = self.next_can_act_after(bb_idx);

        // Blinds can put the whole table all in.
        if self.betting_round_complete() {
            self.advance_after_round(&mut Vec::new());
        }
    }
}
