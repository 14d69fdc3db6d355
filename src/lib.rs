//! `holdem_table` is a library for running Texas Hold'em hands.
//!
//! The `core` module contains the card primitives: values, suits, an
//! ordered deck, and hand scoring for 5 to 7 card hands.
//!
//! The `engine` module contains the hand progression machinery: a
//! `HandState` that is advanced one validated action at a time, side pot
//! layering and showdown payout, positional label assignment, and a
//! `HandDriver` that serializes a table's actors and streams state
//! snapshots to observers.
pub mod core;
pub mod engine;
