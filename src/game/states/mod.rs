//! Phase definitions for the round FSM.
//!
//! Each state represents a specific phase of one round of porrinha.

use super::entities::Handle;

/// Collecting each active participant's secret hand, in rotation order
/// from the starting player.
#[derive(Debug)]
pub struct CollectingHands {}

/// Collecting each active participant's guess at the hand total, in the
/// same rotation order.
#[derive(Debug)]
pub struct CollectingGuesses {}

/// Applying the round outcome: spending the winner's token, handling
/// elimination, and rotating the starting player.
#[derive(Debug)]
pub struct Settling {
    /// Winner of the guess phase, if any. When several guesses were
    /// correct, this is the last one recorded in rotation order.
    pub(crate) winner: Option<Handle>,
}

/// Round results have been applied; participants still in the game are
/// told how the round went.
#[derive(Debug)]
pub struct Notifying {}

/// Fewer than two participants remain; the ranking is final.
#[derive(Debug)]
pub struct GameOver {}
