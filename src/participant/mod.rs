//! The capability contract every player implementation satisfies, plus
//! ready-made implementations and the factory registry that builds them
//! from names.
//!
//! The engine only ever calls through [`Participant`]; it never inspects
//! an implementation's internals. Implementations in turn observe the
//! game only through the [`TableView`] passed to each callback.

pub mod registry;
pub mod scripted;

pub use registry::{ParticipantRegistry, RegistryError};
pub use scripted::{Random, Scripted};

use crate::game::entities::Handle;
use crate::game::view::TableView;

/// One contestant, driven by the engine one blocking callback at a time.
///
/// `seat` is the participant's stable handle for the whole game; it is
/// handed to every callback so implementations need not track it
/// themselves. Returned values are sanitized by the engine: an
/// out-of-stock or negative hand is coerced to 0, and an out-of-range
/// or duplicate guess is invalidated for the round. Misbehaving is
/// never fatal, just losing.
pub trait Participant {
    /// Display name, used in diagnostics.
    fn name(&self) -> &str;

    /// Called once, before the first round. Whole-game queries on the
    /// view are already valid.
    fn begin_game(&mut self, seat: Handle, view: &TableView) {
        let _ = (seat, view);
    }

    /// Declare the tokens held in hand this round. Must be between 0
    /// and the seat's current stock to count.
    fn hand(&mut self, seat: Handle, view: &TableView) -> i64;

    /// Declare a guess at the total of all hands. Guesses already
    /// recorded this round are visible through `view.guesses()`;
    /// `view.valid_guess` tells whether a candidate would be accepted.
    fn guess(&mut self, seat: Handle, view: &TableView) -> i64;

    /// Called once per round after settlement, while the seat is still
    /// in the game. The view exposes this round's own hand
    /// (`view.hand(seat)`), the full guess vector, and the winner.
    /// Purely observational.
    fn end_round(&mut self, seat: Handle, view: &TableView) {
        let _ = (seat, view);
    }
}
