//! Read-only queries over the state of a game in progress.
//!
//! Not every accessor is meaningful at every moment. There are three
//! groups ("whole-game queries", "round queries" and "end-of-round
//! queries"), each with its own validity window, described per group.
//! Calling an accessor outside its window is not an error; it simply
//! reports whatever the previous window left behind.

use super::entities::{Guess, Handle, Tokens};
use super::state_machine::{GameData, GameError};

/// A read-only projection over the game data.
///
/// The engine hands a view to every participant callback; participants
/// never hold a mutable reference to the game. Out-of-range handles are
/// reported as [`GameError::InvalidHandle`], never a panic.
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    data: &'a GameData,
}

impl<'a> TableView<'a> {
    pub(crate) fn new(data: &'a GameData) -> Self {
        Self { data }
    }

    // === Whole-game queries ===
    //
    // Valid from the first `begin_game` call until the game is over.

    /// Number of seats in this game, including eliminated ones.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.data.stocks.len()
    }

    /// Number of seats still playing.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.data.active_count
    }

    /// Total tokens remaining across all participants.
    #[must_use]
    pub fn pot(&self) -> Tokens {
        self.data.pot
    }

    /// The seat that opens the current round.
    #[must_use]
    pub fn starting_player(&self) -> Handle {
        self.data.starting_player
    }

    /// Tokens the given seat still holds. This is *not* the number of
    /// tokens it committed as its hand this round.
    pub fn stock(&self, seat: Handle) -> Result<Tokens, GameError> {
        self.data
            .stocks
            .get(seat)
            .copied()
            .ok_or(GameError::InvalidHandle(seat))
    }

    /// The stock vector. `stocks()[seat]` is the same as `stock(seat)`.
    #[must_use]
    pub fn stocks(&self) -> &[Tokens] {
        &self.data.stocks
    }

    // === Round queries ===
    //
    // Built up as the guess phase progresses. A seat later in rotation
    // order sees the recorded guesses of everyone before it; its own
    // slot reads `Pending` while it is choosing.

    /// The current guess slot of the given seat.
    pub fn guess(&self, seat: Handle) -> Result<Guess, GameError> {
        self.data
            .guesses
            .get(seat)
            .copied()
            .ok_or(GameError::InvalidHandle(seat))
    }

    /// The guess vector. `guesses()[seat]` is the same as `guess(seat)`.
    #[must_use]
    pub fn guesses(&self) -> &[Guess] {
        &self.data.guesses
    }

    /// Tests whether `possible_guess` would be accepted right now,
    /// applying the game rule and the two "stupidity rules" enforced by
    /// the engine. A guess is invalid if it
    ///
    /// - is negative; or
    /// - is greater than the pot; or
    /// - is equal to some already-recorded guess.
    ///
    /// In all other cases the guess is valid. Nothing is mutated.
    #[must_use]
    pub fn valid_guess(&self, possible_guess: i64) -> bool {
        if possible_guess < 0 || possible_guess > i64::from(self.data.pot) {
            return false;
        }
        let v = possible_guess as Tokens;
        !self.data.guesses.contains(&Guess::Value(v))
    }

    // === End-of-round queries ===
    //
    // Valid from the `end_round` notifications of a round until the
    // `end_round` notifications of the following round.

    /// Tokens the given seat held in hand last round, or `None` if it
    /// did not play last round (first round, or eliminated in an
    /// earlier round).
    pub fn hand(&self, seat: Handle) -> Result<Option<Tokens>, GameError> {
        self.data
            .last_hand
            .get(seat)
            .copied()
            .ok_or(GameError::InvalidHandle(seat))
    }

    /// The hand vector. `hands()[seat]` is the same as `hand(seat)`.
    #[must_use]
    pub fn hands(&self) -> &[Option<Tokens>] {
        &self.data.last_hand
    }

    /// The seat that won the last round, or `None` if nobody guessed
    /// right (or no round has settled yet).
    #[must_use]
    pub fn last_winner(&self) -> Option<Handle> {
        self.data.last_winner
    }
}
