//! # Porrinha
//!
//! A simulation engine for porrinha, the turn-based chopstick guessing
//! game, implemented as a type-safe finite state machine (FSM).
//!
//! Each round, every active participant secretly commits a hand bounded
//! by its remaining token stock, then guesses the total of all hands. A
//! correct guesser spends one token; whoever runs out of tokens leaves
//! the game; the game ends when fewer than two participants remain, and
//! the order of elimination is the final ranking.
//!
//! ## Architecture
//!
//! One round moves through five phases, each a distinct state of the
//! FSM:
//!
//! - **CollectingHands**: each active seat commits its secret hand
//! - **CollectingGuesses**: each active seat guesses the hand total
//! - **Settling**: the winner spends a token; eliminations and
//!   starting-player rotation are applied
//! - **Notifying**: remaining seats observe the round's outcome
//! - **GameOver**: fewer than two seats remain; the ranking is final
//!
//! The engine is strictly sequential: one round at a time, one blocking
//! participant callback at a time, no background work. Participants
//! implement the [`Participant`] contract and observe the game only
//! through the read-only [`TableView`].
//!
//! ## Example
//!
//! ```
//! use porrinha::participant::Scripted;
//! use porrinha::{run_game, GameSettings, Participant};
//!
//! let seats: Vec<Box<dyn Participant>> = vec![
//!     Box::new(Scripted::new("alice", &[0], &[0])),
//!     Box::new(Scripted::new("bob", &[1], &[1])),
//! ];
//! let ranking = run_game(seats, GameSettings::default()).unwrap();
//! assert_eq!(ranking.loser(), Some(0));
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    constants, entities, run_game, GameData, GameError, GameEvent, GameSettings,
    GameStateManagement, Guess, GuessProblem, Handle, PorrinhaState, Ranking, TableView, Tokens,
};

/// Participant contract, ready-made implementations, and the factory
/// registry.
pub mod participant;
pub use participant::{Participant, ParticipantRegistry, RegistryError};
