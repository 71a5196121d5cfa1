//! Porrinha game engine - core FSM and game logic.
//!
//! This module provides the round-execution state machine and the game
//! state it drives:
//! - Type-safe finite state machine over the five round phases
//! - Token bookkeeping (stocks, pot, eliminations, rotation)
//! - Guess validation and winner determination
//! - Event generation and read-only views

pub mod constants;
pub mod entities;
pub mod state_machine;
pub mod states;
pub mod view;

pub use entities::{
    GameEvent, GameSettings, Guess, GuessProblem, Handle, Ranking, Tokens,
};
pub use state_machine::{
    run_game, Game, GameData, GameError, GameStateManagement, PorrinhaState,
};
pub use view::TableView;
