//! Engine-wide defaults.

use super::entities::Tokens;

/// Number of tokens each participant starts with unless the settings
/// say otherwise. Three chopsticks per hand is the traditional game.
pub const DEFAULT_INITIAL_STOCK: Tokens = 3;

/// Minimum number of participants a game can start with. The engine
/// refuses to begin a game it cannot finish.
pub const MIN_PARTICIPANTS: usize = 2;
