use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants;

/// Type alias for token counts. Stocks, the pot, hands, and concrete
/// guesses are all token counts.
///
/// If a table ever holds ~4.2 billion chopsticks, then we may have
/// a problem.
pub type Tokens = u32;

/// Type alias for seat positions. A handle is assigned when a participant
/// is seated and identifies it for the whole game; it is never reassigned.
pub type Handle = usize;

/// The state of one guess slot during a round.
///
/// A slot holds either a concrete value in `0..=pot` or one of three
/// named statuses. There are no other cases, so every consumer can
/// match exhaustively.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Guess {
    /// The participant has not guessed yet this round, but its guess
    /// will eventually be recorded. While a participant is choosing,
    /// its own slot reads as `Pending`.
    Pending,
    /// The participant is out of the game; its stock dropped to zero.
    NotPlaying,
    /// The participant made an invalid guess this round. An invalid
    /// slot cannot win.
    Invalid,
    /// A recorded guess, guaranteed to be at most the pot.
    Value(Tokens),
}

impl Guess {
    /// The concrete value, if one was recorded.
    #[must_use]
    pub fn value(self) -> Option<Tokens> {
        match self {
            Self::Value(v) => Some(v),
            Self::Pending | Self::NotPlaying | Self::Invalid => None,
        }
    }

    #[must_use]
    pub fn is_not_playing(self) -> bool {
        self == Self::NotPlaying
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Pending => "pending",
            Self::NotPlaying => "not playing",
            Self::Invalid => "invalid",
            Self::Value(v) => return write!(f, "{v}"),
        };
        write!(f, "{repr}")
    }
}

/// Why the engine refused a guess.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GuessProblem {
    /// Negative guesses are deemed wrong outright.
    Negative,
    /// The guess exceeded the tokens left on the table.
    OverPot { pot: Tokens },
    /// Another participant already guessed the same value this round.
    /// The earlier guess stands; only the later duplicate is penalized.
    Duplicate { held_by: Handle },
}

impl fmt::Display for GuessProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "negative guesses are deemed wrong"),
            Self::OverPot { pot } => write!(f, "only {pot} tokens left on the table"),
            Self::Duplicate { held_by } => {
                write!(f, "seat {held_by} already guessed that value")
            }
        }
    }
}

/// Events that occur during gameplay.
///
/// Events give more insight as to what kind of game updates occur due to
/// participant choices or state transitions. They are buffered in the
/// game data and drained by whoever is driving the engine.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    RoundStarted { round: u32, pot: Tokens },
    HandCoerced { seat: Handle, submitted: i64, stock: Tokens },
    GuessRejected { seat: Handle, submitted: i64, problem: GuessProblem },
    RoundWon { seat: Handle, hand_sum: Tokens },
    NoWinner { hand_sum: Tokens },
    Eliminated { seat: Handle },
    GameEnded { loser: Handle },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoundStarted { round, pot } => {
                format!("round {round}: {pot} tokens on the table")
            }
            Self::HandCoerced {
                seat,
                submitted,
                stock,
            } => {
                format!("seat {seat} played {submitted} with {stock} in stock, hand reset to 0")
            }
            Self::GuessRejected {
                seat,
                submitted,
                problem,
            } => format!("seat {seat} guessed {submitted}: {problem}"),
            Self::RoundWon { seat, hand_sum } => {
                format!("seat {seat} guessed the hand total ({hand_sum})")
            }
            Self::NoWinner { hand_sum } => {
                format!("no one guessed the hand total ({hand_sum})")
            }
            Self::Eliminated { seat } => {
                format!("seat {seat} is out of tokens and leaves the game")
            }
            Self::GameEnded { loser } => format!("game over: seat {loser} loses"),
        };
        write!(f, "{repr}")
    }
}

/// Game configuration settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    /// Tokens each participant starts with. Must be positive.
    pub initial_stock: Tokens,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(constants::DEFAULT_INITIAL_STOCK)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(initial_stock: Tokens) -> Self {
        Self { initial_stock }
    }
}

/// The final ranking of a finished game.
///
/// Handles appear in elimination order: index 0 is the first seat whose
/// stock reached zero, and the last entry is the sole survivor, the
/// loser of the game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ranking {
    order: Vec<Handle>,
}

impl Ranking {
    pub(crate) fn new(order: Vec<Handle>) -> Self {
        Self { order }
    }

    /// Handles in elimination order, loser last.
    #[must_use]
    pub fn order(&self) -> &[Handle] {
        &self.order
    }

    /// The seat left holding tokens once everyone else was out.
    #[must_use]
    pub fn loser(&self) -> Option<Handle> {
        self.order.last().copied()
    }

    /// A seat's position in the elimination order, 0 being the first
    /// seat eliminated.
    #[must_use]
    pub fn placement(&self, seat: Handle) -> Option<usize> {
        self.order.iter().position(|&h| h == seat)
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .order
            .iter()
            .map(|h| format!("P{h}"))
            .collect::<Vec<_>>()
            .join(" > ");
        write!(f, "{repr}")
    }
}
