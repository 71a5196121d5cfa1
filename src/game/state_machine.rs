//! The round state machine and the game data it drives.
//!
//! One round is a fixed sequence of phases. Each phase is a typestate of
//! [`Game`], each transition is a `From` impl that performs that phase's
//! work, and [`PorrinhaState`] is the enum that owns whichever phase the
//! game is currently in. The terminal condition (fewer than two active
//! seats) is checked only between rounds.

use enum_dispatch::enum_dispatch;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use super::constants::MIN_PARTICIPANTS;
use super::entities::{GameEvent, GameSettings, Guess, GuessProblem, Handle, Ranking, Tokens};
use super::states::{CollectingGuesses, CollectingHands, GameOver, Notifying, Settling};
use super::view::TableView;
use crate::participant::Participant;

/// Errors reported to the caller before or instead of running a game.
///
/// Participant misbehavior is never an error: malformed hands and
/// guesses are sanitized locally so the simulation always makes
/// progress.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("need {needed}+ participants, have {current}")]
    NotEnoughParticipants { needed: usize, current: usize },
    #[error("initial stock must be positive and the pot must fit in a token count")]
    InvalidInitialStock,
    #[error("no seat at handle {0}")]
    InvalidHandle(Handle),
}

/// Mutable record of one game in progress.
///
/// Owned by the engine for the lifetime of one game and mutated only by
/// the phase transitions; participants observe it through [`TableView`].
#[derive(Debug, PartialEq)]
pub struct GameData {
    /// Tokens each seat still holds.
    pub(super) stocks: Vec<Tokens>,
    /// Sum of all stocks. The correct guess can never exceed this.
    pub(super) pot: Tokens,
    /// Seats still playing.
    pub(super) active_count: usize,
    /// Seat that opens the current round.
    pub(super) starting_player: Handle,
    /// Winner of the last settled round, if anyone guessed right.
    pub(super) last_winner: Option<Handle>,
    /// Hands committed this round, by seat.
    pub(super) current_hand: Vec<Tokens>,
    /// Hands of the previous settled round. `None` for seats that did
    /// not play it (not yet, or eliminated earlier).
    pub(super) last_hand: Vec<Option<Tokens>>,
    /// Sum of `current_hand`; the value a correct guess must hit.
    pub(super) hand_sum: Tokens,
    /// Guess slots for the round in progress.
    pub(super) guesses: Vec<Guess>,
    /// Initial guess vector for each round: `Pending` for live seats,
    /// flipped to `NotPlaying` as seats are eliminated.
    pub(super) guess_template: Vec<Guess>,
    /// Seats in the order their stock reached zero. At game end the
    /// survivor is appended, making this the final ranking.
    pub(super) elimination_order: Vec<Handle>,
    /// Round counter, starting at 1.
    pub(super) round: u32,
    /// Buffered gameplay events, drained by the engine's driver.
    pub(super) events: VecDeque<GameEvent>,
    settings: GameSettings,
}

impl GameData {
    /// Fresh game data for `participant_count` seats. Fully derived
    /// from its two inputs; nothing carries over between games.
    #[must_use]
    pub fn new(participant_count: usize, settings: GameSettings) -> Self {
        let pot = settings.initial_stock * participant_count as Tokens;
        let guess_template = vec![Guess::Pending; participant_count];
        let mut data = Self {
            stocks: vec![settings.initial_stock; participant_count],
            pot,
            active_count: participant_count,
            starting_player: 0,
            last_winner: None,
            current_hand: vec![0; participant_count],
            last_hand: vec![None; participant_count],
            hand_sum: 0,
            guesses: guess_template.clone(),
            guess_template,
            elimination_order: Vec::new(),
            round: 1,
            events: VecDeque::new(),
            settings,
        };
        data.push_event(GameEvent::RoundStarted { round: 1, pot });
        data
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Moves `starting_player` forward (at least one step, wrapping) to
    /// the next seat that is still playing. Requires at least one
    /// active seat, which the terminal condition guarantees.
    fn advance_starting_player(&mut self) {
        let n = self.guess_template.len();
        loop {
            self.starting_player = (self.starting_player + 1) % n;
            if self.guess_template[self.starting_player] != Guess::NotPlaying {
                break;
            }
        }
    }
}

/// A porrinha game: the data, the seated participants, and the current
/// phase. The engine only ever talks to participants through the
/// [`Participant`] contract, one blocking callback at a time.
pub struct Game<T> {
    pub(super) data: GameData,
    pub(super) seats: Vec<Box<dyn Participant>>,
    pub state: T,
}

impl<T> Game<T> {
    /// Rotation order for the current round: every seat index once,
    /// starting at the starting player and wrapping.
    fn rotation(&self) -> Vec<Handle> {
        let n = self.seats.len();
        let start = self.data.starting_player;
        (0..n).map(|i| (start + i) % n).collect()
    }
}

/// Operations available in every phase.
#[enum_dispatch]
pub trait GameStateManagement {
    /// Take the buffered gameplay events.
    fn drain_events(&mut self) -> VecDeque<GameEvent>;

    /// Read-only view over the game, for tooling between steps.
    fn view(&self) -> TableView<'_>;
}

impl<T> GameStateManagement for Game<T> {
    fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.data.events)
    }

    fn view(&self) -> TableView<'_> {
        TableView::new(&self.data)
    }
}

// === Phase transitions ===
//
// Each `From` impl performs the work of the phase being left.

/// Hand phase: collect and sanitize every active seat's hand.
impl From<Game<CollectingHands>> for Game<CollectingGuesses> {
    fn from(mut value: Game<CollectingHands>) -> Self {
        for p in value.rotation() {
            if value.data.guesses[p].is_not_playing() {
                continue;
            }
            let submitted = {
                let view = TableView::new(&value.data);
                value.seats[p].hand(p, &view)
            };
            let stock = value.data.stocks[p];
            let hand = if submitted < 0 || submitted > i64::from(stock) {
                warn!(
                    "participant {} (seat {p}) chose {submitted} tokens as its hand \
                     despite having only {stock} left, resetting its hand to 0",
                    value.seats[p].name()
                );
                value
                    .data
                    .push_event(GameEvent::HandCoerced { seat: p, submitted, stock });
                0
            } else {
                submitted as Tokens
            };
            value.data.current_hand[p] = hand;
            value.data.hand_sum += hand;
        }
        Self {
            data: value.data,
            seats: value.seats,
            state: CollectingGuesses {},
        }
    }
}

/// Guess phase: collect and validate guesses, remembering the winner.
///
/// Validation order matters: negative, over the pot, duplicate. On a
/// duplicate only the later guess in rotation order is invalidated; the
/// earlier one stands. Every correct guess overwrites the winner, so
/// when several seats are correct the last one in rotation order is
/// recorded. Both asymmetries are the game's actual policy.
impl From<Game<CollectingGuesses>> for Game<Settling> {
    fn from(mut value: Game<CollectingGuesses>) -> Self {
        let mut winner = None;
        for p in value.rotation() {
            if value.data.guesses[p].is_not_playing() {
                continue;
            }
            let submitted = {
                let view = TableView::new(&value.data);
                value.seats[p].guess(p, &view)
            };
            let pot = value.data.pot;
            if submitted < 0 {
                warn!(
                    "participant {} (seat {p}) stupidly guessed {submitted}, \
                     it is deemed to be wrong",
                    value.seats[p].name()
                );
                value.data.guesses[p] = Guess::Invalid;
                value.data.push_event(GameEvent::GuessRejected {
                    seat: p,
                    submitted,
                    problem: GuessProblem::Negative,
                });
                continue;
            }
            if submitted > i64::from(pot) {
                warn!(
                    "participant {} (seat {p}) stupidly guessed {submitted} despite \
                     having only {pot} tokens left on the table",
                    value.seats[p].name()
                );
                value.data.guesses[p] = Guess::Invalid;
                value.data.push_event(GameEvent::GuessRejected {
                    seat: p,
                    submitted,
                    problem: GuessProblem::OverPot { pot },
                });
                continue;
            }
            let v = submitted as Tokens;
            let duplicate = (0..value.data.guesses.len())
                .find(|&j| j != p && value.data.guesses[j] == Guess::Value(v));
            if let Some(held_by) = duplicate {
                warn!(
                    "participant {} (seat {p}) guessed {v}, the same value seat \
                     {held_by} guessed; resetting its guess as a penalty",
                    value.seats[p].name()
                );
                value.data.guesses[p] = Guess::Invalid;
                value.data.push_event(GameEvent::GuessRejected {
                    seat: p,
                    submitted,
                    problem: GuessProblem::Duplicate { held_by },
                });
                continue;
            }
            value.data.guesses[p] = Guess::Value(v);
            // Easier to do the winner test now than to loop through the
            // vector again.
            if v == value.data.hand_sum {
                winner = Some(p);
            }
        }
        Self {
            data: value.data,
            seats: value.seats,
            state: Settling { winner },
        }
    }
}

/// Settlement and notification: spend the winner's token, handle
/// elimination, rotate the starting player, then tell every seat still
/// active how the round went.
impl From<Game<Settling>> for Game<Notifying> {
    fn from(mut value: Game<Settling>) -> Self {
        let winner = value.state.winner;
        value.data.last_winner = winner;
        match winner {
            None => {
                info!(
                    "round {}: no one guessed the hand total ({})",
                    value.data.round, value.data.hand_sum
                );
                value.data.push_event(GameEvent::NoWinner {
                    hand_sum: value.data.hand_sum,
                });
                value.data.advance_starting_player();
            }
            Some(w) => {
                info!(
                    "round {}: participant {} (seat {w}) guessed right ({})",
                    value.data.round,
                    value.seats[w].name(),
                    value.data.hand_sum
                );
                value.data.push_event(GameEvent::RoundWon {
                    seat: w,
                    hand_sum: value.data.hand_sum,
                });
                value.data.pot -= 1;
                value.data.stocks[w] -= 1;
                value.data.starting_player = w;
                if value.data.stocks[w] == 0 {
                    info!(
                        "participant {} (seat {w}) left the game",
                        value.seats[w].name()
                    );
                    value.data.guess_template[w] = Guess::NotPlaying;
                    value.data.elimination_order.push(w);
                    value.data.active_count -= 1;
                    value.data.push_event(GameEvent::Eliminated { seat: w });
                    value.data.advance_starting_player();
                }
            }
        }

        // This round's hands become "last round" before anyone is
        // notified, so end-of-round queries see the round just played.
        // A seat that sat out the round has no last hand.
        for p in 0..value.data.guesses.len() {
            value.data.last_hand[p] = if value.data.guesses[p].is_not_playing() {
                None
            } else {
                Some(value.data.current_hand[p])
            };
        }

        for p in value.rotation() {
            if value.data.guess_template[p].is_not_playing() {
                continue;
            }
            let view = TableView::new(&value.data);
            value.seats[p].end_round(p, &view);
        }
        Self {
            data: value.data,
            seats: value.seats,
            state: Notifying {},
        }
    }
}

/// Next round: reset the per-round scratch from the template.
impl From<Game<Notifying>> for Game<CollectingHands> {
    fn from(mut value: Game<Notifying>) -> Self {
        value.data.round += 1;
        value.data.guesses = value.data.guess_template.clone();
        value.data.current_hand.fill(0);
        value.data.hand_sum = 0;
        value.data.push_event(GameEvent::RoundStarted {
            round: value.data.round,
            pot: value.data.pot,
        });
        Self {
            data: value.data,
            seats: value.seats,
            state: CollectingHands {},
        }
    }
}

/// Game over: the sole survivor is appended to the elimination order as
/// the final (loser) entry.
impl From<Game<Notifying>> for Game<GameOver> {
    fn from(mut value: Game<Notifying>) -> Self {
        let loser = value.data.starting_player;
        info!(
            "game ended; loser: participant {} (seat {loser}), with {} tokens",
            value.seats[loser].name(),
            value.data.stocks[loser]
        );
        value.data.elimination_order.push(loser);
        value.data.push_event(GameEvent::GameEnded { loser });
        Self {
            data: value.data,
            seats: value.seats,
            state: GameOver {},
        }
    }
}

impl Game<GameOver> {
    /// Handles in elimination order, loser last.
    #[must_use]
    pub fn ranking(&self) -> Ranking {
        Ranking::new(self.data.elimination_order.clone())
    }
}

/// A porrinha game in whichever phase it is currently in.
#[enum_dispatch(GameStateManagement)]
pub enum PorrinhaState {
    CollectingHands(Game<CollectingHands>),
    CollectingGuesses(Game<CollectingGuesses>),
    Settling(Game<Settling>),
    Notifying(Game<Notifying>),
    GameOver(Game<GameOver>),
}

impl PorrinhaState {
    /// Seats the participants and enters the first round's hand phase.
    ///
    /// Fails before any round runs if there are fewer than two seats or
    /// the configured stock is zero or too large for the pot to hold.
    /// Every participant is told its handle through `begin_game` before
    /// the first hand is requested.
    pub fn new(
        seats: Vec<Box<dyn Participant>>,
        settings: GameSettings,
    ) -> Result<Self, GameError> {
        if seats.len() < MIN_PARTICIPANTS {
            return Err(GameError::NotEnoughParticipants {
                needed: MIN_PARTICIPANTS,
                current: seats.len(),
            });
        }
        let pot_fits = Tokens::try_from(seats.len())
            .ok()
            .and_then(|n| settings.initial_stock.checked_mul(n));
        if settings.initial_stock == 0 || pot_fits.is_none() {
            return Err(GameError::InvalidInitialStock);
        }
        let data = GameData::new(seats.len(), settings);
        let mut game = Game {
            data,
            seats,
            state: CollectingHands {},
        };
        for p in 0..game.seats.len() {
            let view = TableView::new(&game.data);
            game.seats[p].begin_game(p, &view);
        }
        Ok(Self::CollectingHands(game))
    }

    /// Advances the game by one phase. Stepping a finished game is a
    /// no-op.
    #[must_use]
    pub fn step(self) -> Self {
        match self {
            Self::CollectingHands(game) => Self::CollectingGuesses(game.into()),
            Self::CollectingGuesses(game) => Self::Settling(game.into()),
            Self::Settling(game) => Self::Notifying(game.into()),
            Self::Notifying(game) => {
                if game.data.active_count < MIN_PARTICIPANTS {
                    Self::GameOver(game.into())
                } else {
                    Self::CollectingHands(game.into())
                }
            }
            Self::GameOver(game) => Self::GameOver(game),
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// Runs one game to completion and returns the elimination-order
/// ranking (length = participant count, last entry = loser).
///
/// A participant callback that never returns stalls the simulation;
/// that is a constraint of the cooperative design, not something the
/// engine works around.
pub fn run_game(
    seats: Vec<Box<dyn Participant>>,
    settings: GameSettings,
) -> Result<Ranking, GameError> {
    let mut state = PorrinhaState::new(seats, settings)?;
    loop {
        state = state.step();
        if let PorrinhaState::GameOver(game) = &state {
            return Ok(game.ranking());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::scripted::Scripted;

    fn seats_of(scripts: Vec<Scripted>) -> Vec<Box<dyn Participant>> {
        scripts
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Participant>)
            .collect()
    }

    #[test]
    fn test_init_is_idempotent() {
        let settings = GameSettings::new(2);
        assert_eq!(
            GameData::new(4, settings.clone()),
            GameData::new(4, settings)
        );
    }

    #[test]
    fn test_init_derives_pot_from_inputs() {
        let data = GameData::new(3, GameSettings::new(2));
        assert_eq!(data.pot, 6);
        assert_eq!(data.stocks, vec![2, 2, 2]);
        assert_eq!(data.active_count, 3);
        assert_eq!(data.starting_player, 0);
        assert_eq!(data.last_winner, None);
        assert_eq!(data.guesses, vec![Guess::Pending; 3]);
        assert!(data.elimination_order.is_empty());
    }

    #[test]
    fn test_advance_starting_player_skips_eliminated() {
        let mut data = GameData::new(4, GameSettings::default());
        data.guess_template[1] = Guess::NotPlaying;
        data.guess_template[2] = Guess::NotPlaying;
        data.starting_player = 0;
        data.advance_starting_player();
        assert_eq!(data.starting_player, 3);
        data.advance_starting_player();
        assert_eq!(data.starting_player, 0);
    }

    #[test]
    fn test_advance_always_moves_at_least_one_step() {
        let mut data = GameData::new(2, GameSettings::default());
        data.advance_starting_player();
        assert_eq!(data.starting_player, 1);
    }

    #[test]
    fn test_new_rejects_single_seat() {
        let seats = seats_of(vec![Scripted::new("solo", &[], &[])]);
        let err = PorrinhaState::new(seats, GameSettings::default()).err().unwrap();
        assert_eq!(
            err,
            GameError::NotEnoughParticipants {
                needed: 2,
                current: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_zero_stock() {
        let seats = seats_of(vec![
            Scripted::new("a", &[], &[]),
            Scripted::new("b", &[], &[]),
        ]);
        let err = PorrinhaState::new(seats, GameSettings::new(0)).err().unwrap();
        assert_eq!(err, GameError::InvalidInitialStock);
    }

    #[test]
    fn test_new_rejects_stock_that_overflows_the_pot() {
        let seats = seats_of(vec![
            Scripted::new("a", &[], &[]),
            Scripted::new("b", &[], &[]),
        ]);
        let err = PorrinhaState::new(seats, GameSettings::new(Tokens::MAX))
            .err()
            .unwrap();
        assert_eq!(err, GameError::InvalidInitialStock);
    }

    #[test]
    fn test_malformed_hand_is_coerced_to_zero() {
        // Seat 0 overdraws its stock, seat 1 plays a negative hand.
        // Both are coerced to 0, so the true total is 0 and seat 0's
        // guess of 0 wins.
        let seats = seats_of(vec![
            Scripted::new("a", &[99], &[0]),
            Scripted::new("b", &[-1], &[1]),
        ]);
        let mut state = PorrinhaState::new(seats, GameSettings::new(1)).unwrap();
        state = state.step(); // hands
        state = state.step(); // guesses
        state = state.step(); // settle + notify
        let events = state.drain_events();
        assert!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::HandCoerced { .. }))
                .count()
                == 2
        );
        assert_eq!(state.view().last_winner(), Some(0));
    }

    #[test]
    fn test_winner_spends_one_token() {
        let seats = seats_of(vec![
            Scripted::new("a", &[1], &[2]),
            Scripted::new("b", &[1], &[3]),
        ]);
        let mut state = PorrinhaState::new(seats, GameSettings::new(2)).unwrap();
        for _ in 0..3 {
            state = state.step();
        }
        // hand_sum = 2, seat 0 guessed it.
        let view = state.view();
        assert_eq!(view.last_winner(), Some(0));
        assert_eq!(view.stocks(), &[1, 2]);
        assert_eq!(view.pot(), 3);
        assert_eq!(view.starting_player(), 0);
    }

    #[test]
    fn test_no_winner_leaves_stocks_untouched() {
        let seats = seats_of(vec![
            Scripted::new("a", &[1], &[0]),
            Scripted::new("b", &[1], &[3]),
        ]);
        let mut state = PorrinhaState::new(seats, GameSettings::new(2)).unwrap();
        for _ in 0..3 {
            state = state.step();
        }
        let view = state.view();
        assert_eq!(view.last_winner(), None);
        assert_eq!(view.stocks(), &[2, 2]);
        assert_eq!(view.pot(), 4);
        assert_eq!(view.starting_player(), 1);
    }

    #[test]
    fn test_stepping_a_finished_game_is_a_noop() {
        let seats = seats_of(vec![
            Scripted::new("a", &[0], &[0]),
            Scripted::new("b", &[1], &[1]),
        ]);
        let mut state = PorrinhaState::new(seats, GameSettings::new(1)).unwrap();
        while !state.is_over() {
            state = state.step();
        }
        state = state.step();
        assert!(state.is_over());
    }
}
