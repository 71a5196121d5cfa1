//! Ready-made participant implementations.
//!
//! `Scripted` replays fixed hand and guess sequences and is the
//! workhorse of the engine's tests; `Random` plays legally but without
//! any strategy, which is all a simulation needs to exercise whole
//! games end to end.

use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::VecDeque;

use super::Participant;
use crate::game::entities::Handle;
use crate::game::view::TableView;

/// Replays fixed hand and guess scripts, one entry per round.
///
/// Once a script runs out the participant keeps playing 0s, which are
/// always legal hands and frequently duplicate guesses, so exhausted
/// scripts drift toward losing rather than stalling a game.
#[derive(Debug)]
pub struct Scripted {
    name: String,
    hands: VecDeque<i64>,
    guesses: VecDeque<i64>,
}

impl Scripted {
    #[must_use]
    pub fn new(name: impl Into<String>, hands: &[i64], guesses: &[i64]) -> Self {
        Self {
            name: name.into(),
            hands: hands.iter().copied().collect(),
            guesses: guesses.iter().copied().collect(),
        }
    }
}

impl Participant for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn hand(&mut self, _seat: Handle, _view: &TableView) -> i64 {
        self.hands.pop_front().unwrap_or(0)
    }

    fn guess(&mut self, _seat: Handle, _view: &TableView) -> i64 {
        self.guesses.pop_front().unwrap_or(0)
    }
}

/// Plays a uniformly random hand and a random valid guess.
pub struct Random {
    name: String,
    rng: ThreadRng,
}

impl Random {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: rand::rng(),
        }
    }
}

impl Participant for Random {
    fn name(&self) -> &str {
        &self.name
    }

    fn hand(&mut self, seat: Handle, view: &TableView) -> i64 {
        let stock = view.stock(seat).unwrap_or(0);
        i64::from(self.rng.random_range(0..=stock))
    }

    fn guess(&mut self, _seat: Handle, view: &TableView) -> i64 {
        let candidates: Vec<i64> = (0..=i64::from(view.pot()))
            .filter(|&v| view.valid_guess(v))
            .collect();
        if candidates.is_empty() {
            // Not reachable with fewer guessers than pot + 1 values,
            // but a wrong guess beats a panic.
            return 0;
        }
        candidates[self.rng.random_range(0..candidates.len())]
    }
}
