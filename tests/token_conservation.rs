//! Token conservation tests for whole games.
//!
//! The pot is defined as the sum of all stocks, and settlement must
//! keep the two in lockstep: every round either changes nothing or
//! removes exactly one token from both a stock and the pot. These tests
//! drive full games and check the bookkeeping after every settlement.

use porrinha::participant::Random;
use porrinha::{
    GameSettings, GameStateManagement, Guess, Participant, PorrinhaState, Tokens,
};

/// Games with random participants end quickly in practice; this cap
/// only exists so a regression cannot hang the suite.
const MAX_STEPS: usize = 1_000_000;

fn random_seats(n: usize) -> Vec<Box<dyn Participant>> {
    (0..n)
        .map(|i| Box::new(Random::new(format!("random{i}"))) as Box<dyn Participant>)
        .collect()
}

fn assert_invariants(state: &PorrinhaState, participants: usize, initial_stock: Tokens) {
    let view = state.view();

    let stock_sum: Tokens = view.stocks().iter().sum();
    assert_eq!(
        stock_sum,
        view.pot(),
        "{participants} players x {initial_stock} tokens: stocks sum to {stock_sum} \
         but the pot says {}",
        view.pot()
    );

    // Recorded guesses were validated against the pot as of guess
    // collection; a winning settlement has since removed one token.
    let guess_ceiling = if view.last_winner().is_some() {
        view.pot() + 1
    } else {
        view.pot()
    };
    for (seat, &guess) in view.guesses().iter().enumerate() {
        match guess {
            Guess::Pending | Guess::NotPlaying | Guess::Invalid => {}
            Guess::Value(v) => assert!(
                v <= guess_ceiling,
                "seat {seat} holds recorded guess {v} above the guess-time \
                 pot {guess_ceiling}"
            ),
        }
    }

    // A seat is active exactly while its stock is positive.
    let starting = view.starting_player();
    assert!(starting < participants);
    assert!(
        view.stocks()[starting] > 0,
        "starting player {starting} is eliminated"
    );
}

#[test]
fn test_conservation_across_random_games() {
    let test_cases = vec![(2, 1), (2, 3), (3, 2), (4, 3), (5, 1), (6, 4)];

    for (participants, initial_stock) in test_cases {
        let seats = random_seats(participants);
        let mut state =
            PorrinhaState::new(seats, GameSettings::new(initial_stock)).unwrap();

        let mut steps = 0;
        while !state.is_over() {
            state = state.step();
            steps += 1;
            assert!(
                steps < MAX_STEPS,
                "{participants} players x {initial_stock} tokens: game did not end"
            );
            if matches!(state, PorrinhaState::Notifying(_)) {
                assert_invariants(&state, participants, initial_stock);
            }
        }
    }
}

#[test]
fn test_final_ranking_is_a_permutation() {
    let test_cases = vec![(2, 2), (3, 1), (4, 2), (5, 3)];

    for (participants, initial_stock) in test_cases {
        let seats = random_seats(participants);
        let ranking =
            porrinha::run_game(seats, GameSettings::new(initial_stock)).unwrap();

        assert_eq!(ranking.order().len(), participants);
        let mut seen = vec![false; participants];
        for &seat in ranking.order() {
            assert!(!seen[seat], "seat {seat} ranked twice");
            seen[seat] = true;
        }
    }
}

#[test]
fn test_loser_keeps_its_remaining_tokens() {
    // Everyone else spent their way out one token at a time, so the
    // loser holds the whole remaining pot.
    let participants = 3;
    let seats = random_seats(participants);
    let mut state = PorrinhaState::new(seats, GameSettings::new(2)).unwrap();
    let mut steps = 0;
    while !state.is_over() {
        state = state.step();
        steps += 1;
        assert!(steps < MAX_STEPS);
    }
    let view = state.view();
    let loser = view.starting_player();
    assert_eq!(view.stock(loser), Ok(view.pot()));
    assert!(view.pot() > 0);
}
