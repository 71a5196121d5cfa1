use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use porrinha::participant::{Random, Scripted};
use porrinha::{GameSettings, Participant, PorrinhaState, run_game};

fn random_seats(n: usize) -> Vec<Box<dyn Participant>> {
    (0..n)
        .map(|i| Box::new(Random::new(format!("random{i}"))) as Box<dyn Participant>)
        .collect()
}

/// Benchmark a full game of random participants at various table sizes.
fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game_random");
    for participants in [2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, &n| {
                b.iter(|| {
                    run_game(random_seats(n), GameSettings::default()).unwrap()
                });
            },
        );
    }
    group.finish();
}

/// Benchmark a single round of the state machine with scripted seats,
/// isolating the per-phase overhead from participant decision time.
fn bench_single_round(c: &mut Criterion) {
    c.bench_function("single_round_scripted", |b| {
        b.iter(|| {
            let seats: Vec<Box<dyn Participant>> = vec![
                Box::new(Scripted::new("a", &[1], &[0])),
                Box::new(Scripted::new("b", &[1], &[1])),
                Box::new(Scripted::new("c", &[1], &[4])),
            ];
            let mut state = PorrinhaState::new(seats, GameSettings::default()).unwrap();
            for _ in 0..3 {
                state = state.step();
            }
            state
        });
    });
}

criterion_group!(benches, bench_full_game, bench_single_round);
criterion_main!(benches);
