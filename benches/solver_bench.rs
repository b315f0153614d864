use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heartless_king::card::CardId;
use heartless_king::config::RulesConfig;
use heartless_king::simulation::{play_game, DiscardPolicy};
use heartless_king::solver::{reachable_values, Solver, SolverValue};

fn hand(values: &[f64]) -> Vec<SolverValue> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| SolverValue::new(v, CardId(i as u8)))
        .collect()
}

fn benchmark_solve_found(c: &mut Criterion) {
    let solver = Solver::default();
    let values = hand(&[13.0, 5.0, 3.0, 2.0, 9.0]);

    c.bench_function("solve_five_found", |b| {
        b.iter(|| solver.solve(black_box(&values), black_box(12.0), Some(CardId(0))))
    });
}

fn benchmark_solve_unreachable(c: &mut Criterion) {
    let solver = Solver::default();
    let values = hand(&[13.0, 1.0, 1.0, 1.0, 1.0]);

    c.bench_function("solve_five_unreachable", |b| {
        b.iter(|| solver.solve(black_box(&values), black_box(97.0), Some(CardId(0))))
    });
}

fn benchmark_reachability(c: &mut Criterion) {
    c.bench_function("reachable_values_six", |b| {
        b.iter(|| reachable_values(black_box(&[13.0, 7.0, 5.0, 3.0, 2.0, 1.0])))
    });
}

fn benchmark_autoplay_game(c: &mut Criterion) {
    let rules = RulesConfig::default();

    c.bench_function("autoplay_game_seed_12345", |b| {
        b.iter(|| play_game(black_box(12345), rules, DiscardPolicy::Lowest))
    });
}

criterion_group!(
    benches,
    benchmark_solve_found,
    benchmark_solve_unreachable,
    benchmark_reachability,
    benchmark_autoplay_game
);
criterion_main!(benches);
