//! Batch autoplay and aggregate statistics.

use crate::config::RulesConfig;
use crate::rng::batch_seed;
use crate::simulation::decisions::DiscardPolicy;
use crate::simulation::engine::{play_game, GameReport, Outcome};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate over many games
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub outcomes: BTreeMap<Outcome, usize>,
    pub win_rate: f64,
    pub avg_turns: f64,
    pub avg_win_turns: f64,
    pub avg_kings: f64,
    pub avg_anchor_uses: f64,
    /// Victories keyed by the attack count they took
    pub win_turns: BTreeMap<u32, usize>,
}

impl SimulationSummary {
    pub fn from_reports(reports: &[GameReport]) -> Self {
        if reports.is_empty() {
            return SimulationSummary::default();
        }
        let games = reports.len();

        let mut outcomes = BTreeMap::new();
        let mut win_turns = BTreeMap::new();
        for r in reports {
            *outcomes.entry(r.outcome).or_insert(0) += 1;
            if r.outcome == Outcome::Victory {
                *win_turns.entry(r.turns).or_insert(0) += 1;
            }
        }

        let wins: usize = win_turns.values().sum();
        let avg_win_turns = if wins > 0 {
            win_turns.iter().map(|(t, c)| f64::from(*t) * *c as f64).sum::<f64>() / wins as f64
        } else {
            0.0
        };

        SimulationSummary {
            games,
            win_rate: wins as f64 / games as f64,
            avg_turns: mean(reports, |r| f64::from(r.turns)),
            avg_win_turns,
            avg_kings: mean(reports, |r| f64::from(r.kings_defeated)),
            avg_anchor_uses: mean(reports, |r| f64::from(r.anchor_uses)),
            outcomes,
            win_turns,
        }
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }
}

fn mean(reports: &[GameReport], f: impl Fn(&GameReport) -> f64) -> f64 {
    reports.iter().map(f).sum::<f64>() / reports.len() as f64
}

/// Play `games` games in parallel. Game `i` uses `batch_seed(seed, i)`, so a
/// batch is reproducible regardless of thread scheduling.
pub fn simulate(games: usize, seed: u64, rules: RulesConfig, policy: DiscardPolicy) -> Vec<GameReport> {
    simulate_with(games, seed, rules, policy, |_| {})
}

/// `simulate`, calling `on_game` as each game finishes
pub fn simulate_with<F>(
    games: usize,
    seed: u64,
    rules: RulesConfig,
    policy: DiscardPolicy,
    on_game: F,
) -> Vec<GameReport>
where
    F: Fn(&GameReport) + Sync,
{
    (0..games)
        .into_par_iter()
        .map(|i| {
            let report = play_game(batch_seed(seed, i), rules, policy);
            on_game(&report);
            report
        })
        .collect()
}
