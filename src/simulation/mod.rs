pub mod decisions;
pub mod engine;
pub mod stats;

pub use decisions::{DecisionEngine, DiscardPolicy};
pub use engine::{play_game, GameReport, Outcome};
pub use stats::{simulate, simulate_with, SimulationSummary};
