pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod rng;
pub mod session;
pub mod simulation;
pub mod solver;

pub use error::{ErrorKind, GameError};
pub use game::{AttackMode, GameSession, Snapshot};
pub use session::{SessionId, SessionRegistry};

#[cfg(test)]
mod integration_tests;
