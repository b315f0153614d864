pub mod snapshot;
pub mod state;
pub mod zones;

pub use snapshot::{CardView, Snapshot};
pub use state::{AttackMode, AttackReport, EnemyCheck, GameSession, Phase};
pub use zones::{Deck, EnemyRow, Hand};
