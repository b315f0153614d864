use crate::config::RulesConfig;
use crate::game::{AttackMode, GameSession};
use crate::rng::GameRng;
use crate::simulation::decisions::{DecisionEngine, DiscardPolicy};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// How an autoplayed game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every required king fell
    Victory,
    /// Enemy row and deck ran out first
    Stalemate,
    /// No enemy on the row could be defeated
    Stuck,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Victory => write!(f, "Victory"),
            Outcome::Stalemate => write!(f, "Stalemate"),
            Outcome::Stuck => write!(f, "Stuck"),
        }
    }
}

/// Result of a single autoplayed game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReport {
    pub seed: u64,
    pub outcome: Outcome,
    /// Successful attacks
    pub turns: u32,
    pub kings_defeated: u8,
    /// Attacks whose expression used the anchor
    pub anchor_uses: u32,
    pub deck_left: usize,
}

/// Play one game to the end with the solver choosing every attack
pub fn play_game(seed: u64, rules: RulesConfig, policy: DiscardPolicy) -> GameReport {
    let mut rng = GameRng::new(Some(seed));
    let mut session = GameSession::start(rules, &mut rng);
    let mut anchor_uses = 0;

    let outcome = loop {
        if session.is_over() {
            break if session.is_victory() {
                Outcome::Victory
            } else {
                Outcome::Stalemate
            };
        }

        if session.discard_pending() {
            let Some(index) = DecisionEngine::choose_discard(&session, policy, &mut rng) else {
                break Outcome::Stuck;
            };
            if session.discard(index).is_err() {
                break Outcome::Stuck;
            }
            continue;
        }

        let Some(index) = DecisionEngine::choose_enemy(&session) else {
            break Outcome::Stuck;
        };
        match session.attack(index, AttackMode::Auto) {
            Ok(report) => {
                if report.used_anchor {
                    anchor_uses += 1;
                }
            }
            Err(_) => break Outcome::Stuck,
        }
    };

    debug!(seed, %outcome, turns = session.attacks(), "autoplay finished");

    GameReport {
        seed,
        outcome,
        turns: session.attacks(),
        kings_defeated: session.kings_defeated(),
        anchor_uses,
        deck_left: session.deck().size(),
    }
}
