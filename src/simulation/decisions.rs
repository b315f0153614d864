use crate::card::ANCHOR_ID;
use crate::game::GameSession;
use crate::rng::GameRng;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which non-anchor card the autoplayer gives up after a win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiscardPolicy {
    /// Lowest value in the hand
    #[default]
    Lowest,
    /// Highest value in the hand
    Highest,
    /// Uniformly random
    Random,
}

impl fmt::Display for DiscardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardPolicy::Lowest => write!(f, "lowest"),
            DiscardPolicy::Highest => write!(f, "highest"),
            DiscardPolicy::Random => write!(f, "random"),
        }
    }
}

/// Decision engine for the autoplayer
pub struct DecisionEngine;

impl DecisionEngine {
    /// Pick the enemy to attack: the first defeatable king, else the first
    /// defeatable enemy in row order. None means the hand is stuck.
    pub fn choose_enemy(session: &GameSession) -> Option<usize> {
        let row = session.enemies().cards();
        let (kings, others): (Vec<usize>, Vec<usize>) =
            (0..row.len()).partition(|&i| row[i].card.is_any_king());

        kings.into_iter().chain(others).find(|&i| {
            session
                .check_enemy(i)
                .map(|check| check.solution.is_some())
                .unwrap_or(false)
        })
    }

    /// Pick a hand index to discard. Ties go to the earliest card.
    pub fn choose_discard(session: &GameSession, policy: DiscardPolicy, rng: &mut GameRng) -> Option<usize> {
        let hand = session.hand();
        let candidates: Vec<(usize, u32)> = hand
            .cards()
            .iter()
            .zip(hand.values())
            .enumerate()
            .filter(|(_, (slot, _))| slot.id != ANCHOR_ID)
            .map(|(idx, (_, value))| (idx, value))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        match policy {
            DiscardPolicy::Lowest => candidates
                .iter()
                .fold(None, |best: Option<(usize, u32)>, &(idx, value)| match best {
                    Some((_, v)) if v <= value => best,
                    _ => Some((idx, value)),
                })
                .map(|(idx, _)| idx),
            DiscardPolicy::Highest => candidates
                .iter()
                .fold(None, |best: Option<(usize, u32)>, &(idx, value)| match best {
                    Some((_, v)) if v >= value => best,
                    _ => Some((idx, value)),
                })
                .map(|(idx, _)| idx),
            DiscardPolicy::Random => Some(candidates[rng.random_range(candidates.len())].0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{slot_for, Card, CardSlot, Suit};
    use crate::config::RulesConfig;

    fn card(suit: Suit, rank: u8) -> CardSlot {
        slot_for(Card::standard(suit, rank))
    }

    fn session(hand: Vec<CardSlot>, enemies: Vec<CardSlot>) -> GameSession {
        GameSession::arranged(RulesConfig::default(), vec![], hand, enemies, 0).unwrap()
    }

    #[test]
    fn test_kings_come_first() {
        let s = session(
            vec![card(Suit::Spade, 13), card(Suit::Heart, 6), card(Suit::Heart, 7)],
            vec![card(Suit::Club, 1), card(Suit::Club, 13)],
        );
        assert_eq!(DecisionEngine::choose_enemy(&s), Some(1));
    }

    #[test]
    fn test_skips_undefeatable() {
        let s = session(
            vec![card(Suit::Spade, 13), card(Suit::Heart, 1), card(Suit::Heart, 2)],
            vec![card(Suit::Club, 9), card(Suit::Club, 3)],
        );
        assert_eq!(DecisionEngine::choose_enemy(&s), Some(1));

        let stuck = session(
            vec![card(Suit::Spade, 13), card(Suit::Heart, 1), card(Suit::Heart, 2)],
            vec![card(Suit::Club, 9)],
        );
        assert_eq!(DecisionEngine::choose_enemy(&stuck), None);
    }

    #[test]
    fn test_discard_policies() {
        let s = session(
            vec![
                card(Suit::Spade, 13),
                card(Suit::Heart, 5),
                card(Suit::Heart, 2),
                card(Suit::Club, 12),
                card(Suit::Club, 2),
            ],
            vec![],
        );
        let mut rng = GameRng::new(Some(4));
        assert_eq!(DecisionEngine::choose_discard(&s, DiscardPolicy::Lowest, &mut rng), Some(2));
        assert_eq!(DecisionEngine::choose_discard(&s, DiscardPolicy::Highest, &mut rng), Some(3));
        for _ in 0..20 {
            let idx = DecisionEngine::choose_discard(&s, DiscardPolicy::Random, &mut rng).unwrap();
            assert_ne!(idx, 0);
            assert!(idx < 5);
        }
    }
}
