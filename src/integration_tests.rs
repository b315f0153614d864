//! Integration tests for the Heartless King engine
//! Drives whole games through the session registry and checks the rules hold

use crate::card::{slot_for, Card, CardSlot, Suit, WildcardSize, ANCHOR_ID, FULL_SET_SIZE};
use crate::config::RulesConfig;
use crate::error::ErrorKind;
use crate::game::{AttackMode, GameSession, Phase};
use crate::rng::GameRng;
use crate::session::SessionRegistry;
use crate::simulation::{play_game, DecisionEngine, DiscardPolicy, Outcome};

fn card(suit: Suit, rank: u8) -> CardSlot {
    slot_for(Card::standard(suit, rank))
}

fn anchor() -> CardSlot {
    card(Suit::Spade, 13)
}

fn assert_conserved(session: &GameSession, discarded: usize) {
    let total = session.deck().size() + session.hand().size() + session.enemies().size() + discarded;
    assert_eq!(total, FULL_SET_SIZE, "cards were lost or duplicated");
    let anchors = session.hand().cards().iter().filter(|s| s.id == ANCHOR_ID).count();
    assert_eq!(anchors, 1, "hand must keep exactly one anchor");
}

#[test]
fn test_full_games_keep_invariants() {
    let rules = RulesConfig::default();
    for seed in 0..15 {
        let mut rng = GameRng::new(Some(seed));
        let mut session = GameSession::start(rules, &mut rng);
        let mut discarded = 0;
        assert_conserved(&session, discarded);

        while !session.is_over() {
            if session.discard_pending() {
                let index = DecisionEngine::choose_discard(&session, DiscardPolicy::Lowest, &mut rng).unwrap();
                session.discard(index).unwrap();
                discarded += 1;
                assert_eq!(session.hand().size(), rules.hand_size());
            } else {
                let Some(index) = DecisionEngine::choose_enemy(&session) else {
                    break;
                };
                let kings_before = session.kings_defeated();
                let enemy = session.enemies().cards()[index];
                let report = session.attack(index, AttackMode::Auto).unwrap();

                assert_eq!(report.defeated, enemy);
                assert_eq!(session.hand().cards().last(), Some(&enemy));
                let expected = kings_before + u8::from(enemy.card.is_any_king());
                assert_eq!(session.kings_defeated(), expected);
                assert!(session.enemies().size() == rules.enemy_row_size || session.deck().is_empty());
            }
            assert_conserved(&session, discarded);
        }

        if session.is_victory() {
            assert_eq!(session.kings_defeated(), rules.kings_to_win);
            assert!(!session.discard_pending());
        }
    }
}

#[test]
fn test_same_seed_produces_same_game() {
    let rules = RulesConfig::default();
    let a = play_game(54321, rules, DiscardPolicy::Random);
    let b = play_game(54321, rules, DiscardPolicy::Random);
    assert_eq!(a, b);
}

#[test]
fn test_anchor_excluded_when_possible() {
    let session = GameSession::arranged(
        RulesConfig::default(),
        vec![],
        vec![anchor(), card(Suit::Heart, 5), card(Suit::Heart, 3), card(Suit::Heart, 2)],
        vec![card(Suit::Club, 10)],
        0,
    )
    .unwrap();
    let check = session.check_enemy(0).unwrap();
    let solution = check.solution.unwrap();
    assert_eq!(solution.expression, "((5 + 3) + 2)");
    assert!(!solution.used_exempt);
}

fn five_three_against(enemy: CardSlot) -> GameSession {
    GameSession::arranged(
        RulesConfig::default(),
        vec![],
        vec![anchor(), card(Suit::Heart, 5), card(Suit::Heart, 3)],
        vec![enemy],
        0,
    )
    .unwrap()
}

#[test]
fn test_anchor_joins_when_hand_falls_short() {
    // 5 and 3 alone never make 11
    let mut session = five_three_against(card(Suit::Club, 11));
    let solution = session.check_enemy(0).unwrap().solution.unwrap();
    assert!(solution.used_exempt);
    assert!((solution.result - 11.0).abs() < 1e-9);

    let report = session.attack(0, AttackMode::Auto).unwrap();
    assert!(report.used_anchor);
    assert_eq!(report.target, 11);

    let mut manual = five_three_against(card(Suit::Club, 11));
    let report = manual
        .attack(0, AttackMode::Manual("13 - 5 + 3".to_string()))
        .unwrap();
    assert!(report.used_anchor);
}

#[test]
fn test_manual_attack_may_skip_anchor() {
    let mut session = five_three_against(card(Suit::Club, 8));
    let report = session
        .attack(0, AttackMode::Manual("5 + 3".to_string()))
        .unwrap();
    assert!(!report.used_anchor);
    assert_eq!(session.phase(), Phase::Over { victory: false });
}

#[test]
fn test_big_wildcard_takes_row_maximum() {
    let session = GameSession::arranged(
        RulesConfig::default(),
        vec![],
        vec![anchor(), card(Suit::Heart, 5)],
        vec![
            card(Suit::Heart, 7),
            slot_for(Card::wildcard(WildcardSize::Big)),
            card(Suit::Club, 2),
        ],
        0,
    )
    .unwrap();
    assert_eq!(session.enemy_target(1).unwrap(), 7);
    assert_eq!(session.snapshot().enemy_values, vec![7, 7, 2]);
}

#[test]
fn test_registry_round_trip() {
    let mut registry = SessionRegistry::with_seed(RulesConfig::default(), Some(2024));
    let (id, start) = registry.new_session(Some(31));
    assert_eq!(start.phase, Phase::Active);

    let found = (0..start.enemy_row.len()).find_map(|i| {
        let check = registry.check_enemy(id, i).unwrap();
        check.expression.map(|expr| (i, expr))
    });
    let Some((index, expression)) = found else {
        // Nothing defeatable: attacks must fail and leave the state alone
        let err = registry.attack(id, 0, AttackMode::Auto).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSolutionFound);
        assert_eq!(registry.get_state(id).unwrap(), start);
        return;
    };

    let report = registry.validate_expression(id, index, &expression).unwrap();
    assert!(report.valid);
    assert_eq!(registry.get_state(id).unwrap(), start);

    let after = registry
        .attack(id, index, AttackMode::Manual(expression))
        .unwrap();
    assert_eq!(after.hand.len(), 6);
    assert_eq!(after.hand.last().map(|c| c.id), Some(start.enemy_row[index].id));

    if after.discard_pending {
        let anchor_index = after.hand.iter().position(|c| c.is_anchor).unwrap();
        let err = registry.discard(id, anchor_index).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotDiscardable);
        assert_eq!(registry.get_state(id).unwrap(), after);

        let done = registry.discard(id, 5).unwrap();
        assert_eq!(done.hand.len(), 5);
        assert!(!done.discard_pending);
    }
}

#[test]
fn test_batch_outcomes_are_classified() {
    let rules = RulesConfig {
        kings_to_win: 1,
        ..RulesConfig::default()
    };
    for seed in 0..10 {
        let report = play_game(seed, rules, DiscardPolicy::Highest);
        match report.outcome {
            Outcome::Victory => assert_eq!(report.kings_defeated, 1),
            Outcome::Stalemate | Outcome::Stuck => assert_eq!(report.kings_defeated, 0),
        }
    }
}
