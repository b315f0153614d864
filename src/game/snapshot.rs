use crate::card::{CardId, CardSlot, SuitTag, ANCHOR_ID};
use crate::game::state::{GameSession, Phase};
use serde::Serialize;

/// One card as an adapter renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub suit: SuitTag,
    pub rank: String,
    pub label: String,
    pub big_wildcard: bool,
    pub is_anchor: bool,
    pub is_any_king: bool,
    /// Value in the zone the card sits in
    pub value: u32,
}

impl CardView {
    fn new(slot: &CardSlot, value: u32) -> Self {
        CardView {
            id: slot.id,
            suit: slot.card.suit_tag(),
            rank: slot.card.display_rank(),
            label: slot.card.to_string(),
            big_wildcard: slot.card.is_big_wildcard(),
            is_anchor: slot.id == ANCHOR_ID,
            is_any_king: slot.card.is_any_king(),
            value,
        }
    }
}

/// Read-only picture of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub hand: Vec<CardView>,
    pub enemy_row: Vec<CardView>,
    pub enemy_values: Vec<u32>,
    pub hand_values: Vec<u32>,
    pub kings_defeated: u8,
    pub discard_pending: bool,
    pub over: bool,
    pub victory: bool,
    pub deck_size: usize,
    pub phase: Phase,
}

fn views(cards: &[CardSlot], values: &[u32]) -> Vec<CardView> {
    cards.iter().zip(values).map(|(slot, &v)| CardView::new(slot, v)).collect()
}

impl GameSession {
    pub fn snapshot(&self) -> Snapshot {
        let hand_values = self.hand().values();
        let enemy_values = self.enemies().values();
        Snapshot {
            hand: views(self.hand().cards(), &hand_values),
            enemy_row: views(self.enemies().cards(), &enemy_values),
            enemy_values,
            hand_values,
            kings_defeated: self.kings_defeated(),
            discard_pending: self.discard_pending(),
            over: self.is_over(),
            victory: self.is_victory(),
            deck_size: self.deck().size(),
            phase: self.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RulesConfig;
    use crate::game::GameSession;
    use crate::rng::GameRng;

    #[test]
    fn test_snapshot_of_fresh_deal() {
        let session = GameSession::start(RulesConfig::default(), &mut GameRng::new(Some(5)));
        let snap = session.snapshot();

        assert_eq!(snap.hand.len(), 5);
        assert_eq!(snap.enemy_row.len(), 4);
        assert_eq!(snap.deck_size, 45);
        assert!(snap.hand[0].is_anchor);
        assert_eq!(snap.hand[0].label, "♠K");
        assert_eq!(snap.hand_values.len(), 5);
        assert_eq!(snap.enemy_values, session.enemies().values());
        assert!(!snap.discard_pending && !snap.over && !snap.victory);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let session = GameSession::start(RulesConfig::default(), &mut GameRng::new(Some(5)));
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"]["state"], "active");
        assert_eq!(json["hand"][0]["suit"], "spade");
        assert_eq!(json["hand"][0]["rank"], "K");
        assert_eq!(json["hand"][0]["is_anchor"], true);
    }
}
