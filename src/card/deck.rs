use crate::card::types::{Card, CardId, CardSlot, Suit, WildcardSize};

/// 52 standard cards plus the two jokers
pub const FULL_SET_SIZE: usize = 54;

/// Slot of the Spade King, the player's anchor card
pub const ANCHOR_ID: CardId = CardId(12);

/// Build the full ordered card set: Spade, Heart, Diamond, Club (Ace to King
/// each), then the small and big wildcard. Slot ids follow this order.
pub fn full_card_set() -> Vec<CardSlot> {
    let standard = Suit::ALL
        .iter()
        .flat_map(|&suit| (1..=13).map(move |rank| Card::standard(suit, rank)));
    let jokers = [
        Card::wildcard(WildcardSize::Small),
        Card::wildcard(WildcardSize::Big),
    ];

    standard
        .chain(jokers)
        .enumerate()
        .map(|(idx, card)| CardSlot::new(CardId(idx as u8), card))
        .collect()
}

/// The slot a card occupies in the full ordered card set
pub fn slot_for(card: Card) -> CardSlot {
    let idx = match card {
        Card::Standard { suit, rank } => suit.index() * 13 + usize::from(rank) - 1,
        Card::Wildcard { size: WildcardSize::Small } => 52,
        Card::Wildcard { size: WildcardSize::Big } => 53,
    };
    CardSlot::new(CardId(idx as u8), card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_full_set_size() {
        assert_eq!(full_card_set().len(), FULL_SET_SIZE);
    }

    #[test]
    fn test_anchor_slot_is_spade_king() {
        let set = full_card_set();
        let anchor = set[ANCHOR_ID.0 as usize];
        assert_eq!(anchor.id, ANCHOR_ID);
        assert_eq!(anchor.card, Card::standard(Suit::Spade, 13));
    }

    #[test]
    fn test_slot_for_matches_set_order() {
        for slot in full_card_set() {
            assert_eq!(slot_for(slot.card), slot);
        }
    }

    #[test]
    fn test_cards_are_unique() {
        let set = full_card_set();
        let cards: HashSet<Card> = set.iter().map(|s| s.card).collect();
        assert_eq!(cards.len(), FULL_SET_SIZE);
        let kings = set.iter().filter(|s| s.card.is_any_king()).count();
        assert_eq!(kings, 4);
    }
}
