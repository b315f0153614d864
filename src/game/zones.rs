use crate::card::{context_values, CardSlot, ANCHOR_ID};
use crate::rng::GameRng;

/// Deck - face-down cards, drawn from the front
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<CardSlot>,
}

impl Deck {
    pub fn new() -> Self {
        Deck { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<CardSlot>) -> Self {
        Deck { cards }
    }

    /// Take the front card out of the deck
    pub fn draw(&mut self) -> Option<CardSlot> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    pub fn cards(&self) -> &[CardSlot] {
        &self.cards
    }
}

/// Hand - the player's cards, anchor included
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<CardSlot>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<CardSlot>) -> Self {
        Hand { cards }
    }

    pub fn add_card(&mut self, card: CardSlot) {
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, index: usize) -> Option<CardSlot> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[CardSlot] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&CardSlot> {
        self.cards.get(index)
    }

    pub fn anchor_index(&self) -> Option<usize> {
        self.cards.iter().position(|slot| slot.id == ANCHOR_ID)
    }

    /// Current values, each card valued against the whole hand
    pub fn values(&self) -> Vec<u32> {
        context_values(&self.cards)
    }
}

/// Enemy row - face-up cards waiting to be defeated
#[derive(Debug, Clone, Default)]
pub struct EnemyRow {
    cards: Vec<CardSlot>,
}

impl EnemyRow {
    pub fn new() -> Self {
        EnemyRow { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<CardSlot>) -> Self {
        EnemyRow { cards }
    }

    pub fn add_card(&mut self, card: CardSlot) {
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, index: usize) -> Option<CardSlot> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardSlot] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&CardSlot> {
        self.cards.get(index)
    }

    /// Current values, each card valued against the whole row
    pub fn values(&self) -> Vec<u32> {
        context_values(&self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{full_card_set, Card, CardId, Suit, WildcardSize};

    #[test]
    fn test_deck_draws_from_front() {
        let mut deck = Deck::from_cards(full_card_set());
        let first = deck.draw().unwrap();
        assert_eq!(first.id, CardId(0));
        assert_eq!(deck.size(), 53);
    }

    #[test]
    fn test_empty_deck_draw() {
        let mut deck = Deck::new();
        assert!(deck.draw().is_none());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_hand_anchor_lookup() {
        let set = full_card_set();
        let mut hand = Hand::from_cards(vec![set[3], set[ANCHOR_ID.0 as usize]]);
        assert_eq!(hand.anchor_index(), Some(1));
        hand.remove_card(1);
        assert_eq!(hand.anchor_index(), None);
        assert!(hand.remove_card(5).is_none());
    }

    #[test]
    fn test_wildcard_revalued_when_hand_changes() {
        let mut hand = Hand::from_cards(vec![
            CardSlot::new(CardId(53), Card::wildcard(WildcardSize::Big)),
            CardSlot::new(CardId(14), Card::standard(Suit::Heart, 2)),
        ]);
        assert_eq!(hand.values(), vec![2, 2]);
        hand.add_card(CardSlot::new(CardId(21), Card::standard(Suit::Heart, 9)));
        assert_eq!(hand.values(), vec![9, 2, 9]);
    }
}
