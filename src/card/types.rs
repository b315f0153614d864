use serde::{Deserialize, Serialize};
use std::fmt;

/// The four standard suits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    /// Position in the card set order
    pub fn index(&self) -> usize {
        match self {
            Suit::Spade => 0,
            Suit::Heart => 1,
            Suit::Diamond => 2,
            Suit::Club => 3,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
        }
    }
}

/// Suit tag as reported to adapters; wildcards carry their own tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuitTag {
    Spade,
    Heart,
    Diamond,
    Club,
    Wildcard,
}

impl From<Suit> for SuitTag {
    fn from(suit: Suit) -> Self {
        match suit {
            Suit::Spade => SuitTag::Spade,
            Suit::Heart => SuitTag::Heart,
            Suit::Diamond => SuitTag::Diamond,
            Suit::Club => SuitTag::Club,
        }
    }
}

/// Which of the two jokers a wildcard is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WildcardSize {
    Small,
    Big,
}

/// A playing card. Standard ranks run 1 (Ace) to 13 (King).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Card {
    Standard { suit: Suit, rank: u8 },
    Wildcard { size: WildcardSize },
}

impl Card {
    pub fn standard(suit: Suit, rank: u8) -> Self {
        debug_assert!((1..=13).contains(&rank), "rank out of range: {}", rank);
        Card::Standard { suit, rank }
    }

    pub fn wildcard(size: WildcardSize) -> Self {
        Card::Wildcard { size }
    }

    pub fn suit_tag(&self) -> SuitTag {
        match self {
            Card::Standard { suit, .. } => SuitTag::from(*suit),
            Card::Wildcard { .. } => SuitTag::Wildcard,
        }
    }

    /// Rank of a standard card, None for wildcards
    pub fn rank(&self) -> Option<u8> {
        match self {
            Card::Standard { rank, .. } => Some(*rank),
            Card::Wildcard { .. } => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Card::Wildcard { .. })
    }

    pub fn is_big_wildcard(&self) -> bool {
        matches!(self, Card::Wildcard { size: WildcardSize::Big })
    }

    /// King of any suit. Wildcards never count, whatever they are worth.
    pub fn is_any_king(&self) -> bool {
        self.rank() == Some(13)
    }

    /// Rank as printed on the card face
    pub fn display_rank(&self) -> String {
        match self {
            Card::Standard { rank, .. } => match rank {
                1 => "A".to_string(),
                11 => "J".to_string(),
                12 => "Q".to_string(),
                13 => "K".to_string(),
                n => n.to_string(),
            },
            Card::Wildcard { size: WildcardSize::Big } => "Big".to_string(),
            Card::Wildcard { size: WildcardSize::Small } => "Small".to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Standard { suit, .. } => write!(f, "{}{}", suit.symbol(), self.display_rank()),
            Card::Wildcard { .. } => write!(f, "{} Joker", self.display_rank()),
        }
    }
}

/// Stable slot identifier: the card's index in the full ordered card set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u8);

/// A card together with the slot it occupies in the card set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSlot {
    pub id: CardId,
    pub card: Card,
}

impl CardSlot {
    pub fn new(id: CardId, card: Card) -> Self {
        CardSlot { id, card }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rank() {
        assert_eq!(Card::standard(Suit::Heart, 1).display_rank(), "A");
        assert_eq!(Card::standard(Suit::Heart, 10).display_rank(), "10");
        assert_eq!(Card::standard(Suit::Heart, 11).display_rank(), "J");
        assert_eq!(Card::standard(Suit::Heart, 12).display_rank(), "Q");
        assert_eq!(Card::standard(Suit::Heart, 13).display_rank(), "K");
        assert_eq!(Card::wildcard(WildcardSize::Big).display_rank(), "Big");
    }

    #[test]
    fn test_display_label() {
        assert_eq!(Card::standard(Suit::Spade, 13).to_string(), "♠K");
        assert_eq!(Card::standard(Suit::Club, 7).to_string(), "♣7");
        assert_eq!(Card::wildcard(WildcardSize::Small).to_string(), "Small Joker");
    }

    #[test]
    fn test_kings_exclude_wildcards() {
        assert!(Card::standard(Suit::Diamond, 13).is_any_king());
        assert!(!Card::standard(Suit::Diamond, 12).is_any_king());
        assert!(!Card::wildcard(WildcardSize::Big).is_any_king());
    }

    #[test]
    fn test_suit_tag() {
        assert_eq!(Card::standard(Suit::Club, 2).suit_tag(), SuitTag::Club);
        assert_eq!(Card::wildcard(WildcardSize::Big).suit_tag(), SuitTag::Wildcard);
    }

    #[test]
    fn test_card_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Card::standard(Suit::Spade, 13)).unwrap();
        assert_eq!(json, r#"{"kind":"standard","suit":"spade","rank":13}"#);
    }
}
