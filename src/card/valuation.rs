//! Point values of cards.
//!
//! A standard card is worth its rank. A wildcard copies the highest (big) or
//! lowest (small) standard card it shares a context with, so its value has to
//! be recomputed whenever the hand or enemy row it sits in changes.

use crate::card::types::{Card, CardSlot, WildcardSize};

/// Big wildcard value when no standard card shares its context
pub const BIG_WILDCARD_DEFAULT: u32 = 14;
/// Small wildcard value when no standard card shares its context
pub const SMALL_WILDCARD_DEFAULT: u32 = 1;

/// Value of `card` evaluated within `context` (the zone it sits in, which may
/// include the card itself)
pub fn card_value(card: &Card, context: &[CardSlot]) -> u32 {
    match card {
        Card::Standard { rank, .. } => u32::from(*rank),
        Card::Wildcard { size } => {
            let others = context.iter().filter_map(|slot| slot.card.rank());
            let picked = match size {
                WildcardSize::Big => others.max(),
                WildcardSize::Small => others.min(),
            };
            match (picked, size) {
                (Some(rank), _) => u32::from(rank),
                (None, WildcardSize::Big) => BIG_WILDCARD_DEFAULT,
                (None, WildcardSize::Small) => SMALL_WILDCARD_DEFAULT,
            }
        }
    }
}

/// Values of every card in a zone, in zone order
pub fn context_values(context: &[CardSlot]) -> Vec<u32> {
    context
        .iter()
        .map(|slot| card_value(&slot.card, context))
        .collect()
}
