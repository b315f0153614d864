pub mod deck;
pub mod types;
pub mod valuation;

pub use deck::{full_card_set, slot_for, ANCHOR_ID, FULL_SET_SIZE};
pub use types::{Card, CardId, CardSlot, Suit, SuitTag, WildcardSize};
pub use valuation::{card_value, context_values};
