//! Core types - order book entries, candidates and balances

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side. `Ask` sells base for quote, `Bid` buys base with quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Ask,
    Bid,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Ask => write!(f, "ASK"),
            Side::Bid => write!(f, "BID"),
        }
    }
}

/// One raw row of the provider's order book: `[id, price, signed_size]`.
///
/// Sign of `signed_size` tells the sides apart; the provider interleaves
/// both sides in a single sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub id: u64,
    pub price: Decimal,
    pub signed_size: Decimal,
}

impl OrderBookEntry {
    pub fn new(id: u64, price: Decimal, signed_size: Decimal) -> Self {
        Self { id, price, signed_size }
    }

    pub fn is_negative_size(&self) -> bool {
        self.signed_size.is_sign_negative() && !self.signed_size.is_zero()
    }
}

/// Reference prices for one observation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    pub ask_price: Decimal,
    pub bid_price: Decimal,
}

impl PricePair {
    /// The price a candidate on `side` is compared against.
    pub fn reference(&self, side: Side) -> Decimal {
        match side {
            Side::Ask => self.ask_price,
            Side::Bid => self.bid_price,
        }
    }
}

/// A synthesized order awaiting a fill decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateOrder {
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
}

impl CandidateOrder {
    pub fn ask(price: Decimal, size: Decimal) -> Self {
        Self { side: Side::Ask, price, size }
    }

    pub fn bid(price: Decimal, size: Decimal) -> Self {
        Self { side: Side::Bid, price, size }
    }
}

impl std::fmt::Display for CandidateOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {} ({})", self.side, self.price, self.size)
    }
}

/// Two-asset balance: `base` (e.g. ETH) and `quote` (e.g. USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub base: Decimal,
    pub quote: Decimal,
}

impl Balance {
    pub fn new(base: Decimal, quote: Decimal) -> Self {
        Self { base, quote }
    }

    /// Guarded fill. Returns `true` if the balance was mutated.
    ///
    /// Ask: requires `quote > price`, then `quote -= price; base += size`.
    /// Bid: requires `base > size`, then `quote += price; base -= size`.
    /// An under-funded fill leaves the balance untouched, as does any fill
    /// whose result would not be solvent (negative price or size) or would
    /// overflow.
    pub fn apply_fill(&mut self, side: Side, price: Decimal, size: Decimal) -> bool {
        let next = match side {
            Side::Ask if self.quote > price => {
                Balance::settle(self.base.checked_add(size), self.quote.checked_sub(price))
            }
            Side::Bid if self.base > size => {
                Balance::settle(self.base.checked_sub(size), self.quote.checked_add(price))
            }
            _ => None,
        };

        match next {
            Some(next) if next.is_solvent() => {
                *self = next;
                true
            }
            _ => false,
        }
    }

    fn settle(base: Option<Decimal>, quote: Option<Decimal>) -> Option<Balance> {
        Some(Balance::new(base?, quote?))
    }

    pub fn is_solvent(&self) -> bool {
        !self.base.is_sign_negative() && !self.quote.is_sign_negative()
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            base: Decimal::from(10),
            quote: Decimal::from(2000),
        }
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ ETH: {}, USD: {} }}", self.base, self.quote)
    }
}

/// Result of a single `try_fill`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOutcome {
    Filled,
    NotFilled,
}

impl FillOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, FillOutcome::Filled)
    }
}
