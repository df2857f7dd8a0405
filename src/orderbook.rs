//! Price discovery over the provider's raw order book.
//!
//! The feed interleaves both sides in one array, already ordered by the
//! provider. Nothing here sorts or re-buckets rows: the reference prices are
//! read positionally, and each positional rule has its own function.

use crate::core::{Error, OrderBookEntry, PricePair, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decode a `[[id, price, signed_size], ...]` JSON payload.
///
/// Numbers are converted through their JSON text so `1840.623906` stays
/// exactly `1840.623906`.
pub fn parse_snapshot(body: &[u8]) -> Result<Vec<OrderBookEntry>> {
    let rows: Vec<(u64, serde_json::Number, serde_json::Number)> =
        serde_json::from_slice(body).map_err(|e| Error::malformed(format!("bad payload: {}", e)))?;

    rows.into_iter()
        .map(|(id, price, size)| {
            Ok(OrderBookEntry::new(id, json_decimal(&price)?, json_decimal(&size)?))
        })
        .collect()
}

fn json_decimal(n: &serde_json::Number) -> Result<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| Error::malformed(format!("unrepresentable number {}: {}", text, e)))
}

/// Ask reference: price of the first row.
pub fn first_entry_quote(book: &[OrderBookEntry]) -> Option<Decimal> {
    book.first().map(|e| e.price)
}

/// Bid reference: price of the first row with negative size.
///
/// This is not the highest bid on the book. It mirrors the reference feed
/// layout, where the first negative-size row sits at the top of the other
/// side; a different provider ordering silently changes its meaning.
pub fn first_negative_size_quote(book: &[OrderBookEntry]) -> Option<Decimal> {
    book.iter().find(|e| e.is_negative_size()).map(|e| e.price)
}

/// Derive the cycle's reference prices.
pub fn find_best_prices(book: &[OrderBookEntry]) -> Result<PricePair> {
    let ask_price = first_entry_quote(book).ok_or_else(|| Error::malformed("empty order book"))?;
    let bid_price = first_negative_size_quote(book)
        .ok_or_else(|| Error::malformed("no negative-size entry in order book"))?;

    for (label, price) in [("ask", ask_price), ("bid", bid_price)] {
        if price <= Decimal::ZERO {
            return Err(Error::malformed(format!("non-positive {} reference: {}", label, price)));
        }
    }

    Ok(PricePair { ask_price, bid_price })
}
