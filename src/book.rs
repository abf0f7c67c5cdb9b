//! Executable price model
//!
//! Walks order book levels to compute the size-weighted average fill
//! price for a requested trade size, instead of assuming the whole size
//! fills at top of book.

use crate::models::{OrderBook, Side};

/// Average execution price for filling `size` base units against `book`.
///
/// Buy orders walk the asks ascending, sell orders walk the bids
/// descending; each level contributes `min(level.amount, remaining)`.
/// Returns `None` when the book cannot fill the full size (insufficient
/// liquidity); callers must treat that as "no opportunity", never as a
/// degenerate price. `size <= 0` is the caller's responsibility to guard.
pub fn executable_price(book: &OrderBook, side: Side, size: f64) -> Option<f64> {
    let levels = match side {
        Side::Buy => &book.asks,
        Side::Sell => &book.bids,
    };

    let mut remaining = size;
    let mut notional = 0.0;

    for level in levels {
        let take = level.amount.min(remaining);
        notional += take * level.price;
        remaining -= take;
        if remaining <= 0.0 {
            break;
        }
    }

    if remaining > 0.0 {
        return None;
    }

    Some(notional / size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceLevel;

    fn book(bids: &[(f64, f64)], asks: &[(f64, f64)]) -> OrderBook {
        OrderBook {
            symbol: "BTC/USDT".to_string(),
            exchange_id: "test".to_string(),
            bids: bids.iter().map(|&(p, a)| PriceLevel::new(p, a)).collect(),
            asks: asks.iter().map(|&(p, a)| PriceLevel::new(p, a)).collect(),
        }
    }

    #[test]
    fn buy_walks_asks_across_levels() {
        let b = book(&[], &[(10.0, 1.0), (11.0, 2.0)]);
        // (10*1 + 11*2) / 3
        let price = executable_price(&b, Side::Buy, 3.0).unwrap();
        assert!((price - 32.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn sell_walks_bids_across_levels() {
        let b = book(&[(9.0, 1.0), (8.0, 1.0)], &[]);
        let price = executable_price(&b, Side::Sell, 2.0).unwrap();
        assert!((price - 8.5).abs() < 1e-12);
    }

    #[test]
    fn size_matching_full_depth_fills_exactly() {
        let b = book(&[], &[(10010.0, 5.0), (10020.0, 10.0)]);
        let price = executable_price(&b, Side::Buy, 15.0).unwrap();
        let expected = (10010.0 * 5.0 + 10020.0 * 10.0) / 15.0;
        assert!((price - expected).abs() < 1e-9);
    }

    #[test]
    fn size_exceeding_depth_is_insufficient_liquidity() {
        let b = book(&[], &[(10.0, 1.0), (11.0, 2.0)]);
        assert!(executable_price(&b, Side::Buy, 3.5).is_none());
    }

    #[test]
    fn empty_side_is_insufficient_liquidity() {
        let b = book(&[], &[]);
        assert!(executable_price(&b, Side::Buy, 1.0).is_none());
        assert!(executable_price(&b, Side::Sell, 1.0).is_none());
    }

    #[test]
    fn partial_top_level_fill_uses_top_price() {
        let b = book(&[], &[(100.0, 5.0), (110.0, 5.0)]);
        let price = executable_price(&b, Side::Buy, 2.0).unwrap();
        assert_eq!(price, 100.0);
    }
}
