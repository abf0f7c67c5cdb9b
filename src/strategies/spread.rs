//! Two-venue spread strategy: buy base on venue A, transfer, sell on B

use crate::book::executable_price;
use crate::models::{Opportunity, OpportunityKind, OrderBook, Side, TradingFees};

/// Computes a buy-on-A / sell-on-B opportunity for a quote-denominated
/// notional, or `None` when illiquid, eaten by the transfer fee, or below
/// `threshold_pct` ROI.
///
/// The base quantity is estimated twice: first from top of book to pick a
/// walk size, then from the realized average buy price. Feeding the
/// first-pass approximation into venue B's book walk would misstate
/// slippage whenever the spread itself is large.
#[allow(clippy::too_many_arguments)]
pub fn find_cex_cex_opportunity(
    base_symbol: &str,
    quote_symbol: &str,
    size_in_quote: f64,
    book_a: &OrderBook,
    book_b: &OrderBook,
    fees_a: &TradingFees,
    fees_b: &TradingFees,
    threshold_pct: f64,
    transfer_fee_in_base: f64,
) -> Option<Opportunity> {
    let top_ask_a = book_a.best_ask()?;
    let approx_base_size = size_in_quote / top_ask_a.max(1e-9);

    let buy_avg_price_a = executable_price(book_a, Side::Buy, approx_base_size)?;

    // Exact quantity bought for the notional at the realized average price
    let base_amount = size_in_quote / buy_avg_price_a;
    let buy_unit_cost_with_fee = fees_a.apply_taker(buy_avg_price_a, Side::Buy);

    let base_after_transfer = (base_amount - transfer_fee_in_base).max(0.0);
    if base_after_transfer <= 0.0 {
        return None;
    }

    let sell_avg_price_b = executable_price(book_b, Side::Sell, base_after_transfer)?;
    let sell_unit_price_with_fee = fees_b.apply_taker(sell_avg_price_b, Side::Sell);

    let cost_quote = buy_unit_cost_with_fee * base_amount;
    let proceeds_quote = sell_unit_price_with_fee * base_after_transfer;

    let profit = proceeds_quote - cost_quote;
    let roi_pct = if cost_quote > 0.0 {
        100.0 * profit / cost_quote
    } else {
        0.0
    };

    if roi_pct < threshold_pct {
        return None;
    }

    let description = format!(
        "Buy {base_symbol} on {} at ~{buy_avg_price_a:.2}, \
         transfer (-{transfer_fee_in_base} {base_symbol}), sell on {} at ~{sell_avg_price_b:.2}; \
         size {base_after_transfer:.6} {base_symbol}",
        book_a.exchange_id, book_b.exchange_id,
    );
    Some(Opportunity {
        kind: OpportunityKind::CexCex,
        description,
        expected_profit: profit,
        expected_roi_pct: roi_pct,
        legs: vec![
            format!("BUY {base_symbol} with {quote_symbol} on {}", book_a.exchange_id),
            format!("TRANSFER {base_symbol} (-{transfer_fee_in_base} fee)"),
            format!("SELL {base_symbol} for {quote_symbol} on {}", book_b.exchange_id),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceLevel;

    const ZERO_FEES: TradingFees = TradingFees {
        maker_rate: 0.0,
        taker_rate: 0.0,
    };

    fn book(exchange_id: &str, bids: &[(f64, f64)], asks: &[(f64, f64)]) -> OrderBook {
        OrderBook {
            symbol: "BTC/USDT".to_string(),
            exchange_id: exchange_id.to_string(),
            bids: bids.iter().map(|&(p, a)| PriceLevel::new(p, a)).collect(),
            asks: asks.iter().map(|&(p, a)| PriceLevel::new(p, a)).collect(),
        }
    }

    fn book_a() -> OrderBook {
        book(
            "binance",
            &[(9990.0, 5.0), (9980.0, 10.0)],
            &[(10010.0, 5.0), (10020.0, 10.0)],
        )
    }

    fn book_b() -> OrderBook {
        book("kraken", &[(10120.0, 5.0), (10110.0, 10.0)], &[(10130.0, 5.0)])
    }

    #[test]
    fn detects_cross_venue_spread_with_zero_fees() {
        let opp = find_cex_cex_opportunity(
            "BTC", "USDT", 1000.0, &book_a(), &book_b(), &ZERO_FEES, &ZERO_FEES, 0.5, 0.0,
        )
        .unwrap();

        assert_eq!(opp.kind, OpportunityKind::CexCex);
        assert_eq!(opp.legs.len(), 3);
        // Whole size fills at top of book on both sides
        let expected_roi = 100.0 * (10120.0 - 10010.0) / 10010.0;
        assert!((opp.expected_roi_pct - expected_roi).abs() < 1e-3);
        let expected_profit = 1000.0 / 10010.0 * 10120.0 - 1000.0;
        assert!((opp.expected_profit - expected_profit).abs() < 1e-6);
    }

    #[test]
    fn threshold_above_spread_yields_none() {
        let opp = find_cex_cex_opportunity(
            "BTC", "USDT", 1000.0, &book_a(), &book_b(), &ZERO_FEES, &ZERO_FEES, 5.0, 0.0,
        );
        assert!(opp.is_none());
    }

    #[test]
    fn transfer_fee_exceeding_position_yields_none() {
        // 1000 USDT buys ~0.1 BTC; a 1 BTC transfer fee wipes it out
        let opp = find_cex_cex_opportunity(
            "BTC", "USDT", 1000.0, &book_a(), &book_b(), &ZERO_FEES, &ZERO_FEES, 0.5, 1.0,
        );
        assert!(opp.is_none());
    }

    #[test]
    fn illiquid_sell_book_yields_none() {
        let thin_b = book("kraken", &[(10120.0, 0.001)], &[]);
        let opp = find_cex_cex_opportunity(
            "BTC", "USDT", 1000.0, &book_a(), &thin_b, &ZERO_FEES, &ZERO_FEES, 0.5, 0.0,
        );
        assert!(opp.is_none());
    }

    #[test]
    fn roi_is_monotonic_in_the_gap() {
        let mut last_roi = f64::NEG_INFINITY;
        for bid in [10050.0, 10120.0, 10200.0, 10400.0] {
            let b = book("kraken", &[(bid, 5.0), (bid - 10.0, 10.0)], &[]);
            let opp = find_cex_cex_opportunity(
                "BTC", "USDT", 1000.0, &book_a(), &b, &ZERO_FEES, &ZERO_FEES, 0.0, 0.0,
            )
            .unwrap();
            assert!(opp.expected_roi_pct > last_roi);
            last_roi = opp.expected_roi_pct;
        }
    }

    #[test]
    fn taker_fees_reduce_roi() {
        let fees = TradingFees {
            maker_rate: 0.001,
            taker_rate: 0.001,
        };
        let gross = find_cex_cex_opportunity(
            "BTC", "USDT", 1000.0, &book_a(), &book_b(), &ZERO_FEES, &ZERO_FEES, 0.0, 0.0,
        )
        .unwrap();
        let net = find_cex_cex_opportunity(
            "BTC", "USDT", 1000.0, &book_a(), &book_b(), &fees, &fees, 0.0, 0.0,
        )
        .unwrap();
        assert!(net.expected_roi_pct < gross.expected_roi_pct);
    }
}
