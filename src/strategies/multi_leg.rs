//! Multi-leg strategy: fiat -> P2P asset buy -> network transfer -> spot sell

use crate::models::{Opportunity, OpportunityKind, P2PQuote, Side, TradingFees};

/// Plans the fiat-in / fiat-out chain: buy the asset on a P2P advert,
/// move it over the network (fixed fee in asset units), sell it on the
/// destination venue at `spot_sell_price` net of taker fee.
///
/// Returns `None` when the transfer fee consumes the position or the path
/// is not profitable at all. Unlike the two-venue spread strategy this
/// gates on `roi > 0` only; filtering against the configured minimum is
/// the caller's job.
///
/// The legs list carries a spot-conversion placeholder step that is not
/// numerically modeled; callers must not assume its cost is included.
pub fn plan_multi_leg_path(
    p2p_buy: &P2PQuote,
    spot_sell_price: f64,
    spot_sell_fees: &TradingFees,
    transfer_fee_asset: f64,
    size_in_fiat: f64,
    fiat: &str,
    asset: &str,
) -> Option<Opportunity> {
    let asset_after_p2p = size_in_fiat / p2p_buy.price;

    let asset_after_transfer = (asset_after_p2p - transfer_fee_asset).max(0.0);
    if asset_after_transfer <= 0.0 {
        return None;
    }

    let sell_unit_net = spot_sell_fees.apply_taker(spot_sell_price, Side::Sell);
    let proceeds_fiat = sell_unit_net * asset_after_transfer;

    let cost_fiat = size_in_fiat;
    let profit_fiat = proceeds_fiat - cost_fiat;
    let roi_pct = if cost_fiat > 0.0 {
        100.0 * profit_fiat / cost_fiat
    } else {
        0.0
    };

    if roi_pct <= 0.0 {
        return None;
    }

    Some(Opportunity {
        kind: OpportunityKind::MultiLeg,
        description: format!(
            "P2P→SPOT→TRANSFER→SELL: pay {cost_fiat:.2} {fiat}, get {proceeds_fiat:.2} {fiat}; \
             profit {profit_fiat:.2} {fiat}, ROI {roi_pct:.2}%"
        ),
        expected_profit: profit_fiat,
        expected_roi_pct: roi_pct,
        legs: vec![
            format!("P2P BUY {asset} with {fiat} at {:.4}", p2p_buy.price),
            "SPOT (optional conversion or hold)".to_string(),
            format!("TRANSFER {asset} (-{transfer_fee_asset} fee)"),
            format!("SELL {asset} at {sell_unit_net:.4} net"),
        ],
    })
}
