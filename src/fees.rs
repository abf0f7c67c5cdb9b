//! Fee application and default fee schedules
//!
//! Strategies model aggressive (marketable) orders, so only taker rates
//! are applied; maker rates ride along in `TradingFees` for callers that
//! ever model resting orders.

use std::collections::HashMap;

use crate::models::{Side, TradingFees, TransferFee};

impl TradingFees {
    /// Adjust a unit price for the taker fee in the given direction:
    /// buying raises the effective cost, selling lowers the proceeds.
    pub fn apply_taker(&self, unit_price: f64, side: Side) -> f64 {
        match side {
            Side::Buy => unit_price * (1.0 + self.taker_rate),
            Side::Sell => unit_price * (1.0 - self.taker_rate),
        }
    }
}

/// Default trading fees when a venue's schedule cannot be fetched (0.1%/0.1%)
pub const DEFAULT_TRADING_FEES: TradingFees = TradingFees {
    maker_rate: 0.001,
    taker_rate: 0.001,
};

/// Transfer fee applied when no (asset, network) entry is configured
const FALLBACK_TRANSFER_FEE: f64 = 1.0;

/// Fee lookup with documented defaults.
///
/// The transfer table is explicit configuration data so tests and callers
/// can override it; it is not meant to be exhaustive.
pub struct FeeService {
    default_trading_fees: TradingFees,
    transfer_table: HashMap<(String, String), f64>,
}

impl Default for FeeService {
    fn default() -> Self {
        let mut transfer_table = HashMap::new();
        transfer_table.insert(("USDT".to_string(), "TRC20".to_string()), 1.0);
        transfer_table.insert(("USDT".to_string(), "ERC20".to_string()), 10.0);
        transfer_table.insert(("USDT".to_string(), "BEP20".to_string()), 0.8);
        Self {
            default_trading_fees: DEFAULT_TRADING_FEES,
            transfer_table,
        }
    }
}

impl FeeService {
    pub fn new(default_trading_fees: TradingFees, transfer_table: HashMap<(String, String), f64>) -> Self {
        Self {
            default_trading_fees,
            transfer_table,
        }
    }

    /// Venue schedule when available, otherwise the default schedule.
    pub fn trading_fees(&self, exchange_default: Option<TradingFees>) -> TradingFees {
        exchange_default.unwrap_or(self.default_trading_fees)
    }

    pub fn transfer_fee(&self, asset: &str, network: &str) -> TransferFee {
        let fee_amount = self
            .transfer_table
            .get(&(asset.to_string(), network.to_string()))
            .copied()
            .unwrap_or(FALLBACK_TRANSFER_FEE);
        TransferFee {
            asset: asset.to_string(),
            network: network.to_string(),
            fee_amount,
        }
    }
}
