//! Venue data connectors
//!
//! The scan core talks to venues exclusively through `MarketDataClient`;
//! transports live behind it. Every fallible call is per-venue and
//! per-request: callers degrade failures to "exclude this venue for this
//! cycle" and never abort a scan over them.

pub mod mock;
pub mod p2p;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::error::ConnectorError;
use crate::models::{MarketLimits, OrderBook, Ticker, TradingFees};

#[async_trait]
pub trait MarketDataClient: Send + Sync {
    fn venue_id(&self) -> &str;

    /// Point-in-time order book snapshot, depth-limited per side
    async fn fetch_order_book(&self, symbol: &str, limit: usize) -> Result<OrderBook, ConnectorError>;

    /// Top-of-book snapshot
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ConnectorError>;

    /// Venue fee schedule; callers fall back to the default schedule on error
    async fn fetch_trading_fees(&self, symbol: Option<&str>) -> Result<TradingFees, ConnectorError>;

    /// 24h quote volume per symbol; may be partial
    async fn fetch_quote_volumes(&self, symbols: &[String]) -> Result<HashMap<String, f64>, ConnectorError>;

    /// Minimum order amount/cost for one symbol
    async fn fetch_market_limits(&self, symbol: &str) -> Result<MarketLimits, ConnectorError>;

    /// All spot symbols the venue lists
    async fn list_spot_symbols(&self) -> Result<HashSet<String>, ConnectorError>;
}
