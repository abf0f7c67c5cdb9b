//! Market data value types shared across connectors, strategies and the scanner

use serde::{Deserialize, Serialize};

/// Trade direction against a venue's order book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Single price level of an order book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub amount: f64,
}

impl PriceLevel {
    pub fn new(price: f64, amount: f64) -> Self {
        Self { price, amount }
    }
}

/// Point-in-time order book snapshot for one symbol on one venue.
///
/// Fetched fresh per scan cycle and consumed immediately; never mutated
/// or cached by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: String,
    pub exchange_id: String,
    /// Sorted descending by price
    pub bids: Vec<PriceLevel>,
    /// Sorted ascending by price
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }
}

/// Lightweight top-of-book snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub exchange_id: String,
    pub best_bid: f64,
    pub best_ask: f64,
}

/// Fractional trading fee rates (0.001 = 0.1%).
///
/// Maker rates are carried for completeness but the strategies model
/// aggressive (marketable) orders and apply taker rates only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TradingFees {
    pub maker_rate: f64,
    pub taker_rate: f64,
}

/// Fixed deduction in asset units for moving funds between venues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferFee {
    pub asset: String,
    pub network: String,
    pub fee_amount: f64,
}

/// Direction of a peer-to-peer advert, from our perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    /// We buy the asset with fiat
    Buy,
    /// We sell the asset for fiat
    Sell,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "BUY"),
            TradeType::Sell => write!(f, "SELL"),
        }
    }
}

/// One peer-to-peer advert: price is fiat per asset unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct P2PQuote {
    pub asset: String,
    pub fiat: String,
    pub trade_type: TradeType,
    pub price: f64,
    pub available_amount: f64,
    pub min_amount: f64,
    pub advertiser: Option<String>,
}

/// Kind of trade path an opportunity was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityKind {
    CexCex,
    P2pCex,
    CexTriangular,
    MultiLeg,
}

impl std::fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpportunityKind::CexCex => write!(f, "CEX_CEX"),
            OpportunityKind::P2pCex => write!(f, "P2P_CEX"),
            OpportunityKind::CexTriangular => write!(f, "CEX_Triangular"),
            OpportunityKind::MultiLeg => write!(f, "Multi_Leg"),
        }
    }
}

/// A profitable trade path computed by a strategy call.
///
/// Immutable and transient: it lives only as long as the call that
/// produced it and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub kind: OpportunityKind,
    pub description: String,
    pub expected_profit: f64,
    pub expected_roi_pct: f64,
    /// Human-readable steps, in execution order
    pub legs: Vec<String>,
}

/// Minimum order constraints for a symbol on one venue
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MarketLimits {
    pub min_amount: f64,
    pub min_cost: f64,
}
