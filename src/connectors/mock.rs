//! Deterministic mock venue for demos and tests
//!
//! Ships the same canned data as the live flows expect: a tight-spread
//! book on venue A, a shifted book on venue B (wide enough to clear 0.5%
//! after fees), and P2P adverts around the 1.00 fiat peg.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::MarketDataClient;
use crate::error::ConnectorError;
use crate::fees::DEFAULT_TRADING_FEES;
use crate::models::{
    MarketLimits, OrderBook, P2PQuote, PriceLevel, Ticker, TradeType, TradingFees,
};

pub struct MockVenue {
    id: String,
    books: HashMap<String, OrderBook>,
    volumes: HashMap<String, f64>,
    limits: HashMap<String, MarketLimits>,
    fees: TradingFees,
    fail_fetches: bool,
}

impl MockVenue {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            books: HashMap::new(),
            volumes: HashMap::new(),
            limits: HashMap::new(),
            fees: DEFAULT_TRADING_FEES,
            fail_fetches: false,
        }
    }

    pub fn with_book(mut self, symbol: &str, bids: &[(f64, f64)], asks: &[(f64, f64)]) -> Self {
        self.books.insert(
            symbol.to_string(),
            OrderBook {
                symbol: symbol.to_string(),
                exchange_id: self.id.clone(),
                bids: bids.iter().map(|&(p, a)| PriceLevel::new(p, a)).collect(),
                asks: asks.iter().map(|&(p, a)| PriceLevel::new(p, a)).collect(),
            },
        );
        self
    }

    pub fn with_volume(mut self, symbol: &str, quote_volume: f64) -> Self {
        self.volumes.insert(symbol.to_string(), quote_volume);
        self
    }

    pub fn with_limits(mut self, symbol: &str, min_amount: f64, min_cost: f64) -> Self {
        self.limits.insert(
            symbol.to_string(),
            MarketLimits {
                min_amount,
                min_cost,
            },
        );
        self
    }

    /// Make every fetch fail, to exercise per-venue degradation paths
    pub fn failing(mut self) -> Self {
        self.fail_fetches = true;
        self
    }

    fn guard(&self) -> Result<(), ConnectorError> {
        if self.fail_fetches {
            return Err(ConnectorError::Venue(format!("{} unavailable", self.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataClient for MockVenue {
    fn venue_id(&self) -> &str {
        &self.id
    }

    async fn fetch_order_book(&self, symbol: &str, limit: usize) -> Result<OrderBook, ConnectorError> {
        self.guard()?;
        let book = self
            .books
            .get(symbol)
            .ok_or_else(|| ConnectorError::Venue(format!("{} does not list {symbol}", self.id)))?;
        let mut book = book.clone();
        book.bids.truncate(limit);
        book.asks.truncate(limit);
        Ok(book)
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ConnectorError> {
        let book = self.fetch_order_book(symbol, 1).await?;
        Ok(Ticker {
            symbol: symbol.to_string(),
            exchange_id: self.id.clone(),
            best_bid: book.best_bid().unwrap_or(0.0),
            best_ask: book.best_ask().unwrap_or(0.0),
        })
    }

    async fn fetch_trading_fees(&self, _symbol: Option<&str>) -> Result<TradingFees, ConnectorError> {
        self.guard()?;
        Ok(self.fees)
    }

    async fn fetch_quote_volumes(&self, symbols: &[String]) -> Result<HashMap<String, f64>, ConnectorError> {
        self.guard()?;
        Ok(symbols
            .iter()
            .filter_map(|s| self.volumes.get(s).map(|v| (s.clone(), *v)))
            .collect())
    }

    async fn fetch_market_limits(&self, symbol: &str) -> Result<MarketLimits, ConnectorError> {
        self.guard()?;
        Ok(self.limits.get(symbol).copied().unwrap_or_default())
    }

    async fn list_spot_symbols(&self) -> Result<HashSet<String>, ConnectorError> {
        self.guard()?;
        Ok(self.books.keys().cloned().collect())
    }
}

/// The canonical demo pair: a tight book on `exchange_a` and a book on
/// `exchange_b` priced high enough to arbitrage after 0.1% taker fees.
pub fn mock_pair(exchange_a: &str, exchange_b: &str, symbol: &str) -> (MockVenue, MockVenue) {
    let a = MockVenue::new(exchange_a).with_book(
        symbol,
        &[(9990.0, 5.0), (9980.0, 10.0)],
        &[(10010.0, 5.0), (10020.0, 10.0)],
    );
    let b = MockVenue::new(exchange_b).with_book(
        symbol,
        &[(10120.0, 5.0), (10110.0, 10.0)],
        &[(10130.0, 5.0), (10140.0, 10.0)],
    );
    (a, b)
}

/// A small multi-venue universe for scan demos: three venues quoting the
/// same symbols at slightly different levels, with plausible volumes and
/// lot limits. Spreads on BTC and SOL clear the default threshold; ETH
/// does not.
pub fn mock_scan_venues() -> Vec<MockVenue> {
    vec![
        MockVenue::new("okx")
            .with_book("BTC/USDT", &[(9995.0, 4.0), (9985.0, 8.0)], &[(10005.0, 4.0), (10015.0, 8.0)])
            .with_book("ETH/USDT", &[(1999.0, 40.0)], &[(2001.0, 40.0)])
            .with_book("SOL/USDT", &[(99.8, 800.0)], &[(100.0, 800.0)])
            .with_volume("BTC/USDT", 2_000_000.0)
            .with_volume("ETH/USDT", 1_500_000.0)
            .with_volume("SOL/USDT", 400_000.0)
            .with_limits("BTC/USDT", 0.0001, 10.0)
            .with_limits("ETH/USDT", 0.001, 10.0)
            .with_limits("SOL/USDT", 0.01, 10.0),
        MockVenue::new("kraken")
            .with_book("BTC/USDT", &[(10110.0, 4.0), (10100.0, 8.0)], &[(10120.0, 4.0)])
            .with_book("ETH/USDT", &[(2000.0, 40.0)], &[(2002.0, 40.0)])
            .with_volume("BTC/USDT", 1_200_000.0)
            .with_volume("ETH/USDT", 900_000.0)
            .with_limits("BTC/USDT", 0.0001, 10.0)
            .with_limits("ETH/USDT", 0.001, 10.0),
        MockVenue::new("kucoin")
            .with_book("SOL/USDT", &[(101.2, 800.0), (101.1, 1500.0)], &[(101.4, 800.0)])
            .with_book("ETH/USDT", &[(1998.5, 40.0)], &[(2000.5, 40.0)])
            .with_volume("SOL/USDT", 300_000.0)
            .with_volume("ETH/USDT", 700_000.0)
            .with_limits("SOL/USDT", 0.01, 10.0)
            .with_limits("ETH/USDT", 0.001, 10.0),
    ]
}

/// Canned P2P BUY adverts (we buy the asset with fiat)
pub fn p2p_buy_quotes(asset: &str, fiat: &str) -> Vec<P2PQuote> {
    vec![
        mock_quote(asset, fiat, TradeType::Buy, 1.01, 5000.0),
        mock_quote(asset, fiat, TradeType::Buy, 1.02, 10000.0),
    ]
}

/// Canned P2P SELL adverts (we sell the asset for fiat)
pub fn p2p_sell_quotes(asset: &str, fiat: &str) -> Vec<P2PQuote> {
    vec![
        mock_quote(asset, fiat, TradeType::Sell, 1.03, 5000.0),
        mock_quote(asset, fiat, TradeType::Sell, 1.02, 10000.0),
    ]
}

fn mock_quote(asset: &str, fiat: &str, trade_type: TradeType, price: f64, available: f64) -> P2PQuote {
    P2PQuote {
        asset: asset.to_string(),
        fiat: fiat.to_string(),
        trade_type,
        price,
        available_amount: available,
        min_amount: 10.0,
        advertiser: None,
    }
}
