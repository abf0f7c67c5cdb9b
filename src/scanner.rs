//! Concurrent multi-venue scan core
//!
//! One cycle: prefetch volumes and lot limits per venue, then for each
//! candidate symbol fan out a top-of-book fetch to every venue that lists
//! it, reduce to the global best ask / best bid, filter, and emit rows.
//! A venue failure only removes that venue from that symbol's comparison;
//! the cycle always completes. Nothing is retried inside a cycle; the
//! next cycle is the retry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::config::STABLES;
use crate::connectors::MarketDataClient;
use crate::error::ConnectorError;
use crate::models::MarketLimits;

/// Venue id -> market data client
pub type ClientMap = HashMap<String, Arc<dyn MarketDataClient>>;

/// Venue id -> tradable symbols, already filtered
pub type VenueSymbols = HashMap<String, HashSet<String>>;

/// Order book depth requested for top-of-book comparisons
const BOOK_DEPTH: usize = 10;

#[derive(Debug, Clone)]
pub struct ScanParams {
    /// Notional size in quote units used for profit simulation
    pub size: f64,
    /// Minimum ROI percent for a row to be emitted
    pub threshold_pct: f64,
    /// Bound on simultaneous fetches, re-applied per symbol
    pub workers: usize,
    /// Minimum 24h quote volume on both chosen venues; 0 disables
    pub min_volume: f64,
    /// Respect per-venue minimum amount / minimum cost
    pub enforce_lots: bool,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            size: 1000.0,
            threshold_pct: 0.5,
            workers: 32,
            min_volume: 0.0,
            enforce_lots: false,
        }
    }
}

/// One emitted scan result
#[derive(Debug, Clone, Serialize)]
pub struct ScanRow {
    pub symbol: String,
    pub ask_venue: String,
    pub ask: f64,
    pub bid_venue: String,
    pub bid: f64,
    pub roi_pct: f64,
    pub profit: f64,
}

/// Per-venue data prefetched once per cycle, best-effort
struct VenuePrefetch {
    volumes: HashMap<String, f64>,
    limits: HashMap<String, MarketLimits>,
}

/// Keep symbols matching the quote set and base allow-list; optionally
/// drop pure stable/stable pairs. Quote set `ANY`/`*` (or empty) accepts
/// every quote.
pub fn filter_symbols(
    symbols: &HashSet<String>,
    quotes: &HashSet<String>,
    bases_allow: Option<&HashSet<String>>,
    skip_pure_stables: bool,
) -> HashSet<String> {
    let any_quote =
        quotes.is_empty() || quotes.contains("ANY") || quotes.contains("*");
    symbols
        .iter()
        .filter(|s| {
            let Some((base, quote)) = s.split_once('/') else {
                return false;
            };
            if skip_pure_stables && STABLES.contains(&base) && STABLES.contains(&quote) {
                return false;
            }
            if !any_quote && !quotes.contains(quote) {
                return false;
            }
            if let Some(allow) = bases_allow {
                if !allow.contains(base) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Symbols listed on at least `min_listings` venues, sorted for stable
/// iteration order
pub fn common_symbols(venue_symbols: &VenueSymbols, min_listings: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for symbols in venue_symbols.values() {
        for s in symbols {
            *counts.entry(s).or_default() += 1;
        }
    }
    let mut out: Vec<String> = counts
        .into_iter()
        .filter(|&(_, c)| c >= min_listings)
        .map(|(s, _)| s.to_string())
        .collect();
    out.sort();
    out
}

/// List every venue's spot symbols (empty set on failure) and apply the
/// symbol filters
pub async fn load_venue_symbols(
    clients: &ClientMap,
    quotes: &HashSet<String>,
    bases_allow: Option<&HashSet<String>>,
    skip_pure_stables: bool,
) -> VenueSymbols {
    let mut out = VenueSymbols::new();
    for (venue_id, client) in clients {
        let symbols = match client.list_spot_symbols().await {
            Ok(symbols) => symbols,
            Err(e) => {
                debug!("{venue_id}: spot symbol listing failed: {e}");
                HashSet::new()
            }
        };
        out.insert(
            venue_id.clone(),
            filter_symbols(&symbols, quotes, bases_allow, skip_pure_stables),
        );
    }
    out
}

async fn fetch_best_levels(
    client: &dyn MarketDataClient,
    symbol: &str,
) -> Result<(Option<f64>, Option<f64>), ConnectorError> {
    let book = client.fetch_order_book(symbol, BOOK_DEPTH).await?;
    Ok((book.best_ask(), book.best_bid()))
}

async fn prefetch_venue(
    venue_id: &str,
    client: &dyn MarketDataClient,
    symbols: &[String],
) -> VenuePrefetch {
    let volumes = match client.fetch_quote_volumes(symbols).await {
        Ok(volumes) => volumes,
        Err(e) => {
            debug!("{venue_id}: volume prefetch failed: {e}");
            HashMap::new()
        }
    };

    let mut limits = HashMap::new();
    for symbol in symbols {
        let value = match client.fetch_market_limits(symbol).await {
            Ok(value) => value,
            Err(e) => {
                debug!("{venue_id}: limits for {symbol} failed: {e}");
                MarketLimits::default()
            }
        };
        limits.insert(symbol.clone(), value);
    }

    VenuePrefetch { volumes, limits }
}

/// Runs one scan cycle and returns the emitted rows, unsorted. Stateless:
/// every cycle refetches everything. Callers typically sort descending by
/// ROI and truncate to a top-N.
pub async fn scan_symbols_once(
    clients: &ClientMap,
    venue_symbols: &VenueSymbols,
    symbols: &[String],
    params: &ScanParams,
) -> Vec<ScanRow> {
    let workers = params.workers.max(1);

    let prefetch: DashMap<String, VenuePrefetch> = DashMap::new();
    {
        let prefetch = &prefetch;
        stream::iter(clients.iter())
            .map(|(venue_id, client)| {
                let client = Arc::clone(client);
                async move {
                    let snapshot = prefetch_venue(venue_id, client.as_ref(), symbols).await;
                    prefetch.insert(venue_id.clone(), snapshot);
                }
            })
            .buffer_unordered(workers)
            .collect::<Vec<()>>()
            .await;
    }

    let mut rows = Vec::new();

    for symbol in symbols {
        let listing: Vec<(&String, &Arc<dyn MarketDataClient>)> = clients
            .iter()
            .filter(|(venue_id, _)| {
                venue_symbols
                    .get(*venue_id)
                    .is_some_and(|s| s.contains(symbol))
            })
            .collect();
        if listing.len() < 2 {
            continue;
        }

        // Explicit per-venue outcomes, bounded fan-out re-created per symbol
        let outcomes: Vec<(String, Result<(Option<f64>, Option<f64>), ConnectorError>)> =
            stream::iter(listing)
                .map(|(venue_id, client)| {
                    let client = Arc::clone(client);
                    async move {
                        let result = fetch_best_levels(client.as_ref(), symbol).await;
                        (venue_id.clone(), result)
                    }
                })
                .buffer_unordered(workers)
                .collect()
                .await;

        // Min/max reduction; strict comparisons keep first arrival on ties
        let mut best_ask: Option<(f64, String)> = None;
        let mut best_bid: Option<(f64, String)> = None;
        for (venue_id, outcome) in outcomes {
            match outcome {
                Ok((ask, bid)) => {
                    if let Some(a) = ask {
                        if best_ask.as_ref().map_or(true, |(v, _)| a < *v) {
                            best_ask = Some((a, venue_id.clone()));
                        }
                    }
                    if let Some(b) = bid {
                        if best_bid.as_ref().map_or(true, |(v, _)| b > *v) {
                            best_bid = Some((b, venue_id));
                        }
                    }
                }
                Err(e) => debug!("{venue_id}: excluded for {symbol} this cycle: {e}"),
            }
        }

        let (Some((ask, ask_venue)), Some((bid, bid_venue))) = (best_ask, best_bid) else {
            continue;
        };
        // No cross-venue spread possible against a single venue
        if ask_venue == bid_venue {
            continue;
        }

        if params.min_volume > 0.0 {
            let volume_of = |venue: &str| {
                prefetch
                    .get(venue)
                    .and_then(|p| p.volumes.get(symbol).copied())
                    .unwrap_or(0.0)
            };
            if volume_of(&ask_venue) < params.min_volume || volume_of(&bid_venue) < params.min_volume {
                continue;
            }
        }

        let base_amount = params.size / ask;

        if params.enforce_lots {
            let limits_of = |venue: &str| {
                prefetch
                    .get(venue)
                    .and_then(|p| p.limits.get(symbol).copied())
                    .unwrap_or_default()
            };
            let la = limits_of(&ask_venue);
            let lb = limits_of(&bid_venue);
            if la.min_amount > 0.0 && base_amount < la.min_amount {
                continue;
            }
            if la.min_cost > 0.0 && params.size < la.min_cost {
                continue;
            }
            if lb.min_amount > 0.0 && base_amount < lb.min_amount {
                continue;
            }
        }

        let cost = params.size;
        let proceeds = bid * base_amount;
        let profit = proceeds - cost;
        let roi_pct = if cost > 0.0 { 100.0 * profit / cost } else { 0.0 };

        if roi_pct >= params.threshold_pct {
            rows.push(ScanRow {
                symbol: symbol.clone(),
                ask_venue,
                ask,
                bid_venue,
                bid,
                roi_pct,
                profit,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::mock::MockVenue;

    fn setup(venues: Vec<MockVenue>) -> ClientMap {
        let mut clients = ClientMap::new();
        for venue in venues {
            clients.insert(venue.venue_id().to_string(), Arc::new(venue));
        }
        clients
    }

    async fn symbols_for(clients: &ClientMap) -> VenueSymbols {
        let quotes = HashSet::from(["USDT".to_string()]);
        load_venue_symbols(clients, &quotes, None, false).await
    }

    fn params(threshold_pct: f64) -> ScanParams {
        ScanParams {
            size: 1000.0,
            threshold_pct,
            workers: 4,
            min_volume: 0.0,
            enforce_lots: false,
        }
    }

    #[tokio::test]
    async fn emits_cross_venue_row_with_expected_roi() {
        let a = MockVenue::new("a").with_book("BTC/USDT", &[(99.0, 100.0)], &[(100.0, 100.0)]);
        let b = MockVenue::new("b").with_book("BTC/USDT", &[(105.0, 100.0)], &[(106.0, 100.0)]);
        let clients = setup(vec![a, b]);
        let venue_symbols = symbols_for(&clients).await;

        let rows = scan_symbols_once(
            &clients,
            &venue_symbols,
            &["BTC/USDT".to_string()],
            &params(1.0),
        )
        .await;

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.ask_venue, "a");
        assert_eq!(row.bid_venue, "b");
        assert_eq!(row.ask, 100.0);
        assert_eq!(row.bid, 105.0);
        // 1000 buys 10 units at 100, sold at 105 -> 5% ROI, 50 profit
        assert!((row.roi_pct - 5.0).abs() < 1e-9);
        assert!((row.profit - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn same_venue_best_ask_and_bid_is_excluded() {
        // Venue a has both the lowest ask and the highest bid
        let a = MockVenue::new("a").with_book("BTC/USDT", &[(99.0, 10.0)], &[(100.0, 10.0)]);
        let b = MockVenue::new("b").with_book("BTC/USDT", &[(98.0, 10.0)], &[(101.0, 10.0)]);
        let clients = setup(vec![a, b]);
        let venue_symbols = symbols_for(&clients).await;

        let rows = scan_symbols_once(
            &clients,
            &venue_symbols,
            &["BTC/USDT".to_string()],
            &params(0.0),
        )
        .await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn min_volume_filter_excludes_thin_markets() {
        let a = MockVenue::new("a")
            .with_book("BTC/USDT", &[(99.0, 100.0)], &[(100.0, 100.0)])
            .with_volume("BTC/USDT", 50_000.0);
        let b = MockVenue::new("b")
            .with_book("BTC/USDT", &[(105.0, 100.0)], &[(106.0, 100.0)])
            .with_volume("BTC/USDT", 50_000.0);
        let clients = setup(vec![a, b]);
        let venue_symbols = symbols_for(&clients).await;

        let mut p = params(0.0);
        p.min_volume = 100_000.0;
        let rows =
            scan_symbols_once(&clients, &venue_symbols, &["BTC/USDT".to_string()], &p).await;
        assert!(rows.is_empty());

        p.min_volume = 10_000.0;
        let rows =
            scan_symbols_once(&clients, &venue_symbols, &["BTC/USDT".to_string()], &p).await;
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn lot_filter_excludes_below_min_cost() {
        let a = MockVenue::new("a")
            .with_book("BTC/USDT", &[(99.0, 100.0)], &[(100.0, 100.0)])
            .with_limits("BTC/USDT", 0.0, 2000.0);
        let b = MockVenue::new("b").with_book("BTC/USDT", &[(105.0, 100.0)], &[(106.0, 100.0)]);
        let clients = setup(vec![a, b]);
        let venue_symbols = symbols_for(&clients).await;

        let mut p = params(0.0);
        p.enforce_lots = true;
        // size 1000 is below venue a's min cost of 2000
        let rows =
            scan_symbols_once(&clients, &venue_symbols, &["BTC/USDT".to_string()], &p).await;
        assert!(rows.is_empty());

        p.enforce_lots = false;
        let rows =
            scan_symbols_once(&clients, &venue_symbols, &["BTC/USDT".to_string()], &p).await;
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn lot_filter_excludes_below_min_amount() {
        // 1000 quote at ask 100 buys 10 base, below the bid venue's 50 minimum
        let a = MockVenue::new("a").with_book("BTC/USDT", &[(99.0, 100.0)], &[(100.0, 100.0)]);
        let b = MockVenue::new("b")
            .with_book("BTC/USDT", &[(105.0, 100.0)], &[(106.0, 100.0)])
            .with_limits("BTC/USDT", 50.0, 0.0);
        let clients = setup(vec![a, b]);
        let venue_symbols = symbols_for(&clients).await;

        let mut p = params(0.0);
        p.enforce_lots = true;
        let rows =
            scan_symbols_once(&clients, &venue_symbols, &["BTC/USDT".to_string()], &p).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn failing_venue_is_excluded_without_killing_the_cycle() {
        let a = MockVenue::new("a").with_book("BTC/USDT", &[(99.0, 100.0)], &[(100.0, 100.0)]);
        let b = MockVenue::new("b").with_book("BTC/USDT", &[(105.0, 100.0)], &[(106.0, 100.0)]);
        let c = MockVenue::new("c")
            .with_book("BTC/USDT", &[(200.0, 100.0)], &[(201.0, 100.0)])
            .failing();
        let clients = setup(vec![a, b, c]);

        // Venue c claims the symbol but every fetch fails
        let mut venue_symbols = symbols_for(&clients).await;
        venue_symbols.insert(
            "c".to_string(),
            HashSet::from(["BTC/USDT".to_string()]),
        );

        let rows = scan_symbols_once(
            &clients,
            &venue_symbols,
            &["BTC/USDT".to_string()],
            &params(0.0),
        )
        .await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bid_venue, "b");
    }

    #[tokio::test]
    async fn symbol_on_one_venue_only_is_skipped() {
        let a = MockVenue::new("a").with_book("BTC/USDT", &[(99.0, 10.0)], &[(100.0, 10.0)]);
        let b = MockVenue::new("b").with_book("ETH/USDT", &[(9.0, 10.0)], &[(10.0, 10.0)]);
        let clients = setup(vec![a, b]);
        let venue_symbols = symbols_for(&clients).await;

        let rows = scan_symbols_once(
            &clients,
            &venue_symbols,
            &["BTC/USDT".to_string(), "ETH/USDT".to_string()],
            &params(0.0),
        )
        .await;
        assert!(rows.is_empty());
    }

    #[test]
    fn filter_symbols_applies_quote_base_and_stable_rules() {
        let symbols: HashSet<String> = ["BTC/USDT", "ETH/BTC", "USDC/USDT", "bad-symbol"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let quotes = HashSet::from(["USDT".to_string()]);
        let filtered = filter_symbols(&symbols, &quotes, None, true);
        assert_eq!(filtered, HashSet::from(["BTC/USDT".to_string()]));

        let any = HashSet::from(["ANY".to_string()]);
        let filtered = filter_symbols(&symbols, &any, None, false);
        assert_eq!(filtered.len(), 3);

        let allow = HashSet::from(["ETH".to_string()]);
        let filtered = filter_symbols(&symbols, &any, Some(&allow), false);
        assert_eq!(filtered, HashSet::from(["ETH/BTC".to_string()]));
    }

    #[test]
    fn common_symbols_requires_min_listings() {
        let mut venue_symbols = VenueSymbols::new();
        venue_symbols.insert(
            "a".to_string(),
            HashSet::from(["BTC/USDT".to_string(), "ETH/USDT".to_string()]),
        );
        venue_symbols.insert("b".to_string(), HashSet::from(["BTC/USDT".to_string()]));

        assert_eq!(common_symbols(&venue_symbols, 2), vec!["BTC/USDT"]);
        assert_eq!(
            common_symbols(&venue_symbols, 1),
            vec!["BTC/USDT", "ETH/USDT"]
        );
    }
}
