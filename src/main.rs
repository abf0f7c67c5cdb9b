use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use eyre::Result;
use tokio::time::interval;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod book;
mod config;
mod connectors;
mod display;
mod error;
mod fees;
mod models;
mod scanner;
mod strategies;
mod universe;

use config::Settings;
use connectors::mock;
use connectors::p2p::BinanceP2PClient;
use connectors::MarketDataClient;
use fees::FeeService;
use models::TradeType;
use scanner::{common_symbols, load_venue_symbols, scan_symbols_once, ClientMap, ScanParams};
use strategies::{find_cex_cex_opportunity, plan_multi_leg_path};

#[derive(Parser)]
#[command(name = "arb-scanner")]
#[command(about = "Order-book-aware crypto arbitrage scanner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one symbol across two venues, plus a multi-leg P2P path (default)
    Check {
        /// Symbol, e.g. BTC/USDT
        #[arg(long)]
        symbol: Option<String>,

        /// Trade size in quote units
        #[arg(long)]
        size: Option<f64>,

        /// Minimum ROI percent to report
        #[arg(long)]
        threshold: Option<f64>,

        /// Fetch live P2P adverts instead of canned quotes
        #[arg(long, default_value = "false")]
        live_p2p: bool,
    },

    /// Scan many symbols across the venue set on an interval
    Scan {
        /// Quote size to simulate profit
        #[arg(long, default_value = "1000.0")]
        size: f64,

        /// Min ROI percent to display
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Min 24h quote volume on both chosen venues (0 disables)
        #[arg(long, default_value = "0.0")]
        min_volume: f64,

        /// Max parallel requests per symbol
        #[arg(long, default_value = "32")]
        workers: usize,

        /// Refresh seconds
        #[arg(long, default_value = "4.0")]
        interval: f64,

        /// Top rows by ROI
        #[arg(long, default_value = "50")]
        top: usize,

        /// Comma-separated quotes, or ANY
        #[arg(long, default_value = "USDT")]
        quotes: String,

        /// Comma-separated bases; empty uses the market-cap preset
        #[arg(long, default_value = "")]
        bases: String,

        /// Size of the market-cap preset when --bases is empty
        #[arg(long, default_value = "100")]
        top_bases: usize,

        /// Limit number of symbols scanned
        #[arg(long, default_value = "500")]
        limit_symbols: usize,

        /// Skip pure stable/stable pairs
        #[arg(long)]
        skip_stables: bool,

        /// Respect min lot and min cost per venue
        #[arg(long)]
        enforce_lots: bool,

        /// Export last snapshot to a CSV path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Stop after N cycles (0 = run forever)
        #[arg(long, default_value = "0")]
        cycles: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let mut settings = Settings::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        None => run_check(settings, false).await,
        Some(Commands::Check {
            symbol,
            size,
            threshold,
            live_p2p,
        }) => {
            if let Some(symbol) = symbol {
                settings.symbol = symbol;
            }
            if let Some(size) = size {
                settings.trade_size = size;
            }
            if let Some(threshold) = threshold {
                settings.spread_threshold_pct = threshold;
            }
            run_check(settings, live_p2p).await
        }
        Some(Commands::Scan {
            size,
            threshold,
            min_volume,
            workers,
            interval,
            top,
            quotes,
            bases,
            top_bases,
            limit_symbols,
            skip_stables,
            enforce_lots,
            export,
            cycles,
        }) => {
            let params = ScanParams {
                size,
                threshold_pct: threshold,
                workers,
                min_volume,
                enforce_lots,
            };
            run_scan(
                params,
                interval,
                top,
                &quotes,
                &bases,
                top_bases,
                limit_symbols,
                skip_stables,
                export,
                cycles,
            )
            .await
        }
    }
}

/// Single-pair demo: two-venue spread plus a multi-leg P2P path, against
/// the canned venue pair
async fn run_check(settings: Settings, live_p2p: bool) -> Result<()> {
    let (base, quote) = settings
        .symbol
        .split_once('/')
        .ok_or_else(|| eyre::eyre!("symbol must be BASE/QUOTE, got {}", settings.symbol))?;

    if !settings.use_mock_data {
        warn!("live venue connectivity is not configured; using deterministic mock venues");
    }

    let fee_service = FeeService::default();
    let (venue_a, venue_b) = mock::mock_pair(&settings.exchange_a, &settings.exchange_b, &settings.symbol);

    let book_a = venue_a.fetch_order_book(&settings.symbol, 20).await?;
    let book_b = venue_b.fetch_order_book(&settings.symbol, 20).await?;
    println!(
        "{}",
        display::render_book(&format!("{} {}", book_a.exchange_id, settings.symbol), &book_a, 5)
    );
    println!(
        "{}",
        display::render_book(&format!("{} {}", book_b.exchange_id, settings.symbol), &book_b, 5)
    );

    let fees_a = fee_service.trading_fees(venue_a.fetch_trading_fees(Some(settings.symbol.as_str())).await.ok());
    let fees_b = fee_service.trading_fees(venue_b.fetch_trading_fees(Some(settings.symbol.as_str())).await.ok());

    let transfer_fee_in_base = if base == "USDT" {
        fee_service.transfer_fee(base, &settings.network_pref).fee_amount
    } else {
        0.0
    };

    match find_cex_cex_opportunity(
        base,
        quote,
        settings.trade_size,
        &book_a,
        &book_b,
        &fees_a,
        &fees_b,
        settings.spread_threshold_pct,
        transfer_fee_in_base,
    ) {
        Some(opp) => info!(
            "[{}] ROI {:.2}% | profit ~{:.2} {} | {}",
            opp.kind, opp.expected_roi_pct, opp.expected_profit, quote, opp.description
        ),
        None => info!(
            "no two-venue opportunity above {:.2}% on {}",
            settings.spread_threshold_pct, settings.symbol
        ),
    }

    // Multi-leg demo: P2P buy USDT, transfer, sell at venue B's best bid
    let p2p_quotes = if live_p2p {
        match BinanceP2PClient::new()
            .fetch_quotes("USDT", &settings.p2p_fiat, TradeType::Buy, 5)
            .await
        {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("live P2P fetch failed, using canned quotes: {e}");
                mock::p2p_buy_quotes("USDT", &settings.p2p_fiat)
            }
        }
    } else {
        mock::p2p_buy_quotes("USDT", &settings.p2p_fiat)
    };

    let Some(p2p_buy) = p2p_quotes.first() else {
        info!("no P2P adverts available");
        return Ok(());
    };
    let Some(sell_price_b) = book_b.best_bid() else {
        info!("no bids on {}", book_b.exchange_id);
        return Ok(());
    };

    let transfer = fee_service.transfer_fee("USDT", &settings.network_pref);
    let multi = plan_multi_leg_path(
        p2p_buy,
        sell_price_b,
        &fees_b,
        transfer.fee_amount,
        settings.trade_size,
        &settings.p2p_fiat,
        "USDT",
    );
    match multi {
        // The strategy only gates on roi > 0; the configured threshold
        // applies here
        Some(m) if m.expected_roi_pct >= settings.spread_threshold_pct => info!(
            "[{}] ROI {:.2}% | profit ~{:.2} {} | {}",
            m.kind, m.expected_roi_pct, m.expected_profit, settings.p2p_fiat, m.description
        ),
        _ => info!(
            "no multi-leg opportunity above {:.2}%",
            settings.spread_threshold_pct
        ),
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_scan(
    params: ScanParams,
    interval_secs: f64,
    top: usize,
    quotes: &str,
    bases: &str,
    top_bases: usize,
    limit_symbols: usize,
    skip_stables: bool,
    export: Option<PathBuf>,
    cycles: u64,
) -> Result<()> {
    let quotes: HashSet<String> = quotes
        .split(',')
        .map(|q| q.trim().to_uppercase())
        .filter(|q| !q.is_empty())
        .collect();

    let bases_allow: Option<HashSet<String>> = if bases.is_empty() {
        Some(universe::top_bases_by_market_cap(top_bases).await.into_iter().collect())
    } else {
        Some(
            bases
                .split(',')
                .map(|b| b.trim().to_uppercase())
                .filter(|b| !b.is_empty())
                .collect(),
        )
    };

    let mut clients = ClientMap::new();
    for venue in mock::mock_scan_venues() {
        clients.insert(venue.venue_id().to_string(), Arc::new(venue));
    }
    if clients.is_empty() {
        println!("No venues available");
        return Ok(());
    }

    let venue_symbols =
        load_venue_symbols(&clients, &quotes, bases_allow.as_ref(), skip_stables).await;
    let mut symbols = common_symbols(&venue_symbols, 2);
    symbols.truncate(limit_symbols);
    if symbols.is_empty() {
        println!("No common symbols across venues");
        return Ok(());
    }
    info!(
        "scanning {} symbols across {} venues",
        symbols.len(),
        clients.len()
    );

    let mut ticker = interval(Duration::from_secs_f64(interval_secs.max(0.1)));
    let mut completed = 0u64;
    loop {
        ticker.tick().await;

        let mut rows = scan_symbols_once(&clients, &venue_symbols, &symbols, &params).await;
        rows.sort_by(|a, b| b.roi_pct.total_cmp(&a.roi_pct));
        rows.truncate(top);

        println!("{}", display::render_rows(&rows));
        if let Some(path) = &export {
            if let Err(e) = display::export_csv(path, &rows) {
                warn!("csv export failed: {e}");
            }
        }

        completed += 1;
        if cycles > 0 && completed >= cycles {
            break;
        }
    }

    Ok(())
}
