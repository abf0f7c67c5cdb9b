//! Plain-text rendering of scan results and order books, plus CSV export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::models::OrderBook;
use crate::scanner::ScanRow;

/// Render a scan snapshot as an aligned text table, newest cycle header
/// first
pub fn render_rows(rows: &[ScanRow]) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();
    out.push_str(&format!("== Arbitrage scan @ {timestamp} ==\n"));
    out.push_str(&format!(
        "{:<12} {:<10} {:>12} {:<10} {:>12} {:>8} {:>10}\n",
        "Symbol", "Ask Ex", "Ask", "Bid Ex", "Bid", "ROI %", "Profit"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<12} {:<10} {:>12.4} {:<10} {:>12.4} {:>8.2} {:>10.2}\n",
            row.symbol, row.ask_venue, row.ask, row.bid_venue, row.bid, row.roi_pct, row.profit
        ));
    }
    if rows.is_empty() {
        out.push_str("(no opportunities this cycle)\n");
    }
    out
}

/// Render the top levels of one order book
pub fn render_book(title: &str, book: &OrderBook, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {title} ==\n"));
    out.push_str("ASKS:\n");
    for level in book.asks.iter().take(limit) {
        out.push_str(&format!("  {:.2} x {:.4}\n", level.price, level.amount));
    }
    out.push_str("BIDS:\n");
    for level in book.bids.iter().take(limit) {
        out.push_str(&format!("  {:.2} x {:.4}\n", level.price, level.amount));
    }
    out
}

/// Overwrite `path` with the latest snapshot
pub fn export_csv(path: &Path, rows: &[ScanRow]) -> eyre::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(
        writer,
        "symbol,ask_exchange,ask,bid_exchange,bid,roi_pct,profit"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            row.symbol, row.ask_venue, row.ask, row.bid_venue, row.bid, row.roi_pct, row.profit
        )?;
    }
    writer.flush()?;
    Ok(())
}
