//! Scanner configuration
//!
//! Settings come from `ARB_`-prefixed environment variables (a `.env`
//! file is honored); CLI flags override them. The venue list, stable set
//! and fallback universe are explicit data so tests can override them
//! instead of reaching into the engine.

/// Venue ids scanned by default (region-blocked venues excluded by callers)
pub const DEFAULT_VENUES: &[&str] = &[
    "okx", "kraken", "kucoin", "gate", "bitget", "mexc", "coinex", "poloniex",
    "lbank", "xt", "whitebit", "bitmart", "phemex", "btse", "ascendex", "probit",
    "digifinex", "bittrex", "hitbtc", "huobi", "bitstamp", "bitvavo", "bitrue",
];

/// Fiat-pegged stable units; pure stable/stable pairs carry no signal
pub const STABLES: &[&str] = &["USDT", "USDC", "BUSD", "TUSD", "FDUSD", "DAI"];

/// Conservative static fallback of large-cap bases, used when the
/// market-cap lookup is unavailable
pub const DEFAULT_TOP_BASES: &[&str] = &[
    "BTC", "ETH", "BNB", "XRP", "SOL", "ADA", "DOGE", "TRX", "TON",
    "DOT", "MATIC", "AVAX", "SHIB", "LINK", "LTC", "BCH", "UNI",
    "XLM", "ATOM", "ETC", "APT", "ARB", "OP", "NEAR", "FIL", "INJ",
    "SUI", "TAO", "HBAR", "RNDR", "AAVE", "MKR", "ALGO", "FTM",
    "EGLD", "KAS", "XMR", "GRT", "BTT", "TIA", "JTO", "IMX", "SEI",
    "RUNE", "FLOW", "VET", "PEPE", "DYDX", "PYTH",
];

const ENV_PREFIX: &str = "ARB_";

#[derive(Debug, Clone)]
pub struct Settings {
    pub exchange_a: String,
    pub exchange_b: String,
    pub symbol: String,
    /// Notional size in quote units
    pub trade_size: f64,
    /// Minimum net ROI percent to report
    pub spread_threshold_pct: f64,
    pub p2p_fiat: String,
    /// Preferred transfer network (USDT/TRC20 default)
    pub network_pref: String,
    pub use_mock_data: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exchange_a: "binance".to_string(),
            exchange_b: "kraken".to_string(),
            symbol: "BTC/USDT".to_string(),
            trade_size: 1000.0,
            spread_threshold_pct: 0.5,
            p2p_fiat: "USD".to_string(),
            network_pref: "TRC20".to_string(),
            use_mock_data: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let d = Settings::default();
        Self {
            exchange_a: env_string("EXCHANGE_A", d.exchange_a),
            exchange_b: env_string("EXCHANGE_B", d.exchange_b),
            symbol: env_string("SYMBOL", d.symbol),
            trade_size: env_parse("TRADE_SIZE", d.trade_size),
            spread_threshold_pct: env_parse("SPREAD_THRESHOLD_PCT", d.spread_threshold_pct),
            p2p_fiat: env_string("P2P_FIAT", d.p2p_fiat),
            network_pref: env_string("NETWORK_PREF", d.network_pref),
            use_mock_data: env_bool("USE_MOCK_DATA", d.use_mock_data),
            log_level: env_string("LOG_LEVEL", d.log_level),
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(format!("{ENV_PREFIX}{key}")).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(format!("{ENV_PREFIX}{key}"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(format!("{ENV_PREFIX}{key}")) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}
