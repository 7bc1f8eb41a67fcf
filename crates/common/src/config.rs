use serde::{Deserialize, Serialize};

/// All configuration loaded from environment variables at startup.
/// Every knob has a default so a bare `.env` still runs; the core never
/// reads the environment itself — these values are passed in as parameters.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange REST endpoint (archive/indexer)
    pub archive_url: String,

    // Serving
    pub listen_port: u16,

    // Refresh scheduling
    pub refresh_interval_secs: u64,
    pub refresh_concurrency: usize,
    pub refresh_timeout_secs: u64,

    // Scoring thresholds (see ScoringConfig in crates/analyzer)
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Per-interval funding rate considered extreme, as a fraction (0.01 = 1%).
    pub funding_rate_high: f64,
    pub funding_rate_low: f64,
    pub min_volume_24h: f64,
    pub max_spread_percent: f64,

    // Watchlist file path
    pub watchlist_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            archive_url: "https://archive.prod.nado.xyz".to_string(),
            listen_port: 8080,
            refresh_interval_secs: 60,
            refresh_concurrency: 8,
            refresh_timeout_secs: 10,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            funding_rate_high: 0.01,
            funding_rate_low: -0.01,
            min_volume_24h: 100_000.0,
            max_spread_percent: 0.5,
            watchlist_path: "config/markets.toml".to_string(),
        }
    }
}

impl Config {
    /// Load all configuration from environment variables, falling back to
    /// defaults. Loads `.env` if present. Panics on any unparseable value.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let defaults = Config::default();
        Config {
            archive_url: optional_env("ARCHIVE_URL").unwrap_or(defaults.archive_url),
            listen_port: parsed_env("LISTEN_PORT", defaults.listen_port),
            refresh_interval_secs: parsed_env(
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval_secs,
            ),
            refresh_concurrency: parsed_env("REFRESH_CONCURRENCY", defaults.refresh_concurrency),
            refresh_timeout_secs: parsed_env("REFRESH_TIMEOUT_SECS", defaults.refresh_timeout_secs),
            rsi_oversold: parsed_env("RSI_OVERSOLD", defaults.rsi_oversold),
            rsi_overbought: parsed_env("RSI_OVERBOUGHT", defaults.rsi_overbought),
            funding_rate_high: parsed_env("FUNDING_RATE_HIGH", defaults.funding_rate_high),
            funding_rate_low: parsed_env("FUNDING_RATE_LOW", defaults.funding_rate_low),
            min_volume_24h: parsed_env("MIN_VOLUME_24H", defaults.min_volume_24h),
            max_spread_percent: parsed_env("MAX_SPREAD_PERCENT", defaults.max_spread_percent),
            watchlist_path: optional_env("WATCHLIST_PATH").unwrap_or(defaults.watchlist_path),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            panic!("Environment variable '{key}' has unparseable value: '{raw}'")
        }),
        Err(_) => default,
    }
}

/// Watchlist of instruments to scan, loaded from a TOML file.
///
/// Example `config/markets.toml`:
/// ```toml
/// symbols = ["BTC-PERP_USDT0", "ETH-PERP_USDT0", "SOL-PERP_USDT0"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Watchlist {
    pub symbols: Vec<String>,
}

impl Watchlist {
    /// Load from a TOML file. Exits process on error — a missing watchlist
    /// means there is nothing to scan.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
            panic!("Failed to read watchlist file '{path}': {e}")
        });
        let watchlist: Watchlist = toml::from_str(&content).unwrap_or_else(|e| {
            panic!("Failed to parse watchlist file '{path}': {e}")
        });
        if watchlist.symbols.is_empty() {
            panic!("Watchlist file '{path}' lists no symbols");
        }
        watchlist
    }
}
