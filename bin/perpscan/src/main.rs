use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use analyzer::ScoringConfig;
use api::AppState;
use cache::{Refresher, SetupCache};
use common::{Config, Watchlist};
use feed::RestFeed;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let watchlist = Watchlist::load(&cfg.watchlist_path);
    info!(
        symbols = watchlist.symbols.len(),
        interval_secs = cfg.refresh_interval_secs,
        "PerpScan starting"
    );

    // ── Market data feed ──────────────────────────────────────────────────────
    let feed = RestFeed::new(&cfg.archive_url)
        .unwrap_or_else(|e| panic!("Failed to build market data feed: {e}"));

    // ── Cache + refresher ─────────────────────────────────────────────────────
    let cache = Arc::new(SetupCache::new());
    let refresher = Arc::new(Refresher::new(
        cache,
        Arc::new(feed),
        ScoringConfig::from(&cfg),
        watchlist.symbols,
        &cfg,
    ));
    tokio::spawn(refresher.clone().run());

    // ── API server ────────────────────────────────────────────────────────────
    api::serve(AppState::new(refresher), cfg.listen_port).await;
}
