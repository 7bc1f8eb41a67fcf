use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use analyzer::ScoringConfig;
use common::{Config, Error, MarketData};

use crate::store::{RefreshOutcome, SetupCache};

/// Drives periodic re-analysis of the watchlist and exposes the same refresh
/// path for on-demand triggers, so a manual refresh and the timer can never
/// produce different results for the same inputs.
pub struct Refresher {
    cache: Arc<SetupCache>,
    feed: Arc<dyn MarketData>,
    scoring: ScoringConfig,
    symbols: Vec<String>,
    interval: Duration,
    timeout: Duration,
    concurrency: usize,
    last_cycle: RwLock<Option<DateTime<Utc>>>,
}

impl Refresher {
    pub fn new(
        cache: Arc<SetupCache>,
        feed: Arc<dyn MarketData>,
        scoring: ScoringConfig,
        symbols: Vec<String>,
        config: &Config,
    ) -> Self {
        Self {
            cache,
            feed,
            scoring,
            symbols,
            interval: Duration::from_secs(config.refresh_interval_secs),
            timeout: Duration::from_secs(config.refresh_timeout_secs),
            concurrency: config.refresh_concurrency,
            last_cycle: RwLock::new(None),
        }
    }

    pub fn cache(&self) -> &SetupCache {
        &self.cache
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Completion time of the most recent full cycle, if one has finished.
    pub async fn last_cycle(&self) -> Option<DateTime<Utc>> {
        *self.last_cycle.read().await
    }

    /// Fetch, analyze and store one symbol. Serialized per symbol by the
    /// cache's single-flight gate; a call racing an in-flight refresh joins
    /// its result instead of hitting the feed again.
    pub async fn refresh_symbol(&self, symbol: &str) -> RefreshOutcome {
        let outcome = self
            .cache
            .refresh(symbol, || async {
                let work = async {
                    let snapshot = self.feed.snapshot(symbol).await?;
                    analyzer::analyze(&snapshot, &self.scoring)
                };
                match tokio::time::timeout(self.timeout, work).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout {
                        symbol: symbol.to_string(),
                    }),
                }
            })
            .await;

        match &outcome {
            RefreshOutcome::Refreshed(cached) => {
                debug!(
                    symbol,
                    score = cached.setup.overall_score,
                    signal = %cached.setup.signal,
                    "setup refreshed"
                );
            }
            RefreshOutcome::Joined(_) => {
                debug!(symbol, "joined in-flight refresh");
            }
            RefreshOutcome::Failed { stale, error } => {
                warn!(
                    symbol,
                    %error,
                    serving_stale = stale.is_some(),
                    "refresh failed"
                );
            }
        }
        outcome
    }

    /// One full cycle over the watchlist with bounded concurrency. A failing
    /// symbol never blocks the rest of the cycle.
    pub async fn refresh_all(&self) {
        let started = std::time::Instant::now();
        let results: Vec<bool> = stream::iter(self.symbols.clone())
            .map(|symbol| async move {
                !matches!(
                    self.refresh_symbol(&symbol).await,
                    RefreshOutcome::Failed { .. }
                )
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let ok = results.iter().filter(|&&r| r).count();
        let failed = results.len() - ok;
        info!(
            ok,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "refresh cycle complete"
        );
        *self.last_cycle.write().await = Some(Utc::now());
    }

    /// Periodic refresh loop. The first tick fires immediately so the cache
    /// is populated at startup.
    pub async fn run(self: Arc<Self>) {
        info!(
            symbols = self.symbols.len(),
            interval_secs = self.interval.as_secs(),
            "refresher started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh_all().await;
        }
    }
}
