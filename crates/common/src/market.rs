use async_trait::async_trait;

use crate::{MarketSnapshot, Result};

/// Abstraction over the market-data source.
///
/// `RestFeed` in `crates/feed` implements this against the exchange REST API.
/// Tests implement it with canned snapshots. The scoring core never talks to
/// the network directly — everything arrives through this trait as a typed,
/// validated `MarketSnapshot`.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// List the perpetual instruments available for scanning.
    async fn symbols(&self) -> Result<Vec<String>>;

    /// Fetch a full snapshot (ticker, funding, candles) for one symbol.
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot>;
}
