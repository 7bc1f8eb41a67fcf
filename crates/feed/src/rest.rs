use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use common::{Candle, CandleSeries, Error, MarketData, MarketSnapshot, Result};

/// The contracts endpoint carries a full ticker per market; refetching it for
/// every symbol in a cycle would hammer the indexer for identical data.
const CONTRACTS_CACHE_TTL: Duration = Duration::from_secs(30);
const ORDERBOOK_DEPTH: u32 = 5;
const TRADES_LIMIT: u32 = 500;
/// Below this many trades an OHLCV series is noise, not history.
const MIN_TRADES_FOR_CANDLES: usize = 10;

/// REST client for a perp DEX with a gateway/archive split: the archive
/// (indexer) serves contracts, orderbooks and trades.
pub struct RestFeed {
    archive_url: Url,
    http: Client,
    contracts: RwLock<Option<(Instant, HashMap<String, Contract>)>>,
}

impl RestFeed {
    pub fn new(archive_url: &str) -> Result<Self> {
        let archive_url = Url::parse(archive_url)
            .map_err(|e| Error::Config(format!("invalid archive URL '{archive_url}': {e}")))?;
        Ok(Self {
            archive_url,
            http: Client::builder()
                .use_rustls_tls()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            contracts: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.archive_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("archive URL cannot be a base".to_string()))?
            .extend(["v2", path]);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status} from {url}: {body}")));
        }
        serde_json::from_str(&body).map_err(Error::from)
    }

    /// Full contracts map, served from the short-lived in-process cache when
    /// fresh enough.
    async fn contracts(&self) -> Result<HashMap<String, Contract>> {
        if let Some((fetched_at, contracts)) = self.contracts.read().await.as_ref() {
            if fetched_at.elapsed() < CONTRACTS_CACHE_TTL {
                return Ok(contracts.clone());
            }
        }

        let contracts: HashMap<String, Contract> =
            self.get_json(self.endpoint("contracts")?).await?;
        debug!(count = contracts.len(), "fetched contracts");
        *self.contracts.write().await = Some((Instant::now(), contracts.clone()));
        Ok(contracts)
    }

    async fn contract(&self, symbol: &str) -> Result<Contract> {
        self.contracts()
            .await?
            .remove(symbol)
            .ok_or_else(|| Error::Exchange(format!("unknown ticker '{symbol}'")))
    }

    /// Best bid/ask from the top of the book.
    async fn top_of_book(&self, symbol: &str) -> Result<(f64, f64)> {
        let mut url = self.endpoint("orderbook")?;
        url.query_pairs_mut()
            .append_pair("ticker_id", symbol)
            .append_pair("depth", &ORDERBOOK_DEPTH.to_string());
        let book: Orderbook = self.get_json(url).await?;

        match (book.bids.first(), book.asks.first()) {
            (Some(bid), Some(ask)) => Ok((bid.price.0, ask.price.0)),
            _ => Err(Error::Exchange(format!(
                "{symbol}: orderbook has no liquidity"
            ))),
        }
    }

    async fn trades(&self, symbol: &str) -> Result<Vec<Trade>> {
        let mut url = self.endpoint("trades")?;
        url.query_pairs_mut()
            .append_pair("ticker_id", symbol)
            .append_pair("limit", &TRADES_LIMIT.to_string());
        self.get_json(url).await
    }

    /// Hourly candles for a symbol, aggregated from recent trades. The
    /// indexer has no candlestick endpoint; an empty series is a valid
    /// answer for thin markets and the scorers degrade on it explicitly.
    async fn candles(&self, symbol: &str) -> Result<CandleSeries> {
        let trades = self.trades(symbol).await?;
        if trades.len() < MIN_TRADES_FOR_CANDLES {
            debug!(symbol, trades = trades.len(), "too few trades for candles");
            return Ok(CandleSeries::default());
        }
        candles_from_trades(trades)
    }
}

#[async_trait]
impl MarketData for RestFeed {
    async fn symbols(&self) -> Result<Vec<String>> {
        let contracts = self.contracts().await?;
        let mut symbols: Vec<String> = contracts
            .into_iter()
            .filter(|(_, c)| c.product_type.as_deref() == Some("perpetual"))
            .map(|(ticker_id, _)| ticker_id)
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        let contract = self.contract(symbol).await?;
        let (bid, ask) = self.top_of_book(symbol).await?;
        let candles = self.candles(symbol).await?;

        let last_price = contract.last_price.0;
        let snapshot = MarketSnapshot {
            symbol: symbol.to_string(),
            last_price,
            // Fields the contract feed may omit stay None; substituting a
            // number here would make "unreported" indistinguishable from a
            // real quote downstream.
            mark_price: contract.mark_price.map(|n| n.0),
            index_price: contract.index_price.map(|n| n.0),
            bid,
            ask,
            volume_24h: contract.quote_volume.0,
            price_change_pct_24h: contract.price_change_percent_24h.0,
            funding_rate: contract.funding_rate.map(|n| n.0),
            candles,
            timestamp: Utc::now(),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Bucket trades into hourly OHLCV bars, ascending by hour.
fn candles_from_trades(mut trades: Vec<Trade>) -> Result<CandleSeries> {
    trades.sort_by(|a, b| {
        a.timestamp
            .partial_cmp(&b.timestamp)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    struct Bucket {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    }

    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();
    for trade in &trades {
        let price = trade.price.0;
        if price <= 0.0 || !price.is_finite() {
            continue;
        }
        let secs = normalize_timestamp(trade.timestamp);
        let hour = secs - secs.rem_euclid(3600);
        let volume = trade.quote_filled.0.abs();

        buckets
            .entry(hour)
            .and_modify(|b| {
                b.high = b.high.max(price);
                b.low = b.low.min(price);
                b.close = price;
                b.volume += volume;
            })
            .or_insert(Bucket {
                open: price,
                high: price,
                low: price,
                close: price,
                volume,
            });
    }

    let candles: Vec<Candle> = buckets
        .into_iter()
        .filter_map(|(hour, b)| {
            let timestamp = Utc.timestamp_opt(hour, 0).single()?;
            Some(Candle {
                timestamp,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
            })
        })
        .collect();

    CandleSeries::new(candles)
}

/// The trades feed mixes second and millisecond epochs.
fn normalize_timestamp(raw: f64) -> i64 {
    if raw > 1e10 {
        (raw / 1000.0) as i64
    } else {
        raw as i64
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

/// Numeric field the indexer serves either as a JSON number or a quoted
/// decimal string.
#[derive(Debug, Clone, Copy, Default)]
struct Num(f64);

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Num(v)),
            Raw::Text(s) => s.trim().parse().map(Num).map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Contract {
    #[serde(default)]
    product_type: Option<String>,
    last_price: Num,
    #[serde(default)]
    mark_price: Option<Num>,
    #[serde(default)]
    index_price: Option<Num>,
    #[serde(default)]
    funding_rate: Option<Num>,
    #[serde(default)]
    quote_volume: Num,
    #[serde(default)]
    price_change_percent_24h: Num,
}

#[derive(Debug, Deserialize)]
struct Orderbook {
    #[serde(default)]
    bids: Vec<BookLevel>,
    #[serde(default)]
    asks: Vec<BookLevel>,
}

#[derive(Debug, Deserialize)]
struct BookLevel {
    price: Num,
}

#[derive(Debug, Deserialize)]
struct Trade {
    timestamp: f64,
    price: Num,
    #[serde(default)]
    quote_filled: Num,
}
