use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One OHLCV bar for a fixed time bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered candle history for one symbol, ascending by time.
///
/// Construction validates the series once so the indicator code downstream
/// never has to re-check ordering or sanity of individual bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a validated series. Rejects out-of-order or duplicate
    /// timestamps, non-finite or non-positive prices, and negative volume.
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        for (i, c) in candles.iter().enumerate() {
            let prices = [c.open, c.high, c.low, c.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(Error::InvalidSnapshot(format!(
                    "candle {i} has non-positive or non-finite price"
                )));
            }
            if c.high < c.low {
                return Err(Error::InvalidSnapshot(format!(
                    "candle {i} has high < low"
                )));
            }
            if !c.volume.is_finite() || c.volume < 0.0 {
                return Err(Error::InvalidSnapshot(format!(
                    "candle {i} has invalid volume"
                )));
            }
            if i > 0 && c.timestamp <= candles[i - 1].timestamp {
                return Err(Error::InvalidSnapshot(format!(
                    "candle {i} is not strictly after its predecessor"
                )));
            }
        }
        Ok(Self { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }
}

/// Normalized market state for one symbol at one refresh cycle.
/// Built once by the market-data collaborator; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub last_price: f64,
    /// `None` when the venue did not report a mark price.
    pub mark_price: Option<f64>,
    /// `None` when the venue did not report an index price.
    pub index_price: Option<f64>,
    pub bid: f64,
    pub ask: f64,
    pub volume_24h: f64,
    pub price_change_pct_24h: f64,
    /// Per-interval funding rate as a fraction (0.0001 = 0.01%). `None` when
    /// the venue did not report one — a missing rate is not a zero rate, and
    /// the funding scorer degrades rather than pretending it saw 0.
    pub funding_rate: Option<f64>,
    pub candles: CandleSeries,
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Reject malformed snapshots before any indicator work runs.
    /// A zero value here is a data error, not "unknown" — unknown fields
    /// are `None`, never a placeholder number.
    pub fn validate(&self) -> Result<()> {
        let must_be_positive = [
            ("last_price", Some(self.last_price)),
            ("mark_price", self.mark_price),
            ("index_price", self.index_price),
            ("bid", Some(self.bid)),
            ("ask", Some(self.ask)),
        ];
        for (name, value) in must_be_positive {
            let Some(value) = value else { continue };
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSnapshot(format!(
                    "{}: {name} must be positive, got {value}",
                    self.symbol
                )));
            }
        }
        if self.bid > self.ask {
            return Err(Error::InvalidSnapshot(format!(
                "{}: crossed book (bid {} > ask {})",
                self.symbol, self.bid, self.ask
            )));
        }
        if !self.volume_24h.is_finite() || self.volume_24h < 0.0 {
            return Err(Error::InvalidSnapshot(format!(
                "{}: invalid 24h volume {}",
                self.symbol, self.volume_24h
            )));
        }
        if let Some(rate) = self.funding_rate {
            if !rate.is_finite() {
                return Err(Error::InvalidSnapshot(format!(
                    "{}: non-finite funding rate",
                    self.symbol
                )));
            }
        }
        Ok(())
    }

    /// Bid/ask spread as a percentage of the mid price.
    pub fn spread_percent(&self) -> f64 {
        let mid = (self.bid + self.ask) / 2.0;
        if mid <= 0.0 {
            return 0.0;
        }
        (self.ask - self.bid) / mid * 100.0
    }
}

/// Indicator values derived from one candle series. `None` means the series
/// was too short for that indicator's window — never "zero".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indicators {
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub adx_14: Option<f64>,
    pub atr_14: Option<f64>,
}

/// One scorer's output: a 0–100 sub-score plus the qualitative factors
/// behind it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: f64,
    pub bullish: Vec<String>,
    pub bearish: Vec<String>,
    pub warnings: Vec<String>,
}

impl ComponentScore {
    /// Documented fallback when a scorer's inputs are unavailable.
    pub const NEUTRAL: f64 = 50.0;

    pub fn neutral(warning: impl Into<String>) -> Self {
        Self {
            score: Self::NEUTRAL,
            warnings: vec![warning.into()],
            ..Self::default()
        }
    }
}

/// The five sub-scores, in evaluation (and weight) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentScores {
    pub trend: ComponentScore,
    pub momentum: ComponentScore,
    pub funding: ComponentScore,
    pub liquidity: ComponentScore,
    pub volatility: ComponentScore,
}

/// Candidate trade direction for direction-aware scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Discrete classification of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Signal {
    pub fn is_long(&self) -> bool {
        matches!(self, Signal::Buy | Signal::StrongBuy)
    }

    pub fn is_short(&self) -> bool {
        matches!(self, Signal::Sell | Signal::StrongSell)
    }

    pub fn matches_direction(&self, direction: Direction) -> bool {
        match direction {
            Direction::Long => self.is_long(),
            Direction::Short => self.is_short(),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::StrongBuy => write!(f, "strong_buy"),
            Signal::Buy => write!(f, "buy"),
            Signal::Neutral => write!(f, "neutral"),
            Signal::Sell => write!(f, "sell"),
            Signal::StrongSell => write!(f, "strong_sell"),
        }
    }
}

/// Quality tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupQuality {
    Excellent,
    Good,
    Average,
    Poor,
}

impl std::fmt::Display for SetupQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupQuality::Excellent => write!(f, "excellent"),
            SetupQuality::Good => write!(f, "good"),
            SetupQuality::Average => write!(f, "average"),
            SetupQuality::Poor => write!(f, "poor"),
        }
    }
}

/// Suggested position risk tier. Higher volatility maps to higher risk and
/// lower suggested leverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Complete scored setup for one symbol. Immutable once produced; the cache
/// replaces the whole value on refresh, never patches fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setup {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,

    // Market context carried through for consumers
    pub last_price: f64,
    pub funding_rate: Option<f64>,
    pub volume_24h: f64,
    pub price_change_pct_24h: f64,

    pub indicators: Indicators,
    pub scores: ComponentScores,

    pub overall_score: f64,
    pub quality: SetupQuality,
    pub signal: Signal,

    pub risk_level: RiskLevel,
    pub suggested_leverage: u32,
    pub suggested_entry: Option<f64>,
    pub suggested_stop_loss: Option<f64>,
    pub suggested_take_profit: Option<f64>,

    // Union of per-component factors, in component evaluation order
    pub bullish_factors: Vec<String>,
    pub bearish_factors: Vec<String>,
    pub warnings: Vec<String>,
}
