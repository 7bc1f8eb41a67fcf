use serde::{Deserialize, Serialize};

/// Scoring thresholds, read once at startup and passed into the scorers.
/// The scorers themselves never touch the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// RSI below this flags oversold conditions.
    pub rsi_oversold: f64,
    /// RSI above this flags overbought conditions.
    pub rsi_overbought: f64,
    /// Per-interval funding rate considered extreme on the positive side
    /// (0.01 = 1%). Positive funding means longs pay shorts.
    pub funding_rate_high: f64,
    /// Negative-side counterpart of `funding_rate_high`.
    pub funding_rate_low: f64,
    /// 24h quote volume below this is penalized as illiquid.
    pub min_volume_24h: f64,
    /// Bid/ask spread (percent of mid) above this is penalized.
    pub max_spread_percent: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            funding_rate_high: 0.01,
            funding_rate_low: -0.01,
            min_volume_24h: 100_000.0,
            max_spread_percent: 0.5,
        }
    }
}

impl From<&common::Config> for ScoringConfig {
    fn from(cfg: &common::Config) -> Self {
        Self {
            rsi_oversold: cfg.rsi_oversold,
            rsi_overbought: cfg.rsi_overbought,
            funding_rate_high: cfg.funding_rate_high,
            funding_rate_low: cfg.funding_rate_low,
            min_volume_24h: cfg.min_volume_24h,
            max_spread_percent: cfg.max_spread_percent,
        }
    }
}
