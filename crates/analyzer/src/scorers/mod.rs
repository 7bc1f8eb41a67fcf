//! Component scorers: pure functions mapping a snapshot + indicators to a
//! 0–100 sub-score plus qualitative factors.
//!
//! All scores share one axis: 100 strongly favors a long, 0 strongly favors
//! a short, 50 is neutral. A scorer whose indicators are unavailable
//! degrades to `ComponentScore::NEUTRAL` (50) and records a
//! reduced-confidence warning — it never fails the setup.

pub mod funding;
pub mod liquidity;
pub mod momentum;
pub mod trend;
pub mod volatility;

use common::{ComponentScores, Direction, Indicators, MarketSnapshot};

use crate::config::ScoringConfig;

/// Evaluate all five scorers in their fixed (weight) order. The funding
/// scorer is evaluated on the long axis here; its short-side view is the
/// exact mirror (see `funding::score`).
pub fn score_all(
    snapshot: &MarketSnapshot,
    indicators: &Indicators,
    cfg: &ScoringConfig,
) -> ComponentScores {
    ComponentScores {
        trend: trend::score(snapshot, indicators),
        momentum: momentum::score(snapshot, indicators, cfg),
        funding: funding::score(snapshot, Direction::Long, cfg),
        liquidity: liquidity::score(snapshot, cfg),
        volatility: volatility::score(snapshot, indicators),
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{TimeZone, Utc};
    use common::{Candle, CandleSeries, MarketSnapshot};

    /// Snapshot with sane liquid-market defaults; tweak fields per test.
    pub fn snapshot(last_price: f64) -> MarketSnapshot {
        MarketSnapshot {
            symbol: "BTC-PERP_USDT0".to_string(),
            last_price,
            mark_price: Some(last_price),
            index_price: Some(last_price),
            bid: last_price * 0.9995,
            ask: last_price * 1.0005,
            volume_24h: 5_000_000.0,
            price_change_pct_24h: 0.0,
            funding_rate: Some(0.0),
            candles: CandleSeries::default(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    pub fn candles_from_closes(closes: &[f64], range: f64) -> CandleSeries {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: c,
                high: c + range,
                low: (c - range).max(0.01),
                close: c,
                volume: 10_000.0,
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testutil::*;

    #[test]
    fn all_scores_stay_in_range_without_indicators() {
        let snap = snapshot(100.0);
        let scores = score_all(&snap, &Indicators::default(), &ScoringConfig::default());
        for s in [
            &scores.trend,
            &scores.momentum,
            &scores.funding,
            &scores.liquidity,
            &scores.volatility,
        ] {
            assert!((0.0..=100.0).contains(&s.score), "score {}", s.score);
        }
    }

    #[test]
    fn missing_indicators_warn_on_every_degraded_scorer() {
        let snap = snapshot(100.0);
        let scores = score_all(&snap, &Indicators::default(), &ScoringConfig::default());
        assert!(!scores.trend.warnings.is_empty());
        assert!(!scores.momentum.warnings.is_empty());
        assert!(!scores.volatility.warnings.is_empty());
        // Funding (rate present) and liquidity use snapshot fields only —
        // no degradation here
        assert_eq!(scores.trend.score, common::ComponentScore::NEUTRAL);
        assert_eq!(scores.momentum.score, common::ComponentScore::NEUTRAL);
        assert_eq!(scores.volatility.score, common::ComponentScore::NEUTRAL);
    }
}
