use common::{ComponentScore, MarketSnapshot};

use crate::config::ScoringConfig;

/// Liquidity scorer (weight 15%). Direction-neutral.
///
/// Spread contributes 0–60: full credit up to 20% of the configured cap,
/// linear decay to 30 at the cap, then a ramp to zero at 3× the cap.
/// Volume contributes 0–40: full credit at 10× the configured minimum,
/// scaled down below it. Breaches of either threshold add warnings.
pub fn score(snapshot: &MarketSnapshot, cfg: &ScoringConfig) -> ComponentScore {
    let mut bullish = Vec::new();
    let mut bearish = Vec::new();
    let mut warnings = Vec::new();

    let spread = snapshot.spread_percent();
    let cap = cfg.max_spread_percent;
    let tight = cap * 0.2;

    let spread_score = if spread <= tight {
        bullish.push(format!("Tight spread ({spread:.3}%)"));
        60.0
    } else if spread <= cap {
        60.0 - (spread - tight) / (cap - tight) * 30.0
    } else {
        warnings.push(format!(
            "Spread {spread:.3}% above the {cap:.2}% cap — execution will be costly"
        ));
        bearish.push(format!("Wide spread ({spread:.3}%)"));
        (30.0 - (spread - cap) / (2.0 * cap) * 30.0).max(0.0)
    };

    let volume = snapshot.volume_24h;
    let min = cfg.min_volume_24h;

    let volume_score = if volume >= min * 10.0 {
        bullish.push(format!("Deep 24h volume ({volume:.0})"));
        40.0
    } else if volume >= min {
        20.0 + (volume - min) / (min * 9.0) * 20.0
    } else {
        warnings.push(format!(
            "24h volume {volume:.0} below the {min:.0} minimum — slippage risk"
        ));
        bearish.push("Thin 24h volume".to_string());
        (volume / min * 20.0).max(0.0)
    };

    ComponentScore {
        score: spread_score + volume_score,
        bullish,
        bearish,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::snapshot;
    use super::*;

    fn cfg() -> ScoringConfig {
        ScoringConfig::default()
    }

    fn snap(spread_pct: f64, volume: f64) -> MarketSnapshot {
        let mut s = snapshot(100.0);
        // bid/ask symmetric around 100 giving the requested spread percent
        let half = spread_pct / 100.0 * 100.0 / 2.0;
        s.bid = 100.0 - half;
        s.ask = 100.0 + half;
        s.volume_24h = volume;
        s
    }

    #[test]
    fn deep_liquid_market_scores_full_marks() {
        let s = score(&snap(0.05, 5_000_000.0), &cfg());
        assert_eq!(s.score, 100.0);
        assert!(s.warnings.is_empty());
        assert_eq!(s.bullish.len(), 2);
    }

    #[test]
    fn wide_spread_is_penalized_with_warning() {
        let s = score(&snap(1.0, 5_000_000.0), &cfg());
        assert!(s.score < 70.0, "got {}", s.score);
        assert!(s.warnings.iter().any(|w| w.contains("Spread")));
    }

    #[test]
    fn extreme_spread_zeroes_the_spread_component() {
        // 3x the 0.5% cap
        let s = score(&snap(1.5, 5_000_000.0), &cfg());
        assert_eq!(s.score, 40.0); // volume component only
    }

    #[test]
    fn thin_volume_is_penalized_with_warning() {
        let s = score(&snap(0.05, 20_000.0), &cfg());
        assert!(s.score < 70.0, "got {}", s.score);
        assert!(s.warnings.iter().any(|w| w.contains("volume")));
    }

    #[test]
    fn volume_just_above_minimum_gets_partial_credit() {
        let low = score(&snap(0.05, 100_000.0), &cfg()).score;
        let high = score(&snap(0.05, 1_000_000.0), &cfg()).score;
        assert!(low < high);
        assert!(low >= 80.0); // 60 spread + 20 floor
    }

    #[test]
    fn score_never_leaves_range() {
        for (spread, vol) in [(0.01, 1e9), (5.0, 0.0), (0.5, 100_000.0), (2.0, 50.0)] {
            let s = score(&snap(spread, vol), &cfg()).score;
            assert!((0.0..=100.0).contains(&s), "spread {spread} vol {vol}: {s}");
        }
    }
}
