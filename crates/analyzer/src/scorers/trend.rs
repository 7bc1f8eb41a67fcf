use common::{ComponentScore, Indicators, MarketSnapshot};

use super::clamp_score;

/// Trend scorer (weight 30%).
///
/// Compares last price to SMA-20 and SMA-50 and uses ADX for strength.
/// Full alignment (price above both, SMA-20 above SMA-50) with a strong ADX
/// pushes toward 100; the mirrored bearish stack pushes toward 0. Mixed
/// signals (e.g. above SMA-20 but below SMA-50) land near neutral.
pub fn score(snapshot: &MarketSnapshot, indicators: &Indicators) -> ComponentScore {
    let (Some(sma_20), Some(sma_50)) = (indicators.sma_20, indicators.sma_50) else {
        return ComponentScore::neutral(
            "Trend: not enough candle history for SMA-20/SMA-50 — scoring neutral",
        );
    };

    let price = snapshot.last_price;
    let mut score = 50.0;
    let mut bullish = Vec::new();
    let mut bearish = Vec::new();
    let mut warnings = Vec::new();

    if price > sma_20 {
        score += 15.0;
        bullish.push(format!("Price above SMA-20 ({sma_20:.4})"));
    } else {
        score -= 15.0;
        bearish.push(format!("Price below SMA-20 ({sma_20:.4})"));
    }

    if price > sma_50 {
        score += 15.0;
        bullish.push(format!("Price above SMA-50 ({sma_50:.4})"));
    } else {
        score -= 15.0;
        bearish.push(format!("Price below SMA-50 ({sma_50:.4})"));
    }

    if sma_20 > sma_50 {
        score += 10.0;
        bullish.push("SMA-20 above SMA-50 (uptrend structure)".to_string());
    } else if sma_20 < sma_50 {
        score -= 10.0;
        bearish.push("SMA-20 below SMA-50 (downtrend structure)".to_string());
    }

    match indicators.adx_14 {
        Some(adx) if adx >= 25.0 => {
            // Strong trend amplifies whichever way the averages lean
            if score > 50.0 {
                score += 10.0;
                bullish.push(format!("Strong trend (ADX {adx:.1})"));
            } else if score < 50.0 {
                score -= 10.0;
                bearish.push(format!("Strong trend (ADX {adx:.1})"));
            }
        }
        Some(adx) if adx < 20.0 => {
            // Weak trend: dampen the directional lean
            score = 50.0 + (score - 50.0) / 2.0;
            warnings.push(format!("Weak trend (ADX {adx:.1}) — directional signal dampened"));
        }
        Some(_) => {}
        None => {
            warnings.push("Trend: ADX unavailable — strength unconfirmed".to_string());
        }
    }

    ComponentScore {
        score: clamp_score(score),
        bullish,
        bearish,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::snapshot;
    use super::*;

    fn indicators(sma_20: f64, sma_50: f64, adx: Option<f64>) -> Indicators {
        Indicators {
            sma_20: Some(sma_20),
            sma_50: Some(sma_50),
            adx_14: adx,
            ..Indicators::default()
        }
    }

    #[test]
    fn fully_aligned_uptrend_maxes_out() {
        let snap = snapshot(110.0);
        let s = score(&snap, &indicators(105.0, 100.0, Some(35.0)));
        assert!(s.score >= 90.0, "got {}", s.score);
        assert!(s.bearish.is_empty());
    }

    #[test]
    fn fully_aligned_downtrend_bottoms_out() {
        let snap = snapshot(90.0);
        let s = score(&snap, &indicators(95.0, 100.0, Some(35.0)));
        assert!(s.score <= 10.0, "got {}", s.score);
        assert!(s.bullish.is_empty());
    }

    #[test]
    fn partial_alignment_is_near_neutral() {
        // Above SMA-20 but below SMA-50: partial credit, not full
        let snap = snapshot(100.0);
        let s = score(&snap, &indicators(99.0, 101.0, None));
        assert!((35.0..=65.0).contains(&s.score), "got {}", s.score);
        assert!(!s.bullish.is_empty() && !s.bearish.is_empty());
    }

    #[test]
    fn weak_adx_dampens_the_lean() {
        let snap = snapshot(110.0);
        let strong = score(&snap, &indicators(105.0, 100.0, Some(35.0)));
        let weak = score(&snap, &indicators(105.0, 100.0, Some(12.0)));
        assert!(weak.score < strong.score);
        assert!(!weak.warnings.is_empty());
    }

    #[test]
    fn missing_smas_degrade_to_neutral_with_warning() {
        let snap = snapshot(100.0);
        let s = score(&snap, &Indicators::default());
        assert_eq!(s.score, ComponentScore::NEUTRAL);
        assert_eq!(s.warnings.len(), 1);
    }
}
