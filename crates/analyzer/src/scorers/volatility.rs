use common::{ComponentScore, Indicators, MarketSnapshot};

use super::clamp_score;

// Plateau bounds for Bollinger width and ATR, both as percent of price.
// Moderate volatility scores highest; both extremes score low.
const BB_ZERO_LOW: f64 = 0.5;
const BB_FULL_LOW: f64 = 2.0;
const BB_FULL_HIGH: f64 = 6.0;
const BB_ZERO_HIGH: f64 = 12.0;

const ATR_ZERO_LOW: f64 = 0.25;
const ATR_FULL_LOW: f64 = 1.0;
const ATR_FULL_HIGH: f64 = 3.0;
const ATR_ZERO_HIGH: f64 = 6.0;

/// Volatility scorer (weight 10%). Direction-neutral and deliberately
/// non-monotonic: a compressed range offers no move to trade, an exploding
/// range is uncontrollable risk, and the middle band scores highest.
pub fn score(snapshot: &MarketSnapshot, indicators: &Indicators) -> ComponentScore {
    let price = snapshot.last_price;

    let bb_width_pct = indicators
        .bollinger_upper
        .zip(indicators.bollinger_lower)
        .map(|(upper, lower)| (upper - lower) / price * 100.0);
    let atr_pct = indicators.atr_14.map(|atr| atr / price * 100.0);

    if bb_width_pct.is_none() && atr_pct.is_none() {
        return ComponentScore::neutral(
            "Volatility: Bollinger Bands and ATR unavailable — scoring neutral",
        );
    }

    let mut bullish = Vec::new();
    let mut bearish = Vec::new();
    let mut warnings = Vec::new();
    let mut parts = Vec::with_capacity(2);

    match bb_width_pct {
        Some(width) => {
            parts.push(plateau(width, BB_ZERO_LOW, BB_FULL_LOW, BB_FULL_HIGH, BB_ZERO_HIGH));
            if width < BB_FULL_LOW {
                warnings.push(format!(
                    "Bollinger range compressed ({width:.2}% of price) — little room to trade"
                ));
            } else if width > BB_FULL_HIGH {
                bearish.push(format!("Bollinger range wide ({width:.2}% of price)"));
            } else {
                bullish.push(format!("Moderate Bollinger range ({width:.2}% of price)"));
            }
        }
        None => warnings.push("Volatility: Bollinger Bands unavailable — reduced confidence".to_string()),
    }

    match atr_pct {
        Some(atr) => {
            parts.push(plateau(atr, ATR_ZERO_LOW, ATR_FULL_LOW, ATR_FULL_HIGH, ATR_ZERO_HIGH));
            if atr > ATR_FULL_HIGH {
                warnings.push(format!("ATR {atr:.2}% of price — stops must be wide"));
            }
        }
        None => warnings.push("Volatility: ATR unavailable — reduced confidence".to_string()),
    }

    let score = parts.iter().sum::<f64>() / parts.len() as f64 * 100.0;

    ComponentScore {
        score: clamp_score(score),
        bullish,
        bearish,
        warnings,
    }
}

/// Trapezoid membership: 0 outside [zero_low, zero_high], 1 inside
/// [full_low, full_high], linear on the shoulders.
fn plateau(x: f64, zero_low: f64, full_low: f64, full_high: f64, zero_high: f64) -> f64 {
    if x <= zero_low || x >= zero_high {
        0.0
    } else if x < full_low {
        (x - zero_low) / (full_low - zero_low)
    } else if x <= full_high {
        1.0
    } else {
        (zero_high - x) / (zero_high - full_high)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::snapshot;
    use super::*;

    fn with_vol(bb_width_pct: Option<f64>, atr_pct: Option<f64>) -> (MarketSnapshot, Indicators) {
        let price = 100.0;
        let snap = snapshot(price);
        let ind = Indicators {
            bollinger_upper: bb_width_pct.map(|w| price + w / 2.0),
            bollinger_lower: bb_width_pct.map(|w| price - w / 2.0),
            atr_14: atr_pct.map(|a| a / 100.0 * price),
            ..Indicators::default()
        };
        (snap, ind)
    }

    #[test]
    fn moderate_volatility_scores_highest() {
        let (snap, ind) = with_vol(Some(4.0), Some(2.0));
        let s = score(&snap, &ind);
        assert_eq!(s.score, 100.0);
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn scoring_is_non_monotonic_in_range_width() {
        let tight = {
            let (snap, ind) = with_vol(Some(0.6), Some(0.3));
            score(&snap, &ind).score
        };
        let moderate = {
            let (snap, ind) = with_vol(Some(4.0), Some(2.0));
            score(&snap, &ind).score
        };
        let wild = {
            let (snap, ind) = with_vol(Some(11.0), Some(5.5));
            score(&snap, &ind).score
        };
        assert!(tight < moderate, "{tight} !< {moderate}");
        assert!(wild < moderate, "{wild} !< {moderate}");
    }

    #[test]
    fn compressed_range_warns() {
        let (snap, ind) = with_vol(Some(0.8), Some(0.5));
        let s = score(&snap, &ind);
        assert!(s.warnings.iter().any(|w| w.contains("compressed")));
    }

    #[test]
    fn extreme_width_scores_zero() {
        let (snap, ind) = with_vol(Some(15.0), Some(8.0));
        let s = score(&snap, &ind);
        assert_eq!(s.score, 0.0);
    }

    #[test]
    fn single_available_input_still_scores() {
        let (snap, ind) = with_vol(None, Some(2.0));
        let s = score(&snap, &ind);
        assert_eq!(s.score, 100.0);
        assert!(s.warnings.iter().any(|w| w.contains("Bollinger")));
    }

    #[test]
    fn nothing_available_degrades_to_neutral() {
        let (snap, ind) = with_vol(None, None);
        let s = score(&snap, &ind);
        assert_eq!(s.score, ComponentScore::NEUTRAL);
        assert_eq!(s.warnings.len(), 1);
    }
}
