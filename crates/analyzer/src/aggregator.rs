use common::{
    ComponentScores, Indicators, MarketSnapshot, RiskLevel, Setup, SetupQuality, Signal,
};

pub const WEIGHT_TREND: f64 = 0.30;
pub const WEIGHT_MOMENTUM: f64 = 0.25;
pub const WEIGHT_FUNDING: f64 = 0.20;
pub const WEIGHT_LIQUIDITY: f64 = 0.15;
pub const WEIGHT_VOLATILITY: f64 = 0.10;

/// Stop distance and target distance as ATR multiples. Target at twice the
/// stop keeps a 2:1 reward-to-risk.
const ATR_STOP_MULT: f64 = 1.5;
const ATR_TARGET_MULT: f64 = 3.0;

/// Fixed-weight sum of the component scores. Each component is in [0,100],
/// and the weights sum to 1, so the result is in [0,100] by construction.
pub fn overall_score(scores: &ComponentScores) -> f64 {
    WEIGHT_TREND * scores.trend.score
        + WEIGHT_MOMENTUM * scores.momentum.score
        + WEIGHT_FUNDING * scores.funding.score
        + WEIGHT_LIQUIDITY * scores.liquidity.score
        + WEIGHT_VOLATILITY * scores.volatility.score
}

/// Signal bands, lower-bound inclusive:
/// `[75,100] strong_buy, [60,75) buy, [40,60) neutral, [25,40) sell,
/// [0,25) strong_sell`. So 60.0 is a buy and 59.999 is neutral.
pub fn classify(score: f64) -> Signal {
    if score >= 75.0 {
        Signal::StrongBuy
    } else if score >= 60.0 {
        Signal::Buy
    } else if score >= 40.0 {
        Signal::Neutral
    } else if score >= 25.0 {
        Signal::Sell
    } else {
        Signal::StrongSell
    }
}

/// Quality tier for display: how convincing the setup is, regardless of
/// direction. Distance from neutral is what counts.
pub fn quality(score: f64) -> SetupQuality {
    let conviction = (score - 50.0).abs();
    if conviction >= 25.0 {
        SetupQuality::Excellent
    } else if conviction >= 15.0 {
        SetupQuality::Good
    } else if conviction >= 5.0 {
        SetupQuality::Average
    } else {
        SetupQuality::Poor
    }
}

struct RiskParams {
    level: RiskLevel,
    leverage: u32,
    entry: Option<f64>,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    warnings: Vec<String>,
}

/// Derive risk level, leverage and price levels from ATR and the signal
/// direction. Long: stop below entry, target above; short inverted.
/// No ATR or a neutral signal means no suggested levels.
fn risk_parameters(
    snapshot: &MarketSnapshot,
    indicators: &Indicators,
    volatility_score: f64,
    signal: Signal,
) -> RiskParams {
    let Some(atr) = indicators.atr_14 else {
        return RiskParams {
            level: RiskLevel::High,
            leverage: 1,
            entry: None,
            stop_loss: None,
            take_profit: None,
            warnings: vec!["ATR unavailable — no stop/target suggested, assume high risk".to_string()],
        };
    };

    let price = snapshot.last_price;
    let atr_pct = atr / price * 100.0;

    let level = if atr_pct < 1.5 && volatility_score >= 40.0 {
        RiskLevel::Low
    } else if atr_pct < 3.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    if signal == Signal::Neutral {
        return RiskParams {
            level,
            leverage: 1,
            entry: None,
            stop_loss: None,
            take_profit: None,
            warnings: Vec::new(),
        };
    }

    let stop_distance = atr * ATR_STOP_MULT;
    let target_distance = atr * ATR_TARGET_MULT;
    let (stop_loss, take_profit) = if signal.is_long() {
        (price - stop_distance, price + target_distance)
    } else {
        (price + stop_distance, price - target_distance)
    };

    let risk_pct = stop_distance / price * 100.0;
    RiskParams {
        level,
        leverage: suggested_leverage(risk_pct),
        entry: Some(price),
        stop_loss: Some(stop_loss),
        take_profit: Some(take_profit),
        warnings: Vec::new(),
    }
}

/// Inverse tiering: the further the stop (more volatile the market), the
/// lower the suggested leverage.
fn suggested_leverage(risk_pct: f64) -> u32 {
    let lev = if risk_pct < 1.0 {
        10
    } else if risk_pct < 2.0 {
        5
    } else if risk_pct < 3.5 {
        3
    } else if risk_pct < 5.0 {
        2
    } else {
        1
    };
    lev.clamp(1, 10)
}

/// Assemble the final setup: aggregate score, signal, risk parameters, and
/// the union of all factor lists in component evaluation order.
pub fn build_setup(
    snapshot: &MarketSnapshot,
    indicators: Indicators,
    scores: ComponentScores,
) -> Setup {
    let overall = overall_score(&scores);
    let signal = classify(overall);
    let risk = risk_parameters(snapshot, &indicators, scores.volatility.score, signal);

    let components = [
        &scores.trend,
        &scores.momentum,
        &scores.funding,
        &scores.liquidity,
        &scores.volatility,
    ];
    let mut bullish_factors = Vec::new();
    let mut bearish_factors = Vec::new();
    let mut warnings = Vec::new();
    for component in components {
        bullish_factors.extend(component.bullish.iter().cloned());
        bearish_factors.extend(component.bearish.iter().cloned());
        warnings.extend(component.warnings.iter().cloned());
    }
    warnings.extend(risk.warnings);

    Setup {
        symbol: snapshot.symbol.clone(),
        timestamp: snapshot.timestamp,
        last_price: snapshot.last_price,
        funding_rate: snapshot.funding_rate,
        volume_24h: snapshot.volume_24h,
        price_change_pct_24h: snapshot.price_change_pct_24h,
        indicators,
        overall_score: overall,
        quality: quality(overall),
        signal,
        risk_level: risk.level,
        suggested_leverage: risk.leverage,
        suggested_entry: risk.entry,
        suggested_stop_loss: risk.stop_loss,
        suggested_take_profit: risk.take_profit,
        bullish_factors,
        bearish_factors,
        warnings,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ComponentScore;

    fn scores(t: f64, m: f64, f: f64, l: f64, v: f64) -> ComponentScores {
        let cs = |score: f64| ComponentScore {
            score,
            ..ComponentScore::default()
        };
        ComponentScores {
            trend: cs(t),
            momentum: cs(m),
            funding: cs(f),
            liquidity: cs(l),
            volatility: cs(v),
        }
    }

    #[test]
    fn overall_is_the_fixed_weight_sum() {
        let s = scores(80.0, 70.0, 60.0, 90.0, 50.0);
        let expected = 0.30 * 80.0 + 0.25 * 70.0 + 0.20 * 60.0 + 0.15 * 90.0 + 0.10 * 50.0;
        assert!((overall_score(&s) - expected).abs() < 1e-9);
    }

    #[test]
    fn all_neutral_components_give_exactly_50() {
        let s = scores(50.0, 50.0, 50.0, 50.0, 50.0);
        assert!((overall_score(&s) - 50.0).abs() < 1e-9);
        assert_eq!(classify(overall_score(&s)), Signal::Neutral);
    }

    #[test]
    fn band_edges_are_lower_bound_inclusive() {
        assert_eq!(classify(75.0), Signal::StrongBuy);
        assert_eq!(classify(74.999), Signal::Buy);
        assert_eq!(classify(60.0), Signal::Buy);
        assert_eq!(classify(59.999), Signal::Neutral);
        assert_eq!(classify(40.0), Signal::Neutral);
        assert_eq!(classify(39.999), Signal::Sell);
        assert_eq!(classify(25.0), Signal::Sell);
        assert_eq!(classify(24.999), Signal::StrongSell);
        assert_eq!(classify(0.0), Signal::StrongSell);
        assert_eq!(classify(100.0), Signal::StrongBuy);
    }

    #[test]
    fn leverage_tiers_are_inverse_in_risk() {
        let levels: Vec<u32> = [0.5, 1.5, 3.0, 4.0, 6.0]
            .iter()
            .map(|&r| suggested_leverage(r))
            .collect();
        assert_eq!(levels, vec![10, 5, 3, 2, 1]);
        for w in levels.windows(2) {
            assert!(w[0] >= w[1], "leverage must not increase with risk");
        }
    }

    #[test]
    fn quality_tracks_conviction_not_direction() {
        assert_eq!(quality(80.0), SetupQuality::Excellent);
        assert_eq!(quality(20.0), SetupQuality::Excellent);
        assert_eq!(quality(67.0), SetupQuality::Good);
        assert_eq!(quality(58.0), SetupQuality::Average);
        assert_eq!(quality(51.0), SetupQuality::Poor);
    }
}
