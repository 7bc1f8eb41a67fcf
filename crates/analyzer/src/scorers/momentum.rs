use common::{ComponentScore, Indicators, MarketSnapshot};

use crate::config::ScoringConfig;

use super::clamp_score;

/// Momentum scorer (weight 25%).
///
/// RSI distance from neutral (50) contributes up to ±25; readings past the
/// configured overbought/oversold thresholds are treated as chase risk and
/// pull the contribution back with a warning. MACD-vs-signal adds ±15 plus a
/// histogram-magnitude bonus of up to ±10 (in basis points of price).
pub fn score(
    snapshot: &MarketSnapshot,
    indicators: &Indicators,
    cfg: &ScoringConfig,
) -> ComponentScore {
    let rsi = indicators.rsi_14;
    let macd_pair = indicators.macd.zip(indicators.macd_signal);

    if rsi.is_none() && macd_pair.is_none() {
        return ComponentScore::neutral(
            "Momentum: RSI and MACD unavailable — scoring neutral",
        );
    }

    let mut score = 50.0;
    let mut bullish = Vec::new();
    let mut bearish = Vec::new();
    let mut warnings = Vec::new();

    match rsi {
        Some(rsi) => {
            let mut contribution = ((rsi - 50.0) * 0.7).clamp(-25.0, 25.0);
            if rsi >= cfg.rsi_overbought {
                contribution -= 10.0;
                warnings.push(format!("RSI overbought ({rsi:.1}) — long entries are chasing"));
            } else if rsi <= cfg.rsi_oversold {
                contribution += 10.0;
                warnings.push(format!("RSI oversold ({rsi:.1}) — short entries are chasing"));
            }
            if rsi > 55.0 {
                bullish.push(format!("RSI {rsi:.1} above neutral"));
            } else if rsi < 45.0 {
                bearish.push(format!("RSI {rsi:.1} below neutral"));
            }
            score += contribution;
        }
        None => warnings.push("Momentum: RSI unavailable — reduced confidence".to_string()),
    }

    match macd_pair {
        Some((macd, signal)) => {
            if macd > signal {
                score += 15.0;
                bullish.push("MACD above signal line".to_string());
            } else if macd < signal {
                score -= 15.0;
                bearish.push("MACD below signal line".to_string());
            }
            if let Some(hist) = indicators.macd_histogram {
                // Divergence magnitude, in basis points of price
                let bonus = (hist / snapshot.last_price * 10_000.0).clamp(-10.0, 10.0);
                score += bonus;
            }
        }
        None => warnings.push("Momentum: MACD unavailable — reduced confidence".to_string()),
    }

    ComponentScore {
        score: clamp_score(score),
        bullish,
        bearish,
        warnings,
    }
}
