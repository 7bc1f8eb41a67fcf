use common::{ComponentScore, Direction, MarketSnapshot};

use crate::config::ScoringConfig;

/// Funding scorer (weight 20%). Direction-aware.
///
/// Positive funding means longs pay shorts, so a high positive rate is
/// unfavorable for longs and favorable for shorts; negative funding is the
/// reverse. The long and short views are exact mirrors:
/// `score(long) + score(short) == 100` for every rate.
///
/// A snapshot without a reported rate scores neutral with a warning — an
/// unreported rate is never treated as zero.
pub fn score(snapshot: &MarketSnapshot, direction: Direction, cfg: &ScoringConfig) -> ComponentScore {
    let Some(rate) = snapshot.funding_rate else {
        return ComponentScore::neutral("Funding: rate unavailable — scoring neutral");
    };

    // Piecewise linear in the rate, each side saturating at its own
    // configured threshold: a rate at the high threshold scores 15 for
    // longs, a rate at the low threshold scores 85.
    let lean = if rate >= 0.0 {
        rate / cfg.funding_rate_high * 35.0
    } else {
        -(rate / cfg.funding_rate_low) * 35.0
    };
    let long_score = (50.0 - lean).clamp(15.0, 85.0);
    let score = match direction {
        Direction::Long => long_score,
        Direction::Short => 100.0 - long_score,
    };

    let mut bullish = Vec::new();
    let mut bearish = Vec::new();

    let rate_pct = rate * 100.0;
    // Hourly funding annualized, as in the exchange docs
    let annual_pct = rate * 24.0 * 365.0 * 100.0;

    if rate >= cfg.funding_rate_high {
        match direction {
            Direction::Long => bearish.push(format!(
                "High positive funding ({rate_pct:.4}%/interval, ~{annual_pct:.0}%/yr) — longs pay shorts"
            )),
            Direction::Short => bullish.push(format!(
                "High positive funding ({rate_pct:.4}%/interval, ~{annual_pct:.0}%/yr) — shorts collect"
            )),
        }
    } else if rate <= cfg.funding_rate_low {
        match direction {
            Direction::Long => bullish.push(format!(
                "Deep negative funding ({rate_pct:.4}%/interval, ~{annual_pct:.0}%/yr) — longs collect"
            )),
            Direction::Short => bearish.push(format!(
                "Deep negative funding ({rate_pct:.4}%/interval, ~{annual_pct:.0}%/yr) — shorts pay longs"
            )),
        }
    } else if rate > 0.0 {
        match direction {
            Direction::Long => bearish.push(format!("Funding slightly against longs ({rate_pct:.4}%)")),
            Direction::Short => bullish.push(format!("Funding slightly favors shorts ({rate_pct:.4}%)")),
        }
    } else if rate < 0.0 {
        match direction {
            Direction::Long => bullish.push(format!("Funding favors longs ({rate_pct:.4}%)")),
            Direction::Short => bearish.push(format!("Funding slightly against shorts ({rate_pct:.4}%)")),
        }
    }

    ComponentScore {
        score,
        bullish,
        bearish,
        warnings: Vec::new(),
    }
}
