use common::Candle;

/// True range of a bar given the previous close.
pub(crate) fn true_range(prev_close: f64, candle: &Candle) -> f64 {
    let high_low = candle.high - candle.low;
    let high_close = (candle.high - prev_close).abs();
    let low_close = (candle.low - prev_close).abs();
    high_low.max(high_close).max(low_close)
}

/// ATR (Average True Range) with Wilder smoothing.
/// Needs at least `period + 1` candles (true range uses the prior close).
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let trs: Vec<f64> = candles
        .windows(2)
        .map(|w| true_range(w[0].close, &w[1]))
        .collect();

    let mut value = trs[..period].iter().sum::<f64>() / period as f64;
    for &tr in &trs[period..] {
        value = (value * (period - 1) as f64 + tr) / period as f64;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    fn fixed_range_series(n: usize, range: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| candle(i, 100.0, 100.0 + range, 100.0 - range, 100.0))
            .collect()
    }

    #[test]
    fn returns_none_when_short() {
        let candles = fixed_range_series(14, 1.0);
        assert!(atr(&candles, 14).is_none());
    }

    #[test]
    fn constant_range_gives_that_range() {
        // Every bar: high-low = 2.0, closes flat → TR = 2.0 everywhere
        let candles = fixed_range_series(40, 1.0);
        let value = atr(&candles, 14).unwrap();
        assert!((value - 2.0).abs() < 1e-9, "ATR should be 2.0, got {value}");
    }

    #[test]
    fn gaps_raise_true_range() {
        // A close-to-open gap larger than the bar range dominates TR
        let mut candles = fixed_range_series(20, 0.5);
        candles.push(candle(20, 110.0, 110.5, 109.5, 110.0)); // 10-point gap up
        let with_gap = atr(&candles, 14).unwrap();
        let without_gap = atr(&fixed_range_series(21, 0.5), 14).unwrap();
        assert!(with_gap > without_gap);
    }

    #[test]
    fn wilder_smoothing_decays_spikes() {
        let mut candles = fixed_range_series(15, 1.0);
        candles.push(candle(15, 100.0, 120.0, 80.0, 100.0)); // one wild bar
        candles.extend(fixed_range_series(30, 1.0).into_iter().enumerate().map(
            |(i, mut c)| {
                c.timestamp = Utc.timestamp_opt(1_700_000_000 + (16 + i as i64) * 3600, 0).unwrap();
                c
            },
        ));
        let value = atr(&candles, 14).unwrap();
        // Spike decays back toward the steady 2.0 range
        assert!(value < 6.0, "spike should have decayed, got {value}");
        assert!(value > 2.0);
    }
}
