//! Stateless indicator functions over an ordered candle series.
//!
//! Every function returns `None` when the series is shorter than its
//! required window. Callers must treat `None` as "unavailable", never as
//! zero — the scorers degrade to a neutral default instead.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;

pub use adx::adx;
pub use atr::atr;
pub use bollinger::{bollinger, BollingerBands};
pub use macd::{macd, Macd};
pub use moving_average::{ema, sma};
pub use rsi::rsi;

use common::{CandleSeries, Indicators};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SMA_SHORT: usize = 20;
pub const SMA_LONG: usize = 50;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const ADX_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

/// Compute the full indicator bag for one candle series.
/// Each field is independently `None` if the series is too short for it.
pub fn compute_all(series: &CandleSeries) -> Indicators {
    let closes = series.closes();
    let candles = series.candles();

    let macd_out = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let bands = bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);

    Indicators {
        rsi_14: rsi(&closes, RSI_PERIOD),
        macd: macd_out.as_ref().map(|m| m.macd),
        macd_signal: macd_out.as_ref().map(|m| m.signal),
        macd_histogram: macd_out.as_ref().map(|m| m.histogram),
        sma_20: sma(&closes, SMA_SHORT),
        sma_50: sma(&closes, SMA_LONG),
        bollinger_upper: bands.as_ref().map(|b| b.upper),
        bollinger_lower: bands.as_ref().map(|b| b.lower),
        adx_14: adx(candles, ADX_PERIOD),
        atr_14: atr(candles, ATR_PERIOD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::Candle;

    fn series(closes: &[f64]) -> CandleSeries {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: c,
                high: c + 0.5,
                low: c - 0.5,
                close: c,
                volume: 1_000.0,
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }

    #[test]
    fn short_series_yields_all_unavailable() {
        let s = series(&[100.0, 101.0, 102.0, 101.5, 102.5, 103.0, 102.0, 103.5, 104.0, 105.0]);
        let ind = compute_all(&s);
        assert!(ind.rsi_14.is_none());
        assert!(ind.macd.is_none());
        assert!(ind.sma_20.is_none());
        assert!(ind.sma_50.is_none());
        assert!(ind.bollinger_upper.is_none());
        assert!(ind.adx_14.is_none());
        assert!(ind.atr_14.is_none());
    }

    #[test]
    fn sixty_bar_series_yields_everything() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let ind = compute_all(&series(&closes));
        assert!(ind.rsi_14.is_some());
        assert!(ind.macd.is_some());
        assert!(ind.macd_signal.is_some());
        assert!(ind.macd_histogram.is_some());
        assert!(ind.sma_20.is_some());
        assert!(ind.sma_50.is_some());
        assert!(ind.bollinger_upper.is_some());
        assert!(ind.bollinger_lower.is_some());
        assert!(ind.adx_14.is_some());
        assert!(ind.atr_14.is_some());
    }

    #[test]
    fn windows_fill_in_independently() {
        // 40 bars: enough for RSI/MACD/SMA-20/Bollinger/ATR/ADX, not SMA-50
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let ind = compute_all(&series(&closes));
        assert!(ind.rsi_14.is_some());
        assert!(ind.macd.is_some());
        assert!(ind.sma_20.is_some());
        assert!(ind.sma_50.is_none());
        assert!(ind.atr_14.is_some());
    }
}
