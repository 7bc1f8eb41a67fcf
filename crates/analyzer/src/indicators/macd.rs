use super::moving_average::ema_series;

/// MACD line, signal line and histogram at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD (Moving Average Convergence/Divergence) over close prices (oldest
/// first).
///
/// MACD line = EMA(fast) − EMA(slow); signal = EMA of the MACD line over
/// `signal_period`. Needs at least `slow + signal_period` closes.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Option<Macd> {
    if fast == 0 || fast >= slow || signal_period == 0 {
        return None;
    }
    if closes.len() < slow + signal_period {
        return None;
    }

    let fast_ema = ema_series(closes, fast); // starts at input index fast-1
    let slow_ema = ema_series(closes, slow); // starts at input index slow-1

    // Align both EMA series at input index slow-1
    let offset = slow - fast;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .zip(fast_ema[offset..].iter())
        .map(|(s, f)| f - s)
        .collect();

    let signal_line = ema_series(&macd_line, signal_period);

    let macd_value = *macd_line.last()?;
    let signal_value = *signal_line.last()?;
    Some(Macd {
        macd: macd_value,
        signal: signal_value,
        histogram: macd_value - signal_value,
    })
}
