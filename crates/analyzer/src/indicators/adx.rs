use common::Candle;

use super::atr::true_range;

/// ADX (Average Directional Index) with Wilder smoothing.
///
/// Measures trend strength regardless of direction: ~0–20 weak, 25+ strong.
/// Needs at least `2 * period + 1` candles: one period to seed the
/// directional-movement averages and another to seed the DX average.
pub fn adx(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < 2 * period + 1 {
        return None;
    }

    let n = candles.len();
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);
    let mut trs = Vec::with_capacity(n - 1);

    for w in candles.windows(2) {
        let (prev, curr) = (&w[0], &w[1]);
        let up = curr.high - prev.high;
        let down = prev.low - curr.low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        trs.push(true_range(prev.close, curr));
    }

    let sm_plus = wilder_sum_series(&plus_dm, period);
    let sm_minus = wilder_sum_series(&minus_dm, period);
    let sm_tr = wilder_sum_series(&trs, period);

    let mut dx = Vec::with_capacity(sm_tr.len());
    for i in 0..sm_tr.len() {
        if sm_tr[i] <= 0.0 {
            dx.push(0.0);
            continue;
        }
        let plus_di = 100.0 * sm_plus[i] / sm_tr[i];
        let minus_di = 100.0 * sm_minus[i] / sm_tr[i];
        let di_sum = plus_di + minus_di;
        dx.push(if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        });
    }

    if dx.len() < period {
        return None;
    }

    // ADX: seed with the mean of the first `period` DX values, then Wilder
    let mut value = dx[..period].iter().sum::<f64>() / period as f64;
    for &d in &dx[period..] {
        value = (value * (period - 1) as f64 + d) / period as f64;
    }
    Some(value)
}

/// Wilder running sum: seed with the plain sum of the first `period` values,
/// then `s = s - s/period + v`. Output starts at input index `period - 1`.
fn wilder_sum_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut s: f64 = values[..period].iter().sum();
    out.push(s);
    for &v in &values[period..] {
        s = s - s / period as f64 + v;
        out.push(s);
    }
    out
}
