use super::moving_average::sma;

/// Bollinger Bands at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bollinger Bands: `period`-SMA ± `std_dev` sample standard deviations of
/// the same window. Returns `None` with fewer than `period` closes.
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> Option<BollingerBands> {
    if period < 2 || closes.len() < period {
        return None;
    }
    let middle = sma(closes, period)?;
    let window = &closes[closes.len() - period..];

    // Sample standard deviation (n-1 divisor), matching common charting tools
    let variance = window.iter().map(|c| (c - middle).powi(2)).sum::<f64>() / (period - 1) as f64;
    let sd = variance.sqrt();

    Some(BollingerBands {
        upper: middle + sd * std_dev,
        middle,
        lower: middle - sd * std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_when_short() {
        let prices = vec![100.0; 19];
        assert!(bollinger(&prices, 20, 2.0).is_none());
    }

    #[test]
    fn constant_series_collapses_bands() {
        let prices = vec![50.0; 25];
        let b = bollinger(&prices, 20, 2.0).unwrap();
        assert!((b.upper - 50.0).abs() < 1e-9);
        assert!((b.lower - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bands_are_symmetric_around_middle() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64).sin() * 3.0).collect();
        let b = bollinger(&prices, 20, 2.0).unwrap();
        assert!(((b.upper - b.middle) - (b.middle - b.lower)).abs() < 1e-9);
        assert!(b.upper > b.middle && b.middle > b.lower);
    }

    #[test]
    fn wider_dispersion_widens_bands() {
        let calm: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64 * 0.1).collect();
        let wild: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64 * 5.0).collect();
        let calm_width = {
            let b = bollinger(&calm, 20, 2.0).unwrap();
            b.upper - b.lower
        };
        let wild_width = {
            let b = bollinger(&wild, 20, 2.0).unwrap();
            b.upper - b.lower
        };
        assert!(wild_width > calm_width * 10.0);
    }
}
