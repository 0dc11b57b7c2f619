// Bollinger Bands indicator implementation
use super::{closes, defined, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Rolling mean +/- `multiplier` population standard deviations.
pub fn bollinger(values: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let len = values.len();
    let mut bands = BollingerBands {
        upper: vec![None; len],
        middle: vec![None; len],
        lower: vec![None; len],
    };
    if period == 0 || len < period {
        return bands;
    }

    let mut sum = 0.0;
    for i in 0..len {
        sum += values[i];
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 < period {
            continue;
        }

        let window = &values[i + 1 - period..=i];
        let mean = sum / period as f64;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();

        bands.middle[i] = defined(mean);
        bands.upper[i] = defined(mean + multiplier * std);
        bands.lower[i] = defined(mean - multiplier * std);
    }
    bands
}

/// Exposes the middle band through the calculator interface.
pub struct Bollinger {
    name: String,
    period: usize,
    multiplier: f64,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self {
            name: format!("BB({},{})", period, multiplier),
            period,
            multiplier,
        }
    }
}

impl IndicatorCalculator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "multiplier": self.multiplier })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        bollinger(&closes(data), self.period, self.multiplier).middle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_known_window() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger(&values, 8, 2.0);
        // mean 5, population std 2
        assert_eq!(bands.middle[7], Some(5.0));
        assert_eq!(bands.upper[7], Some(9.0));
        assert_eq!(bands.lower[7], Some(1.0));
        assert!(bands.middle[6].is_none());
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let values: Vec<f64> = (0..120).map(|i| 50.0 + ((i as f64) / 3.0).cos() * 4.0).collect();
        let bands = bollinger(&values, 20, 2.0);
        for i in 0..values.len() {
            match (bands.upper[i], bands.middle[i], bands.lower[i]) {
                (Some(u), Some(m), Some(l)) => assert!(u >= m && m >= l, "bad ordering at {}", i),
                (None, None, None) => assert!(i < 19),
                _ => panic!("bands partially defined at {}", i),
            }
        }
    }

    #[test]
    fn test_bollinger_insufficient_history() {
        let bands = bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert_eq!(bands.middle, vec![None; 3]);
    }
}
