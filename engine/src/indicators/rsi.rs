// Relative Strength Index (RSI) indicator implementation
use super::{closes, defined, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

/// RSI with Wilder smoothing, aligned to the input.
///
/// Averages are seeded from the first `period` deltas and the first value is
/// emitted at index `period + 1`, after one smoothing step.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period + 2 {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period + 1];

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    let weight = (period - 1) as f64;

    for i in (period + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let (current_gain, current_loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

        avg_gain = (avg_gain * weight + current_gain) / period as f64;
        avg_loss = (avg_loss * weight + current_loss) / period as f64;

        results.push(defined(rsi_value(avg_gain, avg_loss)));
    }
    results
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        rsi(&closes(data), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candle(close: f64) -> Candle {
        Candle { time: 0, open: close, high: close, low: close, close, volume: 0.0 }
    }

    #[test]
    fn test_rsi_first_value_at_period_plus_one() {
        let prices = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let candles: Vec<Candle> = prices.iter().map(|p| create_candle(*p)).collect();
        let results = Rsi::new(14).calculate(&candles);

        assert_eq!(results.len(), prices.len());
        for (i, value) in results.iter().enumerate().take(15) {
            assert_eq!(*value, None, "Expected None at index {}", i);
        }
        for value in results.iter().skip(15) {
            let v = value.expect("RSI defined after seed");
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {}", v);
        }
        // Mostly rising series stays above the midline
        assert!(results[15].unwrap() > 50.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let results = rsi(&[1.0; 15], 14);
        assert_eq!(results, vec![None; 15]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let values: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let results = rsi(&values, 14);
        for i in 0..15 {
            assert_eq!(results[i], None);
        }
        for i in 15..20 {
            assert_eq!(results[i], Some(100.0));
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let values: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let results = rsi(&values, 14);
        for i in 15..20 {
            assert_eq!(results[i], Some(0.0));
        }
    }

    #[test]
    fn test_rsi_stays_in_bounds_on_oscillating_series() {
        let values: Vec<f64> = (0..200).map(|i| 100.0 + ((i as f64) * 0.7).sin() * 5.0 + (i % 7) as f64).collect();
        for value in rsi(&values, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
