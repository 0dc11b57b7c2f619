// Exponential Moving Average (EMA) indicator implementation
use super::{closes, defined, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// EMA over a numeric series, aligned to the input.
///
/// Seeded with the SMA of the first `period` values at index `period - 1`,
/// then `value * k + prev * (1 - k)` with `k = 2 / (period + 1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];
    let multiplier = 2.0 / (period as f64 + 1.0);

    // Calculate initial SMA for the first EMA value
    let initial_sum: f64 = values.iter().take(period).sum();
    let mut previous_ema = initial_sum / period as f64;
    results.push(defined(previous_ema));

    for value in values.iter().skip(period) {
        let ema = value * multiplier + previous_ema * (1.0 - multiplier);
        results.push(defined(ema));
        previous_ema = ema;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        ema(&closes(data), self.period)
    }
}
