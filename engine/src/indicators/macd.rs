// Moving Average Convergence/Divergence (MACD) indicator implementation
use super::ema::ema;
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// MACD line, signal line and histogram, each aligned to the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// `macd = EMA(fast) - EMA(slow)`, `signal = EMA(signal_period)` of the line,
/// `histogram = macd - signal`.
///
/// Undefined MACD entries feed the signal EMA as zero so its seed window is
/// always full; the signal itself is only reported where the line exists.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let seeded: Vec<f64> = line.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal: Vec<Option<f64>> = ema(&seeded, signal_period)
        .into_iter()
        .zip(line.iter())
        .map(|(s, m)| m.and(s))
        .collect();

    let histogram = line
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries { macd: line, signal, histogram }
}

/// Exposes the MACD line through the calculator interface.
pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        macd(&closes(data), self.fast, self.slow, self.signal).macd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn test_macd_alignment() {
        let series = macd(&trending(60), 12, 26, 9);
        assert_eq!(series.macd.len(), 60);
        assert_eq!(series.signal.len(), 60);
        assert_eq!(series.histogram.len(), 60);

        // Slow EMA first defined at index 25
        assert!(series.macd[24].is_none());
        assert!(series.macd[25].is_some());
        assert!(series.signal[24].is_none());
        assert!(series.signal[25].is_some());
        assert!(series.histogram[25].is_some());
    }

    #[test]
    fn test_macd_positive_on_uptrend() {
        let series = macd(&trending(80), 12, 26, 9);
        let last = series.macd.last().unwrap().unwrap();
        assert!(last > 0.0);
        let hist = series.histogram.last().unwrap().unwrap();
        let signal = series.signal.last().unwrap().unwrap();
        assert!((hist - (last - signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_short_input_is_undefined() {
        let series = macd(&trending(20), 12, 26, 9);
        assert!(series.macd.iter().all(Option::is_none));
        assert!(series.signal.iter().all(Option::is_none));
        assert!(series.histogram.iter().all(Option::is_none));
    }
}
