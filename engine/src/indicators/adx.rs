// Average Directional Index (ADX) indicator implementation
use super::{defined, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// ADX with Wilder running-sum smoothing, aligned to the input.
///
/// 1. +DM / -DM and true range from bar-over-bar differences
/// 2. running sums seeded over the first `period` moves, then
///    `prev - prev / period + new`
/// 3. DX = |+DI - -DI| / (+DI + -DI) * 100 (denominator 1 when zero)
/// 4. ADX seeded as the mean DX of the second `period` window, then
///    `(prev * (period - 1) + dx) / period`
///
/// Fewer than `2 * period` bars yields an all-undefined series.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let len = high.len().min(low.len()).min(close.len());
    let mut results = vec![None; len];
    if period == 0 || len < 2 * period {
        return results;
    }

    let mut sm_plus = 0.0;
    let mut sm_minus = 0.0;
    let mut sm_tr = 0.0;
    let mut dx_sum = 0.0;
    let mut prev_adx: Option<f64> = None;
    let p = period as f64;

    for i in 1..len {
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];
        let plus_dm = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
        let minus_dm = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
        let tr = (high[i] - low[i])
            .max((high[i] - close[i - 1]).abs())
            .max((low[i] - close[i - 1]).abs());

        if i <= period {
            sm_plus += plus_dm;
            sm_minus += minus_dm;
            sm_tr += tr;
            if i < period {
                continue;
            }
        } else {
            sm_plus = sm_plus - sm_plus / p + plus_dm;
            sm_minus = sm_minus - sm_minus / p + minus_dm;
            sm_tr = sm_tr - sm_tr / p + tr;
        }

        let (plus_di, minus_di) = if sm_tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * sm_plus / sm_tr, 100.0 * sm_minus / sm_tr)
        };
        let di_sum = plus_di + minus_di;
        let dx = (plus_di - minus_di).abs() / if di_sum == 0.0 { 1.0 } else { di_sum } * 100.0;

        // DX is first available at index `period`; the seed window ends at 2 * period - 1.
        match prev_adx {
            None => {
                dx_sum += dx;
                if i == 2 * period - 1 {
                    let seed = dx_sum / p;
                    prev_adx = Some(seed);
                    results[i] = defined(seed);
                }
            }
            Some(prev) => {
                let value = (prev * (p - 1.0) + dx) / p;
                prev_adx = Some(value);
                results[i] = defined(value);
            }
        }
    }
    results
}

pub struct Adx {
    name: String,
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ADX({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let high: Vec<f64> = data.iter().map(|c| c.high).collect();
        let low: Vec<f64> = data.iter().map(|c| c.low).collect();
        let close: Vec<f64> = data.iter().map(|c| c.close).collect();
        adx(&high, &low, &close, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                Candle { time: i as i64, open: base, high: base + 1.0, low: base - 1.0, close: base + 0.5, volume: 1.0 }
            })
            .collect()
    }

    #[test]
    fn test_adx_requires_two_periods() {
        let results = Adx::new(14).calculate(&rising_candles(27));
        assert_eq!(results, vec![None; 27]);
    }

    #[test]
    fn test_adx_first_value_at_seed_index() {
        let results = Adx::new(14).calculate(&rising_candles(40));
        assert!(results[26].is_none());
        assert!(results[27].is_some());
        assert!(results.iter().skip(27).all(Option::is_some));
    }

    #[test]
    fn test_adx_strong_on_steady_trend() {
        let results = Adx::new(14).calculate(&rising_candles(60));
        let last = results.last().unwrap().unwrap();
        // Only +DM is ever positive, so DX is 100 throughout
        assert!((last - 100.0).abs() < 1e-9, "ADX was {}", last);
    }

    #[test]
    fn test_adx_flat_market_is_zero() {
        let candles: Vec<Candle> = (0..40)
            .map(|i| Candle { time: i, open: 10.0, high: 10.0, low: 10.0, close: 10.0, volume: 0.0 })
            .collect();
        let results = Adx::new(14).calculate(&candles);
        assert_eq!(results.last().unwrap(), &Some(0.0));
    }
}
