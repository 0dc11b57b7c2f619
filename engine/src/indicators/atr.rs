// Average True Range (ATR)
use super::defined;
use shared::models::Candle;

/// max(high - low, |high - prev close|, |low - prev close|)
pub fn true_range(current: &Candle, previous: &Candle) -> f64 {
    (current.high - current.low)
        .max((current.high - previous.close).abs())
        .max((current.low - previous.close).abs())
}

/// Mean of the most recent `period` true ranges. Undefined with fewer than
/// `period + 1` candles.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }
    let recent = &candles[candles.len() - period - 1..];
    let sum: f64 = recent.windows(2).map(|pair| true_range(&pair[1], &pair[0])).sum();
    defined(sum / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(high: f64, low: f64, close: f64) -> Candle {
        Candle { time: 0, open: close, high, low, close, volume: 0.0 }
    }

    #[test]
    fn test_atr_constant_prices_is_zero() {
        let candles = vec![candle(10.0, 10.0, 10.0); 30];
        assert_eq!(atr(&candles, 14), Some(0.0));
    }

    #[test]
    fn test_atr_insufficient_history() {
        let candles = vec![candle(11.0, 9.0, 10.0); 14];
        assert_eq!(atr(&candles, 14), None);
        assert_eq!(atr(&[], 14), None);
    }

    #[test]
    fn test_atr_uses_most_recent_window() {
        let mut candles = vec![candle(100.0, 90.0, 95.0); 10];
        // Last three bars have a range of 2 and close unchanged
        candles.extend(vec![candle(11.0, 9.0, 10.0); 3]);
        // Window covers bars 10..13; the first includes a gap from 95 to 11
        let value = atr(&candles, 2).unwrap();
        assert!((value - 2.0).abs() < 1e-12);
        let wider = atr(&candles, 3).unwrap();
        assert!((wider - (86.0 + 2.0 + 2.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_true_range_gap() {
        let prev = candle(10.0, 9.0, 9.5);
        let gap_up = candle(13.0, 12.0, 12.5);
        assert_eq!(true_range(&gap_up, &prev), 3.5);
    }
}
