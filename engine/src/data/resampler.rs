// Aggregates finer candles into coarser synthetic bars (e.g. 4H from 1H)
use shared::models::{Candle, Timeframe};

/// Groups candles into consecutive chunks of `factor` and folds each chunk into
/// one bar. A trailing chunk shorter than `factor` is discarded.
///
/// - open: first candle's open, time: first candle's time
/// - high/low: max/min over the chunk
/// - close: last candle's close
/// - volume: summed
pub fn resample(candles: &[Candle], factor: usize) -> Vec<Candle> {
    if factor == 0 {
        return Vec::new();
    }
    candles
        .chunks_exact(factor)
        .map(|chunk| {
            let first = chunk[0];
            chunk.iter().skip(1).fold(first, |mut bar, c| {
                if c.high > bar.high {
                    bar.high = c.high;
                }
                if c.low < bar.low {
                    bar.low = c.low;
                }
                bar.close = c.close;
                bar.volume += c.volume;
                bar
            })
        })
        .collect()
}

/// Integer multiple between two timeframes, when `target` is strictly coarser
/// than `source` and divides evenly.
pub fn resample_factor(source: Timeframe, target: Timeframe) -> Option<usize> {
    let (src, dst) = (source.minutes(), target.minutes());
    if dst > src && dst % src == 0 {
        Some((dst / src) as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_candle(i: usize) -> Candle {
        let base = 100.0 + i as f64;
        Candle {
            time: i as i64 * 3_600_000,
            open: base,
            high: base + 2.0,
            low: base - 1.0,
            close: base + 0.5,
            volume: 10.0,
        }
    }

    fn unit_candles(n: usize) -> Vec<Candle> {
        (0..n).map(unit_candle).collect()
    }

    #[test]
    fn test_eight_into_two() {
        let bars = resample(&unit_candles(8), 4);
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn test_trailing_partial_chunk_discarded() {
        let bars = resample(&unit_candles(5), 4);
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_aggregate_fields() {
        let bars = resample(&unit_candles(4), 4);
        let bar = bars[0];
        assert_eq!(bar.time, 0);
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 105.0);
        assert_eq!(bar.low, 99.0);
        assert_eq!(bar.close, 103.5);
        assert_eq!(bar.volume, 40.0);
    }

    #[test]
    fn test_empty_input_and_zero_factor() {
        assert!(resample(&[], 4).is_empty());
        assert!(resample(&unit_candles(3), 0).is_empty());
    }

    #[test]
    fn test_resample_factor() {
        assert_eq!(resample_factor(Timeframe::Hour1, Timeframe::Hour4), Some(4));
        assert_eq!(resample_factor(Timeframe::Minute5, Timeframe::Minute15), Some(3));
        assert_eq!(resample_factor(Timeframe::Day1, Timeframe::Week1), Some(7));
        assert_eq!(resample_factor(Timeframe::Hour4, Timeframe::Hour1), None);
        assert_eq!(resample_factor(Timeframe::Hour1, Timeframe::Hour1), None);
    }
}
