// Support/resistance levels from the recent range and the slow moving averages
use super::instrument::Instrument;
use shared::models::Candle;
use shared::utils::round_to;

/// Number of support and resistance candidates reported.
pub const LEVEL_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Levels {
    pub raw_support: f64,
    pub raw_resistance: f64,
    pub key_support: f64,
    pub key_resistance: f64,
    /// Below price, nearest first.
    pub supports: Vec<f64>,
    /// Above price, nearest first.
    pub resistances: Vec<f64>,
}

/// Builds the level set from the baseline bars (most recent lookback of the
/// retained window), the defined dynamic levels and the step used for padding.
///
/// Returns `None` when the baseline holds no finite bar.
pub fn compute_levels(
    baseline: &[Candle],
    dynamic_levels: &[f64],
    price: f64,
    step: f64,
    instrument: &Instrument,
) -> Option<Levels> {
    let finite: Vec<&Candle> = baseline.iter().filter(|c| c.has_finite_prices()).collect();
    if finite.is_empty() {
        return None;
    }
    let raw_resistance = finite.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let raw_support = finite.iter().map(|c| c.low).fold(f64::MAX, f64::min);

    let key_resistance = dynamic_levels.iter().copied().fold(raw_resistance, f64::max);
    let key_support = dynamic_levels.iter().copied().fold(raw_support, f64::min);

    // FX pads with single pips instead of ATR steps.
    let step = instrument.pip_size.unwrap_or(step);

    let mut above: Vec<f64> = std::iter::once(raw_resistance)
        .chain(dynamic_levels.iter().copied())
        .filter(|level| *level > price)
        .collect();
    above.sort_by(|a, b| a.total_cmp(b));

    let mut below: Vec<f64> = std::iter::once(raw_support)
        .chain(dynamic_levels.iter().copied())
        .filter(|level| *level < price)
        .collect();
    below.sort_by(|a, b| b.total_cmp(a));

    let mut resistances = pad(above, price, step);
    let mut supports = pad(below, price, -step);

    if instrument.is_forex() {
        let decimals = instrument.decimals as u32;
        resistances.iter_mut().for_each(|v| *v = round_to(*v, decimals));
        supports.iter_mut().for_each(|v| *v = round_to(*v, decimals));
    }

    Some(Levels { raw_support, raw_resistance, key_support, key_resistance, supports, resistances })
}

// Trims to LEVEL_COUNT or extends by stepping beyond the last entry (or price).
fn pad(mut levels: Vec<f64>, price: f64, step: f64) -> Vec<f64> {
    levels.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON * a.abs().max(1.0));
    levels.truncate(LEVEL_COUNT);
    while levels.len() < LEVEL_COUNT {
        let anchor = levels.last().copied().unwrap_or(price);
        levels.push(anchor + step);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64) -> Candle {
        Candle { time: 0, open: (high + low) / 2.0, high, low, close: (high + low) / 2.0, volume: 1.0 }
    }

    fn equity() -> Instrument {
        Instrument::resolve("AAPL")
    }

    #[test]
    fn test_raw_and_key_levels() {
        let baseline = vec![bar(105.0, 98.0), bar(107.0, 99.0), bar(104.0, 97.0)];
        let levels = compute_levels(&baseline, &[110.0, 95.0], 101.0, 1.0, &equity()).unwrap();
        assert_eq!(levels.raw_resistance, 107.0);
        assert_eq!(levels.raw_support, 97.0);
        assert_eq!(levels.key_resistance, 110.0);
        assert_eq!(levels.key_support, 95.0);
        assert_eq!(levels.resistances, vec![107.0, 110.0, 111.0]);
        assert_eq!(levels.supports, vec![97.0, 95.0, 94.0]);
    }

    #[test]
    fn test_padding_from_price_when_no_candidate() {
        // Price above the whole range and both averages
        let baseline = vec![bar(105.0, 100.0)];
        let levels = compute_levels(&baseline, &[], 120.0, 2.0, &equity()).unwrap();
        assert_eq!(levels.resistances, vec![122.0, 124.0, 126.0]);
        assert_eq!(levels.supports, vec![100.0, 98.0, 96.0]);
    }

    #[test]
    fn test_forex_pads_with_pips_and_rounds() {
        let eurusd = Instrument::resolve("EURUSD");
        let baseline = vec![bar(1.09123456, 1.08011111)];
        let levels = compute_levels(&baseline, &[], 1.0850, 0.0040, &eurusd).unwrap();
        assert_eq!(levels.resistances, vec![1.09123, 1.09133, 1.09143]);
        assert_eq!(levels.supports, vec![1.08011, 1.08001, 1.07991]);
    }

    #[test]
    fn test_exactly_three_candidates_each_side() {
        let baseline: Vec<Candle> = (0..30).map(|i| bar(100.0 + i as f64, 90.0 - i as f64)).collect();
        let levels = compute_levels(&baseline, &[130.0, 140.0, 50.0], 95.0, 1.5, &equity()).unwrap();
        assert_eq!(levels.resistances.len(), LEVEL_COUNT);
        assert_eq!(levels.supports.len(), LEVEL_COUNT);
        assert!(levels.resistances.windows(2).all(|w| w[0] < w[1]));
        assert!(levels.supports.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_empty_baseline() {
        assert!(compute_levels(&[], &[100.0], 100.0, 1.0, &equity()).is_none());
    }
}
