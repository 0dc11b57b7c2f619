// Technical indicators module
pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use adx::{adx, Adx};
pub use atr::{atr, true_range};
pub use bollinger::{bollinger, Bollinger, BollingerBands};
pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdSeries};
pub use rsi::{rsi, Rsi};

use crate::config::settings::AnalysisSettings;
use serde_json::Value;
use shared::models::{Candle, Indicator, IndicatorSnapshot};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>; // None where history is insufficient
}

/// Non-finite results become undefined instead of leaking NaN downstream.
pub(crate) fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

/// Value at `index` of an aligned series, flattening the undefined sentinel.
pub fn value_at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}

/// Last entry of an aligned series.
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Every series the analysis reads, index-aligned with the candle input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
    pub ema20: Vec<Option<f64>>,
    pub ema50: Vec<Option<f64>>,
    pub ema200: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
    pub bollinger: BollingerBands,
    /// Change of the slow EMA over the slope lookback, when both ends exist.
    pub ema200_slope: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle], settings: &AnalysisSettings) -> Self {
        let close = closes(candles);
        let high: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let low: Vec<f64> = candles.iter().map(|c| c.low).collect();

        let MacdSeries { macd, signal, histogram } =
            macd::macd(&close, settings.macd_fast, settings.macd_slow, settings.macd_signal);
        let ema200 = ema::ema(&close, settings.ema_slow);
        let ema200_slope = Self::slope(&ema200, settings.slope_lookback);

        let set = IndicatorSet {
            rsi: rsi::rsi(&close, settings.rsi_period),
            macd,
            signal,
            histogram,
            ema20: ema::ema(&close, settings.ema_fast),
            ema50: ema::ema(&close, settings.ema_mid),
            ema200,
            adx: adx::adx(&high, &low, &close, settings.adx_period),
            bollinger: bollinger::bollinger(&close, settings.bollinger_period, settings.bollinger_multiplier),
            ema200_slope,
            atr: atr::atr(candles, settings.atr_period),
        };
        tracing::debug!(
            bars = candles.len(),
            rsi = ?set.snapshot().rsi,
            adx = ?set.snapshot().adx,
            atr = ?set.atr,
            "Computed indicator set"
        );
        set
    }

    fn slope(series: &[Option<f64>], lookback: usize) -> Option<f64> {
        let last = series.len().checked_sub(1)?;
        let earlier = last.checked_sub(lookback)?;
        match (value_at(series, last), value_at(series, earlier)) {
            (Some(now), Some(then)) => defined(now - then),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: last_value(&self.rsi),
            macd: last_value(&self.macd),
            signal: last_value(&self.signal),
            histogram: last_value(&self.histogram),
            ema20: last_value(&self.ema20),
            ema50: last_value(&self.ema50),
            ema200: last_value(&self.ema200),
            ema200_slope: self.ema200_slope,
            adx: last_value(&self.adx),
            atr: self.atr,
            bollinger_upper: last_value(&self.bollinger.upper),
            bollinger_middle: last_value(&self.bollinger.middle),
            bollinger_lower: last_value(&self.bollinger.lower),
        }
    }
}

/// The calculators behind the series dump, configured from settings.
pub fn standard_calculators(settings: &AnalysisSettings) -> Vec<Box<dyn IndicatorCalculator>> {
    vec![
        Box::new(Ema::new(settings.ema_fast)),
        Box::new(Ema::new(settings.ema_mid)),
        Box::new(Ema::new(settings.ema_slow)),
        Box::new(Rsi::new(settings.rsi_period)),
        Box::new(Macd::new(settings.macd_fast, settings.macd_slow, settings.macd_signal)),
        Box::new(Bollinger::new(settings.bollinger_period, settings.bollinger_multiplier)),
        Box::new(Adx::new(settings.adx_period)),
    ]
}

/// Runs each calculator over the candles and packages the named series.
pub fn describe(calculators: &[Box<dyn IndicatorCalculator>], candles: &[Candle]) -> Vec<Indicator> {
    calculators
        .iter()
        .map(|calc| Indicator {
            name: calc.name().to_string(),
            parameters: calc.parameters(),
            values: calc.calculate(candles),
        })
        .collect()
}
