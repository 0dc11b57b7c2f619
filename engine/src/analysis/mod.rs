// Candle series in, market assessment out
pub mod instrument;
pub mod levels;
pub mod narrative;
pub mod profile;
pub mod risk;
pub mod scenario;
pub mod scoring;

use crate::config::settings::AnalysisSettings;
use crate::data::resampler::{resample, resample_factor};
use crate::indicators::{value_at, IndicatorSet};
use chrono::{DateTime, Utc};
use instrument::Instrument;
use levels::compute_levels;
use narrative::NarrativeInputs;
use profile::TimeframeProfile;
use scenario::ScenarioContext;
use scoring::ScoringInputs;
use serde::{Deserialize, Serialize};
use shared::models::{
    AnalysisResult, Candle, ChartBar, IndicatorSnapshot, RiskLevel, Sentiment, Timeframe, TrendDirection,
    TrendStrength, VolatilityLevel,
};
use std::str::FromStr;
use tracing::{debug, info, warn};

// Level/scenario step when ATR has no history or is flat, as a fraction of price
const ATR_FALLBACK_FRACTION: f64 = 0.005;

/// One analysis call: the symbol, the timeframe label the result is for, and
/// the candles in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub symbol: String,
    pub timeframe: String,
    #[serde(default)]
    pub candles: Vec<Candle>,
    /// Resolution of `candles` when it is finer than `timeframe`.
    #[serde(default)]
    pub source_timeframe: Option<Timeframe>,
}

impl AnalysisRequest {
    pub fn new(symbol: impl Into<String>, timeframe: impl Into<String>, candles: Vec<Candle>) -> Self {
        AnalysisRequest { symbol: symbol.into(), timeframe: timeframe.into(), candles, source_timeframe: None }
    }

    pub fn with_source_timeframe(mut self, source: Timeframe) -> Self {
        self.source_timeframe = Some(source);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    settings: AnalysisSettings,
}

impl Analyzer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Analyzer { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.analyze_at(request, Utc::now())
    }

    /// Same as [`Analyzer::analyze`] with an explicit generation timestamp.
    pub fn analyze_at(&self, request: &AnalysisRequest, generated_at: DateTime<Utc>) -> AnalysisResult {
        let timeframe = Timeframe::from_str(&request.timeframe).ok();
        let timeframe_label = timeframe.map(|tf| tf.label().to_string()).unwrap_or_else(|| request.timeframe.clone());
        let candles = self.prepare_candles(request, timeframe);
        let indicators = IndicatorSet::compute(&candles, &self.settings);
        let snapshot = indicators.snapshot();

        let last = candles.last().filter(|c| c.has_finite_prices());
        let (last, rsi, macd, signal) = match (last, snapshot.rsi, snapshot.macd, snapshot.signal) {
            (Some(last), Some(rsi), Some(macd), Some(signal)) => (*last, rsi, macd, signal),
            _ => {
                warn!(
                    symbol = %request.symbol,
                    timeframe = %timeframe_label,
                    bars = candles.len(),
                    "Insufficient data for analysis, returning neutral result"
                );
                return insufficient_data(&request.symbol, timeframe_label, generated_at);
            }
        };
        let price = last.close;

        let profile = TimeframeProfile::for_timeframe(timeframe);
        let scoring = scoring::score(
            &ScoringInputs {
                rsi,
                macd,
                signal,
                ema20: snapshot.ema20,
                ema50: snapshot.ema50,
                ema200: snapshot.ema200,
                adx: snapshot.adx,
                ema200_slope: snapshot.ema200_slope,
            },
            &profile,
        );
        debug!(
            symbol = %request.symbol,
            bull = scoring.bull_score,
            bear = scoring.bear_score,
            neutral = scoring.neutral_score,
            "Scored last bar"
        );

        let instrument = Instrument::resolve(&request.symbol);
        let retained_start = candles.len().saturating_sub(profile::display_window(timeframe));
        let retained = &candles[retained_start..];
        let baseline = &retained[retained.len().saturating_sub(self.settings.level_lookback)..];
        let dynamic_levels: Vec<f64> = [snapshot.ema50, snapshot.ema200].into_iter().flatten().collect();
        let step = snapshot.atr.filter(|atr| *atr > 0.0).unwrap_or(price * ATR_FALLBACK_FRACTION);
        let levels = compute_levels(baseline, &dynamic_levels, price, step, &instrument);

        let recent_closes: Vec<f64> = candles[candles.len().saturating_sub(self.settings.activation_lookback)..]
            .iter()
            .map(|c| c.close)
            .collect();
        let (bullish_scenario, bearish_scenario) = match &levels {
            Some(levels) => scenario::build_scenarios(&ScenarioContext {
                price,
                key_support: levels.key_support,
                key_resistance: levels.key_resistance,
                atr: step,
                invalidation_multiplier: profile::invalidation_multiplier(timeframe),
                trigger_buffer: self.settings.trigger_buffer,
                instrument: &instrument,
                trend_short: scoring.trend_short,
                rsi,
                macd,
                signal,
                recent_closes: &recent_closes,
            }),
            None => (None, None),
        };

        let trigger = bullish_scenario.as_ref().or(bearish_scenario.as_ref()).map(|s| s.trigger_price);
        let risk = risk::assess(&candles, price, trigger, &self.settings);

        let opinion = narrative::compose_opinion(&NarrativeInputs {
            symbol: &request.symbol,
            timeframe: &timeframe_label,
            price,
            scoring: &scoring,
            nearest_support: levels.as_ref().and_then(|l| l.supports.first().copied()),
            nearest_resistance: levels.as_ref().and_then(|l| l.resistances.first().copied()),
            bullish: bullish_scenario.as_ref(),
            bearish: bearish_scenario.as_ref(),
            decimals: instrument.decimals,
        });

        info!(
            symbol = %request.symbol,
            timeframe = %timeframe_label,
            bars = candles.len(),
            trend = ?scoring.trend_long,
            sentiment = ?scoring.sentiment,
            bull_pct = scoring.bull_pct,
            bear_pct = scoring.bear_pct,
            neutral_pct = scoring.neutral_pct,
            risk = ?risk.risk_level,
            "Analysis complete"
        );

        let (support, resistance, key_support, key_resistance) = match levels {
            Some(levels) => (levels.supports, levels.resistances, Some(levels.key_support), Some(levels.key_resistance)),
            None => (Vec::new(), Vec::new(), None, None),
        };

        AnalysisResult {
            symbol: request.symbol.clone(),
            timeframe: timeframe_label,
            price: Some(price),
            trend: scoring.trend_long,
            trend_short: scoring.trend_short,
            trend_strength: scoring.trend_strength,
            sentiment: scoring.sentiment,
            bull_pct: scoring.bull_pct,
            bear_pct: scoring.bear_pct,
            neutral_pct: scoring.neutral_pct,
            opinion,
            support,
            resistance,
            key_support,
            key_resistance,
            bullish_scenario,
            bearish_scenario,
            risk_level: risk.risk_level,
            risk_explanation: risk.explanation,
            volatility_pct: risk.volatility_pct,
            volatility_level: risk.volatility_level,
            indicators: snapshot,
            recent_bars: chart_bars(retained, retained_start, &indicators),
            generated_at,
        }
    }

    /// Applies request-level resampling when the source resolution divides the
    /// requested timeframe; otherwise the candles are analysed as given.
    pub fn prepare_candles(&self, request: &AnalysisRequest, timeframe: Option<Timeframe>) -> Vec<Candle> {
        let (source, target) = match (request.source_timeframe, timeframe) {
            (Some(source), Some(target)) if source != target => (source, target),
            _ => return request.candles.clone(),
        };
        match resample_factor(source, target) {
            Some(factor) => {
                let resampled = resample(&request.candles, factor);
                debug!(
                    symbol = %request.symbol,
                    source = %source,
                    target = %target,
                    factor,
                    bars_in = request.candles.len(),
                    bars_out = resampled.len(),
                    "Resampled candles"
                );
                resampled
            }
            None => {
                warn!(
                    symbol = %request.symbol,
                    source = %source,
                    target = %target,
                    "Timeframe is not an integer multiple of the source, analysing candles as given"
                );
                request.candles.clone()
            }
        }
    }
}

fn chart_bars(retained: &[Candle], offset: usize, indicators: &IndicatorSet) -> Vec<ChartBar> {
    retained
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let index = offset + i;
            ChartBar {
                time: c.time,
                open: c.open,
                high: c.high,
                low: c.low,
                close: c.close,
                volume: c.volume,
                ema20: value_at(&indicators.ema20, index),
                ema50: value_at(&indicators.ema50, index),
                ema200: value_at(&indicators.ema200, index),
                bollinger_upper: value_at(&indicators.bollinger.upper, index),
                bollinger_lower: value_at(&indicators.bollinger.lower, index),
            }
        })
        .collect()
}

/// The fixed neutral result returned when the last bar or the momentum
/// indicators are undefined.
pub fn insufficient_data(symbol: &str, timeframe: String, generated_at: DateTime<Utc>) -> AnalysisResult {
    AnalysisResult {
        symbol: symbol.to_string(),
        timeframe,
        price: None,
        trend: TrendDirection::Neutral,
        trend_short: TrendDirection::Neutral,
        trend_strength: TrendStrength::Weak,
        sentiment: Sentiment::Mixed,
        bull_pct: 0,
        bear_pct: 0,
        neutral_pct: 100,
        opinion: narrative::insufficient_data_opinion(),
        support: Vec::new(),
        resistance: Vec::new(),
        key_support: None,
        key_resistance: None,
        bullish_scenario: None,
        bearish_scenario: None,
        risk_level: RiskLevel::Low,
        risk_explanation: narrative::insufficient_data_risk(),
        volatility_pct: None,
        volatility_level: VolatilityLevel::Low,
        indicators: IndicatorSnapshot::default(),
        recent_bars: Vec::new(),
        generated_at,
    }
}
