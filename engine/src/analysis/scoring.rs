// Trend/sentiment classification and weighted bull/bear/neutral scoring
use super::profile::TimeframeProfile;
use shared::models::{Sentiment, TrendDirection, TrendStrength};

/// Last-bar values the rules read. The momentum triple is always defined here;
/// the trend inputs may still lack history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringInputs {
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub adx: Option<f64>,
    pub ema200_slope: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scoring {
    pub trend_long: TrendDirection,
    pub trend_short: TrendDirection,
    pub trend_strength: TrendStrength,
    pub sentiment: Sentiment,
    pub bull_score: u32,
    pub bear_score: u32,
    pub neutral_score: u32,
    pub bull_pct: u32,
    pub bear_pct: u32,
    pub neutral_pct: u32,
}

#[derive(Debug, Default)]
struct Tally {
    bull: u32,
    bear: u32,
    neutral: u32,
}

impl Tally {
    fn add(&mut self, direction: TrendDirection, weight: u32) {
        match direction {
            TrendDirection::Bullish => self.bull += weight,
            TrendDirection::Bearish => self.bear += weight,
            TrendDirection::Neutral => self.neutral += weight,
        }
    }
}

fn compare(a: Option<f64>, b: Option<f64>) -> TrendDirection {
    match (a, b) {
        (Some(a), Some(b)) if a > b => TrendDirection::Bullish,
        (Some(a), Some(b)) if a < b => TrendDirection::Bearish,
        _ => TrendDirection::Neutral,
    }
}

pub fn trend_long(inputs: &ScoringInputs, profile: &TimeframeProfile) -> TrendDirection {
    let stacked = match (inputs.ema20, inputs.ema50, inputs.ema200) {
        (Some(fast), Some(mid), Some(slow)) if fast > mid && mid > slow => TrendDirection::Bullish,
        (Some(fast), Some(mid), Some(slow)) if fast < mid && mid < slow => TrendDirection::Bearish,
        _ => TrendDirection::Neutral,
    };
    match inputs.adx {
        Some(adx) if adx < profile.adx_trend => TrendDirection::Neutral,
        _ => stacked,
    }
}

pub fn trend_short(inputs: &ScoringInputs) -> TrendDirection {
    compare(inputs.ema20, inputs.ema50)
}

pub fn trend_strength(adx: Option<f64>, profile: &TimeframeProfile) -> TrendStrength {
    match adx {
        Some(adx) if adx > profile.adx_trend + 5.0 => TrendStrength::Strong,
        Some(adx) if adx > profile.adx_trend => TrendStrength::Moderate,
        _ => TrendStrength::Weak,
    }
}

pub fn sentiment(rsi: f64, macd: f64, signal: f64) -> Sentiment {
    if rsi > 55.0 && macd > signal {
        Sentiment::BullishDominance
    } else if rsi < 45.0 && macd < signal {
        Sentiment::BearishDominance
    } else {
        Sentiment::Mixed
    }
}

/// Converts the three scores to integer percentages summing to exactly 100.
pub fn percentages(bull: u32, bear: u32, neutral: u32) -> (u32, u32, u32) {
    let total = (bull + bear + neutral).max(1) as f64;
    let mut bull_pct = (100.0 * bull as f64 / total).round() as u32;
    let mut bear_pct = (100.0 * bear as f64 / total).round() as u32;
    // Two halves rounding up can overshoot by one; take it from the larger side.
    if bull_pct + bear_pct > 100 {
        if bull_pct >= bear_pct {
            bull_pct = 100 - bear_pct;
        } else {
            bear_pct = 100 - bull_pct;
        }
    }
    (bull_pct, bear_pct, 100 - bull_pct - bear_pct)
}

pub fn score(inputs: &ScoringInputs, profile: &TimeframeProfile) -> Scoring {
    let trend_long = trend_long(inputs, profile);
    let trend_short = trend_short(inputs);
    let mut tally = Tally::default();

    // 1. RSI against the timeframe thresholds
    if inputs.rsi > profile.rsi_bull {
        tally.add(TrendDirection::Bullish, 2);
    } else if inputs.rsi < profile.rsi_bear {
        tally.add(TrendDirection::Bearish, 2);
    } else {
        tally.add(TrendDirection::Neutral, 1);
    }

    // 2. MACD against its signal, with a neutral band
    let spread = inputs.macd - inputs.signal;
    if spread.abs() <= profile.macd_neutral {
        tally.add(TrendDirection::Neutral, 2);
    } else if spread > 0.0 {
        tally.add(TrendDirection::Bullish, 2);
    } else {
        tally.add(TrendDirection::Bearish, 2);
    }

    // 3. Fast vs mid EMA
    tally.add(trend_short, 1);

    // 4. ADX-confirmed long trend
    match inputs.adx {
        Some(adx) if adx > profile.adx_trend && trend_long != TrendDirection::Neutral => tally.add(trend_long, 2),
        _ => tally.add(TrendDirection::Neutral, 1),
    }

    // 5. Slow EMA slope
    if let Some(slope) = inputs.ema200_slope {
        tally.add(compare(Some(slope), Some(0.0)), 1);
    }

    let (bull_pct, bear_pct, neutral_pct) = percentages(tally.bull, tally.bear, tally.neutral);

    Scoring {
        trend_long,
        trend_short,
        trend_strength: trend_strength(inputs.adx, profile),
        sentiment: sentiment(inputs.rsi, inputs.macd, inputs.signal),
        bull_score: tally.bull,
        bear_score: tally.bear,
        neutral_score: tally.neutral,
        bull_pct,
        bear_pct,
        neutral_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullish_inputs() -> ScoringInputs {
        ScoringInputs {
            rsi: 64.0,
            macd: 1.5,
            signal: 0.9,
            ema20: Some(110.0),
            ema50: Some(105.0),
            ema200: Some(100.0),
            adx: Some(32.0),
            ema200_slope: Some(0.8),
        }
    }

    #[test]
    fn test_full_bullish_alignment() {
        let scoring = score(&bullish_inputs(), &TimeframeProfile::default());
        assert_eq!(scoring.trend_long, TrendDirection::Bullish);
        assert_eq!(scoring.trend_short, TrendDirection::Bullish);
        assert_eq!(scoring.trend_strength, TrendStrength::Strong);
        assert_eq!(scoring.sentiment, Sentiment::BullishDominance);
        // 2 + 2 + 1 + 2 + 1
        assert_eq!((scoring.bull_score, scoring.bear_score, scoring.neutral_score), (8, 0, 0));
        assert_eq!((scoring.bull_pct, scoring.bear_pct, scoring.neutral_pct), (100, 0, 0));
    }

    #[test]
    fn test_weak_adx_forces_neutral_long_trend() {
        let inputs = ScoringInputs { adx: Some(15.0), ..bullish_inputs() };
        let scoring = score(&inputs, &TimeframeProfile::default());
        assert_eq!(scoring.trend_long, TrendDirection::Neutral);
        // Short trend ignores ADX
        assert_eq!(scoring.trend_short, TrendDirection::Bullish);
        assert_eq!(scoring.trend_strength, TrendStrength::Weak);
        // RSI 2 + MACD 2 + EMA 1 + slope 1 bull, ADX gate +1 neutral
        assert_eq!((scoring.bull_score, scoring.neutral_score), (6, 1));
    }

    #[test]
    fn test_moderate_strength_band() {
        let profile = TimeframeProfile::default();
        assert_eq!(trend_strength(Some(22.0), &profile), TrendStrength::Moderate);
        assert_eq!(trend_strength(Some(25.0), &profile), TrendStrength::Moderate);
        assert_eq!(trend_strength(Some(25.1), &profile), TrendStrength::Strong);
        assert_eq!(trend_strength(None, &profile), TrendStrength::Weak);
    }

    #[test]
    fn test_macd_inside_neutral_band() {
        let inputs = ScoringInputs { macd: 1.0, signal: 0.9, rsi: 50.0, ema200_slope: None, ..bullish_inputs() };
        let scoring = score(&inputs, &TimeframeProfile::default());
        // RSI neutral 1, MACD neutral 2, EMA bull 1, ADX bull 2
        assert_eq!((scoring.bull_score, scoring.bear_score, scoring.neutral_score), (3, 0, 3));
        assert_eq!((scoring.bull_pct, scoring.bear_pct, scoring.neutral_pct), (50, 0, 50));
        assert_eq!(scoring.sentiment, Sentiment::Mixed);
    }

    #[test]
    fn test_bearish_sentiment_and_scores() {
        let inputs = ScoringInputs {
            rsi: 30.0,
            macd: -2.0,
            signal: -1.0,
            ema20: Some(90.0),
            ema50: Some(95.0),
            ema200: Some(100.0),
            adx: Some(28.0),
            ema200_slope: Some(-0.5),
        };
        let scoring = score(&inputs, &TimeframeProfile::default());
        assert_eq!(scoring.trend_long, TrendDirection::Bearish);
        assert_eq!(scoring.sentiment, Sentiment::BearishDominance);
        assert_eq!(scoring.bear_pct, 100);
    }

    #[test]
    fn test_missing_trend_history_counts_neutral() {
        let inputs = ScoringInputs {
            rsi: 50.0,
            macd: 0.0,
            signal: 0.0,
            ema20: Some(10.0),
            ema50: None,
            ema200: None,
            adx: None,
            ema200_slope: None,
        };
        let scoring = score(&inputs, &TimeframeProfile::default());
        assert_eq!(scoring.trend_long, TrendDirection::Neutral);
        assert_eq!(scoring.trend_short, TrendDirection::Neutral);
        assert_eq!((scoring.bull_pct, scoring.bear_pct, scoring.neutral_pct), (0, 0, 100));
    }

    #[test]
    fn test_percentages_always_sum_to_hundred() {
        for bull in 0..10 {
            for bear in 0..10 {
                for neutral in 0..10 {
                    let (b, r, n) = percentages(bull, bear, neutral);
                    assert_eq!(b + r + n, 100, "scores {} {} {}", bull, bear, neutral);
                }
            }
        }
        assert_eq!(percentages(0, 0, 0), (0, 0, 100));
        assert_eq!(percentages(3, 5, 0), (38, 62, 0));
    }
}
