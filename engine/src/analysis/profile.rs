// Per-timeframe rule thresholds
use shared::models::Timeframe;
use std::str::FromStr;

/// Thresholds the scoring rules read for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeframeProfile {
    pub rsi_bull: f64,
    pub rsi_bear: f64,
    /// Absolute |MACD - signal| below which momentum counts as neutral.
    pub macd_neutral: f64,
    pub adx_trend: f64,
}

impl Default for TimeframeProfile {
    fn default() -> Self {
        TimeframeProfile { rsi_bull: 55.0, rsi_bear: 45.0, macd_neutral: 0.2, adx_trend: 20.0 }
    }
}

const DEFAULT_DISPLAY_WINDOW: usize = 100;
const DEFAULT_INVALIDATION_MULTIPLIER: f64 = 2.5;

impl TimeframeProfile {
    pub fn for_timeframe(timeframe: Option<Timeframe>) -> Self {
        let (rsi_bull, rsi_bear, macd_neutral, adx_trend) = match timeframe {
            Some(Timeframe::Minute5) => (58.0, 42.0, 0.10, 18.0),
            Some(Timeframe::Minute15) => (57.0, 43.0, 0.15, 20.0),
            Some(Timeframe::Hour1) => (55.0, 45.0, 0.20, 20.0),
            Some(Timeframe::Hour4) => (55.0, 45.0, 0.25, 22.0),
            Some(Timeframe::Day1) => (54.0, 46.0, 0.30, 25.0),
            Some(Timeframe::Week1) => (53.0, 47.0, 0.40, 25.0),
            None => return Self::default(),
        };
        TimeframeProfile { rsi_bull, rsi_bear, macd_neutral, adx_trend }
    }

    /// Looks the profile up by label; unknown labels get the default profile.
    pub fn resolve(label: &str) -> Self {
        Self::for_timeframe(Timeframe::from_str(label).ok())
    }
}

/// Bars retained for levels and the chart payload.
pub fn display_window(timeframe: Option<Timeframe>) -> usize {
    match timeframe {
        Some(Timeframe::Minute5) => 60,
        Some(Timeframe::Minute15) => 80,
        Some(Timeframe::Hour1) => 100,
        Some(Timeframe::Hour4) => 120,
        Some(Timeframe::Day1) => 150,
        Some(Timeframe::Week1) => 200,
        None => DEFAULT_DISPLAY_WINDOW,
    }
}

/// ATR multiple between a scenario trigger and its invalidation.
pub fn invalidation_multiplier(timeframe: Option<Timeframe>) -> f64 {
    match timeframe {
        Some(Timeframe::Minute5) => 1.5,
        Some(Timeframe::Minute15) => 2.0,
        Some(Timeframe::Hour1) => 2.5,
        Some(Timeframe::Hour4) => 3.5,
        Some(Timeframe::Day1) => 4.5,
        Some(Timeframe::Week1) => 6.0,
        None => DEFAULT_INVALIDATION_MULTIPLIER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_falls_back_to_default() {
        let profile = TimeframeProfile::resolve("3H");
        assert_eq!(profile, TimeframeProfile { rsi_bull: 55.0, rsi_bear: 45.0, macd_neutral: 0.2, adx_trend: 20.0 });
        assert_eq!(display_window(None), 100);
    }

    #[test]
    fn test_known_labels_resolve() {
        assert_eq!(TimeframeProfile::resolve("5M").rsi_bull, 58.0);
        assert_eq!(TimeframeProfile::resolve("1d").adx_trend, 25.0);
    }

    #[test]
    fn test_display_window_grows_with_timeframe() {
        let windows: Vec<usize> = Timeframe::all().iter().map(|tf| display_window(Some(*tf))).collect();
        assert!(windows.windows(2).all(|w| w[0] < w[1]));
        assert!(display_window(Some(Timeframe::Minute5)) < display_window(Some(Timeframe::Day1)));
    }

    #[test]
    fn test_invalidation_multiplier_range() {
        let multipliers: Vec<f64> = Timeframe::all().iter().map(|tf| invalidation_multiplier(Some(*tf))).collect();
        assert_eq!(multipliers.first(), Some(&1.5));
        assert_eq!(multipliers.last(), Some(&6.0));
        assert!(multipliers.windows(2).all(|w| w[0] < w[1]));
    }
}
