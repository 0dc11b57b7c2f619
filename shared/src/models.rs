use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLCV bar. `time` is the bar open in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    /// True when every price field is a finite number. Bars failing this are
    /// treated as undefined wherever the engine reads them.
    pub fn has_finite_prices(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timeframe {
    #[serde(rename = "5M")]
    Minute5,
    #[serde(rename = "15M")]
    Minute15,
    #[serde(rename = "1H")]
    Hour1,
    #[serde(rename = "4H")]
    Hour4,
    #[serde(rename = "1D")]
    Day1,
    #[serde(rename = "1W")]
    Week1,
}

impl Timeframe {
    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::Minute5 => 5,
            Timeframe::Minute15 => 15,
            Timeframe::Hour1 => 60,
            Timeframe::Hour4 => 240,
            Timeframe::Day1 => 1_440,
            Timeframe::Week1 => 10_080,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Minute5 => "5M",
            Timeframe::Minute15 => "15M",
            Timeframe::Hour1 => "1H",
            Timeframe::Hour4 => "4H",
            Timeframe::Day1 => "1D",
            Timeframe::Week1 => "1W",
        }
    }

    /// All supported timeframes, finest first.
    pub fn all() -> [Timeframe; 6] {
        [
            Timeframe::Minute5,
            Timeframe::Minute15,
            Timeframe::Hour1,
            Timeframe::Hour4,
            Timeframe::Day1,
            Timeframe::Week1,
        ]
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "5m" | "5min" | "m5" => Ok(Timeframe::Minute5),
            "15m" | "15min" | "m15" => Ok(Timeframe::Minute15),
            "1h" | "60m" | "1hour" | "h1" => Ok(Timeframe::Hour1),
            "4h" | "4hour" | "h4" => Ok(Timeframe::Hour4),
            "1d" | "1day" | "d1" | "d" => Ok(Timeframe::Day1),
            "1w" | "1wk" | "1week" | "w1" | "w" => Ok(Timeframe::Week1),
            _ => Err(anyhow!(
                "Invalid timeframe: '{}'. Valid options: 5M, 15M, 1H, 4H, 1D, 1W",
                s
            )),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A named indicator series aligned to the candle input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

/// Text carried in both output languages: English first, Portuguese second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub pt: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, pt: impl Into<String>) -> Self {
        Self { en: en.into(), pt: pt.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "bullish dominance")]
    BullishDominance,
    #[serde(rename = "bearish dominance")]
    BearishDominance,
    #[serde(rename = "mixed")]
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScenarioStatus {
    Pending,
    Activated,
}

/// A conditional directional trade idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub trigger_price: f64,
    pub target1: f64,
    pub target2: f64,
    pub invalidation_price: f64,
    pub status: ScenarioStatus,
    pub activation_text: BilingualText,
    pub invalidation_text: BilingualText,
}

/// Last-bar indicator values; `None` where history was insufficient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub ema200_slope: Option<f64>,
    pub adx: Option<f64>,
    pub atr: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

/// A retained bar with its overlay values, for charting by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub symbol: String,
    pub timeframe: String,
    pub price: Option<f64>,
    pub trend: TrendDirection,
    pub trend_short: TrendDirection,
    pub trend_strength: TrendStrength,
    pub sentiment: Sentiment,
    pub bull_pct: u32,
    pub bear_pct: u32,
    pub neutral_pct: u32,
    pub opinion: BilingualText,
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
    pub key_support: Option<f64>,
    pub key_resistance: Option<f64>,
    pub bullish_scenario: Option<Scenario>,
    pub bearish_scenario: Option<Scenario>,
    pub risk_level: RiskLevel,
    pub risk_explanation: BilingualText,
    pub volatility_pct: Option<f64>,
    pub volatility_level: VolatilityLevel,
    pub indicators: IndicatorSnapshot,
    pub recent_bars: Vec<ChartBar>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_from_str() {
        assert_eq!(Timeframe::from_str("4H").unwrap(), Timeframe::Hour4);
        assert_eq!(Timeframe::from_str("15m").unwrap(), Timeframe::Minute15);
        assert_eq!(Timeframe::from_str("1d").unwrap(), Timeframe::Day1);
        assert_eq!(Timeframe::from_str("1W").unwrap(), Timeframe::Week1);
        assert!(Timeframe::from_str("3H").is_err());
    }

    #[test]
    fn test_timeframe_labels_round_trip_through_display() {
        for tf in Timeframe::all() {
            assert_eq!(Timeframe::from_str(&tf.to_string()).unwrap(), tf);
        }
    }

    #[test]
    fn test_labels_serialize_upper_case() {
        assert_eq!(serde_json::to_string(&TrendDirection::Bullish).unwrap(), "\"BULLISH\"");
        assert_eq!(serde_json::to_string(&ScenarioStatus::Activated).unwrap(), "\"ACTIVATED\"");
        assert_eq!(serde_json::to_string(&Sentiment::Mixed).unwrap(), "\"mixed\"");
        assert_eq!(serde_json::to_string(&Timeframe::Hour4).unwrap(), "\"4H\"");
    }

    #[test]
    fn test_candle_finite_check() {
        let mut candle = Candle { time: 0, open: 1.0, high: 2.0, low: 0.5, close: 1.5, volume: 10.0 };
        assert!(candle.has_finite_prices());
        candle.close = f64::NAN;
        assert!(!candle.has_finite_prices());
    }
}
