// Volatility classification and the scenario risk rating
use crate::config::settings::AnalysisSettings;
use shared::models::{BilingualText, Candle, RiskLevel, VolatilityLevel};
use shared::utils::{format_price, format_price_pt, round_to};

// Trigger distance (percent of price) cut-offs for the risk score
const NEAR_TRIGGER_PCT: f64 = 0.15;
const MID_TRIGGER_PCT: f64 = 0.35;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    /// Average bar range over the volatility lookback, as percent of price.
    pub volatility_pct: Option<f64>,
    pub volatility_level: VolatilityLevel,
    /// |price - trigger| as percent of price, when a scenario exists.
    pub trigger_distance_pct: Option<f64>,
    pub score: u32,
    pub risk_level: RiskLevel,
    pub explanation: BilingualText,
}

/// Mean `high - low` of the last `lookback` finite bars relative to `price`.
pub fn volatility_pct(candles: &[Candle], price: f64, lookback: usize) -> Option<f64> {
    let start = candles.len().saturating_sub(lookback);
    let ranges: Vec<f64> = candles[start..]
        .iter()
        .filter(|c| c.has_finite_prices())
        .map(|c| c.high - c.low)
        .collect();
    if ranges.is_empty() || price == 0.0 || !price.is_finite() {
        return None;
    }
    let mean = ranges.iter().sum::<f64>() / ranges.len() as f64;
    Some(mean / price * 100.0)
}

pub fn volatility_level(pct: Option<f64>, settings: &AnalysisSettings) -> VolatilityLevel {
    match pct {
        Some(p) if p > settings.volatility_medium_pct => VolatilityLevel::High,
        Some(p) if p > settings.volatility_low_pct => VolatilityLevel::Medium,
        _ => VolatilityLevel::Low,
    }
}

fn distance_points(distance_pct: f64) -> u32 {
    if distance_pct < NEAR_TRIGGER_PCT {
        0
    } else if distance_pct < MID_TRIGGER_PCT {
        1
    } else {
        2
    }
}

pub fn risk_level(score: u32) -> RiskLevel {
    match score {
        0..=2 => RiskLevel::Low,
        3..=4 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

fn volatility_label(level: VolatilityLevel) -> (&'static str, &'static str) {
    match level {
        VolatilityLevel::Low => ("low", "baixa"),
        VolatilityLevel::Medium => ("medium", "média"),
        VolatilityLevel::High => ("high", "alta"),
    }
}

fn risk_label(level: RiskLevel) -> (&'static str, &'static str) {
    match level {
        RiskLevel::Low => ("low", "baixo"),
        RiskLevel::Medium => ("medium", "médio"),
        RiskLevel::High => ("high", "alto"),
    }
}

/// Rates risk from the recent bar ranges and, when a scenario exists, how far
/// its trigger sits from the current price.
pub fn assess(candles: &[Candle], price: f64, trigger: Option<f64>, settings: &AnalysisSettings) -> RiskAssessment {
    let vol_pct = volatility_pct(candles, price, settings.volatility_lookback);
    let vol_level = volatility_level(vol_pct, settings);
    let vol_points = match vol_level {
        VolatilityLevel::Low => 0,
        VolatilityLevel::Medium => 1,
        VolatilityLevel::High => 2,
    };

    let trigger_distance_pct = trigger
        .filter(|_| price != 0.0)
        .map(|t| (price - t).abs() / price * 100.0)
        .filter(|d| d.is_finite());
    let score = vol_points + trigger_distance_pct.map(distance_points).unwrap_or(0);
    let level = risk_level(score);

    let explanation = explain(vol_pct, vol_level, trigger_distance_pct, level, settings.volatility_lookback);
    tracing::debug!(
        volatility_pct = ?vol_pct,
        trigger_distance_pct = ?trigger_distance_pct,
        score,
        "Risk assessed"
    );

    RiskAssessment {
        volatility_pct: vol_pct.map(|p| round_to(p, 2)),
        volatility_level: vol_level,
        trigger_distance_pct,
        score,
        risk_level: level,
        explanation,
    }
}

fn explain(
    vol_pct: Option<f64>,
    vol_level: VolatilityLevel,
    distance: Option<f64>,
    level: RiskLevel,
    lookback: usize,
) -> BilingualText {
    let (vol_en, vol_pt) = volatility_label(vol_level);
    let (risk_en, risk_pt) = risk_label(level);

    let mut en = match vol_pct {
        Some(p) => format!("Volatility is {} ({}% average range over {} bars).", vol_en, format_price(p, 2), lookback),
        None => format!("Volatility is {} (not enough range data).", vol_en),
    };
    let mut pt = match vol_pct {
        Some(p) => format!("Volatilidade {} (amplitude média de {}% em {} candles).", vol_pt, format_price_pt(p, 2), lookback),
        None => format!("Volatilidade {} (dados de amplitude insuficientes).", vol_pt),
    };
    match distance {
        Some(d) => {
            en.push_str(&format!(" The scenario trigger is {}% away from price.", format_price(d, 2)));
            pt.push_str(&format!(" O gatilho do cenário está a {}% do preço.", format_price_pt(d, 2)));
        }
        None => {
            en.push_str(" No active scenario adds distance risk.");
            pt.push_str(" Nenhum cenário ativo acrescenta risco de distância.");
        }
    }
    en.push_str(&format!(" Overall risk: {}.", risk_en));
    pt.push_str(&format!(" Risco geral: {}.", risk_pt));
    BilingualText::new(en, pt)
}
