// Conditional trade scenarios: gating, levels, activation and text
use super::instrument::Instrument;
use shared::models::{BilingualText, Scenario, ScenarioStatus, TrendDirection};
use shared::utils::{format_price, format_price_pt, round_to};

#[derive(Debug, Clone, Copy)]
pub struct ScenarioContext<'a> {
    pub price: f64,
    pub key_support: f64,
    pub key_resistance: f64,
    /// ATR, or its fallback step when ATR lacks history.
    pub atr: f64,
    pub invalidation_multiplier: f64,
    /// Fraction of price added beyond the key level.
    pub trigger_buffer: f64,
    pub instrument: &'a Instrument,
    pub trend_short: TrendDirection,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
    /// Closes of the activation lookback, oldest first.
    pub recent_closes: &'a [f64],
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScenarioLevels {
    trigger: f64,
    target1: f64,
    target2: f64,
    invalidation: f64,
}

/// Long setup: short trend up, MACD at or above signal, RSI above 48.
pub fn bullish_eligible(trend_short: TrendDirection, macd: f64, signal: f64, rsi: f64) -> bool {
    trend_short == TrendDirection::Bullish && macd >= signal && rsi > 48.0
}

/// Short setup: short trend down, MACD at or below signal, RSI below 52.
pub fn bearish_eligible(trend_short: TrendDirection, macd: f64, signal: f64, rsi: f64) -> bool {
    trend_short == TrendDirection::Bearish && macd <= signal && rsi < 52.0
}

fn scenario_levels(ctx: &ScenarioContext<'_>, direction: TrendDirection) -> ScenarioLevels {
    let sign = if direction == TrendDirection::Bullish { 1.0 } else { -1.0 };
    let buffer = ctx.price * ctx.trigger_buffer;
    let trigger = if sign > 0.0 { ctx.key_resistance + buffer } else { ctx.key_support - buffer };

    let (target1, target2) = match ctx.instrument.pip_size {
        Some(pip) => (trigger + sign * 3.0 * pip, trigger + sign * 6.0 * pip),
        None => (trigger + sign * ctx.atr, trigger + sign * 2.0 * ctx.atr),
    };
    let invalidation = trigger - sign * ctx.atr * ctx.invalidation_multiplier;

    let decimals = ctx.instrument.decimals as u32;
    ScenarioLevels {
        trigger: round_to(trigger, decimals),
        target1: round_to(target1, decimals),
        target2: round_to(target2, decimals),
        invalidation: round_to(invalidation, decimals),
    }
}

fn activation_status(recent_closes: &[f64], trigger: f64, direction: TrendDirection) -> ScenarioStatus {
    let crossed = recent_closes.iter().filter(|c| c.is_finite()).any(|close| match direction {
        TrendDirection::Bullish => *close > trigger,
        _ => *close < trigger,
    });
    if crossed {
        ScenarioStatus::Activated
    } else {
        ScenarioStatus::Pending
    }
}

fn scenario_texts(
    levels: &ScenarioLevels,
    status: ScenarioStatus,
    direction: TrendDirection,
    decimals: usize,
    lookback: usize,
) -> (BilingualText, BilingualText) {
    let en = |v: f64| format_price(v, decimals);
    let pt = |v: f64| format_price_pt(v, decimals);
    let bullish = direction == TrendDirection::Bullish;
    let (side_en, side_pt) = if bullish { ("above", "acima de") } else { ("below", "abaixo de") };
    let (against_en, against_pt) = if bullish { ("below", "abaixo de") } else { ("above", "acima de") };

    let activation = match status {
        ScenarioStatus::Activated => BilingualText::new(
            format!(
                "Already active: price closed {} {} within the last {} bars. Targets {} and {}.",
                side_en, en(levels.trigger), lookback, en(levels.target1), en(levels.target2)
            ),
            format!(
                "Já ativado: o preço fechou {} {} nos últimos {} candles. Alvos {} e {}.",
                side_pt, pt(levels.trigger), lookback, pt(levels.target1), pt(levels.target2)
            ),
        ),
        ScenarioStatus::Pending => BilingualText::new(
            format!(
                "Activates on a close {} {}. Targets {} and {}.",
                side_en, en(levels.trigger), en(levels.target1), en(levels.target2)
            ),
            format!(
                "Ativa com fechamento {} {}. Alvos {} e {}.",
                side_pt, pt(levels.trigger), pt(levels.target1), pt(levels.target2)
            ),
        ),
    };
    let invalidation = BilingualText::new(
        format!("Invalidated on a close {} {}.", against_en, en(levels.invalidation)),
        format!("Invalidado com fechamento {} {}.", against_pt, pt(levels.invalidation)),
    );
    (activation, invalidation)
}

fn build(ctx: &ScenarioContext<'_>, direction: TrendDirection) -> Scenario {
    let levels = scenario_levels(ctx, direction);
    let status = activation_status(ctx.recent_closes, levels.trigger, direction);
    let (activation_text, invalidation_text) =
        scenario_texts(&levels, status, direction, ctx.instrument.decimals, ctx.recent_closes.len());
    Scenario {
        trigger_price: levels.trigger,
        target1: levels.target1,
        target2: levels.target2,
        invalidation_price: levels.invalidation,
        status,
        activation_text,
        invalidation_text,
    }
}

/// Returns `(bullish, bearish)`. The RSI guards (above 48 vs below 52) together
/// with the opposite short-trend requirement keep at most one side populated.
pub fn build_scenarios(ctx: &ScenarioContext<'_>) -> (Option<Scenario>, Option<Scenario>) {
    let bullish = bullish_eligible(ctx.trend_short, ctx.macd, ctx.signal, ctx.rsi)
        .then(|| build(ctx, TrendDirection::Bullish));
    let bearish = bearish_eligible(ctx.trend_short, ctx.macd, ctx.signal, ctx.rsi)
        .then(|| build(ctx, TrendDirection::Bearish));
    tracing::debug!(
        symbol = %ctx.instrument.code,
        bullish = bullish.is_some(),
        bearish = bearish.is_some(),
        "Scenario gating evaluated"
    );
    (bullish, bearish)
}
