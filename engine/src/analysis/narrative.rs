// Bilingual opinion text
use super::scoring::Scoring;
use shared::models::{BilingualText, Scenario, ScenarioStatus, Sentiment, TrendDirection, TrendStrength};
use shared::utils::{format_price, format_price_pt};

/// Everything the opinion template reads.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeInputs<'a> {
    pub symbol: &'a str,
    pub timeframe: &'a str,
    pub price: f64,
    pub scoring: &'a Scoring,
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
    pub bullish: Option<&'a Scenario>,
    pub bearish: Option<&'a Scenario>,
    pub decimals: usize,
}

fn trend_label(direction: TrendDirection) -> (&'static str, &'static str) {
    match direction {
        TrendDirection::Bullish => ("bullish", "de alta"),
        TrendDirection::Bearish => ("bearish", "de baixa"),
        TrendDirection::Neutral => ("neutral", "neutra"),
    }
}

fn strength_label(strength: TrendStrength) -> (&'static str, &'static str) {
    match strength {
        TrendStrength::Strong => ("strong", "forte"),
        TrendStrength::Moderate => ("moderate", "moderada"),
        TrendStrength::Weak => ("weak", "fraca"),
    }
}

fn sentiment_label(sentiment: Sentiment) -> (&'static str, &'static str) {
    match sentiment {
        Sentiment::BullishDominance => ("bullish dominance", "domínio comprador"),
        Sentiment::BearishDominance => ("bearish dominance", "domínio vendedor"),
        Sentiment::Mixed => ("mixed", "misto"),
    }
}

pub fn compose_opinion(inputs: &NarrativeInputs<'_>) -> BilingualText {
    let scoring = inputs.scoring;
    let en_price = |v: f64| format_price(v, inputs.decimals);
    let pt_price = |v: f64| format_price_pt(v, inputs.decimals);
    let (trend_en, trend_pt) = trend_label(scoring.trend_long);
    let (short_en, short_pt) = trend_label(scoring.trend_short);
    let (strength_en, strength_pt) = strength_label(scoring.trend_strength);
    let (sentiment_en, sentiment_pt) = sentiment_label(scoring.sentiment);

    let mut en = format!(
        "{} on {} trades at {}. The trend is {} with {} strength (short term {}), sentiment shows {}. \
         Bias: {}% bullish, {}% bearish, {}% neutral.",
        inputs.symbol,
        inputs.timeframe,
        en_price(inputs.price),
        trend_en,
        strength_en,
        short_en,
        sentiment_en,
        scoring.bull_pct,
        scoring.bear_pct,
        scoring.neutral_pct
    );
    let mut pt = format!(
        "{} no {} negocia a {}. A tendência é {} com força {} (curto prazo {}), o sentimento indica {}. \
         Viés: {}% comprador, {}% vendedor, {}% neutro.",
        inputs.symbol,
        inputs.timeframe,
        pt_price(inputs.price),
        trend_pt,
        strength_pt,
        short_pt,
        sentiment_pt,
        scoring.bull_pct,
        scoring.bear_pct,
        scoring.neutral_pct
    );

    if let (Some(support), Some(resistance)) = (inputs.nearest_support, inputs.nearest_resistance) {
        en.push_str(&format!(" Nearest support {}, nearest resistance {}.", en_price(support), en_price(resistance)));
        pt.push_str(&format!(" Suporte mais próximo {}, resistência mais próxima {}.", pt_price(support), pt_price(resistance)));
    }

    match (inputs.bullish, inputs.bearish) {
        (Some(scenario), _) => {
            let (state_en, state_pt) = status_label(scenario.status);
            en.push_str(&format!(
                " Bullish scenario {} above {}, aiming for {} and {}.",
                state_en, en_price(scenario.trigger_price), en_price(scenario.target1), en_price(scenario.target2)
            ));
            pt.push_str(&format!(
                " Cenário de alta {} acima de {}, com alvos em {} e {}.",
                state_pt, pt_price(scenario.trigger_price), pt_price(scenario.target1), pt_price(scenario.target2)
            ));
        }
        (None, Some(scenario)) => {
            let (state_en, state_pt) = status_label(scenario.status);
            en.push_str(&format!(
                " Bearish scenario {} below {}, aiming for {} and {}.",
                state_en, en_price(scenario.trigger_price), en_price(scenario.target1), en_price(scenario.target2)
            ));
            pt.push_str(&format!(
                " Cenário de baixa {} abaixo de {}, com alvos em {} e {}.",
                state_pt, pt_price(scenario.trigger_price), pt_price(scenario.target1), pt_price(scenario.target2)
            ));
        }
        (None, None) => {
            en.push_str(" No scenario qualifies until short-term trend and momentum agree.");
            pt.push_str(" Nenhum cenário se qualifica até que tendência de curto prazo e momento concordem.");
        }
    }

    BilingualText::new(en, pt)
}

fn status_label(status: ScenarioStatus) -> (&'static str, &'static str) {
    match status {
        ScenarioStatus::Pending => ("pending", "pendente"),
        ScenarioStatus::Activated => ("already active", "já ativo"),
    }
}

pub fn insufficient_data_opinion() -> BilingualText {
    BilingualText::new(
        "Not enough price history to compute the indicators; the outlook stays neutral.",
        "Histórico de preços insuficiente para calcular os indicadores; a leitura permanece neutra.",
    )
}

pub fn insufficient_data_risk() -> BilingualText {
    BilingualText::new(
        "Risk cannot be rated without enough price history.",
        "Não é possível avaliar o risco sem histórico de preços suficiente.",
    )
}
