// Engine settings, loaded from a JSON file or falling back to defaults
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    pub rsi_period: usize,
    pub ema_fast: usize,
    pub ema_mid: usize,
    pub ema_slow: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub adx_period: usize,
    pub atr_period: usize,
    /// Bars of the slow EMA used for its slope.
    pub slope_lookback: usize,
    /// Bars behind the raw support/resistance baseline.
    pub level_lookback: usize,
    /// Bars scanned for a close beyond the trigger.
    pub activation_lookback: usize,
    pub volatility_lookback: usize,
    /// Trigger offset beyond the key level, as a fraction of price.
    pub trigger_buffer: f64,
    /// Upper bounds (percent of price) for LOW and MEDIUM volatility.
    pub volatility_low_pct: f64,
    pub volatility_medium_pct: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            rsi_period: 14,
            ema_fast: 20,
            ema_mid: 50,
            ema_slow: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            adx_period: 14,
            atr_period: 14,
            slope_lookback: 5,
            level_lookback: 30,
            activation_lookback: 5,
            volatility_lookback: 20,
            trigger_buffer: 0.0002,
            volatility_low_pct: 0.6,
            volatility_medium_pct: 1.2,
        }
    }
}

impl AnalysisSettings {
    /// Reads settings from a JSON file. Absent fields keep their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let settings: AnalysisSettings = serde_json::from_str(&raw).map_err(|e| {
            EngineError::ConfigError(format!("Invalid settings file '{}': {}", path.display(), e))
        })?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "Loaded analysis settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("ema_fast", self.ema_fast),
            ("ema_mid", self.ema_mid),
            ("ema_slow", self.ema_slow),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("adx_period", self.adx_period),
            ("atr_period", self.atr_period),
            ("level_lookback", self.level_lookback),
            ("activation_lookback", self.activation_lookback),
            ("volatility_lookback", self.volatility_lookback),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(EngineError::ConfigError(format!("{} must be greater than 0", name)));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::ConfigError("macd_fast must be shorter than macd_slow".to_string()));
        }
        if self.bollinger_multiplier <= 0.0 || self.trigger_buffer < 0.0 {
            return Err(EngineError::ConfigError(
                "bollinger_multiplier must be positive and trigger_buffer non-negative".to_string(),
            ));
        }
        if self.volatility_low_pct > self.volatility_medium_pct {
            return Err(EngineError::ConfigError(
                "volatility_low_pct must not exceed volatility_medium_pct".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnalysisSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_settings(r#"{ "rsi_period": 21, "level_lookback": 40 }"#);
        let settings = AnalysisSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.rsi_period, 21);
        assert_eq!(settings.level_lookback, 40);
        assert_eq!(settings.ema_slow, 200);
        assert_eq!(settings.trigger_buffer, 0.0002);
    }

    #[test]
    fn test_zero_period_rejected() {
        let file = write_settings(r#"{ "atr_period": 0 }"#);
        let err = AnalysisSettings::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("atr_period must be greater than 0"));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let file = write_settings("{ not json");
        let err = AnalysisSettings::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AnalysisSettings::load_from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
