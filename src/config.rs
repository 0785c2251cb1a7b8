use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Upper bound for `history_days` and `horizon_days`.
pub const MAX_WINDOW_DAYS: u32 = 3650;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub provider_base_url: String,
    pub user_agent: String,
    pub history_days: i64,
    pub ema_span: usize,
    pub horizon_days: u32,
    pub chart_width: usize,
    pub chart_height: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) StockTracker/0.1".to_string(),
            history_days: 60,
            ema_span: 20,
            horizon_days: 30,
            chart_width: 60,
            chart_height: 12,
        }
    }
}

impl AppConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.history_days <= 0 || self.history_days > i64::from(MAX_WINDOW_DAYS) {
            return Err(ConfigError::Invalid(format!(
                "history_days must be between 1 and {}",
                MAX_WINDOW_DAYS
            )));
        }
        if self.ema_span == 0 {
            return Err(ConfigError::Invalid("ema_span must be positive".into()));
        }
        if self.horizon_days == 0 || self.horizon_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "horizon_days must be between 1 and {}",
                MAX_WINDOW_DAYS
            )));
        }
        if self.chart_width < 2 || self.chart_height < 2 {
            return Err(ConfigError::Invalid("chart must be at least 2x2".into()));
        }
        Ok(self)
    }
}

/// Loads the config from `path`. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path.as_ref()) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", path.as_ref().display());
            return Ok(AppConfig::default());
        }
        Err(e) => return Err(e.into()),
    };
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg = parse_config(r#"{ "chart_width": 80 }"#).unwrap();
        assert_eq!(cfg.chart_width, 80);
        assert_eq!(cfg.history_days, 60);
        assert_eq!(cfg.ema_span, 20);
        assert_eq!(cfg.horizon_days, 30);
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = load_config("definitely/not/here/config.json").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn rejects_zero_span() {
        let err = parse_config(r#"{ "ema_span": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_oversized_history_window() {
        let err = parse_config(r#"{ "history_days": 1000000000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(parse_config(r#"{ "history_days": 3650 }"#).is_ok());
        assert!(parse_config(r#"{ "history_days": -5 }"#).is_err());
    }

    #[test]
    fn rejects_oversized_horizon() {
        let err = parse_config(r#"{ "horizon_days": 4000000000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_config("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
