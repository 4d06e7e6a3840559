use std::path::Path;
use std::time::Duration;

use chronodeck_application::ServiceConfig;
use serde::Deserialize;

pub const CONFIG_ENV_VAR: &str = "CHRONODECK_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub clock_period_ms: u64,
    pub stopwatch_period_ms: u64,
    pub log_filter: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clock_period_ms: 1_000,
            stopwatch_period_ms: 10,
            log_filter: "info".to_string(),
            window_width: 420.0,
            window_height: 560.0,
        }
    }
}

impl AppConfig {
    /// Reads the file named by `CHRONODECK_CONFIG`, or falls back to defaults.
    pub fn load() -> Result<Self, String> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("failed to read config {}: {error}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(|error| format!("invalid config {}: {error}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(raw).map_err(|error| error.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.clock_period_ms == 0 {
            return Err("clock_period_ms must be greater than zero".to_string());
        }
        if self.stopwatch_period_ms == 0 {
            return Err("stopwatch_period_ms must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            clock_period: Duration::from_millis(self.clock_period_ms),
            stopwatch_period: Duration::from_millis(self.stopwatch_period_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_clock_and_stopwatch_cadence() {
        let config = AppConfig::default();
        let service = config.service_config();
        assert_eq!(service.clock_period, Duration::from_secs(1));
        assert_eq!(service.stopwatch_period, Duration::from_millis(10));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config =
            AppConfig::from_json_str(r#"{"stopwatch_period_ms": 16, "log_filter": "debug"}"#)
                .expect("valid config");
        assert_eq!(config.stopwatch_period_ms, 16);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.clock_period_ms, 1_000);
    }

    #[test]
    fn zero_periods_are_rejected() {
        let error = AppConfig::from_json_str(r#"{"clock_period_ms": 0}"#).expect_err("invalid");
        assert!(error.contains("clock_period_ms"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"window_width": 640.0}}"#).expect("write config");

        let config = AppConfig::from_path(file.path()).expect("load config");
        assert_eq!(config.window_width, 640.0);

        let missing = AppConfig::from_path(Path::new("/definitely/missing/chronodeck.json"));
        assert!(missing.is_err());
    }
}
