use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "planix.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Charts emitted per sheet by the synthesizer; 0 means unbounded.
    pub max_per_sheet: usize,
    /// AI suggestions kept per request.
    pub max_ai_suggestions: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_per_sheet: 10,
            max_ai_suggestions: 10,
        }
    }
}

impl ChartConfig {
    pub fn per_sheet_cap(&self) -> Option<usize> {
        if self.max_per_sheet == 0 {
            None
        } else {
            Some(self.max_per_sheet)
        }
    }
}

/// Application configuration merged from defaults, `planix.toml` and
/// `PLANIX_*` environment variables (nested keys split on `__`, e.g.
/// `PLANIX_SERVER__PORT=8080`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub llm: LLMConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("planix.toml"))
            .merge(Env::prefixed("PLANIX_").split("__"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.charts.max_per_sheet, 10);
        assert_eq!(config.charts.per_sheet_cap(), Some(10));
    }

    #[test]
    fn test_zero_cap_means_unbounded() {
        let charts = ChartConfig {
            max_per_sheet: 0,
            max_ai_suggestions: 10,
        };
        assert_eq!(charts.per_sheet_cap(), None);
    }
}
