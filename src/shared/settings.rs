use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use ts_rs::TS;

use crate::shared::error::{AppError, AppResult};

pub const ENV_BASE_URL: &str = "CONVERTALL_BASE_URL";
pub const ENV_RATES_URL: &str = "CONVERTALL_RATES_URL";
pub const ENV_TIMEOUT_SECS: &str = "CONVERTALL_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct AppSettings {
    pub api: ApiSettings,
    pub preferences: UserPreferences,
    pub precision: PrecisionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct ApiSettings {
    /// Backend service root, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    /// Exchange-rate source; the base currency code is appended as a path segment.
    pub rates_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct UserPreferences {
    pub default_currency_from: String,
    pub default_currency_to: String,
    pub default_length_from: String,
    pub default_length_to: String,
}

/// Decimal places used when displaying results. Presentation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct PrecisionSettings {
    /// Every unit converter page
    #[serde(alias = "length")]
    pub units: u32,
    pub currency: u32,
    /// The "1 USD = x EUR" line
    pub rate: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "http://localhost:5000/api".to_string(),
                rates_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
                timeout_secs: 30,
                auth_token: None,
            },
            preferences: UserPreferences {
                default_currency_from: "USD".to_string(),
                default_currency_to: "EUR".to_string(),
                default_length_from: "m".to_string(),
                default_length_to: "ft".to_string(),
            },
            precision: PrecisionSettings {
                units: 6,
                currency: 4,
                rate: 4,
            },
        }
    }
}

impl AppSettings {
    pub fn settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "convertall", "convertall")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    /// Load settings from the user config directory, writing defaults on first run.
    pub async fn load() -> AppResult<Self> {
        let path = Self::settings_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if fs::metadata(path).await.is_err() {
            tracing::info!(path = %path.display(), "settings file missing, writing defaults");
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await?;
        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub async fn save(&self) -> AppResult<()> {
        let path = Self::settings_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Apply `CONVERTALL_*` environment overrides on top of the loaded values.
    pub fn with_env_overrides(self) -> AppResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(url) = lookup(ENV_RATES_URL) {
            self.api.rates_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::Config("api.base_url must not be empty".to_string()));
        }
        if self.api.rates_url.trim().is_empty() {
            return Err(AppError::Config("api.rates_url must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::Config("api.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_load_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded, AppSettings::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = AppSettings::default();
        settings.precision.currency = 2;
        settings.api.auth_token = Some("token".to_string());
        settings.save_to(&path).await.unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.precision.currency, 2);
        assert_eq!(loaded.api.auth_token.as_deref(), Some("token"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = AppSettings::load_from(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_overrides_apply() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://backend:8080/api"),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        let settings = AppSettings::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.api.base_url, "http://backend:8080/api");
        assert_eq!(settings.timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = AppSettings::default()
            .with_overrides(|k| (k == ENV_TIMEOUT_SECS).then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        let err = AppSettings::default()
            .with_overrides(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_older_file_with_length_precision_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut raw = serde_json::to_value(AppSettings::default()).unwrap();
        raw["precision"] = serde_json::json!({ "length": 3, "currency": 2, "rate": 5 });
        raw["preferences"]["theme"] = serde_json::json!("dark");
        tokio::fs::write(&path, raw.to_string()).await.unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.precision.units, 3);
        assert_eq!(loaded.precision.rate, 5);
    }
}
