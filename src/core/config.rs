use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that overrides `telegram.token` from the config file.
pub const TOKEN_ENV_VAR: &str = "RATEBOT_TELEGRAM_TOKEN";

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_provider_base_url() -> String {
    "https://api.exchangeratesapi.io".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            token: String::new(),
            api_url: default_telegram_api_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_provider_base_url(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "ratebot", "ratebot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "ratebot", "ratebot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.apply_env_overrides(std::env::var(TOKEN_ENV_VAR).ok());
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Built-in defaults with environment overrides applied, for running
    /// without a config file.
    pub fn from_defaults() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides(std::env::var(TOKEN_ENV_VAR).ok());
        config
    }

    fn apply_env_overrides(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            debug!("Using Telegram token from {}", TOKEN_ENV_VAR);
            self.telegram.token = token;
        }
    }

    /// The bot token, or an error naming both places it can be set.
    pub fn telegram_token(&self) -> Result<&str> {
        let token = self.telegram.token.trim();
        if token.is_empty() {
            anyhow::bail!(
                "Telegram bot token is missing; set telegram.token in the config file or {}",
                TOKEN_ENV_VAR
            );
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
telegram:
  token: "123:abc"
provider:
  base_url: "http://example.com/rates"
data_path: "/tmp/ratebot"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/ratebot")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "https://api.exchangeratesapi.io");
        assert!(config.data_path.is_none());
        assert!(config.telegram_token().is_err());
    }

    #[test]
    fn test_env_token_overrides_file() {
        let mut config: AppConfig =
            serde_yaml::from_str("telegram:\n  token: from-file\n").unwrap();

        config.apply_env_overrides(Some("  ".to_string()));
        assert_eq!(config.telegram_token().unwrap(), "from-file");

        config.apply_env_overrides(Some("from-env".to_string()));
        assert_eq!(config.telegram_token().unwrap(), "from-env");
    }

    #[test]
    fn test_env_token_applies_to_defaults() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(Some("123:abc".to_string()));
        assert_eq!(config.telegram_token().unwrap(), "123:abc");
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
    }
}
