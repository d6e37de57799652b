//! Settings file and environment credentials for the homework-status watcher.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("Missing credential: {0} must be set and non-empty")]
    MissingCredential(&'static str),
    #[error("TELEGRAM_CHAT_ID is not a valid integer: {0}")]
    InvalidChatId(String),
}

/// Non-secret settings mirroring the YAML schema. Every field has a default
/// so the settings file is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub app: App,
}

/// Status API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_lookback_seconds")]
    pub lookback_seconds: u64,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_lookback_seconds() -> u64 {
    30 * 24 * 60 * 60
}

fn default_poll_interval_seconds() -> u64 {
    600
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl Default for Api {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            lookback_seconds: default_lookback_seconds(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl Settings {
    /// Parsed endpoint URL; validation guarantees this succeeds after `load`.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api.endpoint)
            .map_err(|_| ConfigError::Invalid("api.endpoint must be a valid URL"))
    }
}

/// Load settings from a YAML file and validate them.
/// - If `path` is None, defaults are used without touching the filesystem.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        }
        None => Settings::default(),
    };
    validate(&settings)?;
    Ok(settings)
}

/// Validate a settings instance.
fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.api.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid("api.endpoint must be non-empty"));
    }
    if Url::parse(&settings.api.endpoint).is_err() {
        return Err(ConfigError::Invalid("api.endpoint must be a valid URL"));
    }
    if settings.app.poll_interval_seconds == 0 {
        return Err(ConfigError::Invalid("app.poll_interval_seconds must be > 0"));
    }
    if settings.app.request_timeout_seconds == 0 {
        return Err(ConfigError::Invalid("app.request_timeout_seconds must be > 0"));
    }
    Ok(())
}

/// Required secrets. Loaded once at startup; the loop refuses to start
/// without all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub bot_token: String,
    pub chat_id: i64,
}

const API_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
const BOT_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

impl Credentials {
    /// Read the three secrets from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read secrets through a key -> value lookup. Tests pass a closure over
    /// a map instead of mutating process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::MissingCredential(key)),
            }
        };

        let api_token = required(API_TOKEN_VAR)?;
        let bot_token = required(BOT_TOKEN_VAR)?;
        let chat_id_raw = required(CHAT_ID_VAR)?;
        let chat_id = chat_id_raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidChatId(chat_id_raw))?;

        Ok(Self {
            api_token,
            bot_token,
            chat_id,
        })
    }
}

/// Example settings YAML.
pub fn example() -> &'static str {
    r#"api:
  endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/"
  lookback_seconds: 2592000

app:
  poll_interval_seconds: 600
  request_timeout_seconds: 30
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_example_ok() {
        let settings: Settings = serde_yaml::from_str(example()).unwrap();
        validate(&settings).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn defaults_when_no_file() {
        let settings = load(None).unwrap();
        assert_eq!(settings.app.poll_interval_seconds, 600);
        assert_eq!(settings.api.lookback_seconds, 30 * 24 * 60 * 60);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: Settings =
            serde_yaml::from_str("app:\n  poll_interval_seconds: 5\n").unwrap();
        assert_eq!(settings.app.poll_interval_seconds, 5);
        assert_eq!(settings.app.request_timeout_seconds, 30);
        assert_eq!(settings.api.endpoint, default_endpoint());
    }

    #[test]
    fn invalid_endpoint_rejected() {
        let mut settings = Settings::default();
        settings.api.endpoint = "not a url".into();
        let err = validate(&settings).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("api.endpoint")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn zero_interval_rejected() {
        let mut settings = Settings::default();
        settings.app.poll_interval_seconds = 0;
        assert!(matches!(validate(&settings), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example()).unwrap();
        let settings = load(Some(&p)).unwrap();
        assert_eq!(settings.app.poll_interval_seconds, 600);
    }

    #[test]
    fn credentials_ok() {
        let vars = env(&[
            ("PRACTICUM_TOKEN", "api-token"),
            ("TELEGRAM_TOKEN", "bot-token"),
            ("TELEGRAM_CHAT_ID", "123456789"),
        ]);
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.api_token, "api-token");
        assert_eq!(creds.bot_token, "bot-token");
        assert_eq!(creds.chat_id, 123456789);
    }

    #[test]
    fn missing_credential_is_fatal() {
        let vars = env(&[
            ("PRACTICUM_TOKEN", "api-token"),
            ("TELEGRAM_CHAT_ID", "123456789"),
        ]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        match err {
            ConfigError::MissingCredential(key) => assert_eq!(key, "TELEGRAM_TOKEN"),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn empty_credential_is_fatal() {
        let vars = env(&[
            ("PRACTICUM_TOKEN", "  "),
            ("TELEGRAM_TOKEN", "bot-token"),
            ("TELEGRAM_CHAT_ID", "123456789"),
        ]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential("PRACTICUM_TOKEN")
        ));
    }

    #[test]
    fn non_numeric_chat_id_rejected() {
        let vars = env(&[
            ("PRACTICUM_TOKEN", "api-token"),
            ("TELEGRAM_TOKEN", "bot-token"),
            ("TELEGRAM_CHAT_ID", "not-a-number"),
        ]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChatId(_)));
    }
}
