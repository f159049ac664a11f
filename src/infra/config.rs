use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://toolboxback-production.up.railway.app";
pub const LIST_FILES_PATH: &str = "/files/list";
pub const FILE_DATA_PATH: &str = "/files/data";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_URL_ENV: &str = "FILEGRID_API_URL";
pub const API_TOKEN_ENV: &str = "FILEGRID_API_TOKEN";
pub const TIMEOUT_ENV: &str = "FILEGRID_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Values given on the command line; they win over the environment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApiOverrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub list_path: String,
    pub data_path: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: None,
            list_path: LIST_FILES_PATH.to_string(),
            data_path: FILE_DATA_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn list_url(&self) -> String {
        format!("{}{}", self.base_url, self.list_path)
    }

    /// The file name travels as the `fileName` query parameter, added by the client.
    pub fn data_url(&self) -> String {
        format!("{}{}", self.base_url, self.data_path)
    }

    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

pub fn resolve_api_config(overrides: &ApiOverrides) -> Result<ApiConfig, ConfigError> {
    resolve_api_config_with(overrides, |key| std::env::var(key).ok())
}

fn resolve_api_config_with(
    overrides: &ApiOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ApiConfig, ConfigError> {
    let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let base_url = overrides
        .api_url
        .clone()
        .or_else(|| lookup(API_URL_ENV))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = overrides.token.clone().or_else(|| lookup(API_TOKEN_ENV));

    let timeout = match lookup(TIMEOUT_ENV) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: TIMEOUT_ENV,
                    value: raw,
                });
            }
        },
        None => DEFAULT_TIMEOUT,
    };

    Ok(ApiConfig::new(&base_url)
        .with_token(token)
        .with_timeout(timeout))
}
