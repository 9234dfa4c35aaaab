use crate::services::providers::GenerationParams;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Endpoint used outside production when `GENERATION_API_URL` is unset.
const DEFAULT_GENERATION_API_URL: &str = "http://localhost:8000/generate";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Which backend answers chat requests.
    pub provider: ProviderKind,
    /// Generation endpoint URL (for the HTTP provider).
    pub api_url: String,
    /// Optional request timeout in seconds; unset means no timeout.
    pub timeout_secs: Option<u64>,
    #[serde(skip)]
    pub params: GenerationParams,
}

impl GenerationConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Http,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProviderKind::Http),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "GENERATION_PROVIDER must be 'http' or 'mock', got '{}'",
                other
            ))),
        }
    }
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";
        let defaults = GenerationParams::default();

        let timeout_secs = match env::var("GENERATION_TIMEOUT_SECS") {
            Ok(value) => Some(parse_value("GENERATION_TIMEOUT_SECS", &value)?),
            Err(_) => None,
        };

        Ok(ChatConfig {
            common: common_config,
            generation: GenerationConfig {
                provider: get_env("GENERATION_PROVIDER", Some("http"), false)?.parse()?,
                api_url: get_env(
                    "GENERATION_API_URL",
                    Some(DEFAULT_GENERATION_API_URL),
                    is_prod,
                )?,
                timeout_secs,
                params: GenerationParams {
                    max_new_tokens: get_parsed(
                        "GENERATION_MAX_NEW_TOKENS",
                        defaults.max_new_tokens,
                    )?,
                    do_sample: get_parsed("GENERATION_DO_SAMPLE", defaults.do_sample)?,
                    temperature: get_parsed("GENERATION_TEMPERATURE", defaults.temperature)?,
                    top_p: get_parsed("GENERATION_TOP_P", defaults.top_p)?,
                },
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Optional tunable: the default applies when unset, a malformed value is an error.
fn get_parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => parse_value(key, &value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("invalid {} '{}': {}", key, value, e))
    })
}
