//! Environment-backed configuration.
//!
//! Values come from a lookup function so the same resolution runs against
//! the process environment in production and a map in tests.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use singularity_axum::{CorsConfig, GatewayConfig, ServerConfig};
use singularity_core::{OrchestratorSettings, SettingsError, validate_settings};
use singularity_openai::{DEFAULT_BASE_URL, OpenAiClientConfig};
use thiserror::Error;

use crate::commands::ServeArgs;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_TEXT_MODEL: &str = "SINGULARITY_TEXT_MODEL";
pub const ENV_VISION_MODEL: &str = "SINGULARITY_VISION_MODEL";
pub const ENV_TEMPERATURE: &str = "SINGULARITY_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "SINGULARITY_MAX_TOKENS";
pub const ENV_HISTORY_LIMIT: &str = "SINGULARITY_HISTORY_LIMIT";
pub const ENV_REQUEST_TIMEOUT: &str = "SINGULARITY_REQUEST_TIMEOUT_SECS";
pub const ENV_PORT: &str = "SINGULARITY_PORT";
pub const ENV_STATIC_DIR: &str = "SINGULARITY_STATIC_DIR";
pub const ENV_ALLOWED_ORIGINS: &str = "SINGULARITY_ALLOWED_ORIGINS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("OPENAI_API_KEY is not set (use --simulate to run without it)")]
    MissingApiKey,

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Everything the environment can configure.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub settings: OrchestratorSettings,
    pub request_timeout: Duration,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    /// `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = OrchestratorSettings::with_defaults();
        let settings = OrchestratorSettings {
            text_model: get(ENV_TEXT_MODEL).unwrap_or(defaults.text_model.clone()),
            vision_model: get(ENV_VISION_MODEL).unwrap_or(defaults.vision_model.clone()),
            temperature: parse_or(&get, ENV_TEMPERATURE, defaults.temperature)?,
            max_tokens: parse_or(&get, ENV_MAX_TOKENS, defaults.max_tokens)?,
            history_limit: parse_or(&get, ENV_HISTORY_LIMIT, defaults.history_limit)?,
            ..defaults
        };

        let timeout_secs: u64 = parse_or(&get, ENV_REQUEST_TIMEOUT, 60)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: ENV_REQUEST_TIMEOUT,
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            api_key: get(ENV_API_KEY),
            base_url: get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            settings,
            request_timeout: Duration::from_secs(timeout_secs),
            port: parse_or(&get, ENV_PORT, singularity_axum::DEFAULT_PORT)?,
            static_dir: get(ENV_STATIC_DIR).map(PathBuf::from),
            allowed_origins: get(ENV_ALLOWED_ORIGINS).map(|raw| split_origins(&raw)),
        })
    }

    /// Combine with `serve` flags into the server configuration.
    ///
    /// Flags win over the environment. Settings are validated here so a bad
    /// value fails before the listener binds.
    pub fn into_server_config(self, args: &ServeArgs) -> Result<ServerConfig, ConfigError> {
        validate_settings(&self.settings)?;

        let gateway = if args.simulate {
            GatewayConfig::Simulated
        } else {
            let api_key = self.api_key.ok_or(ConfigError::MissingApiKey)?;
            GatewayConfig::OpenAi(
                OpenAiClientConfig::new()
                    .with_base_url(self.base_url)
                    .with_api_key(api_key)
                    .with_timeout(self.request_timeout),
            )
        };

        let cors = if !args.allowed_origins.is_empty() {
            CorsConfig::AllowOrigins(args.allowed_origins.clone())
        } else {
            self.allowed_origins
                .map_or(CorsConfig::AllowAll, CorsConfig::AllowOrigins)
        };

        Ok(ServerConfig {
            port: args.port.unwrap_or(self.port),
            static_dir: args.static_dir.clone().or(self.static_dir),
            cors,
            gateway,
            settings: self.settings,
            ..ServerConfig::with_defaults()
        })
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(var).map_or(Ok(default), |value| {
        value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
            value,
        })
    })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
