// @file: rate_ingestion/src/utils/config.rs
// @description: Connector configuration: defaults, optional file, environment and host-supplied overrides.
// @author: LAS.

use std::collections::HashMap;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use url::Url;
use crate::connectors::coingecko::coingecko_rest::DEFAULT_MARKETS_URL;
use crate::core::error::ConnectorError;
use crate::core::validation::RateField;


pub const DEFAULT_TOPIC: &str = "exchange-rates";
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_PER_PAGE: u32 = 250;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_PAGES: u32 = 500;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;


//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicyKind {
    Stop,
    Retry,
}

/// What the pagination controller does when a page request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Stop,
    Retry { attempts: u32, backoff: Duration },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConnectorConfig {
    pub log_level: String,

    // Destination
    pub topic: String,

    // Provider query
    pub currency: String,
    pub per_page: u32,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub max_pages: u32,

    // Validation
    pub required_fields: Vec<String>,

    // Failure handling
    pub failure_policy: FailurePolicyKind,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            base_url: DEFAULT_MARKETS_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_pages: DEFAULT_MAX_PAGES,
            required_fields: Vec::new(),
            failure_policy: FailurePolicyKind::Stop,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl ConnectorConfig {
    //
    // PUBLIC INTERFACE
    //

    /// Defaults, then `connector.{toml,yaml,json}` if present, then `CONNECTOR_*` env vars.
    pub fn load() -> Result<Self, ConnectorError> {
        Self::load_with_env(Self::environment())
    }

    /// Host-supplied options layered over the defaults. `required_fields` is a comma-separated list.
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConnectorError> {
        let mut builder = Self::defaults()?;

        for (key, value) in options {
            builder = if key == "required_fields" {
                let fields: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect();
                builder.set_override(key.as_str(), fields)?
            } else {
                builder.set_override(key.as_str(), value.as_str())?
            };
        }

        let config: ConnectorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.topic.trim().is_empty() {
            return Err(ConnectorError::InvalidConfig("topic must not be empty".to_string()));
        }
        if self.currency.trim().is_empty() {
            return Err(ConnectorError::InvalidConfig("currency must not be empty".to_string()));
        }
        if self.failure_policy == FailurePolicyKind::Retry && self.retry_attempts == 0 {
            return Err(ConnectorError::InvalidConfig("retry_attempts must be at least 1".to_string()));
        }
        self.markets_url()?;
        self.required_rate_fields()?;
        Ok(())
    }

    pub fn markets_url(&self) -> Result<Url, ConnectorError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConnectorError::InvalidConfig(format!("base_url '{}': {}", self.base_url, e)))
    }

    pub fn required_rate_fields(&self) -> Result<Vec<RateField>, ConnectorError> {
        self.required_fields
            .iter()
            .map(|name| name.parse::<RateField>().map_err(ConnectorError::InvalidConfig))
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        match self.failure_policy {
            FailurePolicyKind::Stop => FailurePolicy::Stop,
            FailurePolicyKind::Retry => FailurePolicy::Retry {
                attempts: self.retry_attempts,
                backoff: Duration::from_millis(self.retry_backoff_ms),
            },
        }
    }

    //
    // INTERNAL HELPERS
    //

    fn load_with_env(env: Environment) -> Result<Self, ConnectorError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("connector").required(false))
            .add_source(env);

        let config: ConnectorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    // `CONNECTOR_REQUIRED_FIELDS` is a comma-separated list like the host option.
    fn environment() -> Environment {
        Environment::with_prefix("CONNECTOR")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("required_fields")
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("topic", DEFAULT_TOPIC)?
            .set_default("currency", DEFAULT_CURRENCY)?
            .set_default("per_page", DEFAULT_PER_PAGE as i64)?
            .set_default("base_url", DEFAULT_MARKETS_URL)?
            .set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS as i64)?
            .set_default("max_pages", DEFAULT_MAX_PAGES as i64)?
            .set_default("required_fields", Vec::<String>::new())?
            .set_default("failure_policy", "stop")?
            .set_default("retry_attempts", DEFAULT_RETRY_ATTEMPTS as i64)?
            .set_default("retry_backoff_ms", DEFAULT_RETRY_BACKOFF_MS as i64)
    }
}
