use chrono::Duration as ChronoDuration;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};
use std::convert::TryFrom;
use std::time::Duration;

use crate::entity::clamp_slippage;
use crate::solana::jupiter::config::{DEFAULT_API_URL, DEFAULT_QUOTE_API_URL};
use crate::solana::jupiter::{Config as JupiterConfig, SwapSettings, TokenListSource};

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Process configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub solana_rpc_url: String,
    pub jupiter_api_url: String,
    pub jupiter_quote_api_url: String,
    pub token_list_source: TokenListSource,
    pub token_list_limit: usize,
    pub http_timeout_secs: u64,
    pub quote_debounce_ms: u64,
    pub quote_max_age_secs: u64,
    pub swap_max_retries: usize,
    pub confirm_poll_ms: u64,
    pub confirm_timeout_secs: u64,
    pub default_slippage_bps: u16,
}

impl TryFrom<Config> for AppConfig {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        Ok(AppConfig {
            telegram_bot_token: config.get_string("telegram_bot_token")?,
            solana_rpc_url: config.get_string("solana_rpc_url")?,
            jupiter_api_url: config.get_string("jupiter_api_url")?,
            jupiter_quote_api_url: config.get_string("jupiter_quote_api_url")?,
            token_list_source: config
                .get_string("token_list_source")?
                .parse::<TokenListSource>()
                .map_err(|e| ConfigError::Message(e.to_string()))?,
            token_list_limit: config.get::<usize>("token_list_limit")?,
            http_timeout_secs: config.get::<u64>("http_timeout_secs")?,
            quote_debounce_ms: config.get::<u64>("quote_debounce_ms")?,
            quote_max_age_secs: config.get::<u64>("quote_max_age_secs")?,
            swap_max_retries: config.get::<usize>("swap_max_retries")?,
            confirm_poll_ms: config.get::<u64>("confirm_poll_ms")?,
            confirm_timeout_secs: config.get::<u64>("confirm_timeout_secs")?,
            default_slippage_bps: clamp_slippage(config.get::<u16>("default_slippage_bps")?),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(Environment::default())
    }

    /// Read configuration from an explicit variable map instead of the process environment.
    pub fn from_source(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::build(Environment::default().source(Some(vars)))
    }

    fn build(environment: Environment) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::<DefaultState>::default()
            .set_default("solana_rpc_url", DEFAULT_RPC_URL)?
            .set_default("jupiter_api_url", DEFAULT_API_URL)?
            .set_default("jupiter_quote_api_url", DEFAULT_QUOTE_API_URL)?
            .set_default("token_list_source", "recent")?
            .set_default("token_list_limit", 50)?
            .set_default("http_timeout_secs", 10)?
            .set_default("quote_debounce_ms", 500)?
            .set_default("quote_max_age_secs", 30)?
            .set_default("swap_max_retries", 2)?
            .set_default("confirm_poll_ms", 1000)?
            .set_default("confirm_timeout_secs", 60)?
            .set_default("default_slippage_bps", 50)?
            .add_source(environment.try_parsing(true))
            .build()?;

        AppConfig::try_from(config)
    }

    pub fn jupiter(&self) -> JupiterConfig {
        JupiterConfig {
            api_url: self.jupiter_api_url.clone(),
            quote_api_url: self.jupiter_quote_api_url.clone(),
            token_list_source: self.token_list_source,
            token_list_limit: self.token_list_limit,
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            ..JupiterConfig::default()
        }
    }

    pub fn swap_settings(&self) -> SwapSettings {
        SwapSettings {
            max_retries: self.swap_max_retries,
            poll_interval: Duration::from_millis(self.confirm_poll_ms),
            confirm_timeout: Duration::from_secs(self.confirm_timeout_secs),
            ..SwapSettings::default()
        }
    }

    pub fn quote_debounce(&self) -> Duration {
        Duration::from_millis(self.quote_debounce_ms)
    }

    pub fn quote_max_age(&self) -> ChronoDuration {
        ChronoDuration::seconds(self.quote_max_age_secs as i64)
    }
}
