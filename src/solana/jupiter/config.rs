use anyhow::anyhow;
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::entity::SwapError;

pub const DEFAULT_API_URL: &str = "https://lite-api.jup.ag/tokens/v2";
pub const DEFAULT_QUOTE_API_URL: &str = "https://lite-api.jup.ag/swap/v1";

/// Which token list backs the selector when no search term is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenListSource {
    #[default]
    Recent,
    TopOrganicScore,
}

impl FromStr for TokenListSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "toporganicscore" => Ok(Self::TopOrganicScore),
            _ => Err(anyhow!("Parse TokenListSource error: Invalid value '{}'", s)),
        }
    }
}

impl fmt::Display for TokenListSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Recent => write!(f, "recent"),
            Self::TopOrganicScore => write!(f, "toporganicscore"),
        }
    }
}

/// Jupiter API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the token API (list and search)
    pub api_url: String,

    /// Base URL of the quote and swap API
    pub quote_api_url: String,

    pub token_list_source: TokenListSource,

    pub token_list_limit: usize,

    pub http_timeout: Duration,

    /// How long a fetched token list is reused before it is loaded again
    pub token_list_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            quote_api_url: DEFAULT_QUOTE_API_URL.to_string(),
            token_list_source: TokenListSource::Recent,
            token_list_limit: 50,
            http_timeout: Duration::from_secs(10),
            token_list_ttl: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn http_client(&self) -> Result<Client, SwapError> {
        Ok(Client::builder().timeout(self.http_timeout).build()?)
    }

    pub fn token_list_url(&self) -> String {
        let base = self.api_url.trim_end_matches('/');
        match self.token_list_source {
            TokenListSource::Recent => format!("{}/recent", base),
            TokenListSource::TopOrganicScore => format!(
                "{}/toporganicscore/24h?limit={}",
                base, self.token_list_limit
            ),
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.api_url.trim_end_matches('/'))
    }

    pub fn quote_url(&self) -> String {
        format!("{}/quote", self.quote_api_url.trim_end_matches('/'))
    }

    pub fn swap_url(&self) -> String {
        format!("{}/swap", self.quote_api_url.trim_end_matches('/'))
    }
}
