use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use crate::entity::SwapError;
use crate::solana::jupiter::config::Config;
use crate::solana::jupiter::models::{QuoteParams, QuoteResponse};
use crate::solana::jupiter::response::read_api_response;

/// Source of swap quotes
#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse, SwapError>;
}

/// Quote service backed by the Jupiter `/quote` endpoint
pub struct JupiterQuoteService {
    http_client: Client,
    config: Config,
}

impl JupiterQuoteService {
    pub fn new(config: Config) -> Result<Self, SwapError> {
        Ok(Self {
            http_client: config.http_client()?,
            config,
        })
    }
}

#[async_trait]
impl QuoteService for JupiterQuoteService {
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse, SwapError> {
        debug!("Requesting quote with parameters: {:?}", params);

        let response = self
            .http_client
            .get(self.config.quote_url())
            .query(&[
                ("inputMint", params.input_mint.clone()),
                ("outputMint", params.output_mint.clone()),
                ("amount", params.amount.to_string()),
                ("slippageBps", params.slippage_bps.to_string()),
            ])
            .send()
            .await?;

        let quote: QuoteResponse = read_api_response(response, "get_quote").await?;
        quote.validate_for(params)?;

        info!(
            "Quote received successfully: input_amount={}, output_amount={}",
            quote.in_amount, quote.out_amount
        );

        Ok(quote)
    }
}
