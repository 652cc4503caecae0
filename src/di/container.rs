use anyhow::Result;
use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;

use crate::config::AppConfig;
use crate::services::{QuoteDebouncer, SessionStore};
use crate::solana::client::RpcGateway;
use crate::solana::jupiter::quote_service::{JupiterQuoteService, QuoteService};
use crate::solana::jupiter::swap_service::{JupiterSwapApi, SwapApi, SwapService};
use crate::solana::jupiter::token_repository::{JupiterTokenRepository, TokenRepository};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    rpc: Arc<dyn RpcGateway>,
    sessions: Arc<SessionStore>,
    debouncer: Arc<QuoteDebouncer>,

    // Jupiter services
    token_repository: Arc<dyn TokenRepository>,
    quote_service: Arc<dyn QuoteService>,
    swap_service: Arc<SwapService>,

    // Configuration
    config: AppConfig,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(config: AppConfig, solana_client: Arc<RpcClient>) -> Result<Self> {
        let jupiter_config = config.jupiter();

        let token_repository =
            Arc::new(JupiterTokenRepository::new(jupiter_config.clone())?) as Arc<dyn TokenRepository>;
        let quote_service =
            Arc::new(JupiterQuoteService::new(jupiter_config.clone())?) as Arc<dyn QuoteService>;

        let swap_api = Arc::new(JupiterSwapApi::new(jupiter_config)?) as Arc<dyn SwapApi>;
        let rpc = solana_client as Arc<dyn RpcGateway>;
        let swap_service = Arc::new(SwapService::new(swap_api, rpc.clone(), config.swap_settings()));

        Ok(Self {
            rpc,
            sessions: Arc::new(SessionStore::new(
                config.default_slippage_bps,
                config.quote_max_age(),
            )),
            debouncer: Arc::new(QuoteDebouncer::new(config.quote_debounce())),
            token_repository,
            quote_service,
            swap_service,
            config,
        })
    }

    // Accessor methods

    pub fn rpc(&self) -> Arc<dyn RpcGateway> {
        self.rpc.clone()
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        self.sessions.clone()
    }

    pub fn debouncer(&self) -> Arc<QuoteDebouncer> {
        self.debouncer.clone()
    }

    pub fn token_repository(&self) -> Arc<dyn TokenRepository> {
        self.token_repository.clone()
    }

    pub fn quote_service(&self) -> Arc<dyn QuoteService> {
        self.quote_service.clone()
    }

    pub fn swap_service(&self) -> Arc<SwapService> {
        self.swap_service.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
