pub mod config;
pub mod models;
pub mod quote_service;
pub mod response;
pub mod swap_service;
pub mod token_repository;

pub use config::{Config, TokenListSource};
pub use models::{
    JupiterToken, QuoteParams, QuoteResponse, RoutePlan, SwapInfo, SwapMode, SwapRequest,
    SwapResponse,
};
pub use quote_service::{JupiterQuoteService, QuoteService};
pub use swap_service::{decode_swap_transaction, JupiterSwapApi, SwapApi, SwapService, SwapSettings};
pub use token_repository::{fallback_token, find_token, JupiterTokenRepository, TokenRepository};
