#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Map;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::message::{Message, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::system_instruction;
use solana_sdk::transaction::VersionedTransaction;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use swapana::entity::{SwapError, Token};
use swapana::solana::client::{RpcGateway, SignatureStatus};
use swapana::solana::jupiter::models::{QuoteParams, QuoteResponse, SwapMode, SwapRequest, SwapResponse};
use swapana::solana::jupiter::quote_service::QuoteService;
use swapana::solana::jupiter::swap_service::SwapApi;
use swapana::solana::jupiter::token_repository::{find_token, TokenRepository};

pub const SOL: &str = "So11111111111111111111111111111111111111112";
pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB8pPB263";

pub fn token(id: &str, symbol: &str, decimals: u8) -> Token {
    Token {
        id: id.to_string(),
        name: symbol.to_string(),
        symbol: symbol.to_string(),
        icon: None,
        decimals,
        usd_price: None,
        token_program: spl_token::ID.to_string(),
    }
}

pub struct StaticTokens {
    tokens: Vec<Token>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self {
            tokens: vec![
                token(SOL, "SOL", 9),
                token(USDC, "USDC", 6),
                token(BONK, "Bonk", 5),
            ],
        }
    }
}

#[async_trait]
impl TokenRepository for StaticTokens {
    async fn list_tokens(&self) -> Result<Vec<Token>, SwapError> {
        Ok(self.tokens.clone())
    }

    async fn search_tokens(&self, query: &str) -> Result<Vec<Token>, SwapError> {
        let query = query.to_lowercase();
        Ok(self
            .tokens
            .iter()
            .filter(|token| token.symbol.to_lowercase().contains(&query) || token.id == query)
            .cloned()
            .collect())
    }

    async fn get_token_by_id(&self, token_id: &str) -> Result<Token, SwapError> {
        find_token(&self.tokens, token_id)
            .ok_or_else(|| SwapError::TokenNotFound(token_id.to_string()))
    }
}

/// Quotes at a fixed rate of `rate` output units per 1000 input units.
/// Requests for `held_amount` wait until `release` is called.
pub struct GatedQuotes {
    rate: u64,
    held_amount: Option<u64>,
    gate: Notify,
    pub calls: AtomicUsize,
}

impl GatedQuotes {
    pub fn new(rate: u64) -> Self {
        Self {
            rate,
            held_amount: None,
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn holding(rate: u64, amount: u64) -> Self {
        Self {
            held_amount: Some(amount),
            ..Self::new(rate)
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

pub fn quote_for(params: &QuoteParams, out_amount: u64) -> QuoteResponse {
    QuoteResponse {
        input_mint: params.input_mint.clone(),
        in_amount: params.amount.to_string(),
        output_mint: params.output_mint.clone(),
        out_amount: out_amount.to_string(),
        other_amount_threshold: (out_amount - out_amount * params.slippage_bps as u64 / 10_000)
            .to_string(),
        swap_mode: SwapMode::ExactIn,
        slippage_bps: params.slippage_bps,
        route_plan: Vec::new(),
        extra: Map::new(),
    }
}

#[async_trait]
impl QuoteService for GatedQuotes {
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse, SwapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.held_amount == Some(params.amount) {
            self.gate.notified().await;
        }

        Ok(quote_for(params, params.amount / 1000 * self.rate))
    }
}

/// Returns an unsigned transfer paid by the requesting wallet, or by `payer` when set.
pub struct TransferSwapApi {
    pub payer: Option<Pubkey>,
    pub requests: Mutex<Vec<SwapRequest>>,
}

impl TransferSwapApi {
    pub fn new() -> Self {
        Self {
            payer: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn paid_by(payer: Pubkey) -> Self {
        Self {
            payer: Some(payer),
            ..Self::new()
        }
    }
}

#[async_trait]
impl SwapApi for TransferSwapApi {
    async fn swap_transaction(&self, request: &SwapRequest) -> Result<SwapResponse, SwapError> {
        self.requests.lock().unwrap().push(request.clone());

        let payer = self
            .payer
            .unwrap_or_else(|| Pubkey::from_str(&request.user_public_key).unwrap());
        let instruction = system_instruction::transfer(&payer, &Pubkey::new_unique(), 1_000);
        let message = Message::new_with_blockhash(&[instruction], Some(&payer), &Hash::new_unique());
        let transaction = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::Legacy(message),
        };

        Ok(SwapResponse {
            swap_transaction: STANDARD.encode(bincode::serialize(&transaction).unwrap()),
            last_valid_block_height: Some(1_000),
            prioritization_fee_lamports: None,
        })
    }
}

/// Confirms every transaction on the first status poll.
pub struct ConfirmingRpc {
    pub status: SignatureStatus,
    pub submitted: AtomicUsize,
}

impl ConfirmingRpc {
    pub fn new(status: SignatureStatus) -> Self {
        Self {
            status,
            submitted: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RpcGateway for ConfirmingRpc {
    async fn account(&self, _pubkey: &Pubkey) -> Result<Option<Account>, SwapError> {
        Ok(None)
    }

    async fn latest_blockhash(&self) -> Result<(Hash, u64), SwapError> {
        Ok((Hash::new_unique(), 1_000))
    }

    async fn submit_transaction(
        &self,
        transaction: &VersionedTransaction,
        _max_retries: usize,
    ) -> Result<Signature, SwapError> {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(transaction.signatures[0])
    }

    async fn signature_status(&self, _signature: &Signature) -> Result<SignatureStatus, SwapError> {
        Ok(self.status.clone())
    }

    async fn block_height(&self) -> Result<u64, SwapError> {
        Ok(10)
    }
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
