use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, error, info, warn};
use reqwest::Client;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::entity::SwapError;
use crate::solana::client::{RpcGateway, SignatureStatus};
use crate::solana::jupiter::config::Config;
use crate::solana::jupiter::models::{QuoteResponse, SwapRequest, SwapResponse};
use crate::solana::jupiter::response::read_api_response;
use crate::solana::wallet::WalletAdapter;

/// Builds serialized swap transactions for a quote
#[async_trait]
pub trait SwapApi: Send + Sync {
    async fn swap_transaction(&self, request: &SwapRequest) -> Result<SwapResponse, SwapError>;
}

/// Swap API backed by the Jupiter `/swap` endpoint
pub struct JupiterSwapApi {
    http_client: Client,
    config: Config,
}

impl JupiterSwapApi {
    pub fn new(config: Config) -> Result<Self, SwapError> {
        Ok(Self {
            http_client: config.http_client()?,
            config,
        })
    }
}

#[async_trait]
impl SwapApi for JupiterSwapApi {
    async fn swap_transaction(&self, request: &SwapRequest) -> Result<SwapResponse, SwapError> {
        debug!(
            "Requesting swap transaction with user_public_key: {}",
            request.user_public_key
        );

        let response = self
            .http_client
            .post(self.config.swap_url())
            .json(request)
            .send()
            .await?;

        let swap_response: SwapResponse = read_api_response(response, "swap_transaction").await?;

        info!(
            "Swap transaction received: tx_length={}",
            swap_response.swap_transaction.len()
        );

        Ok(swap_response)
    }
}

/// Decode the base64 transaction returned by `/swap`.
pub fn decode_swap_transaction(encoded: &str) -> Result<VersionedTransaction, SwapError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SwapError::MalformedResponse(format!("Failed to decode transaction: {}", e)))?;

    bincode::deserialize(&bytes).map_err(|e| {
        SwapError::MalformedResponse(format!("Failed to deserialize transaction: {}", e))
    })
}

/// Submission and confirmation settings.
#[derive(Debug, Clone)]
pub struct SwapSettings {
    pub max_retries: usize,
    pub poll_interval: Duration,
    pub confirm_timeout: Duration,
    pub wrap_and_unwrap_sol: bool,
    pub dynamic_compute_unit_limit: bool,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            poll_interval: Duration::from_millis(1000),
            confirm_timeout: Duration::from_secs(60),
            wrap_and_unwrap_sol: true,
            dynamic_compute_unit_limit: true,
        }
    }
}

/// Service for performing swap operations using Jupiter
pub struct SwapService {
    api: Arc<dyn SwapApi>,
    rpc: Arc<dyn RpcGateway>,
    settings: SwapSettings,
}

impl SwapService {
    pub fn new(api: Arc<dyn SwapApi>, rpc: Arc<dyn RpcGateway>, settings: SwapSettings) -> Self {
        Self { api, rpc, settings }
    }

    /// Fetch and decode the unsigned swap transaction for `quote`, with the
    /// last block height it is valid for when the API reports one.
    pub async fn prepare_swap(
        &self,
        quote: &QuoteResponse,
        user_public_key: &Pubkey,
    ) -> Result<(VersionedTransaction, Option<u64>), SwapError> {
        let request = SwapRequest {
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol: self.settings.wrap_and_unwrap_sol,
            dynamic_compute_unit_limit: self.settings.dynamic_compute_unit_limit,
            quote_response: quote.clone(),
        };

        let response = self.api.swap_transaction(&request).await?;
        let transaction = decode_swap_transaction(&response.swap_transaction)?;

        Ok((transaction, response.last_valid_block_height))
    }

    /// Sign, submit and confirm the swap for `quote`. Returns the signature
    /// once the transaction is confirmed.
    pub async fn execute_swap(
        &self,
        quote: &QuoteResponse,
        wallet: &dyn WalletAdapter,
    ) -> Result<Signature, SwapError> {
        info!(
            "Executing swap {} {} -> {}",
            quote.in_amount, quote.input_mint, quote.output_mint
        );

        let (transaction, expires_at) = self.prepare_swap(quote, &wallet.public_key()).await?;

        let signed = wallet.sign_transaction(transaction).await.map_err(|e| {
            warn!("Wallet refused to sign: {}", e);
            e
        })?;

        let last_valid_block_height = match expires_at {
            Some(height) => height,
            None => self.rpc.latest_blockhash().await?.1,
        };
        debug!(
            "Submitting swap {}, valid until height {}",
            signed.message.recent_blockhash(),
            last_valid_block_height
        );

        let signature = self
            .rpc
            .submit_transaction(&signed, self.settings.max_retries)
            .await?;
        info!("Swap transaction submitted: {}", signature);

        self.confirm(&signature, last_valid_block_height).await?;

        info!("Swap transaction confirmed: {}", signature);
        Ok(signature)
    }

    /// Poll until the signature reaches the client commitment, fails, or expires.
    pub async fn confirm(
        &self,
        signature: &Signature,
        last_valid_block_height: u64,
    ) -> Result<(), SwapError> {
        let deadline = Instant::now() + self.settings.confirm_timeout;

        loop {
            match self.rpc.signature_status(signature).await? {
                SignatureStatus::Confirmed => return Ok(()),
                SignatureStatus::Failed(reason) => {
                    error!("Swap transaction {} failed: {}", signature, reason);
                    return Err(SwapError::TransactionFailed(reason));
                }
                SignatureStatus::Pending => {}
            }

            let height = self.rpc.block_height().await?;
            if height > last_valid_block_height {
                warn!(
                    "Blockhash for {} expired at height {} (last valid {})",
                    signature, height, last_valid_block_height
                );
                return Err(SwapError::ConfirmationTimeout);
            }

            if Instant::now() >= deadline {
                warn!("Confirmation of {} timed out", signature);
                return Err(SwapError::ConfirmationTimeout);
            }

            sleep(self.settings.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use solana_sdk::account::Account;
    use solana_sdk::hash::Hash;
    use solana_sdk::message::{Message, VersionedMessage};
    use solana_sdk::signature::Keypair;
    use solana_sdk::system_instruction;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::solana::jupiter::models::SwapMode;
    use crate::solana::wallet::KeypairWallet;

    fn unsigned_transfer(payer: &Pubkey) -> String {
        let instruction = system_instruction::transfer(payer, &Pubkey::new_unique(), 1_000);
        let message = Message::new_with_blockhash(&[instruction], Some(payer), &Hash::new_unique());
        let transaction = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::Legacy(message),
        };

        STANDARD.encode(bincode::serialize(&transaction).unwrap())
    }

    fn quote() -> QuoteResponse {
        QuoteResponse {
            input_mint: "So11111111111111111111111111111111111111112".to_string(),
            in_amount: "1000000000".to_string(),
            output_mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            out_amount: "171234567".to_string(),
            other_amount_threshold: "170378394".to_string(),
            swap_mode: SwapMode::ExactIn,
            slippage_bps: 50,
            route_plan: Vec::new(),
            extra: Map::new(),
        }
    }

    struct FixedSwapApi {
        payer: Pubkey,
        last_valid_block_height: Option<u64>,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    #[async_trait]
    impl SwapApi for FixedSwapApi {
        async fn swap_transaction(&self, request: &SwapRequest) -> Result<SwapResponse, SwapError> {
            self.requests
                .lock()
                .unwrap()
                .push(serde_json::to_value(request).unwrap());
            Ok(SwapResponse {
                swap_transaction: unsigned_transfer(&self.payer),
                last_valid_block_height: self.last_valid_block_height,
                prioritization_fee_lamports: None,
            })
        }
    }

    struct ScriptedRpc {
        statuses: Mutex<Vec<SignatureStatus>>,
        height: AtomicU64,
        submitted_retries: AtomicUsize,
        polls: AtomicUsize,
    }

    impl ScriptedRpc {
        fn new(mut statuses: Vec<SignatureStatus>, height: u64) -> Self {
            statuses.reverse();
            Self {
                statuses: Mutex::new(statuses),
                height: AtomicU64::new(height),
                submitted_retries: AtomicUsize::new(usize::MAX),
                polls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RpcGateway for ScriptedRpc {
        async fn account(&self, _pubkey: &Pubkey) -> Result<Option<Account>, SwapError> {
            Ok(None)
        }

        async fn latest_blockhash(&self) -> Result<(Hash, u64), SwapError> {
            Ok((Hash::new_unique(), 150))
        }

        async fn submit_transaction(
            &self,
            transaction: &VersionedTransaction,
            max_retries: usize,
        ) -> Result<Signature, SwapError> {
            self.submitted_retries.store(max_retries, Ordering::SeqCst);
            Ok(transaction.signatures[0])
        }

        async fn signature_status(&self, _signature: &Signature) -> Result<SignatureStatus, SwapError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            Ok(statuses.pop().unwrap_or(SignatureStatus::Pending))
        }

        async fn block_height(&self) -> Result<u64, SwapError> {
            Ok(self.height.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn service(api: Arc<FixedSwapApi>, rpc: Arc<ScriptedRpc>) -> SwapService {
        SwapService::new(api, rpc, SwapSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn signs_submits_and_confirms() {
        let wallet = KeypairWallet::new(Keypair::new());
        let api = Arc::new(FixedSwapApi {
            payer: wallet.public_key(),
            last_valid_block_height: Some(200),
            requests: Mutex::new(Vec::new()),
        });
        let rpc = Arc::new(ScriptedRpc::new(
            vec![SignatureStatus::Pending, SignatureStatus::Confirmed],
            100,
        ));

        let signature = service(api.clone(), rpc.clone())
            .execute_swap(&quote(), &wallet)
            .await
            .unwrap();

        assert_ne!(signature, Signature::default());
        assert_eq!(rpc.submitted_retries.load(Ordering::SeqCst), 2);
        assert_eq!(rpc.polls.load(Ordering::SeqCst), 2);

        let body = &api.requests.lock().unwrap()[0];
        assert_eq!(body["userPublicKey"], wallet.public_key().to_string());
        assert_eq!(body["wrapAndUnwrapSol"], true);
        assert_eq!(body["quoteResponse"]["outAmount"], "171234567");
    }

    #[tokio::test(start_paused = true)]
    async fn signing_rejection_stops_before_submission() {
        let wallet = KeypairWallet::new(Keypair::new());
        let api = Arc::new(FixedSwapApi {
            payer: Pubkey::new_unique(),
            last_valid_block_height: Some(200),
            requests: Mutex::new(Vec::new()),
        });
        let rpc = Arc::new(ScriptedRpc::new(Vec::new(), 100));

        let result = service(api, rpc.clone()).execute_swap(&quote(), &wallet).await;

        assert!(matches!(result, Err(SwapError::SigningRejected(_))));
        assert_eq!(rpc.submitted_retries.load(Ordering::SeqCst), usize::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn on_chain_error_is_reported() {
        let wallet = KeypairWallet::new(Keypair::new());
        let api = Arc::new(FixedSwapApi {
            payer: wallet.public_key(),
            last_valid_block_height: Some(200),
            requests: Mutex::new(Vec::new()),
        });
        let rpc = Arc::new(ScriptedRpc::new(
            vec![SignatureStatus::Failed("custom program error: 0x1771".to_string())],
            100,
        ));

        let result = service(api, rpc).execute_swap(&quote(), &wallet).await;

        assert!(matches!(result, Err(SwapError::TransactionFailed(reason)) if reason.contains("0x1771")));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_blockhash_times_out() {
        let rpc = Arc::new(ScriptedRpc::new(Vec::new(), 140));
        let api = Arc::new(FixedSwapApi {
            payer: Pubkey::new_unique(),
            last_valid_block_height: Some(200),
            requests: Mutex::new(Vec::new()),
        });

        let result = service(api, rpc.clone())
            .confirm(&Signature::default(), 145)
            .await;

        assert!(matches!(result, Err(SwapError::ConfirmationTimeout)));
        assert_eq!(rpc.polls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_comes_from_the_swap_response() {
        let wallet = KeypairWallet::new(Keypair::new());
        let api = Arc::new(FixedSwapApi {
            payer: wallet.public_key(),
            last_valid_block_height: Some(200),
            requests: Mutex::new(Vec::new()),
        });
        let rpc = Arc::new(ScriptedRpc::new(Vec::new(), 195));

        let result = service(api, rpc.clone()).execute_swap(&quote(), &wallet).await;

        assert!(matches!(result, Err(SwapError::ConfirmationTimeout)));
        // heights 195..=201, expired once past 200
        assert_eq!(rpc.polls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_falls_back_to_latest_blockhash() {
        let wallet = KeypairWallet::new(Keypair::new());
        let api = Arc::new(FixedSwapApi {
            payer: wallet.public_key(),
            last_valid_block_height: None,
            requests: Mutex::new(Vec::new()),
        });
        let rpc = Arc::new(ScriptedRpc::new(Vec::new(), 148));

        let result = service(api, rpc.clone()).execute_swap(&quote(), &wallet).await;

        assert!(matches!(result, Err(SwapError::ConfirmationTimeout)));
        assert_eq!(rpc.polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_confirm_timeout() {
        let rpc = Arc::new(ScriptedRpc::new(Vec::new(), 0));
        rpc.height.store(0, Ordering::SeqCst);
        let api = Arc::new(FixedSwapApi {
            payer: Pubkey::new_unique(),
            last_valid_block_height: Some(200),
            requests: Mutex::new(Vec::new()),
        });

        let result = service(api, rpc.clone())
            .confirm(&Signature::default(), u64::MAX)
            .await;

        assert!(matches!(result, Err(SwapError::ConfirmationTimeout)));
        assert_eq!(rpc.polls.load(Ordering::SeqCst), 61);
    }

    #[test]
    fn rejects_garbage_transactions() {
        assert!(matches!(
            decode_swap_transaction("not base64!"),
            Err(SwapError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_swap_transaction(&STANDARD.encode([1u8, 2, 3])),
            Err(SwapError::MalformedResponse(_))
        ));
    }
}
