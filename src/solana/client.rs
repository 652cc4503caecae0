use anyhow::Result;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use std::sync::Arc;

use crate::entity::SwapError;

/// Create a Solana client with confirmed commitment
pub fn create_solana_client(rpc_url: &str) -> Result<Arc<RpcClient>> {
    let client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

    Ok(Arc::new(client))
}

/// Where a submitted transaction currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    Pending,
    Confirmed,
    Failed(String),
}

/// The RPC calls the swap flow and balance lookup depend on.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    /// Fetch an account; `None` when it does not exist.
    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>, SwapError>;

    /// Latest blockhash and the last block height at which it is valid.
    async fn latest_blockhash(&self) -> Result<(Hash, u64), SwapError>;

    async fn submit_transaction(
        &self,
        transaction: &VersionedTransaction,
        max_retries: usize,
    ) -> Result<Signature, SwapError>;

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus, SwapError>;

    async fn block_height(&self) -> Result<u64, SwapError>;
}

fn client_error(e: impl std::fmt::Display) -> SwapError {
    SwapError::SolanaClient(e.to_string())
}

#[async_trait]
impl RpcGateway for RpcClient {
    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>, SwapError> {
        let response = self
            .get_account_with_commitment(pubkey, self.commitment())
            .await
            .map_err(client_error)?;

        Ok(response.value)
    }

    async fn latest_blockhash(&self) -> Result<(Hash, u64), SwapError> {
        self.get_latest_blockhash_with_commitment(self.commitment())
            .await
            .map_err(client_error)
    }

    async fn submit_transaction(
        &self,
        transaction: &VersionedTransaction,
        max_retries: usize,
    ) -> Result<Signature, SwapError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            max_retries: Some(max_retries),
            ..RpcSendTransactionConfig::default()
        };

        self.send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| SwapError::Submission(e.to_string()))
    }

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus, SwapError> {
        let response = self
            .get_signature_statuses(&[*signature])
            .await
            .map_err(client_error)?;

        let status = match response.value.into_iter().next().flatten() {
            None => SignatureStatus::Pending,
            Some(status) => match status.err {
                Some(err) => SignatureStatus::Failed(err.to_string()),
                None if status.satisfies_commitment(self.commitment()) => {
                    SignatureStatus::Confirmed
                }
                None => SignatureStatus::Pending,
            },
        };

        Ok(status)
    }

    async fn block_height(&self) -> Result<u64, SwapError> {
        self.get_block_height().await.map_err(client_error)
    }
}
