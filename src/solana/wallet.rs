use async_trait::async_trait;
use log::debug;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};

use crate::entity::SwapError;

/// A connected wallet that can sign transactions on the user's behalf.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn public_key(&self) -> Pubkey;

    /// Add this wallet's signature to `transaction`.
    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError>;
}

/// Wallet backed by a keypair held in memory for the current session.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Connect from a base58-encoded 64-byte secret key.
    pub fn connect(secret_base58: &str) -> Result<Self, SwapError> {
        keypair_from_base58(secret_base58).map(Self::new)
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn public_key(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(
        &self,
        mut transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError> {
        let pubkey = self.keypair.pubkey();
        let required = transaction.message.header().num_required_signatures as usize;

        let index = transaction
            .message
            .static_account_keys()
            .iter()
            .take(required)
            .position(|key| *key == pubkey)
            .ok_or_else(|| {
                SwapError::SigningRejected(format!("wallet {} is not a required signer", pubkey))
            })?;

        if transaction.signatures.len() < required {
            transaction.signatures.resize(required, Signature::default());
        }

        let message = transaction.message.serialize();
        transaction.signatures[index] = self.keypair.sign_message(&message);

        debug!("Signed transaction as signer #{} ({})", index, pubkey);

        Ok(transaction)
    }
}

/// Restore Keypair from base58 string (64 bytes).
pub fn keypair_from_base58(keypair_base58: &str) -> Result<Keypair, SwapError> {
    let keypair_bytes = bs58::decode(keypair_base58.trim())
        .into_vec()
        .map_err(|e| SwapError::InvalidKeypair(format!("not base58: {}", e)))?;

    if keypair_bytes.len() != 64 {
        return Err(SwapError::InvalidKeypair(format!(
            "expected 64 bytes, got {}",
            keypair_bytes.len()
        )));
    }

    Keypair::try_from(&keypair_bytes[..]).map_err(|e| SwapError::InvalidKeypair(e.to_string()))
}
