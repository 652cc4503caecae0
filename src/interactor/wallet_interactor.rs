use async_trait::async_trait;
use log::info;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::entity::SwapError;
use crate::services::SessionStore;
use crate::solana::wallet::{KeypairWallet, WalletAdapter};

#[async_trait]
pub trait WalletInteractor: Send + Sync {
    /// Connect a keypair wallet for this chat's session.
    async fn connect(&self, chat_id: ChatId, secret_base58: &str) -> Result<Pubkey, SwapError>;

    /// Drop the chat's wallet. Returns false when none was connected.
    async fn disconnect(&self, chat_id: ChatId) -> bool;

    fn public_key(&self, chat_id: ChatId) -> Option<Pubkey>;
}

pub struct WalletInteractorImpl {
    sessions: Arc<SessionStore>,
}

impl WalletInteractorImpl {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl WalletInteractor for WalletInteractorImpl {
    async fn connect(&self, chat_id: ChatId, secret_base58: &str) -> Result<Pubkey, SwapError> {
        let wallet = KeypairWallet::connect(secret_base58)?;
        let pubkey = wallet.public_key();

        self.sessions.with_session(chat_id, |session| {
            session.wallet = Some(Arc::new(wallet));
            session.balances.clear();
        });

        info!("Chat {} connected wallet {}", chat_id, pubkey);
        Ok(pubkey)
    }

    async fn disconnect(&self, chat_id: ChatId) -> bool {
        let had_wallet = self.sessions.with_session(chat_id, |session| {
            session.balances.clear();
            session.wallet.take().is_some()
        });

        if had_wallet {
            info!("Chat {} disconnected its wallet", chat_id);
        }
        had_wallet
    }

    fn public_key(&self, chat_id: ChatId) -> Option<Pubkey> {
        self.sessions
            .wallet(chat_id)
            .map(|wallet| wallet.public_key())
    }
}
