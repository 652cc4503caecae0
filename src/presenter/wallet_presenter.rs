use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::interactor::balance_interactor::BalanceInteractor;
use crate::interactor::wallet_interactor::WalletInteractor;
use crate::view::wallet_view::WalletView;

#[async_trait]
pub trait WalletPresenter: Send + Sync {
    /// Returns true when a wallet got connected.
    async fn connect(&self, chat_id: ChatId, secret: Option<&str>) -> Result<bool>;
    async fn disconnect(&self, chat_id: ChatId) -> Result<()>;
}

pub struct WalletPresenterImpl<I, B, V> {
    interactor: Arc<I>,
    balances: Arc<B>,
    view: Arc<V>,
}

impl<I, B, V> WalletPresenterImpl<I, B, V>
where
    I: WalletInteractor,
    B: BalanceInteractor,
    V: WalletView,
{
    pub fn new(interactor: Arc<I>, balances: Arc<B>, view: Arc<V>) -> Self {
        Self {
            interactor,
            balances,
            view,
        }
    }
}

#[async_trait]
impl<I, B, V> WalletPresenter for WalletPresenterImpl<I, B, V>
where
    I: WalletInteractor + Send + Sync,
    B: BalanceInteractor + Send + Sync,
    V: WalletView + Send + Sync,
{
    async fn connect(&self, chat_id: ChatId, secret: Option<&str>) -> Result<bool> {
        let secret = match secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                self.view.display_usage().await?;
                return Ok(false);
            }
        };

        match self.interactor.connect(chat_id, secret).await {
            Ok(pubkey) => {
                if let Err(e) = self.balances.refresh_card_balances(chat_id).await {
                    warn!("Balances unavailable after connect for chat {}: {}", chat_id, e);
                }
                self.view.display_connected(pubkey.to_string()).await?;
                Ok(true)
            }
            Err(e) => {
                self.view.display_error(e.to_string()).await?;
                Ok(false)
            }
        }
    }

    async fn disconnect(&self, chat_id: ChatId) -> Result<()> {
        let had_wallet = self.interactor.disconnect(chat_id).await;
        self.view.display_disconnected(had_wallet).await
    }
}
