use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::entity::SwapError;
use crate::interactor::balance_interactor::BalanceInteractor;
use crate::view::balance_view::BalanceView;

#[async_trait]
pub trait BalancePresenter: Send + Sync {
    async fn show_balances(&self, chat_id: ChatId) -> Result<()>;
}

pub struct BalancePresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> BalancePresenterImpl<I, V>
where
    I: BalanceInteractor,
    V: BalanceView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> BalancePresenter for BalancePresenterImpl<I, V>
where
    I: BalanceInteractor + Send + Sync,
    V: BalanceView + Send + Sync,
{
    async fn show_balances(&self, chat_id: ChatId) -> Result<()> {
        match self.interactor.get_wallet_balances(chat_id).await {
            Ok((address, balances)) => self.view.display_balances(&address, &balances).await,
            Err(SwapError::WalletNotConnected) => self.view.display_no_wallet().await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }
}
