use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::entity::{QuoteOutcome, QuoteTicket, SwapError, TokenSide};
use crate::interactor::balance_interactor::BalanceInteractor;
use crate::interactor::swap_interactor::SwapInteractor;
use crate::services::QuoteDebouncer;
use crate::utils::parse_slippage;
use crate::view::swap_view::SwapView;

#[async_trait]
pub trait SwapPresenter: Send + Sync {
    /// Show the card; `reset` starts over with the default pair.
    async fn show_card(&self, chat_id: ChatId, reset: bool) -> Result<()>;
    async fn change_amount(&self, chat_id: ChatId, amount: &str) -> Result<()>;
    async fn change_token(&self, chat_id: ChatId, side: TokenSide, token_ref: &str) -> Result<()>;
    async fn change_slippage(&self, chat_id: ChatId, input: &str) -> Result<()>;
    async fn flip(&self, chat_id: ChatId) -> Result<()>;
    async fn refresh(&self, chat_id: ChatId) -> Result<()>;
    async fn swap(&self, chat_id: ChatId) -> Result<()>;
}

pub struct SwapPresenterImpl<I, B, V> {
    interactor: Arc<I>,
    balances: Arc<B>,
    view: Arc<V>,
    debouncer: Arc<QuoteDebouncer>,
}

impl<I, B, V> SwapPresenterImpl<I, B, V>
where
    I: SwapInteractor + 'static,
    B: BalanceInteractor + 'static,
    V: SwapView + 'static,
{
    pub fn new(interactor: Arc<I>, balances: Arc<B>, view: Arc<V>, debouncer: Arc<QuoteDebouncer>) -> Self {
        Self {
            interactor,
            balances,
            view,
            debouncer,
        }
    }

    async fn render(&self, chat_id: ChatId) -> Result<()> {
        render_card(self.interactor.as_ref(), self.view.as_ref(), chat_id).await
    }

    /// Redraw now and fetch the quote after the debounce delay. Without a
    /// ticket any scheduled fetch is dropped.
    async fn after_input(&self, chat_id: ChatId, ticket: Option<QuoteTicket>) -> Result<()> {
        match ticket {
            Some(ticket) => self.schedule_quote(chat_id, ticket),
            None => self.debouncer.cancel(chat_id),
        }

        self.render(chat_id).await
    }

    fn schedule_quote(&self, chat_id: ChatId, ticket: QuoteTicket) {
        let interactor = self.interactor.clone();
        let view = self.view.clone();

        self.debouncer.schedule(chat_id, async move {
            let outcome = interactor.fetch_quote(chat_id, ticket).await;
            if outcome == QuoteOutcome::Stale {
                return;
            }

            if let Err(e) = render_card(interactor.as_ref(), view.as_ref(), chat_id).await {
                error!("Failed to render card for chat {}: {}", chat_id, e);
            }
        });
    }

    async fn refresh_balances(&self, chat_id: ChatId) {
        if let Err(e) = self.balances.refresh_card_balances(chat_id).await {
            error!("Balance refresh for chat {} failed: {}", chat_id, e);
        }
    }
}

async fn render_card<I, V>(interactor: &I, view: &V, chat_id: ChatId) -> Result<()>
where
    I: SwapInteractor + ?Sized,
    V: SwapView + ?Sized,
{
    let snapshot = interactor.snapshot(chat_id);
    let message_id = view
        .render_card(&snapshot, interactor.card_message(chat_id))
        .await?;
    interactor.set_card_message(chat_id, message_id);

    Ok(())
}

#[async_trait]
impl<I, B, V> SwapPresenter for SwapPresenterImpl<I, B, V>
where
    I: SwapInteractor + 'static,
    B: BalanceInteractor + 'static,
    V: SwapView + 'static,
{
    async fn show_card(&self, chat_id: ChatId, reset: bool) -> Result<()> {
        if reset {
            self.debouncer.cancel(chat_id);
            self.interactor.open_card(chat_id).await;
        }
        self.refresh_balances(chat_id).await;

        self.render(chat_id).await
    }

    async fn change_amount(&self, chat_id: ChatId, amount: &str) -> Result<()> {
        let ticket = self.interactor.update_amount(chat_id, amount);
        self.after_input(chat_id, ticket).await
    }

    async fn change_token(&self, chat_id: ChatId, side: TokenSide, token_ref: &str) -> Result<()> {
        match self.interactor.select_token(chat_id, side, token_ref).await {
            Ok(ticket) => {
                self.refresh_balances(chat_id).await;
                self.after_input(chat_id, ticket).await
            }
            Err(e) => self.view.display_error(&e).await,
        }
    }

    async fn change_slippage(&self, chat_id: ChatId, input: &str) -> Result<()> {
        match parse_slippage(input) {
            Some(bps) => {
                let ticket = self.interactor.update_slippage(chat_id, bps);
                self.after_input(chat_id, ticket).await
            }
            None => {
                self.view
                    .display_usage("Send slippage as a percentage (0.5%) or in basis points (50).")
                    .await
            }
        }
    }

    async fn flip(&self, chat_id: ChatId) -> Result<()> {
        let ticket = self.interactor.flip(chat_id);
        self.after_input(chat_id, ticket).await
    }

    async fn refresh(&self, chat_id: ChatId) -> Result<()> {
        let ticket = self.interactor.refresh_quote(chat_id);
        self.refresh_balances(chat_id).await;
        self.after_input(chat_id, ticket).await
    }

    async fn swap(&self, chat_id: ChatId) -> Result<()> {
        let snapshot = self.interactor.snapshot(chat_id);
        if let Some(blocker) = snapshot.swap_blocker() {
            return self.view.display_error(&SwapError::from(blocker)).await;
        }

        self.view.display_swap_processing(&snapshot).await?;

        match self.interactor.execute_swap(chat_id).await {
            Ok(outcome) => {
                info!("Swap for chat {} confirmed: {}", chat_id, outcome.signature);
                self.view.display_swap_success(&outcome).await?;
                self.refresh_balances(chat_id).await;
            }
            Err(e) => {
                error!("Swap for chat {} failed: {}", chat_id, e);
                self.view.display_error(&e).await?;
            }
        }

        self.render(chat_id).await
    }
}
