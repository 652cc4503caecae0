use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};

use crate::entity::{
    CardSnapshot, QuoteOutcome, QuoteTicket, SwapError, SwapOutcome, Token, TokenSide,
};
use crate::interactor::token_interactor::resolve_token;
use crate::services::SessionStore;
use crate::solana::jupiter::quote_service::QuoteService;
use crate::solana::jupiter::swap_service::SwapService;
use crate::solana::jupiter::token_repository::{fallback_token, TokenRepository};
use crate::solana::tokens::constants::{SOL_MINT, USDC_MINT};
use crate::solana::utils::format_ui_amount;

#[async_trait]
pub trait SwapInteractor: Send + Sync {
    /// Reset the chat's card to the default pair.
    async fn open_card(&self, chat_id: ChatId) -> CardSnapshot;

    fn snapshot(&self, chat_id: ChatId) -> CardSnapshot;

    fn card_message(&self, chat_id: ChatId) -> Option<MessageId>;

    fn set_card_message(&self, chat_id: ChatId, message_id: MessageId);

    fn update_amount(&self, chat_id: ChatId, amount: &str) -> Option<QuoteTicket>;

    /// Put a token on one side of the card and close the selector.
    async fn select_token(
        &self,
        chat_id: ChatId,
        side: TokenSide,
        token_ref: &str,
    ) -> Result<Option<QuoteTicket>, SwapError>;

    fn flip(&self, chat_id: ChatId) -> Option<QuoteTicket>;

    fn update_slippage(&self, chat_id: ChatId, slippage_bps: u16) -> Option<QuoteTicket>;

    fn refresh_quote(&self, chat_id: ChatId) -> Option<QuoteTicket>;

    /// Fetch the quote for `ticket` and apply it if the card still wants it.
    async fn fetch_quote(&self, chat_id: ChatId, ticket: QuoteTicket) -> QuoteOutcome;

    /// Run the full swap for the card's current quote.
    async fn execute_swap(&self, chat_id: ChatId) -> Result<SwapOutcome, SwapError>;
}

pub struct SwapInteractorImpl {
    sessions: Arc<SessionStore>,
    token_repository: Arc<dyn TokenRepository>,
    quote_service: Arc<dyn QuoteService>,
    swap_service: Arc<SwapService>,
}

impl SwapInteractorImpl {
    pub fn new(
        sessions: Arc<SessionStore>,
        token_repository: Arc<dyn TokenRepository>,
        quote_service: Arc<dyn QuoteService>,
        swap_service: Arc<SwapService>,
    ) -> Self {
        Self {
            sessions,
            token_repository,
            quote_service,
            swap_service,
        }
    }

    async fn default_token(&self, mint: &str) -> Option<Token> {
        match self.token_repository.get_token_by_id(mint).await {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Default token {} unavailable: {}", mint, e);
                fallback_token(mint)
            }
        }
    }
}

#[async_trait]
impl SwapInteractor for SwapInteractorImpl {
    async fn open_card(&self, chat_id: ChatId) -> CardSnapshot {
        let from = self.default_token(SOL_MINT).await;
        let to = self.default_token(USDC_MINT).await;

        self.sessions.with_session(chat_id, |session| {
            session.card.reset(from, to);
            session.selector.close();
            session.card_message_id = None;
            session.snapshot()
        })
    }

    fn snapshot(&self, chat_id: ChatId) -> CardSnapshot {
        self.sessions.snapshot(chat_id)
    }

    fn card_message(&self, chat_id: ChatId) -> Option<MessageId> {
        self.sessions
            .with_session(chat_id, |session| session.card_message_id)
    }

    fn set_card_message(&self, chat_id: ChatId, message_id: MessageId) {
        self.sessions.with_session(chat_id, |session| {
            session.card_message_id = Some(message_id)
        });
    }

    fn update_amount(&self, chat_id: ChatId, amount: &str) -> Option<QuoteTicket> {
        self.sessions
            .with_session(chat_id, |session| session.card.set_from_amount(amount))
    }

    async fn select_token(
        &self,
        chat_id: ChatId,
        side: TokenSide,
        token_ref: &str,
    ) -> Result<Option<QuoteTicket>, SwapError> {
        let token = resolve_token(self.token_repository.as_ref(), token_ref).await?;
        info!("Chat {} picked {} for {}", chat_id, token.symbol, side.as_str());

        Ok(self.sessions.with_session(chat_id, |session| {
            session.selector.close();
            session.card.select_token(side, token)
        }))
    }

    fn flip(&self, chat_id: ChatId) -> Option<QuoteTicket> {
        self.sessions
            .with_session(chat_id, |session| session.card.flip())
    }

    fn update_slippage(&self, chat_id: ChatId, slippage_bps: u16) -> Option<QuoteTicket> {
        self.sessions
            .with_session(chat_id, |session| session.card.set_slippage_bps(slippage_bps))
    }

    fn refresh_quote(&self, chat_id: ChatId) -> Option<QuoteTicket> {
        self.sessions
            .with_session(chat_id, |session| session.card.refresh())
    }

    async fn fetch_quote(&self, chat_id: ChatId, ticket: QuoteTicket) -> QuoteOutcome {
        debug!(
            "Fetching quote #{} for chat {}: {:?}",
            ticket.request_id, chat_id, ticket.params
        );

        let result = self.quote_service.get_quote(&ticket.params).await;
        if let Err(e) = &result {
            error!("Quote #{} for chat {} failed: {}", ticket.request_id, chat_id, e);
        }

        let outcome = self.sessions.with_session(chat_id, |session| {
            session.card.apply_quote(&ticket, result, Utc::now())
        });

        if outcome == QuoteOutcome::Stale {
            debug!("Dropped stale quote #{} for chat {}", ticket.request_id, chat_id);
        }
        outcome
    }

    async fn execute_swap(&self, chat_id: ChatId) -> Result<SwapOutcome, SwapError> {
        let (quote, wallet, from_token, to_token) = self.sessions.with_session(chat_id, |session| {
            let wallet = session.wallet.clone();
            let from = session.card.from_token.clone();
            let to = session.card.to_token.clone();
            let max_age = session.quote_max_age;
            let quote = session
                .card
                .begin_swap(wallet.is_some(), Utc::now(), max_age)?;

            match (wallet, from, to) {
                (Some(wallet), Some(from), Some(to)) => Ok((quote, wallet, from, to)),
                _ => {
                    session.card.finish_swap(false);
                    Err(SwapError::MissingToken)
                }
            }
        })?;

        let result = self
            .swap_service
            .execute_swap(&quote.response, wallet.as_ref())
            .await;

        self.sessions
            .with_session(chat_id, |session| session.card.finish_swap(result.is_ok()));

        let signature = result?;
        let outcome = SwapOutcome {
            source_symbol: from_token.symbol,
            target_symbol: to_token.symbol,
            amount_in: format_ui_amount(quote.params.amount, from_token.decimals),
            amount_out: format_ui_amount(quote.response.out_amount_raw()?, to_token.decimals),
            signature: signature.to_string(),
        };

        info!(
            "Chat {} swapped {} {} for {} {}: {}",
            chat_id,
            outcome.amount_in,
            outcome.source_symbol,
            outcome.amount_out,
            outcome.target_symbol,
            outcome.signature
        );
        Ok(outcome)
    }
}
