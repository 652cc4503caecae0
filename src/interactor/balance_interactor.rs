use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, warn};
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::entity::{SwapError, Token, TokenBalance};
use crate::services::SessionStore;
use crate::solana::client::RpcGateway;
use crate::solana::tokens::spl::{get_token_balance, token_program_id};
use crate::solana::utils::parse_pubkey;

#[async_trait]
pub trait BalanceInteractor: Send + Sync {
    /// Re-read the balances of both card tokens for the connected wallet.
    async fn refresh_card_balances(&self, chat_id: ChatId) -> Result<(), SwapError>;

    /// Balances of the card tokens, for the balance command.
    async fn get_wallet_balances(
        &self,
        chat_id: ChatId,
    ) -> Result<(String, Vec<(Token, TokenBalance)>), SwapError>;
}

pub struct BalanceInteractorImpl {
    sessions: Arc<SessionStore>,
    rpc: Arc<dyn RpcGateway>,
}

impl BalanceInteractorImpl {
    pub fn new(sessions: Arc<SessionStore>, rpc: Arc<dyn RpcGateway>) -> Self {
        Self { sessions, rpc }
    }

    async fn fetch_balances(
        &self,
        chat_id: ChatId,
    ) -> Result<(String, Vec<(Token, TokenBalance)>), SwapError> {
        let (wallet, tokens) = self.sessions.with_session(chat_id, |session| {
            let tokens: Vec<Token> = [session.card.from_token.clone(), session.card.to_token.clone()]
                .into_iter()
                .flatten()
                .collect();
            (session.wallet.clone(), tokens)
        });

        let owner = wallet.ok_or(SwapError::WalletNotConnected)?.public_key();

        let lookups = tokens.into_iter().map(|token| async move {
            let mint = parse_pubkey(&token.id)?;
            let program = token_program_id(&token.token_program);

            let balance =
                get_token_balance(self.rpc.as_ref(), &owner, &mint, &program, Some(token.decimals))
                    .await?;
            debug!("Balance of {} for {}: {}", token.symbol, owner, balance.ui_amount());
            Ok::<_, SwapError>((token, balance))
        });
        let balances = try_join_all(lookups).await?;

        Ok((owner.to_string(), balances))
    }
}

#[async_trait]
impl BalanceInteractor for BalanceInteractorImpl {
    async fn refresh_card_balances(&self, chat_id: ChatId) -> Result<(), SwapError> {
        if self.sessions.wallet(chat_id).is_none() {
            return Ok(());
        }

        let (_, balances) = self.fetch_balances(chat_id).await.map_err(|e| {
            warn!("Failed to refresh balances for chat {}: {}", chat_id, e);
            e
        })?;

        // Keyed by mint; the owner is checked when read back.
        self.sessions.with_session(chat_id, |session| {
            for (_, balance) in balances {
                session.balances.insert(balance.mint.clone(), balance);
            }
        });

        Ok(())
    }

    async fn get_wallet_balances(
        &self,
        chat_id: ChatId,
    ) -> Result<(String, Vec<(Token, TokenBalance)>), SwapError> {
        self.fetch_balances(chat_id).await
    }
}
