use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::entity::{SwapError, Token, TokenSide};
use crate::services::SessionStore;
use crate::solana::jupiter::token_repository::{find_token, TokenRepository};
use crate::solana::utils::parse_pubkey;

/// Resolve a mint address directly, or a symbol through the token list and then remote search.
pub async fn resolve_token(
    token_repository: &dyn TokenRepository,
    token_ref: &str,
) -> Result<Token, SwapError> {
    let token_ref = token_ref.trim();
    if token_ref.is_empty() {
        return Err(SwapError::TokenNotFound(String::new()));
    }

    if parse_pubkey(token_ref).is_ok() {
        return token_repository.get_token_by_id(token_ref).await;
    }

    let listed = token_repository.list_tokens().await.unwrap_or_default();
    if let Some(token) = find_token(&listed, token_ref) {
        return Ok(token);
    }

    let found = token_repository.search_tokens(token_ref).await?;
    find_token(&found, token_ref).ok_or_else(|| SwapError::TokenNotFound(token_ref.to_string()))
}

#[async_trait]
pub trait TokenInteractor: Send + Sync {
    async fn list_tokens(&self) -> Result<Vec<Token>, SwapError>;

    /// Tokens for a search term; an empty term gives the local list.
    async fn search_tokens(&self, query: &str) -> Result<Vec<Token>, SwapError>;

    /// Open the selector for one side of the chat's card and list tokens for it.
    async fn open_selector(&self, chat_id: ChatId, side: TokenSide) -> Result<Vec<Token>, SwapError>;

    /// Apply a search term to the open selector.
    async fn search_in_selector(&self, chat_id: ChatId, term: &str) -> Result<Vec<Token>, SwapError>;

    fn close_selector(&self, chat_id: ChatId);
}

pub struct TokenInteractorImpl {
    sessions: Arc<SessionStore>,
    token_repository: Arc<dyn TokenRepository>,
}

impl TokenInteractorImpl {
    pub fn new(sessions: Arc<SessionStore>, token_repository: Arc<dyn TokenRepository>) -> Self {
        Self {
            sessions,
            token_repository,
        }
    }
}

#[async_trait]
impl TokenInteractor for TokenInteractorImpl {
    async fn list_tokens(&self) -> Result<Vec<Token>, SwapError> {
        self.token_repository.list_tokens().await
    }

    async fn search_tokens(&self, query: &str) -> Result<Vec<Token>, SwapError> {
        if query.trim().is_empty() {
            return self.token_repository.list_tokens().await;
        }
        self.token_repository.search_tokens(query).await
    }

    async fn open_selector(&self, chat_id: ChatId, side: TokenSide) -> Result<Vec<Token>, SwapError> {
        self.sessions
            .with_session(chat_id, |session| session.selector.open(side));

        self.token_repository.list_tokens().await
    }

    async fn search_in_selector(&self, chat_id: ChatId, term: &str) -> Result<Vec<Token>, SwapError> {
        let query = self
            .sessions
            .with_session(chat_id, |session| session.selector.set_search_term(term));

        let (local, remote) = match query {
            Some(query) => {
                debug!("Selector search '{}' for chat {}", query, chat_id);
                (Vec::new(), Some(self.token_repository.search_tokens(&query).await?))
            }
            None => (self.token_repository.list_tokens().await?, None),
        };

        let visible = self.sessions.with_session(chat_id, |session| {
            session
                .selector
                .visible_tokens(&local, remote.as_deref())
                .to_vec()
        });

        Ok(visible)
    }

    fn close_selector(&self, chat_id: ChatId) {
        self.sessions
            .with_session(chat_id, |session| session.selector.close());
    }
}
