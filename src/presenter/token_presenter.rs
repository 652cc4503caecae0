use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::entity::TokenSide;
use crate::interactor::token_interactor::TokenInteractor;
use crate::view::token_view::TokenView;

#[async_trait]
pub trait TokenPresenter: Send + Sync {
    async fn list_tokens(&self) -> Result<()>;
    async fn search_tokens(&self, query: &str) -> Result<()>;
    async fn open_selector(&self, chat_id: ChatId, side: TokenSide) -> Result<()>;
    async fn search_in_selector(&self, chat_id: ChatId, side: TokenSide, term: &str) -> Result<()>;
    fn close_selector(&self, chat_id: ChatId);
}

pub struct TokenPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> TokenPresenterImpl<I, V>
where
    I: TokenInteractor,
    V: TokenView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> TokenPresenter for TokenPresenterImpl<I, V>
where
    I: TokenInteractor + Send + Sync,
    V: TokenView + Send + Sync,
{
    async fn list_tokens(&self) -> Result<()> {
        match self.interactor.list_tokens().await {
            Ok(tokens) => self.view.display_tokens("Tokens", &tokens, None).await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn search_tokens(&self, query: &str) -> Result<()> {
        match self.interactor.search_tokens(query).await {
            Ok(tokens) => {
                let title = format!("Search results for \"{}\"", query.trim());
                self.view.display_tokens(&title, &tokens, None).await
            }
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn open_selector(&self, chat_id: ChatId, side: TokenSide) -> Result<()> {
        match self.interactor.open_selector(chat_id, side).await {
            Ok(tokens) => {
                let title = format!(
                    "Select the \"{}\" token, or send a name, symbol or mint to search",
                    side.as_str()
                );
                self.view.display_tokens(&title, &tokens, Some(side)).await
            }
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn search_in_selector(&self, chat_id: ChatId, side: TokenSide, term: &str) -> Result<()> {
        match self.interactor.search_in_selector(chat_id, term).await {
            Ok(tokens) => {
                let title = if term.trim().is_empty() {
                    "Tokens".to_string()
                } else {
                    format!("Results for \"{}\"", term.trim())
                };
                self.view.display_tokens(&title, &tokens, Some(side)).await
            }
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    fn close_selector(&self, chat_id: ChatId) {
        self.interactor.close_selector(chat_id);
    }
}
