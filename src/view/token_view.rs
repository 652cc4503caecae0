use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
    utils::html::escape,
    Bot,
};

use crate::entity::{Token, TokenSide};
use crate::utils::shorten_address;

/// Rows shown in a token list
pub const MAX_LISTED_TOKENS: usize = 10;

#[async_trait]
pub trait TokenView: Send + Sync {
    /// List tokens; with a side, each token becomes a button that selects it.
    async fn display_tokens(&self, title: &str, tokens: &[Token], side: Option<TokenSide>) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramTokenView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramTokenView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

pub fn token_list_text(title: &str, tokens: &[Token]) -> String {
    let mut text = format!("<b>{}</b>\n\n", escape(title));

    if tokens.is_empty() {
        text.push_str("No tokens found.");
        return text;
    }

    for token in tokens.iter().take(MAX_LISTED_TOKENS) {
        text.push_str(&format!(
            "• <b>{}</b> {} <code>{}</code>",
            escape(&token.symbol),
            escape(&token.name),
            shorten_address(&token.id)
        ));
        if let Some(price) = token.usd_price {
            text.push_str(&format!(" ${:.4}", price));
        }
        text.push('\n');
    }

    text
}

pub fn token_keyboard(tokens: &[Token], side: TokenSide) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = tokens
        .iter()
        .take(MAX_LISTED_TOKENS)
        .map(|token| {
            InlineKeyboardButton::callback(
                token.symbol.clone(),
                format!("select:{}:{}", side.as_str(), token.id),
            )
        })
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> =
        buttons.chunks(3).map(|row| row.to_vec()).collect();
    rows.push(vec![InlineKeyboardButton::callback("Cancel", "cancel")]);

    InlineKeyboardMarkup::new(rows)
}

#[async_trait]
impl TokenView for TelegramTokenView {
    async fn display_tokens(&self, title: &str, tokens: &[Token], side: Option<TokenSide>) -> Result<()> {
        let mut request = self
            .bot
            .send_message(self.chat_id, token_list_text(title, tokens))
            .parse_mode(ParseMode::Html);

        if let Some(side) = side {
            request = request.reply_markup(token_keyboard(tokens, side));
        }

        request.await?;

        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("❌ Token lookup failed: {}", error_message))
            .await?;

        Ok(())
    }
}
