use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html::escape, Bot};

use crate::entity::{Token, TokenBalance};
use crate::utils::{format_usd, shorten_address};

#[async_trait]
pub trait BalanceView: Send + Sync {
    async fn display_balances(&self, address: &str, balances: &[(Token, TokenBalance)]) -> Result<()>;
    async fn display_no_wallet(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramBalanceView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramBalanceView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

pub fn balances_text(address: &str, balances: &[(Token, TokenBalance)]) -> String {
    let mut text = format!(
        "<b>Wallet</b> <code>{}</code>\n\n",
        shorten_address(address)
    );

    if balances.is_empty() {
        text.push_str("Select tokens on the swap card to see their balances.");
        return text;
    }

    for (token, balance) in balances {
        let ui_amount = balance.ui_amount();
        text.push_str(&format!("• <b>{}</b>: {}", escape(&token.symbol), ui_amount));
        if let Some(usd) = token.usd_value(&ui_amount).filter(|usd| *usd > 0.0) {
            text.push_str(&format!(" ({})", format_usd(usd)));
        }
        text.push('\n');
    }

    text
}

#[async_trait]
impl BalanceView for TelegramBalanceView {
    async fn display_balances(&self, address: &str, balances: &[(Token, TokenBalance)]) -> Result<()> {
        self.bot
            .send_message(self.chat_id, balances_text(address, balances))
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_no_wallet(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "No wallet connected. Use /connect <secret key> first.",
            )
            .await?;

        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("❌ Error fetching balances: {}", error_message),
            )
            .await?;

        Ok(())
    }
}
