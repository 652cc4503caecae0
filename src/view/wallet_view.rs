use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, Bot};

#[async_trait]
pub trait WalletView: Send + Sync {
    async fn display_connected(&self, address: String) -> Result<()>;
    async fn display_disconnected(&self, had_wallet: bool) -> Result<()>;
    async fn display_usage(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramWalletView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramWalletView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl WalletView for TelegramWalletView {
    async fn display_connected(&self, address: String) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Wallet connected: <code>{}</code>\n\n\
                    The key is kept in memory for this session only. \
                    Your message with the key has been deleted.",
                    address
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_disconnected(&self, had_wallet: bool) -> Result<()> {
        let text = if had_wallet {
            "Wallet disconnected."
        } else {
            "No wallet was connected."
        };
        self.bot.send_message(self.chat_id, text).await?;

        Ok(())
    }

    async fn display_usage(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Use the command in this format: /connect <base58 secret key>\n\n\
                 The key is used to sign swaps in this chat until /disconnect or a restart.",
            )
            .await?;

        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("❌ Could not connect wallet: {}", error_message),
            )
            .await?;

        Ok(())
    }
}
