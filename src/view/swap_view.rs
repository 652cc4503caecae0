use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode},
    utils::html::escape,
    ApiError, Bot, RequestError,
};

use crate::entity::{
    CardSnapshot, ErrorCategory, SwapBlocker, SwapError, SwapOutcome, TokenBalance,
};
use crate::utils::{format_slippage, format_usd, shorten_address};

#[async_trait]
pub trait SwapView: Send + Sync {
    /// Draw the card, editing `existing` when possible. Returns the card's message id.
    async fn render_card(
        &self,
        snapshot: &CardSnapshot,
        existing: Option<MessageId>,
    ) -> Result<MessageId>;
    async fn display_swap_processing(&self, snapshot: &CardSnapshot) -> Result<()>;
    async fn display_swap_success(&self, outcome: &SwapOutcome) -> Result<()>;
    async fn display_error(&self, error: &SwapError) -> Result<()>;
    async fn display_usage(&self, usage: &str) -> Result<()>;
}

pub struct TelegramSwapView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSwapView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

fn balance_line(balance: Option<&TokenBalance>) -> String {
    match balance {
        Some(balance) => format!(" · balance {}", balance.ui_amount()),
        None => String::new(),
    }
}

/// HTML text of the swap card.
pub fn card_text(snapshot: &CardSnapshot) -> String {
    let card = &snapshot.card;
    let symbol = |token: Option<&crate::entity::Token>| {
        token
            .map(|token| escape(&token.symbol))
            .unwrap_or_else(|| "select".to_string())
    };

    let mut text = String::from("<b>Swap</b>\n\n");

    let from_amount = if card.from_amount.is_empty() { "0.0" } else { card.from_amount.as_str() };
    text.push_str(&format!(
        "<b>From:</b> {} {}{}\n",
        escape(from_amount),
        symbol(card.from_token.as_ref()),
        balance_line(snapshot.from_balance.as_ref())
    ));
    if let Some(usd) = snapshot.from_usd_value().filter(|_| !card.from_amount.is_empty()) {
        text.push_str(&format!("≈ {}\n", format_usd(usd)));
    }

    let to_amount = if card.is_quote_pending() && card.to_amount.is_empty() {
        "…"
    } else if card.to_amount.is_empty() {
        "0.0"
    } else {
        card.to_amount.as_str()
    };
    text.push_str(&format!(
        "<b>To:</b> {} {}{}\n",
        escape(to_amount),
        symbol(card.to_token.as_ref()),
        balance_line(snapshot.to_balance.as_ref())
    ));
    if let Some(usd) = snapshot.to_usd_value().filter(|_| card.quote().is_some()) {
        text.push_str(&format!("≈ {}\n", format_usd(usd)));
    }

    text.push('\n');

    if card.quote().is_some() {
        if let Some(impact) = card.price_impact_pct() {
            text.push_str(&format!("Price impact: {:.2}%\n", impact));
        }
        if let (Some(minimum), Some(token)) = (card.minimum_received(), card.to_token.as_ref()) {
            text.push_str(&format!(
                "Minimum received: {} {}\n",
                minimum,
                escape(&token.symbol)
            ));
        }
        if let Some(quote) = card.quote() {
            let labels = quote.response.route_labels();
            if !labels.is_empty() {
                text.push_str(&format!("Route: {}\n", escape(&labels.join(" → "))));
            }
        }
    }
    text.push_str(&format!("Slippage tolerance: {}\n", format_slippage(card.slippage_bps)));

    if let Some(error) = &card.quote_error {
        text.push_str(&format!("\n⚠️ {} Tap Refresh to retry.\n", escape(error)));
    }

    match &snapshot.wallet {
        Some(address) => text.push_str(&format!("\nWallet: <code>{}</code>", shorten_address(address))),
        None => text.push_str("\nWallet not connected. Use /connect &lt;secret key&gt;."),
    }

    text
}

/// Inline buttons of the swap card.
pub fn card_keyboard(snapshot: &CardSnapshot) -> InlineKeyboardMarkup {
    let card = &snapshot.card;
    let token_button = |label: &str, token: Option<&crate::entity::Token>, data: &str| {
        let symbol = token.map(|t| t.symbol.as_str()).unwrap_or("select");
        InlineKeyboardButton::callback(format!("{}: {}", label, symbol), data.to_string())
    };

    let swap_button = match snapshot.swap_blocker() {
        None => InlineKeyboardButton::callback("✅ Swap", "swap"),
        Some(SwapBlocker::QuoteExpired) => {
            InlineKeyboardButton::callback(SwapBlocker::QuoteExpired.label(), "refresh")
        }
        Some(blocker) => InlineKeyboardButton::callback(blocker.label(), "noop"),
    };

    InlineKeyboardMarkup::new(vec![
        vec![
            token_button("From", card.from_token.as_ref(), "pick:from"),
            token_button("To", card.to_token.as_ref(), "pick:to"),
        ],
        vec![
            InlineKeyboardButton::callback("⇅ Flip", "flip"),
            InlineKeyboardButton::callback("🔄 Refresh", "refresh"),
            InlineKeyboardButton::callback("⚙️ Slippage", "slippage"),
        ],
        vec![swap_button],
    ])
}

/// Text for an error, by category.
pub fn error_text(error: &SwapError) -> String {
    let message = escape(&error.to_string());
    match error.category() {
        ErrorCategory::Network => format!("⚠️ {}\nTap Refresh to try again.", message),
        ErrorCategory::Wallet => format!("🔒 {}", message),
        ErrorCategory::Input => format!("❌ {}", message),
        ErrorCategory::OnChain => format!("❌ Swap failed: {}", message),
    }
}

#[async_trait]
impl SwapView for TelegramSwapView {
    async fn render_card(
        &self,
        snapshot: &CardSnapshot,
        existing: Option<MessageId>,
    ) -> Result<MessageId> {
        let text = card_text(snapshot);
        let keyboard = card_keyboard(snapshot);

        if let Some(message_id) = existing {
            let edited = self
                .bot
                .edit_message_text(self.chat_id, message_id, text.clone())
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard.clone())
                .await;

            match edited {
                Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => {
                    return Ok(message_id)
                }
                Err(e) => debug!("Could not edit card {}, sending a new one: {}", message_id.0, e),
            }
        }

        let message = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await?;

        Ok(message.id)
    }

    async fn display_swap_processing(&self, snapshot: &CardSnapshot) -> Result<()> {
        let card = &snapshot.card;
        let symbol = |token: Option<&crate::entity::Token>| {
            token.map(|t| escape(&t.symbol)).unwrap_or_default()
        };

        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Swapping {} {} for {} {}... Waiting for confirmation.",
                    escape(&card.from_amount),
                    symbol(card.from_token.as_ref()),
                    escape(&card.to_amount),
                    symbol(card.to_token.as_ref())
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_swap_success(&self, outcome: &SwapOutcome) -> Result<()> {
        let text = format!(
            "✅ Swap completed successfully!\n\
            Sent: {} {}\n\
            Received: {} {}\n\
            Transaction signature: <code>{}</code>\n\
            <a href=\"{}\">View on explorer</a>",
            outcome.amount_in,
            escape(&outcome.source_symbol),
            outcome.amount_out,
            escape(&outcome.target_symbol),
            outcome.signature,
            outcome.explorer_url()
        );

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_error(&self, error: &SwapError) -> Result<()> {
        self.bot
            .send_message(self.chat_id, error_text(error))
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_usage(&self, usage: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, usage).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::entity::{SwapCard, Token};
    use crate::solana::jupiter::models::QuoteResponse;

    fn token(id: &str, symbol: &str, decimals: u8, usd_price: Option<f64>) -> Token {
        Token {
            id: id.to_string(),
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            icon: None,
            decimals,
            usd_price,
            token_program: String::new(),
        }
    }

    fn snapshot(wallet: Option<&str>) -> CardSnapshot {
        let card = SwapCard::new(
            Some(token("sol-mint", "SOL", 9, Some(150.0))),
            Some(token("usdc-mint", "USDC", 6, Some(1.0))),
            50,
        );
        CardSnapshot {
            card,
            wallet: wallet.map(str::to_string),
            from_balance: None,
            to_balance: None,
            taken_at: Utc::now(),
            quote_max_age: Duration::seconds(30),
        }
    }

    fn callback_data(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        use teloxide::types::InlineKeyboardButtonKind;

        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_card_asks_for_wallet() {
        let snapshot = snapshot(None);

        let text = card_text(&snapshot);
        let data = callback_data(&card_keyboard(&snapshot));

        assert!(text.contains("<b>From:</b> 0.0 SOL"));
        assert!(text.contains("Slippage tolerance: 0.5%"));
        assert!(text.contains("Wallet not connected"));
        assert!(data.contains(&"noop".to_string()));
        assert!(!data.contains(&"swap".to_string()));
    }

    #[test]
    fn pending_quote_shows_placeholder() {
        let mut snapshot = snapshot(Some("So11111111111111111111111111111111111111112"));
        snapshot.card.set_from_amount("2");

        let text = card_text(&snapshot);

        assert!(text.contains("<b>From:</b> 2 SOL"));
        assert!(text.contains("≈ $300.00"));
        assert!(text.contains("<b>To:</b> … USDC"));
        assert!(text.contains("So111...11112"));
    }

    #[test]
    fn expired_quote_offers_refresh() {
        let mut snapshot = snapshot(Some("So11111111111111111111111111111111111111112"));
        let ticket = snapshot.card.set_from_amount("1").unwrap();
        let quote: QuoteResponse = serde_json::from_value(json!({
            "inputMint": "sol-mint",
            "inAmount": "1000000000",
            "outputMint": "usdc-mint",
            "outAmount": "150000000",
            "otherAmountThreshold": "149250000",
            "slippageBps": 50
        }))
        .unwrap();
        snapshot.card.apply_quote(&ticket, Ok(quote), snapshot.taken_at);
        assert!(callback_data(&card_keyboard(&snapshot)).contains(&"swap".to_string()));

        snapshot.taken_at = snapshot.taken_at + Duration::seconds(31);

        assert_eq!(snapshot.swap_blocker(), Some(SwapBlocker::QuoteExpired));
        let data = callback_data(&card_keyboard(&snapshot));
        assert!(!data.contains(&"swap".to_string()));
        assert_eq!(data.iter().filter(|data| data.as_str() == "refresh").count(), 2);
    }

    #[test]
    fn errors_are_phrased_by_category() {
        assert!(error_text(&SwapError::Api("rate limited".into())).contains("Refresh"));
        assert!(error_text(&SwapError::ConfirmationTimeout).starts_with("❌ Swap failed"));
        assert!(error_text(&SwapError::WalletNotConnected).starts_with("🔒"));
    }
}
