use anyhow::Result;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{swap_presenter, token_presenter, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{State, TokenSide};
use crate::presenter::swap_presenter::SwapPresenter;
use crate::presenter::token_presenter::TokenPresenter;
use crate::utils::parse_slippage;

/// Whether plain text reads as an amount edit.
pub fn looks_like_amount(text: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\d*(?:[.,]\d*)?$").unwrap();
    }

    let text = text.trim();
    text.chars().any(|c| c.is_ascii_digit()) && RE.is_match(text)
}

// Plain text outside of any prompt
pub async fn receive_amount(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or("").trim().replace(',', ".");

    if !looks_like_amount(&text) {
        debug!("Ignoring text from chat {}: {}", chat_id, text);
        bot.send_message(
            chat_id,
            "Send a number to set the amount to sell, or /help for the command list.",
        )
        .await?;
        return Ok(());
    }

    swap_presenter(&bot, chat_id, &services)
        .change_amount(chat_id, &text)
        .await
}

// Text while the token selector is open
pub async fn receive_token_search(
    bot: Bot,
    msg: Message,
    side: TokenSide,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let term = msg.text().unwrap_or("");

    token_presenter(&bot, chat_id, &services)
        .search_in_selector(chat_id, side, term)
        .await
}

// Text after the slippage prompt
pub async fn receive_slippage(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let input = msg.text().unwrap_or("");

    // Invalid input keeps the prompt open
    if parse_slippage(input).is_some() {
        dialogue.update(State::Start).await?;
    }

    swap_presenter(&bot, chat_id, &services)
        .change_slippage(chat_id, input)
        .await
}
