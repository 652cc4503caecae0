use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use super::{swap::prompt_slippage, swap_presenter, token_presenter, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{State, TokenSide};
use crate::presenter::swap_presenter::SwapPresenter;
use crate::presenter::token_presenter::TokenPresenter;

/// A button press on the card or on a token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Flip,
    Refresh,
    Swap,
    Slippage,
    /// A disabled button; the payload is ignored.
    Noop,
    Pick(TokenSide),
    Select(TokenSide, String),
    Cancel,
}

fn parse_side(side: &str) -> Option<TokenSide> {
    match side {
        "from" => Some(TokenSide::From),
        "to" => Some(TokenSide::To),
        _ => None,
    }
}

pub fn parse_callback(data: &str) -> Option<CallbackAction> {
    match data {
        "flip" => return Some(CallbackAction::Flip),
        "refresh" => return Some(CallbackAction::Refresh),
        "swap" => return Some(CallbackAction::Swap),
        "slippage" => return Some(CallbackAction::Slippage),
        "noop" => return Some(CallbackAction::Noop),
        "cancel" => return Some(CallbackAction::Cancel),
        _ => {}
    }

    if let Some(side) = data.strip_prefix("pick:") {
        return parse_side(side).map(CallbackAction::Pick);
    }

    let mut parts = data.strip_prefix("select:")?.splitn(2, ':');
    let side = parse_side(parts.next()?)?;
    let mint = parts.next().filter(|mint| !mint.is_empty())?;

    Some(CallbackAction::Select(side, mint.to_string()))
}

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    // Extract the callback data
    let callback_data = match q.data.clone() {
        Some(data) => data,
        None => return Ok(()),
    };

    // Get the chat ID
    let chat_id = match q.message {
        Some(ref msg) => msg.chat().id,
        None => return Ok(()),
    };

    let telegram_id = q.from.id.0 as i64;
    info!(
        "Received callback: {} from user {}",
        callback_data, telegram_id
    );

    let action = parse_callback(&callback_data);

    // Disabled buttons answer with their reason
    let answer = match &action {
        Some(CallbackAction::Noop) => {
            let snapshot = services.sessions().snapshot(chat_id);
            snapshot
                .swap_blocker()
                .map(|blocker| blocker.label().to_string())
        }
        _ => None,
    };
    let mut request = bot.answer_callback_query(q.id.clone());
    if let Some(text) = answer {
        request = request.text(text);
    }
    if let Err(err) = request.await {
        info!("Failed to answer callback query: {}", err);
    }

    let action = match action {
        Some(action) => action,
        None => {
            warn!("Unknown callback data: {}", callback_data);
            return Ok(());
        }
    };

    match action {
        CallbackAction::Flip => swap_presenter(&bot, chat_id, &services).flip(chat_id).await?,
        CallbackAction::Refresh => {
            swap_presenter(&bot, chat_id, &services)
                .refresh(chat_id)
                .await?
        }
        CallbackAction::Swap => swap_presenter(&bot, chat_id, &services).swap(chat_id).await?,
        CallbackAction::Slippage => prompt_slippage(&bot, chat_id, Some(dialogue)).await?,
        CallbackAction::Noop => {}
        CallbackAction::Pick(side) => {
            dialogue.update(State::AwaitingTokenSearch { side }).await?;
            token_presenter(&bot, chat_id, &services)
                .open_selector(chat_id, side)
                .await?;
        }
        CallbackAction::Select(side, mint) => {
            dialogue.update(State::Start).await?;
            swap_presenter(&bot, chat_id, &services)
                .change_token(chat_id, side, &mint)
                .await?;
        }
        CallbackAction::Cancel => {
            dialogue.update(State::Start).await?;
            token_presenter(&bot, chat_id, &services).close_selector(chat_id);
            swap_presenter(&bot, chat_id, &services)
                .show_card(chat_id, false)
                .await?;
        }
    }

    Ok(())
}
