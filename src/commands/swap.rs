use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{command_argument, swap_presenter, token_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{State, TokenSide};
use crate::presenter::swap_presenter::SwapPresenter;
use crate::presenter::token_presenter::TokenPresenter;

/// Put a token on one side; without an argument the selector opens instead.
async fn choose_token(
    bot: Bot,
    msg: Message,
    side: TokenSide,
    dialogue: Option<MyDialogue>,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let token_ref = command_argument(&msg);

    if token_ref.is_empty() {
        if let Some(dialogue) = dialogue {
            dialogue.update(State::AwaitingTokenSearch { side }).await?;
        }
        return token_presenter(&bot, chat_id, &services)
            .open_selector(chat_id, side)
            .await;
    }

    swap_presenter(&bot, chat_id, &services)
        .change_token(chat_id, side, &token_ref)
        .await
}

pub struct FromCommand;

impl CommandHandler for FromCommand {
    fn command_name() -> &'static str {
        "from"
    }

    fn description() -> &'static str {
        "set the token to sell (mint or symbol)"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        choose_token(bot, msg, TokenSide::From, dialogue, services).await
    }
}

pub struct ToCommand;

impl CommandHandler for ToCommand {
    fn command_name() -> &'static str {
        "to"
    }

    fn description() -> &'static str {
        "set the token to buy (mint or symbol)"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        choose_token(bot, msg, TokenSide::To, dialogue, services).await
    }
}

pub struct AmountCommand;

impl CommandHandler for AmountCommand {
    fn command_name() -> &'static str {
        "amount"
    }

    fn description() -> &'static str {
        "set the amount to sell"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        let amount = command_argument(&msg);

        swap_presenter(&bot, chat_id, &services)
            .change_amount(chat_id, &amount)
            .await
    }
}

pub struct SlippageCommand;

impl CommandHandler for SlippageCommand {
    fn command_name() -> &'static str {
        "slippage"
    }

    fn description() -> &'static str {
        "set slippage, e.g. 0.5% or 50 (bps)"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        let input = command_argument(&msg);

        if input.is_empty() {
            return prompt_slippage(&bot, chat_id, dialogue).await;
        }

        swap_presenter(&bot, chat_id, &services)
            .change_slippage(chat_id, &input)
            .await
    }
}

pub async fn prompt_slippage(bot: &Bot, chat_id: ChatId, dialogue: Option<MyDialogue>) -> Result<()> {
    if let Some(dialogue) = dialogue {
        dialogue.update(State::AwaitingSlippage).await?;
    }

    bot.send_message(
        chat_id,
        "Send the slippage tolerance as a percentage (0.5%) or in basis points (50).",
    )
    .await?;

    Ok(())
}

pub struct FlipCommand;

impl CommandHandler for FlipCommand {
    fn command_name() -> &'static str {
        "flip"
    }

    fn description() -> &'static str {
        "swap the from and to tokens"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;

        swap_presenter(&bot, chat_id, &services).flip(chat_id).await
    }
}

pub struct RefreshCommand;

impl CommandHandler for RefreshCommand {
    fn command_name() -> &'static str {
        "refresh"
    }

    fn description() -> &'static str {
        "fetch a fresh quote"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;

        swap_presenter(&bot, chat_id, &services)
            .refresh(chat_id)
            .await
    }
}

pub struct SwapCommand;

impl CommandHandler for SwapCommand {
    fn command_name() -> &'static str {
        "swap"
    }

    fn description() -> &'static str {
        "execute the swap on the card"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Swap command received from Telegram ID: {}", telegram_id);

        swap_presenter(&bot, chat_id, &services).swap(chat_id).await
    }
}
