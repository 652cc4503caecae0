use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use super::{command_argument, swap_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::balance_interactor::BalanceInteractorImpl;
use crate::interactor::wallet_interactor::WalletInteractorImpl;
use crate::presenter::swap_presenter::SwapPresenter;
use crate::presenter::wallet_presenter::{WalletPresenter, WalletPresenterImpl};
use crate::view::wallet_view::TelegramWalletView;

fn wallet_presenter(
    bot: &Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> WalletPresenterImpl<WalletInteractorImpl, BalanceInteractorImpl, TelegramWalletView> {
    let interactor = Arc::new(WalletInteractorImpl::new(services.sessions()));
    let balances = Arc::new(BalanceInteractorImpl::new(
        services.sessions(),
        services.rpc(),
    ));
    let view = Arc::new(TelegramWalletView::new(bot.clone(), chat_id));

    WalletPresenterImpl::new(interactor, balances, view)
}

pub struct ConnectCommand;

impl CommandHandler for ConnectCommand {
    fn command_name() -> &'static str {
        "connect"
    }

    fn description() -> &'static str {
        "connect a wallet with a base58 secret key"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        let secret = command_argument(&msg);
        info!("Connect command received from Telegram ID: {}", telegram_id);

        // The message carries a secret key
        if !secret.is_empty() {
            if let Err(e) = bot.delete_message(chat_id, msg.id).await {
                warn!("Could not delete the connect message in chat {}: {}", chat_id, e);
            }
        }

        let connected = wallet_presenter(&bot, chat_id, &services)
            .connect(chat_id, Some(secret.as_str()))
            .await?;

        if connected {
            swap_presenter(&bot, chat_id, &services)
                .show_card(chat_id, false)
                .await?;
        }

        Ok(())
    }
}

pub struct DisconnectCommand;

impl CommandHandler for DisconnectCommand {
    fn command_name() -> &'static str {
        "disconnect"
    }

    fn description() -> &'static str {
        "forget the connected wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Disconnect command received from Telegram ID: {}", telegram_id);

        wallet_presenter(&bot, chat_id, &services)
            .disconnect(chat_id)
            .await?;

        swap_presenter(&bot, chat_id, &services)
            .show_card(chat_id, false)
            .await
    }
}
