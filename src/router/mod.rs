use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*,
};

use crate::commands::{
    balance, callback::handle_callback, help, start, swap, text, tokens, wallet,
    BotCommands, CommandHandler, MyDialogue,
};
use crate::di::ServiceContainer;
use crate::entity::{State, TokenSide};

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Command router implementation
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

async fn dispatch_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommands,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> anyhow::Result<()> {
    let telegram_id = msg.from.as_ref().map_or(0, |user| user.id.0 as i64);
    let dialogue = Some(dialogue);

    match cmd {
        BotCommands::Start => {
            start::StartCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Help => {
            help::HelpCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Connect(_) => {
            wallet::ConnectCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Disconnect => {
            wallet::DisconnectCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::From(_) => {
            swap::FromCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::To(_) => {
            swap::ToCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Amount(_) => {
            swap::AmountCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Slippage(_) => {
            swap::SlippageCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Flip => {
            swap::FlipCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Refresh => {
            swap::RefreshCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Swap => {
            swap::SwapCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Tokens => {
            tokens::TokensCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Search(_) => {
            tokens::SearchCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
        BotCommands::Balance => {
            balance::BalanceCommand::execute(bot, msg, telegram_id, dialogue, services).await
        }
    }
}

#[async_trait]
impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;

        let services_for_commands = self.services.clone();
        let services_for_callbacks = self.services.clone();

        // Use BotCommands enum with teloxide's command filter
        let command_handler = teloxide::filter_command::<BotCommands, _>().endpoint(
            move |bot: Bot, msg: Message, cmd: BotCommands, dialogue: MyDialogue| {
                let services = services_for_commands.clone();
                async move { dispatch_command(bot, msg, cmd, dialogue, services).await }
            },
        );

        let services_for_dialog1 = self.services.clone();
        let services_for_dialog2 = self.services.clone();
        let services_for_dialog3 = self.services.clone();

        let message_handler = Update::filter_message()
            .branch(command_handler)
            .branch(
                dptree::entry()
                    .branch(case![State::Start].endpoint(move |bot: Bot, msg: Message| {
                        let services = services_for_dialog1.clone();
                        async move { text::receive_amount(bot, msg, services).await }
                    }))
                    .branch(case![State::AwaitingTokenSearch { side }].endpoint(
                        move |bot: Bot, msg: Message, side: TokenSide| {
                            let services = services_for_dialog2.clone();
                            async move { text::receive_token_search(bot, msg, side, services).await }
                        },
                    ))
                    .branch(case![State::AwaitingSlippage].endpoint(
                        move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                            let services = services_for_dialog3.clone();
                            async move { text::receive_slippage(bot, msg, dialogue, services).await }
                        },
                    )),
            );

        // Add callback query handler for our buttons
        let callback_handler = Update::filter_callback_query().endpoint(
            move |bot: Bot, q: CallbackQuery, dialogue: MyDialogue| {
                let services = services_for_callbacks.clone();
                async move { handle_callback(bot, q, dialogue, services).await }
            },
        );

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}
