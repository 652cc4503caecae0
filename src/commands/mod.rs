use anyhow::Result;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};

use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::balance_interactor::BalanceInteractorImpl;
use crate::interactor::swap_interactor::SwapInteractorImpl;
use crate::interactor::token_interactor::TokenInteractorImpl;
use crate::presenter::swap_presenter::SwapPresenterImpl;
use crate::presenter::token_presenter::TokenPresenterImpl;
use crate::view::swap_view::TelegramSwapView;
use crate::view::token_view::TelegramTokenView;
use teloxide::dispatching::dialogue::Dialogue;

pub mod balance;
pub mod callback;
pub mod help;
pub mod start;
pub mod swap;
pub mod text;
pub mod tokens;
pub mod wallet;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for help
    fn description() -> &'static str;

    /// Execute the command
    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Register all command handlers in the command system
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            start::StartCommand::command_name(),
            start::StartCommand::description(),
        ),
        (
            wallet::ConnectCommand::command_name(),
            wallet::ConnectCommand::description(),
        ),
        (
            wallet::DisconnectCommand::command_name(),
            wallet::DisconnectCommand::description(),
        ),
        (
            swap::FromCommand::command_name(),
            swap::FromCommand::description(),
        ),
        (
            swap::ToCommand::command_name(),
            swap::ToCommand::description(),
        ),
        (
            swap::AmountCommand::command_name(),
            swap::AmountCommand::description(),
        ),
        (
            swap::SlippageCommand::command_name(),
            swap::SlippageCommand::description(),
        ),
        (
            swap::FlipCommand::command_name(),
            swap::FlipCommand::description(),
        ),
        (
            swap::RefreshCommand::command_name(),
            swap::RefreshCommand::description(),
        ),
        (
            swap::SwapCommand::command_name(),
            swap::SwapCommand::description(),
        ),
        (
            tokens::TokensCommand::command_name(),
            tokens::TokensCommand::description(),
        ),
        (
            tokens::SearchCommand::command_name(),
            tokens::SearchCommand::description(),
        ),
        (
            balance::BalanceCommand::command_name(),
            balance::BalanceCommand::description(),
        ),
        (
            help::HelpCommand::command_name(),
            help::HelpCommand::description(),
        ),
    ]
}

/// Bot Commands enum for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "open a fresh swap card")]
    Start,
    #[command(description = "display this help message")]
    Help,
    #[command(description = "connect a wallet with a base58 secret key")]
    Connect(String),
    #[command(description = "forget the connected wallet")]
    Disconnect,
    #[command(description = "set the token to sell (mint or symbol)")]
    From(String),
    #[command(description = "set the token to buy (mint or symbol)")]
    To(String),
    #[command(description = "set the amount to sell")]
    Amount(String),
    #[command(description = "set slippage, e.g. 0.5% or 50 (bps)")]
    Slippage(String),
    #[command(description = "swap the from and to tokens")]
    Flip,
    #[command(description = "fetch a fresh quote")]
    Refresh,
    #[command(description = "execute the swap on the card")]
    Swap,
    #[command(description = "list tradable tokens")]
    Tokens,
    #[command(description = "search tokens by name, symbol or mint")]
    Search(String),
    #[command(description = "show balances of the card tokens")]
    Balance,
}

/// Text after the command word, trimmed.
pub fn command_argument(msg: &Message) -> String {
    msg.text()
        .and_then(|text| text.split_once(char::is_whitespace))
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

pub(crate) type ChatSwapPresenter =
    SwapPresenterImpl<SwapInteractorImpl, BalanceInteractorImpl, TelegramSwapView>;

pub(crate) fn swap_presenter(
    bot: &Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> ChatSwapPresenter {
    let interactor = Arc::new(SwapInteractorImpl::new(
        services.sessions(),
        services.token_repository(),
        services.quote_service(),
        services.swap_service(),
    ));
    let balances = Arc::new(BalanceInteractorImpl::new(
        services.sessions(),
        services.rpc(),
    ));
    let view = Arc::new(TelegramSwapView::new(bot.clone(), chat_id));

    SwapPresenterImpl::new(interactor, balances, view, services.debouncer())
}

pub(crate) fn token_presenter(
    bot: &Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> TokenPresenterImpl<TokenInteractorImpl, TelegramTokenView> {
    let interactor = Arc::new(TokenInteractorImpl::new(
        services.sessions(),
        services.token_repository(),
    ));
    let view = Arc::new(TelegramTokenView::new(bot.clone(), chat_id));

    TokenPresenterImpl::new(interactor, view)
}
