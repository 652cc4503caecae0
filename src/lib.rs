pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod router;
pub mod services;
pub mod solana;
pub mod utils;
pub mod view;

use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use teloxide::{dispatching::dialogue::InMemStorage, Bot};

// Re-export commonly used items
pub use commands::{BotCommands, MyDialogue};
pub use config::AppConfig;
pub use di::ServiceContainer;
pub use entity::*;
pub use router::{Router, TelegramRouter};
pub use solana::create_solana_client;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire the services, router and dialogue storage for one bot.
pub fn create_application(
    bot: Bot,
    config: AppConfig,
    solana_client: Arc<RpcClient>,
) -> anyhow::Result<(TelegramRouter, Bot, Arc<ServiceContainer>, Arc<InMemStorage<State>>)> {
    let services = Arc::new(ServiceContainer::new(config, solana_client)?);
    let router = TelegramRouter::new(services.clone());
    let storage = InMemStorage::<State>::new();

    Ok((router, bot, services, storage))
}
