//! Swapana - Main executable
//!
//! Entry point for the Telegram bot that quotes and executes Solana token
//! swaps through the Jupiter aggregator from a per-chat swap card.
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use swapana::{create_solana_client, AppConfig, Router};
use teloxide::{dptree, Bot};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Swapana Telegram Bot v{}", swapana::VERSION);

    let config = AppConfig::from_env().context("Failed to read configuration")?;

    // Create Telegram bot instance
    let bot = Bot::new(config.telegram_bot_token.clone());

    // Initialize Solana client
    info!("Connecting to Solana network at {}...", config.solana_rpc_url);
    let solana_client =
        create_solana_client(&config.solana_rpc_url).context("Failed to create Solana client")?;

    info!("Initializing bot application...");
    let (router, bot, service_container, storage) =
        swapana::create_application(bot, config, solana_client)
            .context("Failed to initialize services")?;

    // Get the handler from the router
    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service_container, storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    Ok(())
}
