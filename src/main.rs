use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};

use miacbot::cli::{Cli, Commands};
use miacbot::core::{config, init_logger};
use miacbot::storage::{create_pool, SqliteUserStore};
use miacbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use miacbot::RegistrationController;

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // Set up global panic handler so dispatcher panics are logged
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        None => run_bot(false).await,
    }
}

/// Initializes storage and the dispatcher and runs until shutdown.
async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");

    let bot = create_bot()?;

    // Database pool; the schema is created on first connection
    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    let store = Arc::new(SqliteUserStore::new(Arc::clone(&db_pool)));
    let controller = Arc::new(RegistrationController::new(store));

    setup_bot_commands(&bot).await?;

    let handler = schema(HandlerDeps::new(controller));

    let webhook_url = if use_webhook { config::WEBHOOK_URL.clone() } else { None };

    if let Some(url) = webhook_url {
        log::info!("Starting bot in webhook mode at {}", url);

        let addr = ([0, 0, 0, 0], *config::WEBHOOK_PORT).into();
        let url = url::Url::parse(&url)?;
        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url)).await?;

        Dispatcher::builder(bot, handler)
            .dependencies(DependencyMap::new())
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        log::info!("Starting bot in long polling mode");

        // Polling listener that drops updates accumulated while offline
        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

        Dispatcher::builder(bot, handler)
            .dependencies(DependencyMap::new())
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
