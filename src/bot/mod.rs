pub mod commands;
pub mod constants;
pub mod keyboards;
mod callbacks;
mod handlers;
mod utils;

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::render::Compositor;
use crate::session::SessionStore;

pub struct BotState {
    pub sessions: SessionStore,
    pub compositor: Compositor,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = Update::filter_message()
        .filter_command::<commands::Command>()
        .endpoint(handlers::handle_command_dispatch);

    let callback_handler = Update::filter_callback_query()
        .endpoint(callbacks::handle_callback);

    // Logo uploads arrive as photo messages
    let photo_handler = Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some())
        .endpoint(handlers::handle_photo_message);

    // Plain text drives the payload and label prompts
    let message_handler = Update::filter_message()
        .filter(|msg: Message| msg.text().is_some() && !msg.text().unwrap().starts_with('/'))
        .endpoint(handlers::handle_text_message);

    dptree::entry()
        .branch(command_handler)
        .branch(callback_handler)
        .branch(photo_handler)
        .branch(message_handler)
}

pub async fn run_bot(config: Arc<Config>, compositor: Compositor) {
    tracing::info!("Starting Telegram bot...");

    let bot = Bot::new(config.telegram_bot_token.clone());

    // Set bot commands for slash menu
    if let Err(e) = bot.set_my_commands(commands::Command::bot_commands()).await {
        tracing::warn!("Failed to set bot commands: {}", e);
    } else {
        tracing::info!("Bot commands registered successfully");
    }

    let state = Arc::new(BotState {
        sessions: SessionStore::new(),
        compositor,
        config,
        http: reqwest::Client::new(),
    });

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
