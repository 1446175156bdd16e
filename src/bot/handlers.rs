use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{FileId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

use super::constants::messages as msg;
use super::{commands::Command, keyboards, utils, BotState};
use crate::error::AppError;
use crate::session::{ConfigState, QrSettings, Session};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

// Handler for dispatcher-based command handling
pub async fn handle_command_dispatch(
    bot: Bot,
    message: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> HandlerResult {
    match cmd {
        Command::Start => handle_start(bot, message, state).await,
        Command::Qr => handle_qr(bot, message, state).await,
        Command::Help => handle_help(bot, message).await,
    }
}

async fn handle_start(bot: Bot, message: Message, state: Arc<BotState>) -> HandlerResult {
    let user_id = message.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
    tracing::info!("User {} started bot", user_id);

    let mut request = bot
        .send_message(message.chat.id, msg::WELCOME)
        .parse_mode(ParseMode::Html);

    if let Some(url) = &state.config.updates_channel_url {
        if let Ok(parsed) = reqwest::Url::parse(url) {
            request = request.reply_markup(InlineKeyboardMarkup::new(vec![vec![
                InlineKeyboardButton::url("📢 Updates Channel", parsed),
            ]]));
        }
    }

    request.await?;
    Ok(())
}

async fn handle_qr(bot: Bot, message: Message, state: Arc<BotState>) -> HandlerResult {
    let user_id = match message.from.as_ref() {
        Some(u) => u.id.0 as i64,
        None => return Ok(()),
    };
    tracing::info!("User {} started /qr", user_id);

    // Overwrites any flow already in progress for this user.
    state.sessions.begin(user_id).await;

    bot.send_message(message.chat.id, msg::INITIAL_PROMPT)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::cancel_only())
        .await?;
    Ok(())
}

async fn handle_help(bot: Bot, message: Message) -> HandlerResult {
    bot.send_message(message.chat.id, msg::HELP)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Plain text drives two states: the initial payload prompt and the label
/// prompt. Anything else is ignored.
pub async fn handle_text_message(bot: Bot, message: Message, state: Arc<BotState>) -> HandlerResult {
    let user_id = match message.from.as_ref() {
        Some(u) => u.id.0 as i64,
        None => return Ok(()),
    };
    let chat_id = message.chat.id;
    let text = message.text().unwrap_or("").trim().to_string();

    enum Outcome {
        SettingsCreated((String, InlineKeyboardMarkup)),
        LabelAdded((String, InlineKeyboardMarkup)),
        Rejected(String),
        Ignored,
    }

    let outcome = state
        .sessions
        .update(user_id, |session| match session {
            Session::AwaitingText => match QrSettings::new(text.clone()) {
                Ok(settings) => {
                    let view = utils::settings_view(&settings);
                    *session = Session::active(settings);
                    Outcome::SettingsCreated(view)
                }
                Err(AppError::Validation(reason)) => Outcome::Rejected(reason),
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Session::Active { state: flow, settings } if *flow == ConfigState::AwaitingLabel => {
                match settings.set_label(text.clone()) {
                    Ok(()) => {
                        *flow = ConfigState::Settings;
                        Outcome::LabelAdded(utils::settings_view(settings))
                    }
                    Err(AppError::Validation(reason)) => Outcome::Rejected(reason),
                    Err(e) => Outcome::Rejected(e.to_string()),
                }
            }
            _ => Outcome::Ignored,
        })
        .await
        .unwrap_or(Outcome::Ignored);

    match outcome {
        Outcome::SettingsCreated((view_text, keyboard)) => {
            tracing::info!("Data received from user {}", user_id);
            bot.send_message(chat_id, view_text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
            let _ = bot.delete_message(chat_id, message.id).await;
        }
        Outcome::LabelAdded((view_text, keyboard)) => {
            tracing::info!("Label set by user {}", user_id);
            let view_text = format!("<b>✅ Label added!</b>\n\n{}", view_text);
            bot.send_message(chat_id, view_text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
            let _ = bot.delete_message(chat_id, message.id).await;
        }
        Outcome::Rejected(reason) => {
            tracing::warn!("Rejected input from user {}: {}", user_id, reason);
            bot.send_message(chat_id, format!("<b>❌ {}.</b>", reason))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Outcome::Ignored => {}
    }

    Ok(())
}

/// Photos are only meaningful while a logo upload is awaited.
pub async fn handle_photo_message(bot: Bot, message: Message, state: Arc<BotState>) -> HandlerResult {
    let user_id = match message.from.as_ref() {
        Some(u) => u.id.0 as i64,
        None => return Ok(()),
    };
    let chat_id = message.chat.id;

    let awaiting = state
        .sessions
        .peek(user_id, |s| {
            matches!(s, Session::Active { state: ConfigState::AwaitingLogoPhoto, .. })
        })
        .await
        .unwrap_or(false);
    if !awaiting {
        return Ok(());
    }

    let photo = match message.photo().and_then(|sizes| sizes.last()) {
        Some(p) => p,
        None => return Ok(()),
    };

    match download_logo(&bot, &photo.file.id, &state).await {
        Ok(logo) => {
            let view = state
                .sessions
                .update(user_id, |session| match session {
                    Session::Active { state: flow, settings }
                        if *flow == ConfigState::AwaitingLogoPhoto =>
                    {
                        settings.attach_logo(logo);
                        *flow = ConfigState::Settings;
                        let shape = settings
                            .logo_shape
                            .map(|s| s.display_name())
                            .unwrap_or_default();
                        Some((shape, utils::settings_view(settings)))
                    }
                    _ => None,
                })
                .await
                .flatten();

            if let Some((shape, (view_text, keyboard))) = view {
                tracing::info!("Logo received from user {}", user_id);
                let view_text = format!(
                    "<b>✅ Logo uploaded!</b>\n<b>Shape:</b> <code>{}</code>\n\n{}",
                    shape, view_text
                );
                bot.send_message(chat_id, view_text)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(keyboard)
                    .await?;
                let _ = bot.delete_message(chat_id, message.id).await;
            }
        }
        Err(e) => {
            tracing::warn!("Logo upload failed for user {}: {}", user_id, e);
            let view = state
                .sessions
                .update(user_id, |session| match session {
                    Session::Active { state: flow, settings }
                        if *flow == ConfigState::AwaitingLogoPhoto =>
                    {
                        settings.clear_logo();
                        *flow = ConfigState::Settings;
                        Some(utils::settings_view(settings))
                    }
                    _ => None,
                })
                .await
                .flatten();

            if let Some((view_text, keyboard)) = view {
                let view_text = format!("{}\n\n{}", msg::INVALID_LOGO, view_text);
                bot.send_message(chat_id, view_text)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(keyboard)
                    .await?;
            }
        }
    }

    Ok(())
}

async fn download_logo(
    bot: &Bot,
    file_id: &FileId,
    state: &Arc<BotState>,
) -> crate::error::Result<image::DynamicImage> {
    let file = bot
        .get_file(file_id.clone())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let url = state.config.file_url(&file.path);
    let bytes = state.http.get(url).send().await?.bytes().await?;
    tracing::debug!("Logo downloaded: {} bytes", bytes.len());

    image::load_from_memory(&bytes).map_err(|_| AppError::InvalidLogoImage)
}
