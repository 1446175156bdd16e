use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode};

use super::constants::messages as msg;
use super::{keyboards, utils, BotState};
use crate::enums::{EcClass, LogoShape, SizeClass, StyleClass};
use crate::error::AppError;
use crate::session::{ConfigState, Selection, Session};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> HandlerResult {
    let data = match q.data {
        Some(ref d) => d.clone(),
        None => return Ok(()),
    };

    let (chat_id, message_id) = match q.message {
        Some(ref m) => (m.chat().id, m.id()),
        None => return Ok(()),
    };

    let user_id = q.from.id.0 as i64;
    tracing::debug!("Callback from user {}: {}", user_id, data);

    match data.as_str() {
        "cancel" => on_cancel(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "change_style" => on_change_style(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "back_settings" => on_back_to_settings(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "add_logo" => on_add_logo(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "choose_logo_shape" => {
            on_choose_logo_shape(&bot, &q, chat_id, message_id, user_id, &state).await?
        }
        "skip_logo" => on_skip_logo(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "add_label" => on_add_label(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "skip_label" => on_skip_label(&bot, &q, chat_id, message_id, user_id, &state).await?,
        "generate" => on_generate(&bot, &q, chat_id, message_id, user_id, &state).await?,
        other => {
            if let Some(token) = other.strip_prefix("size_") {
                on_size_selected(&bot, &q, chat_id, message_id, user_id, token, &state).await?;
            } else if let Some(token) = other.strip_prefix("error_") {
                on_error_selected(&bot, &q, chat_id, message_id, user_id, token, &state).await?;
            } else if let Some(token) = other.strip_prefix("style_") {
                on_style_selected(&bot, &q, chat_id, message_id, user_id, token, &state).await?;
            } else if let Some(token) = other.strip_prefix("logo_") {
                on_logo_shape_selected(&bot, &q, chat_id, message_id, user_id, token, &state).await?;
            } else {
                tracing::warn!("Unknown callback data: {}", other);
                answer(&bot, &q).await?;
            }
        }
    }

    Ok(())
}

// ─── Answer helpers ─────────────────────────────────────────────────

async fn answer(bot: &Bot, q: &CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

async fn answer_toast(bot: &Bot, q: &CallbackQuery, text: &str) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).text(text).await?;
    Ok(())
}

async fn answer_alert(bot: &Bot, q: &CallbackQuery, text: &str) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).text(text).show_alert(true).await?;
    Ok(())
}

async fn edit_html(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: String,
    keyboard: teloxide::types::InlineKeyboardMarkup,
) -> HandlerResult {
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

// ─── Selections ─────────────────────────────────────────────────────

async fn on_size_selected(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    token: &str,
    state: &Arc<BotState>,
) -> HandlerResult {
    let size: SizeClass = match token.parse() {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!("Invalid size token: {}", token);
            return answer(bot, q).await;
        }
    };

    let outcome = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings } if *flow == ConfigState::Settings => {
                let selection = settings.select_size(size);
                Ok((selection, utils::settings_view(settings)))
            }
            _ => Err(AppError::SessionExpired),
        })
        .await
        .unwrap_or(Err(AppError::SessionExpired));

    match outcome {
        Err(_) => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
        Ok((Selection::AlreadySet, _)) => {
            answer_alert(
                bot,
                q,
                &format!("You Already Chosen {} As Size 🙄", size.display_name()),
            )
            .await
        }
        Ok((Selection::Updated, (text, keyboard))) => {
            edit_html(bot, chat_id, message_id, text, keyboard).await?;
            answer_toast(
                bot,
                q,
                &format!("QR Code Size Updated To {} Size", size.display_name()),
            )
            .await
        }
    }
}

async fn on_error_selected(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    token: &str,
    state: &Arc<BotState>,
) -> HandlerResult {
    let ec: EcClass = match token.parse() {
        Ok(e) => e,
        Err(_) => {
            tracing::warn!("Invalid error correction token: {}", token);
            return answer(bot, q).await;
        }
    };

    let outcome = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings } if *flow == ConfigState::Settings => {
                let selection = settings.select_error_correction(ec);
                Ok((selection, utils::settings_view(settings)))
            }
            _ => Err(AppError::SessionExpired),
        })
        .await
        .unwrap_or(Err(AppError::SessionExpired));

    match outcome {
        Err(_) => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
        Ok((Selection::AlreadySet, _)) => {
            answer_alert(
                bot,
                q,
                &format!(
                    "You Already Chosen {} As Error Correction 🙄",
                    ec.display_name()
                ),
            )
            .await
        }
        Ok((Selection::Updated, (text, keyboard))) => {
            edit_html(bot, chat_id, message_id, text, keyboard).await?;
            answer_toast(
                bot,
                q,
                &format!("Error Correction Updated To {} Percent", ec.percent()),
            )
            .await
        }
    }
}

// ─── Style flow ─────────────────────────────────────────────────────

async fn on_change_style(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    let keyboard = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings } if *flow == ConfigState::Settings => {
                *flow = ConfigState::ChoosingStyle;
                Some(keyboards::styles(settings))
            }
            _ => None,
        })
        .await
        .flatten();

    match keyboard {
        Some(keyboard) => {
            edit_html(bot, chat_id, message_id, msg::STYLE_PROMPT.to_string(), keyboard).await?;
            answer(bot, q).await
        }
        None => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
    }
}

async fn on_style_selected(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    token: &str,
    state: &Arc<BotState>,
) -> HandlerResult {
    let style: StyleClass = match token.parse() {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!("Invalid style token: {}", token);
            return answer(bot, q).await;
        }
    };

    let view = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings } if *flow == ConfigState::ChoosingStyle => {
                settings.set_style(style);
                *flow = ConfigState::Settings;
                Some(utils::settings_view(settings))
            }
            _ => None,
        })
        .await
        .flatten();

    match view {
        Some((text, keyboard)) => {
            edit_html(bot, chat_id, message_id, text, keyboard).await?;
            answer(bot, q).await
        }
        None => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
    }
}

async fn on_back_to_settings(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    // Offered from both the style screen and the logo-shape screen; never
    // mutates the record, so any active sub-screen may return.
    let view = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings } => {
                *flow = ConfigState::Settings;
                Some(utils::settings_view(settings))
            }
            _ => None,
        })
        .await
        .flatten();

    match view {
        Some((text, keyboard)) => {
            edit_html(bot, chat_id, message_id, text, keyboard).await?;
            answer(bot, q).await
        }
        None => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
    }
}

// ─── Logo flow ──────────────────────────────────────────────────────

async fn on_add_logo(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    let moved = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, .. } if *flow == ConfigState::Settings => {
                *flow = ConfigState::LogoMenu;
                true
            }
            _ => false,
        })
        .await
        .unwrap_or(false);

    if moved {
        edit_html(
            bot,
            chat_id,
            message_id,
            msg::LOGO_UPLOAD_PROMPT.to_string(),
            keyboards::logo_menu(),
        )
        .await?;
        answer(bot, q).await
    } else {
        answer_alert(bot, q, msg::SESSION_EXPIRED).await
    }
}

async fn on_choose_logo_shape(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    let moved = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, .. } if *flow == ConfigState::LogoMenu => {
                *flow = ConfigState::ChoosingLogoShape;
                true
            }
            _ => false,
        })
        .await
        .unwrap_or(false);

    if moved {
        edit_html(
            bot,
            chat_id,
            message_id,
            msg::LOGO_SHAPE_PROMPT.to_string(),
            keyboards::logo_shapes(),
        )
        .await?;
        answer(bot, q).await
    } else {
        answer_alert(bot, q, msg::SESSION_EXPIRED).await
    }
}

async fn on_logo_shape_selected(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    token: &str,
    state: &Arc<BotState>,
) -> HandlerResult {
    let shape: LogoShape = match token.parse() {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!("Invalid logo shape token: {}", token);
            return answer(bot, q).await;
        }
    };

    let moved = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings }
                if *flow == ConfigState::ChoosingLogoShape =>
            {
                settings.set_logo_shape(shape);
                *flow = ConfigState::AwaitingLogoPhoto;
                true
            }
            _ => false,
        })
        .await
        .unwrap_or(false);

    if moved {
        let text = format!(
            "<b>🖼️ Upload Logo Image</b>\n\n\
             <b>Selected shape:</b> <code>{}</code>\n\n\
             <b>Now send me the logo image.</b>",
            shape.display_name()
        );
        edit_html(bot, chat_id, message_id, text, keyboards::logo_photo()).await?;
        answer(bot, q).await
    } else {
        answer_alert(bot, q, msg::SESSION_EXPIRED).await
    }
}

async fn on_skip_logo(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    let view = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings }
                if matches!(
                    flow,
                    ConfigState::LogoMenu
                        | ConfigState::ChoosingLogoShape
                        | ConfigState::AwaitingLogoPhoto
                ) =>
            {
                settings.clear_logo();
                *flow = ConfigState::Settings;
                Some(utils::settings_view(settings))
            }
            _ => None,
        })
        .await
        .flatten();

    match view {
        Some((text, keyboard)) => {
            edit_html(bot, chat_id, message_id, text, keyboard).await?;
            answer(bot, q).await
        }
        None => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
    }
}

// ─── Label flow ─────────────────────────────────────────────────────

async fn on_add_label(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    let moved = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, .. } if *flow == ConfigState::Settings => {
                *flow = ConfigState::AwaitingLabel;
                true
            }
            _ => false,
        })
        .await
        .unwrap_or(false);

    if moved {
        edit_html(
            bot,
            chat_id,
            message_id,
            msg::LABEL_PROMPT.to_string(),
            keyboards::label_prompt(),
        )
        .await?;
        answer(bot, q).await
    } else {
        answer_alert(bot, q, msg::SESSION_EXPIRED).await
    }
}

async fn on_skip_label(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    let view = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings }
                if *flow == ConfigState::AwaitingLabel =>
            {
                settings.clear_label();
                *flow = ConfigState::Settings;
                Some(utils::settings_view(settings))
            }
            _ => None,
        })
        .await
        .flatten();

    match view {
        Some((text, keyboard)) => {
            edit_html(bot, chat_id, message_id, text, keyboard).await?;
            answer(bot, q).await
        }
        None => answer_alert(bot, q, msg::SESSION_EXPIRED).await,
    }
}

// ─── Cancel / generate ──────────────────────────────────────────────

async fn on_cancel(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    if state.sessions.clear(user_id).await {
        bot.edit_message_text(chat_id, message_id, msg::CANCELLED)
            .parse_mode(ParseMode::Html)
            .await?;
        tracing::info!("User {} cancelled", user_id);
        answer(bot, q).await
    } else {
        answer_alert(bot, q, msg::SESSION_EXPIRED).await
    }
}

async fn on_generate(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    state: &Arc<BotState>,
) -> HandlerResult {
    // Snapshot the record; the entry itself stays in place so a failed
    // render leaves the user on the settings screen to retry.
    let snapshot = state
        .sessions
        .update(user_id, |session| match session {
            Session::Active { state: flow, settings } if *flow == ConfigState::Settings => {
                Some(settings.clone())
            }
            _ => None,
        })
        .await
        .flatten();

    let settings = match snapshot {
        Some(s) => s,
        None => return answer_alert(bot, q, msg::SESSION_EXPIRED).await,
    };

    answer(bot, q).await?;

    match state.compositor.compose(&settings) {
        Ok(bytes) => {
            let caption = utils::generated_caption(&settings);
            let _ = bot.delete_message(chat_id, message_id).await;
            bot.send_photo(chat_id, InputFile::memory(bytes).file_name("qr.png"))
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .await?;
            state.sessions.clear(user_id).await;
            tracing::info!("QR sent to user {}", user_id);
        }
        Err(AppError::PayloadTooLarge) => {
            bot.send_message(chat_id, msg::PAYLOAD_TOO_LARGE)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Err(e) => {
            tracing::error!("Composition failed for user {}: {}", user_id, e);
            bot.send_message(chat_id, msg::GENERATION_FAILED)
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}
