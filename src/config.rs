use std::env;
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub updates_channel_url: Option<String>,
    pub label_font_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| AppError::Config("TELEGRAM_BOT_TOKEN must be set".to_string()))?;

        if telegram_bot_token.trim().is_empty() {
            return Err(AppError::Config("TELEGRAM_BOT_TOKEN cannot be empty".to_string()));
        }

        let updates_channel_url = env::var("UPDATES_CHANNEL_URL").ok().filter(|s| !s.is_empty());

        let label_font_path = env::var("LABEL_FONT_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Config {
            telegram_bot_token,
            updates_channel_url,
            label_font_path,
        })
    }

    /// Telegram file-download URL for a path returned by getFile.
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.telegram_bot_token, file_path
        )
    }
}
