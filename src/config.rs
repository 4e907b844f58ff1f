use anyhow::{anyhow, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub timetable_base_url: String,
    pub cache_dir: String,
    /// Chat allowed to run /db and /upd. An allow-list entry, not a credential.
    pub admin_chat_id: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "sqlite:./data/bindings.db".to_string());

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let timetable_base_url = env::var("TIMETABLE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "https://timetable.tusur.ru".to_string());
        // Trailing slash would produce double slashes in feed URLs.
        let timetable_base_url = timetable_base_url.trim_end_matches('/').to_string();

        let cache_dir = env::var("CACHE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "./cache".to_string());

        let admin_chat_id = env::var("ADMIN_CHAT_ID")
            .map_err(|_| anyhow!("ADMIN_CHAT_ID must be set"))?
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid ADMIN_CHAT_ID"))?;

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            timetable_base_url,
            cache_dir,
            admin_chat_id,
        })
    }
}
