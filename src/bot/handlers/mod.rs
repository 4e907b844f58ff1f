pub mod message;

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::database::connection::DatabaseManager;
use crate::schedule::fetcher::CalendarFetcher;

/// Wires the inbound message stream to the intent router. One invocation
/// per incoming message; handlers share nothing mutable across messages.
pub struct BotHandler {
    pub db: DatabaseManager,
    pub fetcher: Arc<CalendarFetcher>,
    pub admin_chat_id: i64,
}

impl BotHandler {
    pub fn new(db: DatabaseManager, fetcher: Arc<CalendarFetcher>, admin_chat_id: i64) -> Self {
        Self {
            db,
            fetcher,
            admin_chat_id,
        }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let db = self.db.clone();
        let fetcher = self.fetcher.clone();
        let admin_chat_id = self.admin_chat_id;

        Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let db = db.clone();
            let fetcher = fetcher.clone();
            async move {
                message::handle_message(bot, msg, db, fetcher, admin_chat_id)
                    .await
                    .map_err(Into::into)
            }
        })
    }
}
