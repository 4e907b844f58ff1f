use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Association between a chat and a group number. At most one group per
/// chat; re-binding replaces the previous row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Binding {
    pub chat_id: i64,
    pub group_number: String,
    pub created_at: String,
}

impl Binding {
    /// Absence of a binding is a normal outcome, not an error.
    pub async fn find_by_chat_id(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Binding>(
            "SELECT chat_id, group_number, created_at FROM bindings WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts or overwrites the binding for `chat_id`.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
        group_number: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO bindings (chat_id, group_number, created_at) VALUES (?, ?, ?)
             ON CONFLICT(chat_id) DO UPDATE SET group_number = excluded.group_number",
        )
        .bind(chat_id)
        .bind(group_number)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Deletes any binding for `chat_id`. Removing a non-existent binding
    /// is not an error.
    pub async fn remove(pool: &sqlx::SqlitePool, chat_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM bindings WHERE chat_id = ?")
            .bind(chat_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Snapshot of all bindings, consumed once per broadcast tick.
    pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Binding>("SELECT chat_id, group_number, created_at FROM bindings")
            .fetch_all(pool)
            .await
    }
}
