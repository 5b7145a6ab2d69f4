//! PostgreSQL storage adapters.
//!
//! The state record is stored whole as JSONB and replaced with a single
//! upsert, which gives last-writer-wins per user_id without torn writes.
//! Chat history lives in its own table, trimmed on every append.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::foundation::UserId;
use crate::domain::state::UserState;
use crate::ports::{ChatLog, ChatLogError, ChatRole, ChatTurn, StateStore, StateStoreError};

/// Opens a connection pool against the given database URL.
pub async fn connect(database_url: &str) -> Result<PgPool, StateStoreError> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| StateStoreError::Backend(e.to_string()))
}

/// Creates the tables this adapter needs, if they do not exist yet.
pub async fn migrate(pool: &PgPool) -> Result<(), StateStoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_state (
            user_id TEXT PRIMARY KEY,
            state JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| StateStoreError::Backend(e.to_string()))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_history (
            id BIGSERIAL PRIMARY KEY,
            user_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| StateStoreError::Backend(e.to_string()))?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS chat_history_user_id_id
        ON chat_history (user_id, id DESC)
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| StateStoreError::Backend(e.to_string()))?;

    Ok(())
}

/// Postgres-backed user state store.
#[derive(Debug, Clone)]
pub struct PostgresStateStore {
    pool: PgPool,
}

impl PostgresStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PostgresStateStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserState>, StateStoreError> {
        let row: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT state FROM user_state WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StateStoreError::Backend(e.to_string()))?;

        match row {
            Some(value) => {
                let state = serde_json::from_value(value).map_err(|e| {
                    StateStoreError::Deserialization {
                        user_id: user_id.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, state: &UserState) -> Result<(), StateStoreError> {
        let value =
            serde_json::to_value(state).map_err(|e| StateStoreError::Serialization {
                user_id: state.user_id.clone(),
                reason: e.to_string(),
            })?;

        sqlx::query(
            r#"
            INSERT INTO user_state (user_id, state, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET state = EXCLUDED.state, updated_at = NOW()
            "#,
        )
        .bind(state.user_id.as_str())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StateStoreError::Backend(e.to_string()))?;

        Ok(())
    }
}

/// Postgres-backed chat log.
#[derive(Debug, Clone)]
pub struct PostgresChatLog {
    pool: PgPool,
    cap: i64,
}

impl PostgresChatLog {
    /// Creates a log retaining at most `max_turns` question/answer rounds.
    pub fn new(pool: PgPool, max_turns: usize) -> Self {
        Self {
            pool,
            cap: (max_turns * 2) as i64,
        }
    }
}

#[async_trait]
impl ChatLog for PostgresChatLog {
    async fn recent(&self, user_id: &UserId) -> Result<Vec<ChatTurn>, ChatLogError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT role, content
            FROM chat_history
            WHERE user_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(self.cap)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChatLogError::Backend(e.to_string()))?;

        let mut turns: Vec<ChatTurn> = rows
            .into_iter()
            .map(|(role, content)| ChatTurn {
                role: parse_role(&role),
                content,
            })
            .collect();
        turns.reverse();
        Ok(turns)
    }

    async fn append(&self, user_id: &UserId, turn: ChatTurn) -> Result<(), ChatLogError> {
        sqlx::query("INSERT INTO chat_history (user_id, role, content) VALUES ($1, $2, $3)")
            .bind(user_id.as_str())
            .bind(role_str(turn.role))
            .bind(&turn.content)
            .execute(&self.pool)
            .await
            .map_err(|e| ChatLogError::Backend(e.to_string()))?;

        sqlx::query(
            r#"
            DELETE FROM chat_history
            WHERE user_id = $1 AND id NOT IN (
                SELECT id FROM chat_history
                WHERE user_id = $1
                ORDER BY id DESC
                LIMIT $2
            )
            "#,
        )
        .bind(user_id.as_str())
        .bind(self.cap)
        .execute(&self.pool)
        .await
        .map_err(|e| ChatLogError::Backend(e.to_string()))?;

        Ok(())
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Ai => "ai",
    }
}

fn parse_role(raw: &str) -> ChatRole {
    match raw {
        "ai" => ChatRole::Ai,
        _ => ChatRole::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_roundtrip_through_their_column_encoding() {
        assert_eq!(parse_role(role_str(ChatRole::User)), ChatRole::User);
        assert_eq!(parse_role(role_str(ChatRole::Ai)), ChatRole::Ai);
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(parse_role("system"), ChatRole::User);
    }
}
