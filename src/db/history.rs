//! Conversation history storage.

use crate::types::{AdvisorError, ConversationId, Message, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database};

/// Read access to persisted conversation history.
///
/// The pipeline only loads; writing the exchange back is the caller's job.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the ordered message sequence for a conversation.
    ///
    /// Returns an empty sequence for a conversation with no messages yet.
    async fn load(&self, conversation: &ConversationId) -> Result<Vec<Message>>;
}

/// libsql-backed history store (local SQLite file, in-memory, or remote Turso).
///
/// Besides the read path the pipeline needs, this also carries the write
/// helpers the request-handling layer uses to persist the exchange around
/// each `answer()` call.
pub struct LibsqlHistoryStore {
    db: Database,
}

impl LibsqlHistoryStore {
    /// Open an in-memory database (ephemeral, for development and tests).
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AdvisorError::History(format!("Failed to open database: {}", e)))?;

        let store = Self { db };
        store.initialize_schema().await?;
        Ok(store)
    }

    /// Open a local SQLite database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AdvisorError::History(format!("Failed to open database: {}", e)))?;

        let store = Self { db };
        store.initialize_schema().await?;
        Ok(store)
    }

    /// Connect to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AdvisorError::History(format!("Failed to connect to Turso: {}", e)))?;

        let store = Self { db };
        store.initialize_schema().await?;
        Ok(store)
    }

    fn connection(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(|e| AdvisorError::History(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AdvisorError::History(format!("Failed to create conversations table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                FOREIGN KEY (conversation_id) REFERENCES conversations(id)
            )",
            (),
        )
        .await
        .map_err(|e| AdvisorError::History(format!("Failed to create messages table: {}", e)))?;

        Ok(())
    }

    /// Create a conversation record.
    pub async fn create_conversation(
        &self,
        conversation: &ConversationId,
        user_id: &str,
        title: Option<&str>,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO conversations (id, user_id, title, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (conversation.as_str(), user_id, title, now, now),
        )
        .await
        .map_err(|e| AdvisorError::History(format!("Failed to create conversation: {}", e)))?;

        Ok(())
    }

    /// Whether a conversation record exists.
    pub async fn conversation_exists(&self, conversation: &ConversationId) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT 1 FROM conversations WHERE id = ?",
                [conversation.as_str()],
            )
            .await
            .map_err(|e| AdvisorError::History(format!("Failed to check conversation: {}", e)))?;

        Ok(rows
            .next()
            .await
            .map_err(|e| AdvisorError::History(e.to_string()))?
            .is_some())
    }

    /// Append a message with the given persisted role label.
    pub async fn append(
        &self,
        conversation: &ConversationId,
        role: &str,
        content: &str,
    ) -> Result<()> {
        let conn = self.connection()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO messages (id, conversation_id, role, content, timestamp)
             VALUES (?, ?, ?, ?, ?)",
            (id, conversation.as_str(), role, content, now),
        )
        .await
        .map_err(|e| AdvisorError::History(format!("Failed to add message: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl HistoryStore for LibsqlHistoryStore {
    async fn load(&self, conversation: &ConversationId) -> Result<Vec<Message>> {
        let conn = self.connection()?;

        // rowid breaks timestamp ties so same-second writes keep insertion order.
        let mut rows = conn
            .query(
                "SELECT role, content, timestamp FROM messages
                 WHERE conversation_id = ? ORDER BY timestamp ASC, rowid ASC",
                [conversation.as_str()],
            )
            .await
            .map_err(|e| AdvisorError::History(format!("Failed to query messages: {}", e)))?;

        let mut messages = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AdvisorError::History(e.to_string()))?
        {
            let timestamp = chrono::DateTime::from_timestamp(
                row.get::<i64>(2)
                    .map_err(|e| AdvisorError::History(e.to_string()))?,
                0,
            )
            .ok_or_else(|| AdvisorError::History("Invalid message timestamp".to_string()))?;

            messages.push(Message {
                role: row.get(0).map_err(|e| AdvisorError::History(e.to_string()))?,
                content: row.get(1).map_err(|e| AdvisorError::History(e.to_string()))?,
                timestamp,
            });
        }

        Ok(messages)
    }
}
