//! Scheduled message repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the encrypted `scheduled_message` table.
//! - Keep SQL and cipher plumbing inside the persistence boundary.
//!
//! # Invariants
//! - Every write validates and encrypts before SQL mutation.
//! - Every read hydrates with `SELECT *` so column order never matters.
//! - `id == 0` on insert lets SQLite assign the rowid.
//! - Upsert binds the id as given, so re-applying a sync body replaces its row.

use crate::model::cipher::FieldCipher;
use crate::model::record::RecordDefinition;
use crate::model::scheduled_message::ScheduledMessage;
use crate::repo::{query_records, RepoError, RepoResult};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

const SELECT_SQL: &str = "SELECT * FROM scheduled_message";

/// Query options for listing scheduled messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledMessageQuery {
    /// Only rows whose `timestamp` is `<=` this epoch-millisecond value.
    pub due_at_or_before: Option<i64>,
    pub limit: Option<u32>,
}

/// Repository interface for scheduled message persistence.
pub trait ScheduledMessageRepository {
    /// Inserts a new row and returns its id.
    fn insert(&self, message: &ScheduledMessage) -> RepoResult<i64>;
    /// Inserts or replaces the row with exactly this id, `0` included.
    /// Used by sync write-through.
    fn upsert(&self, message: &ScheduledMessage) -> RepoResult<i64>;
    fn update(&self, message: &ScheduledMessage) -> RepoResult<()>;
    fn get(&self, id: i64) -> RepoResult<Option<ScheduledMessage>>;
    /// Lists rows ordered by delivery time, then id.
    fn list(&self, query: &ScheduledMessageQuery) -> RepoResult<Vec<ScheduledMessage>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed scheduled message repository.
pub struct SqliteScheduledMessageRepository<'a, C: ?Sized> {
    conn: &'a Connection,
    cipher: &'a C,
}

impl<'a, C: FieldCipher + ?Sized> SqliteScheduledMessageRepository<'a, C> {
    pub fn new(conn: &'a Connection, cipher: &'a C) -> Self {
        Self { conn, cipher }
    }

    fn seal(&self, message: &ScheduledMessage) -> RepoResult<ScheduledMessage> {
        message.validate()?;
        let mut sealed = message.clone();
        sealed.encrypt(self.cipher)?;
        Ok(sealed)
    }

    fn write(&self, verb: &str, message: &ScheduledMessage, keyed: bool) -> RepoResult<i64> {
        let sealed = self.seal(message)?;
        let id = (keyed || sealed.id != 0).then_some(sealed.id);

        let result = self.conn.execute(
            &format!(
                "{verb} INTO scheduled_message (
                    _id,
                    title,
                    phone_number,
                    data,
                    mime_type,
                    timestamp
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);"
            ),
            params![
                id,
                sealed.title.as_deref(),
                sealed.destination.as_deref(),
                sealed.payload.as_deref(),
                sealed.mime_type.as_deref(),
                sealed.timestamp,
            ],
        );

        if let Err(err) = result {
            error!(
                "event=scheduled_message_write module=repo status=error error_code=sql_failed error={}",
                err
            );
            return Err(err.into());
        }

        let id = id.unwrap_or_else(|| self.conn.last_insert_rowid());
        debug!("event=scheduled_message_write module=repo status=ok id={id}");
        Ok(id)
    }
}

impl<C> ScheduledMessageRepository for SqliteScheduledMessageRepository<'_, C>
where
    C: FieldCipher + ?Sized,
{
    fn insert(&self, message: &ScheduledMessage) -> RepoResult<i64> {
        self.write("INSERT", message, false)
    }

    fn upsert(&self, message: &ScheduledMessage) -> RepoResult<i64> {
        self.write("INSERT OR REPLACE", message, true)
    }

    fn update(&self, message: &ScheduledMessage) -> RepoResult<()> {
        let sealed = self.seal(message)?;

        let changed = self.conn.execute(
            "UPDATE scheduled_message
             SET
                title = ?1,
                phone_number = ?2,
                data = ?3,
                mime_type = ?4,
                timestamp = ?5
             WHERE _id = ?6;",
            params![
                sealed.title.as_deref(),
                sealed.destination.as_deref(),
                sealed.payload.as_deref(),
                sealed.mime_type.as_deref(),
                sealed.timestamp,
                sealed.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(message.id));
        }

        Ok(())
    }

    fn get(&self, id: i64) -> RepoResult<Option<ScheduledMessage>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SQL} WHERE _id = ?1;"))?;
        let records: Vec<ScheduledMessage> = query_records(&mut stmt, [id], self.cipher)?;
        Ok(records.into_iter().next())
    }

    fn list(&self, query: &ScheduledMessageQuery) -> RepoResult<Vec<ScheduledMessage>> {
        let mut sql = format!("{SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(due) = query.due_at_or_before {
            sql.push_str(" AND timestamp <= ?");
            bind_values.push(Value::Integer(due));
        }

        sql.push_str(" ORDER BY timestamp ASC, _id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        query_records(&mut stmt, params_from_iter(bind_values), self.cipher)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM scheduled_message WHERE _id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}
