//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Table DDL comes from each record's `RecordSchema`, never from
//!   hand-written SQL, so storage and hydration cannot drift apart.

use crate::db::{DbError, DbResult};
use crate::model::record::{RecordDefinition, RecordSchema};
use crate::model::scheduled_message::ScheduledMessage;
use log::info;
use rusqlite::{Connection, Transaction};

type SchemaFn = fn() -> &'static RecordSchema;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    schemas: &'static [SchemaFn],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    schemas: &[<ScheduledMessage as RecordDefinition>::schema],
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns every schema created by the registered migrations.
pub fn registered_schemas() -> Vec<&'static RecordSchema> {
    MIGRATIONS
        .iter()
        .flat_map(|migration| migration.schemas.iter().map(|schema| schema()))
        .collect()
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        for schema in migration.schemas {
            create_table(&tx, schema())?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=db_migrate module=db status=ok version={} tables={}",
            migration.version,
            migration.schemas.len()
        );
    }
    tx.commit()?;

    Ok(())
}

fn create_table(tx: &Transaction<'_>, schema: &RecordSchema) -> DbResult<()> {
    tx.execute_batch(schema.create_statement())?;
    for statement in schema.index_statements() {
        tx.execute_batch(statement)?;
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
