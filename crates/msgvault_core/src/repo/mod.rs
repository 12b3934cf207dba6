//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//! - Run the encryption lifecycle: encrypt before write, decrypt after read.
//!
//! # Invariants
//! - Write paths validate, then encrypt a copy; plaintext never reaches SQL.
//! - Read paths tolerate per-field decrypt failures and skip unreadable
//!   rows, so one corrupt row does not abort a multi-row read.

use crate::db::DbError;
use crate::model::cipher::{CipherError, FieldCipher};
use crate::model::record::{RecordDefinition, RecordValidationError};
use log::warn;
use rusqlite::{Params, Statement};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod scheduled_message_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Cipher(CipherError),
    Db(DbError),
    NotFound(i64),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Cipher(err) => write!(f, "record could not be encrypted: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Cipher(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CipherError> for RepoError {
    fn from(value: CipherError) -> Self {
        Self::Cipher(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs `stmt`, hydrating and decrypting one record per result row.
///
/// Rows whose fields fail to decrypt are still returned; those fields keep
/// their stored value. Rows that cannot be hydrated at all (e.g. text in an
/// integer column) are skipped and logged, never returned as an error.
pub fn query_records<R, P, C>(
    stmt: &mut Statement<'_>,
    params: P,
    cipher: &C,
) -> RepoResult<Vec<R>>
where
    R: RecordDefinition,
    P: Params,
    C: FieldCipher + ?Sized,
{
    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    let mut partial_rows = 0_usize;
    let mut skipped_rows = 0_usize;

    while let Some(row) = rows.next()? {
        let mut record = match R::from_row(row) {
            Ok(record) => record,
            Err(err) => {
                skipped_rows += 1;
                warn!(
                    "event=record_read module=repo status=skipped table={} error_code=row_unreadable error={}",
                    R::schema().table_name(),
                    err
                );
                continue;
            }
        };
        if !record.decrypt(cipher).is_clean() {
            partial_rows += 1;
        }
        records.push(record);
    }

    if partial_rows > 0 || skipped_rows > 0 {
        warn!(
            "event=record_read module=repo status=partial table={} rows={} partial_rows={} skipped_rows={}",
            R::schema().table_name(),
            records.len(),
            partial_rows,
            skipped_rows
        );
    }

    Ok(records)
}
