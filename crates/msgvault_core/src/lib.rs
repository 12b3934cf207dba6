//! Core of msgvault: encrypted, self-describing local records.
//! This crate is the single source of truth for record schema and
//! at-rest encryption invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::cipher::{CipherError, CipherErrorKind, CipherResult, FieldCipher};
pub use model::record::{
    ColumnDef, DecryptReport, RecordColumn, RecordDefinition, RecordSchema,
    RecordValidationError, SqlType,
};
pub use model::remote::RemoteScheduledMessageBody;
pub use model::row::{MemoryRow, RowAccessor, RowError, RowResult, RowValue};
pub use model::scheduled_message::{ScheduledMessage, ScheduledMessageColumn};
pub use repo::scheduled_message_repo::{
    ScheduledMessageQuery, ScheduledMessageRepository, SqliteScheduledMessageRepository,
};
pub use repo::{query_records, RepoError, RepoResult};
pub use service::scheduled_message_service::{ScheduleMessageRequest, ScheduledMessageService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
