//! Scheduled outgoing message record.
//!
//! # Responsibility
//! - Own the `scheduled_message` table shape and its closed column mapping.
//! - Convert between the local record and `RemoteScheduledMessageBody`.
//!
//! # Invariants
//! - On insert, `id == 0` means "not assigned yet" and storage assigns the rowid.
//! - `title`, `destination`, `payload` and `mime_type` are encrypted at rest.
//! - `id` and `timestamp` stay plaintext so storage can key and order rows.

use crate::model::record::{
    ColumnDef, RecordColumn, RecordDefinition, RecordSchema, RecordValidationError,
};
use crate::model::remote::RemoteScheduledMessageBody;
use crate::model::row::{RowAccessor, RowResult};
use once_cell::sync::Lazy;

pub const TABLE: &str = "scheduled_message";
pub const COLUMN_ID: &str = "_id";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_TO: &str = "phone_number";
pub const COLUMN_DATA: &str = "data";
pub const COLUMN_MIME_TYPE: &str = "mime_type";
pub const COLUMN_TIMESTAMP: &str = "timestamp";

/// MIME type used for plain text message bodies.
pub const MIME_TEXT_PLAIN: &str = "text/plain";

static SCHEMA: Lazy<RecordSchema> =
    Lazy::new(|| RecordSchema::new::<ScheduledMessageColumn>(TABLE, &[]));

/// Columns of the `scheduled_message` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledMessageColumn {
    Id,
    Title,
    To,
    Data,
    MimeType,
    Timestamp,
}

impl RecordColumn for ScheduledMessageColumn {
    const ALL: &'static [Self] = &[
        Self::Id,
        Self::Title,
        Self::To,
        Self::Data,
        Self::MimeType,
        Self::Timestamp,
    ];

    fn def(self) -> ColumnDef {
        match self {
            Self::Id => ColumnDef::integer(COLUMN_ID).primary_key(),
            Self::Title => ColumnDef::text(COLUMN_TITLE).not_null(),
            Self::To => ColumnDef::text(COLUMN_TO).not_null(),
            Self::Data => ColumnDef::text(COLUMN_DATA).not_null(),
            Self::MimeType => ColumnDef::text(COLUMN_MIME_TYPE).not_null(),
            Self::Timestamp => ColumnDef::integer(COLUMN_TIMESTAMP).not_null(),
        }
    }
}

/// A message queued for delivery at `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledMessage {
    pub id: i64,
    pub title: Option<String>,
    /// Phone number or other recipient identifier.
    pub destination: Option<String>,
    /// Message text or an encoded attachment reference.
    pub payload: Option<String>,
    pub mime_type: Option<String>,
    /// Delivery time in epoch milliseconds.
    pub timestamp: i64,
}

impl ScheduledMessage {
    /// Creates an unsaved message (`id == 0`).
    pub fn new(
        title: impl Into<String>,
        destination: impl Into<String>,
        payload: impl Into<String>,
        mime_type: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: 0,
            title: Some(title.into()),
            destination: Some(destination.into()),
            payload: Some(payload.into()),
            mime_type: Some(mime_type.into()),
            timestamp,
        }
    }

    /// Maps a sync body onto a local record.
    ///
    /// `deviceId -> id`, `to -> destination`, `data -> payload`; the other
    /// fields keep their names. Nothing is validated here.
    pub fn from_remote(body: &RemoteScheduledMessageBody) -> Self {
        Self {
            id: body.device_id,
            title: Some(body.title.clone()),
            destination: Some(body.to.clone()),
            payload: Some(body.data.clone()),
            mime_type: Some(body.mime_type.clone()),
            timestamp: body.timestamp,
        }
    }

    /// Inverse of `from_remote`, used when uploading a local record.
    ///
    /// # Errors
    /// Returns `MissingField` when a required text field is `None`.
    pub fn to_remote(&self) -> Result<RemoteScheduledMessageBody, RecordValidationError> {
        Ok(RemoteScheduledMessageBody {
            device_id: self.id,
            title: required(&self.title, COLUMN_TITLE)?.to_string(),
            to: required(&self.destination, COLUMN_TO)?.to_string(),
            data: required(&self.payload, COLUMN_DATA)?.to_string(),
            mime_type: required(&self.mime_type, COLUMN_MIME_TYPE)?.to_string(),
            timestamp: self.timestamp,
        })
    }

    /// Checks the not-null columns before the record is written.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        required(&self.title, COLUMN_TITLE)?;
        required(&self.destination, COLUMN_TO)?;
        required(&self.payload, COLUMN_DATA)?;
        required(&self.mime_type, COLUMN_MIME_TYPE)?;
        Ok(())
    }

    pub fn is_text(&self) -> bool {
        self.mime_type.as_deref() == Some(MIME_TEXT_PLAIN)
    }
}

impl From<&RemoteScheduledMessageBody> for ScheduledMessage {
    fn from(value: &RemoteScheduledMessageBody) -> Self {
        Self::from_remote(value)
    }
}

impl From<RemoteScheduledMessageBody> for ScheduledMessage {
    fn from(value: RemoteScheduledMessageBody) -> Self {
        Self::from_remote(&value)
    }
}

impl RecordDefinition for ScheduledMessage {
    type Column = ScheduledMessageColumn;

    fn schema() -> &'static RecordSchema {
        &SCHEMA
    }

    fn assign<A: RowAccessor + ?Sized>(
        &mut self,
        column: Self::Column,
        row: &A,
        index: usize,
    ) -> RowResult<()> {
        match column {
            ScheduledMessageColumn::Id => self.id = row.get_int(index)?.unwrap_or_default(),
            ScheduledMessageColumn::Title => self.title = row.get_string(index)?,
            ScheduledMessageColumn::To => self.destination = row.get_string(index)?,
            ScheduledMessageColumn::Data => self.payload = row.get_string(index)?,
            ScheduledMessageColumn::MimeType => self.mime_type = row.get_string(index)?,
            ScheduledMessageColumn::Timestamp => {
                self.timestamp = row.get_int(index)?.unwrap_or_default()
            }
        }
        Ok(())
    }

    fn sensitive_fields_mut(&mut self) -> Vec<(Self::Column, &mut Option<String>)> {
        vec![
            (ScheduledMessageColumn::Title, &mut self.title),
            (ScheduledMessageColumn::To, &mut self.destination),
            (ScheduledMessageColumn::Data, &mut self.payload),
            (ScheduledMessageColumn::MimeType, &mut self.mime_type),
        ]
    }
}

fn required<'a>(
    value: &'a Option<String>,
    column: &'static str,
) -> Result<&'a str, RecordValidationError> {
    value
        .as_deref()
        .ok_or(RecordValidationError::MissingField(column))
}
