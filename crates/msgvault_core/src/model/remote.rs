//! Wire bodies exchanged with the sync backend.

use serde::{Deserialize, Serialize};

/// Remote representation of one scheduled message.
///
/// Field names follow the backend's camelCase JSON. Values are trusted as
/// delivered; the transport layer owns validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteScheduledMessageBody {
    /// Identifier assigned on the originating device; becomes the local `_id`.
    pub device_id: i64,
    pub title: String,
    pub to: String,
    pub data: String,
    pub mime_type: String,
    /// Delivery time in epoch milliseconds.
    pub timestamp: i64,
}
