//! Scheduled message use-case service.
//!
//! # Responsibility
//! - Provide schedule/sync/delivery entry points for core callers.
//! - Delegate persistence and encryption to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/encryption contracts.
//! - Service layer remains storage-agnostic.

use crate::model::remote::RemoteScheduledMessageBody;
use crate::model::scheduled_message::ScheduledMessage;
use crate::repo::scheduled_message_repo::{ScheduledMessageQuery, ScheduledMessageRepository};
use crate::repo::RepoResult;

/// Use-case service wrapper for scheduled messages.
pub struct ScheduledMessageService<R: ScheduledMessageRepository> {
    repo: R,
}

/// Request model for queueing a new outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMessageRequest {
    pub title: String,
    pub destination: String,
    pub payload: String,
    pub mime_type: String,
    /// Delivery time in epoch milliseconds.
    pub timestamp: i64,
}

impl<R: ScheduledMessageRepository> ScheduledMessageService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Queues a new message and returns its assigned id.
    pub fn schedule(&self, request: &ScheduleMessageRequest) -> RepoResult<i64> {
        let message = ScheduledMessage::new(
            request.title.clone(),
            request.destination.clone(),
            request.payload.clone(),
            request.mime_type.clone(),
            request.timestamp,
        );
        self.repo.insert(&message)
    }

    /// Writes a message received from sync, keyed by its `deviceId`.
    ///
    /// Re-applying the same body replaces the local row instead of
    /// duplicating it.
    pub fn apply_remote(&self, body: &RemoteScheduledMessageBody) -> RepoResult<i64> {
        self.repo.upsert(&ScheduledMessage::from_remote(body))
    }

    /// Builds the upload body for one stored message.
    ///
    /// Returns `Ok(None)` when the id is unknown.
    pub fn export_remote(&self, id: i64) -> RepoResult<Option<RemoteScheduledMessageBody>> {
        match self.repo.get(id)? {
            Some(message) => Ok(Some(message.to_remote()?)),
            None => Ok(None),
        }
    }

    pub fn get(&self, id: i64) -> RepoResult<Option<ScheduledMessage>> {
        self.repo.get(id)
    }

    /// Messages whose delivery time is at or before `now_epoch_ms`, oldest first.
    pub fn due_messages(&self, now_epoch_ms: i64) -> RepoResult<Vec<ScheduledMessage>> {
        self.repo.list(&ScheduledMessageQuery {
            due_at_or_before: Some(now_epoch_ms),
            limit: None,
        })
    }

    /// All queued messages, oldest first.
    pub fn upcoming(&self) -> RepoResult<Vec<ScheduledMessage>> {
        self.repo.list(&ScheduledMessageQuery::default())
    }

    pub fn reschedule(&self, message: &ScheduledMessage) -> RepoResult<()> {
        self.repo.update(message)
    }

    /// Removes a queued message. Also used once a message has been sent.
    pub fn cancel(&self, id: i64) -> RepoResult<()> {
        self.repo.delete(id)
    }
}
