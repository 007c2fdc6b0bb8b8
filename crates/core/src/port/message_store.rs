// Message Store Port (Interface)

use crate::domain::Message;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence interface for messages.
///
/// Ordering contract: "next" is the message with the earliest `created_at`
/// for the queue, ties broken by insertion order.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a new message
    async fn create(&self, message: &Message) -> Result<()>;

    /// Delete one message. Returns false if it was not in that queue.
    async fn delete_one(&self, queue_id: &str, message_id: &str) -> Result<bool>;

    /// Peek at the next pending message without removing it
    async fn next_for(&self, queue_id: &str) -> Result<Option<Message>>;

    /// Remove and return the next pending message.
    ///
    /// Implementations MUST make select-and-delete atomic: two concurrent
    /// callers never receive the same message.
    async fn take_next(&self, queue_id: &str) -> Result<Option<Message>>;

    /// Pending messages in a queue
    async fn count_for(&self, queue_id: &str) -> Result<i64>;

    /// Delete every message in a queue, returning how many were removed
    async fn purge(&self, queue_id: &str) -> Result<u64>;

    /// Pending messages across all queues, if the backend can report it
    async fn total_count(&self) -> Result<Option<i64>> {
        Ok(None)
    }
}
