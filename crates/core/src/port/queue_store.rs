// Queue Store Port (Interface)

use crate::domain::{Queue, Tag};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence interface for queues and their tags
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Store a new queue with its tags
    async fn create(&self, queue: &Queue) -> Result<()>;

    /// All queues, in creation order
    async fn list(&self) -> Result<Vec<Queue>>;

    /// Find queue by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<Queue>>;

    /// Queues carrying every given key/value pair (AND of equality predicates)
    async fn get_by_tags(&self, tags: &[Tag]) -> Result<Vec<Queue>>;

    /// Replace the tag set wholesale. Returns false if the queue is absent.
    async fn replace_tags(&self, id: &str, tags: &[Tag]) -> Result<bool>;

    /// Delete the queue and its tags. Returns false if the queue is absent.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Number of queues, if the backend can report it
    async fn total_count(&self) -> Result<Option<i64>> {
        Ok(None)
    }

    /// Number of tags across all queues, if the backend can report it
    async fn tag_count(&self) -> Result<Option<i64>> {
        Ok(None)
    }
}
