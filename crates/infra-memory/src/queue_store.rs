// In-memory QueueStore

use async_trait::async_trait;
use courier_core::domain::{Queue, Tag};
use courier_core::port::QueueStore;
use courier_core::Result;
use tokio::sync::RwLock;
use tracing::debug;

/// Queues kept in creation order
#[derive(Debug, Default)]
pub struct InMemoryQueueStore {
    queues: RwLock<Vec<Queue>>,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn create(&self, queue: &Queue) -> Result<()> {
        self.queues.write().await.push(queue.clone());
        debug!(queue_id = %queue.id, "Queue stored");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Queue>> {
        Ok(self.queues.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Queue>> {
        Ok(self.queues.read().await.iter().find(|q| q.id == id).cloned())
    }

    async fn get_by_tags(&self, tags: &[Tag]) -> Result<Vec<Queue>> {
        Ok(self
            .queues
            .read()
            .await
            .iter()
            .filter(|q| q.has_all_tags(tags))
            .cloned()
            .collect())
    }

    async fn replace_tags(&self, id: &str, tags: &[Tag]) -> Result<bool> {
        let mut queues = self.queues.write().await;
        match queues.iter_mut().find(|q| q.id == id) {
            Some(queue) => {
                queue.tags = tags.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut queues = self.queues.write().await;
        let before = queues.len();
        queues.retain(|q| q.id != id);
        Ok(queues.len() != before)
    }

    async fn total_count(&self) -> Result<Option<i64>> {
        Ok(Some(self.queues.read().await.len() as i64))
    }

    async fn tag_count(&self) -> Result<Option<i64>> {
        let queues = self.queues.read().await;
        Ok(Some(queues.iter().map(|q| q.tags.len() as i64).sum()))
    }
}
