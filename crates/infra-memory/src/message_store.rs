// In-memory MessageStore

use async_trait::async_trait;
use courier_core::domain::Message;
use courier_core::port::MessageStore;
use courier_core::Result;
use tokio::sync::RwLock;

/// Messages in insertion order. `take_next` runs under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Index of the earliest message for the queue; the first of equal
/// timestamps wins, which keeps insertion order on ties.
fn next_index(messages: &[Message], queue_id: &str) -> Option<usize> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.queue_id == queue_id)
        .min_by_key(|(i, m)| (m.created_at, *i))
        .map(|(i, _)| i)
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: &Message) -> Result<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn delete_one(&self, queue_id: &str, message_id: &str) -> Result<bool> {
        let mut messages = self.messages.write().await;
        match messages
            .iter()
            .position(|m| m.queue_id == queue_id && m.id == message_id)
        {
            Some(i) => {
                messages.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn next_for(&self, queue_id: &str) -> Result<Option<Message>> {
        let messages = self.messages.read().await;
        Ok(next_index(&messages, queue_id).map(|i| messages[i].clone()))
    }

    async fn take_next(&self, queue_id: &str) -> Result<Option<Message>> {
        let mut messages = self.messages.write().await;
        Ok(next_index(&messages, queue_id).map(|i| messages.remove(i)))
    }

    async fn count_for(&self, queue_id: &str) -> Result<i64> {
        let messages = self.messages.read().await;
        Ok(messages.iter().filter(|m| m.queue_id == queue_id).count() as i64)
    }

    async fn purge(&self, queue_id: &str) -> Result<u64> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.queue_id != queue_id);
        Ok((before - messages.len()) as u64)
    }

    async fn total_count(&self) -> Result<Option<i64>> {
        Ok(Some(self.messages.read().await.len() as i64))
    }
}
