// Messaging Service - queue and message use cases
//
// Every operation validates first, then resolves the queue, then touches
// storage, then bumps its counter. Failures never bump a counter.

pub mod requests;

pub use requests::{
    CreateQueueRequest, CreateQueueResponse, DeleteQueueRequest, DescribeQueueStatusRequest,
    DescribeQueuesRequest, PopMessageRequest, PurgeQueueRequest, PushMessageRequest,
    PushMessageResponse, QueueRequest, QueueStatus, UpdateQueueTagsRequest,
};

use super::validate::{require_array, require_non_empty, validate_id};
use crate::domain::{IdKind, Message, Queue};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, MessageStore, QueueStore, StatsReporter, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Queue/Message domain service
pub struct MessagingService {
    queues: Arc<dyn QueueStore>,
    messages: Arc<dyn MessageStore>,
    stats: Arc<dyn StatsReporter>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MessagingService {
    pub fn new(
        queues: Arc<dyn QueueStore>,
        messages: Arc<dyn MessageStore>,
        stats: Arc<dyn StatsReporter>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            queues,
            messages,
            stats,
            id_provider,
            time_provider,
        }
    }

    fn count(&self, name: &str) {
        self.stats.counter_inc(name, &[], 1);
    }

    /// Look up a queue that the request has already validated
    async fn resolve_queue(&self, queue_id: &str) -> Result<Queue> {
        self.queues
            .get_by_id(queue_id)
            .await?
            .ok_or_else(|| AppError::QueueNotFound(queue_id.to_string()))
    }

    pub async fn create_queue(&self, req: CreateQueueRequest) -> Result<CreateQueueResponse> {
        let tags = require_array(req.tags.as_deref(), "tags")?.to_vec();

        let queue = Queue::new(self.id_provider.generate_id(IdKind::Queue), tags);
        self.queues.create(&queue).await?;

        info!(queue_id = %queue.id, tags = queue.tags.len(), "Queue created");
        self.count("queue_created");

        Ok(CreateQueueResponse {
            id: queue.id,
            tags: queue.tags,
        })
    }

    /// Delete the queue, then purge its messages.
    ///
    /// The two steps are not atomic: a crash in between leaves orphaned
    /// messages that no operation can reach.
    pub async fn delete_queue(&self, req: DeleteQueueRequest) -> Result<()> {
        validate_id(&req.queue_id, IdKind::Queue, "queue_id")?;
        let queue = self.resolve_queue(&req.queue_id).await?;

        // Deleted between lookup and delete
        if !self.queues.delete(&queue.id).await? {
            return Err(AppError::QueueNotFound(queue.id));
        }
        let purged = self.messages.purge(&queue.id).await?;

        info!(queue_id = %queue.id, purged, "Queue deleted");
        self.count("queue_deleted");
        Ok(())
    }

    pub async fn describe_queues(&self, req: DescribeQueuesRequest) -> Result<Vec<Queue>> {
        let queues = match req.tags.as_deref() {
            None | Some([]) => self.queues.list().await?,
            Some(tags) => self.queues.get_by_tags(tags).await?,
        };

        debug!(count = queues.len(), "Queues described");
        self.count("queues_described");
        Ok(queues)
    }

    pub async fn push_message(&self, req: PushMessageRequest) -> Result<PushMessageResponse> {
        validate_id(&req.queue_id, IdKind::Queue, "queue_id")?;
        require_non_empty(&req.content_type, "content_type")?;
        require_non_empty(&req.body, "body")?;
        let queue = self.resolve_queue(&req.queue_id).await?;

        let message = Message::new(
            self.id_provider.generate_id(IdKind::Message),
            queue.id,
            req.content_type,
            req.body,
            self.time_provider.now(),
        );
        self.messages.create(&message).await?;

        debug!(
            queue_id = %message.queue_id,
            message_id = %message.id,
            bytes = message.body.len(),
            "Message pushed"
        );
        self.count("message_pushed");

        Ok(PushMessageResponse {
            message_id: message.id,
        })
    }

    /// Remove and return the earliest pending message, if any
    pub async fn pop_message(&self, req: PopMessageRequest) -> Result<Option<Message>> {
        validate_id(&req.queue_id, IdKind::Queue, "queue_id")?;
        let queue = self.resolve_queue(&req.queue_id).await?;

        let message = self.messages.take_next(&queue.id).await?;
        if let Some(message) = &message {
            debug!(queue_id = %queue.id, message_id = %message.id, "Message popped");
            self.count("message_popped");
        }
        Ok(message)
    }

    pub async fn describe_queue_status(
        &self,
        req: DescribeQueueStatusRequest,
    ) -> Result<QueueStatus> {
        validate_id(&req.queue_id, IdKind::Queue, "queue_id")?;
        let queue = self.resolve_queue(&req.queue_id).await?;

        let message_count = self.messages.count_for(&queue.id).await?;

        self.count("queue_status_described");
        Ok(QueueStatus { message_count })
    }

    pub async fn purge_queue(&self, req: PurgeQueueRequest) -> Result<()> {
        validate_id(&req.queue_id, IdKind::Queue, "queue_id")?;
        let queue = self.resolve_queue(&req.queue_id).await?;

        let purged = self.messages.purge(&queue.id).await?;

        info!(queue_id = %queue.id, purged, "Queue purged");
        self.count("queue_purged");
        Ok(())
    }

    /// Replace the tag set wholesale
    pub async fn update_queue_tags(&self, req: UpdateQueueTagsRequest) -> Result<()> {
        validate_id(&req.queue_id, IdKind::Queue, "queue_id")?;
        let tags = require_array(req.tags.as_deref(), "tags")?;
        let queue = self.resolve_queue(&req.queue_id).await?;

        // Deleted between lookup and update
        if !self.queues.replace_tags(&queue.id, tags).await? {
            return Err(AppError::QueueNotFound(queue.id));
        }

        info!(queue_id = %queue.id, tags = tags.len(), "Queue tags updated");
        self.count("queue_tags_updated");
        Ok(())
    }

    /// Refresh the storage gauges. Gauges a backend cannot report are left unset.
    pub async fn record_gauges(&self) -> Result<()> {
        if let Some(pending) = self.messages.total_count().await? {
            self.stats.gauge_set("messages_pending", &[], pending as f64);
        }
        if let Some(queues) = self.queues.total_count().await? {
            self.stats.gauge_set("queue_count", &[], queues as f64);
        }
        if let Some(tags) = self.queues.tag_count().await? {
            self.stats.gauge_set("queue_tag_count", &[], tags as f64);
        }
        Ok(())
    }
}
