// Request / Response records for the messaging use cases

use crate::domain::{MessageId, QueueId, Tag};
use serde::{Deserialize, Serialize};

/// `tags` must be present (an empty list is fine)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateQueueRequest {
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateQueueResponse {
    pub id: QueueId,
    pub tags: Vec<Tag>,
}

/// Shared shape of every request that only names a queue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueRequest {
    #[serde(default)]
    pub queue_id: String,
}

impl QueueRequest {
    pub fn new(queue_id: impl Into<String>) -> Self {
        Self {
            queue_id: queue_id.into(),
        }
    }
}

pub type DeleteQueueRequest = QueueRequest;
pub type PopMessageRequest = QueueRequest;
pub type DescribeQueueStatusRequest = QueueRequest;
pub type PurgeQueueRequest = QueueRequest;

/// Missing or empty `tags` lists every queue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescribeQueuesRequest {
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushMessageRequest {
    #[serde(default)]
    pub queue_id: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushMessageResponse {
    pub message_id: MessageId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueStatus {
    pub message_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQueueTagsRequest {
    #[serde(default)]
    pub queue_id: String,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}
