// Message Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message identifier (`msg:message:<hex>`)
pub type MessageId = String;

/// Message Entity
///
/// A message belongs to exactly one queue for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub queue_id: String,
    pub content_type: String,
    pub body: Vec<u8>,
    /// UTC, serialized as RFC 3339
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message
    ///
    /// # Arguments
    ///
    /// * `id` - Unique message ID (injected, not generated)
    /// * `queue_id` - Owning queue
    /// * `content_type` - MIME type supplied by the producer
    /// * `body` - Raw payload
    /// * `created_at` - Creation time (injected, not system time)
    pub fn new(
        id: impl Into<String>,
        queue_id: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            queue_id: queue_id.into(),
            content_type: content_type.into(),
            body: body.into(),
            created_at,
        }
    }
}
