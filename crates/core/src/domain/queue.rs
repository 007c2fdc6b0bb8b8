// Queue Domain Model

use serde::{Deserialize, Serialize};

/// Queue identifier (`msg:queue:<hex>`)
pub type QueueId = String;

/// Key/value label attached to a queue. Keys are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Queue Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    /// Insertion order is kept for listing
    pub tags: Vec<Tag>,
}

impl Queue {
    pub fn new(id: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            id: id.into(),
            tags,
        }
    }

    /// True if the queue carries every requested key/value pair.
    ///
    /// This is an AND of equality predicates, not tag-set equality: extra
    /// tags on the queue do not prevent a match, and an empty filter
    /// matches every queue.
    pub fn has_all_tags(&self, filter: &[Tag]) -> bool {
        filter.iter().all(|wanted| self.tags.contains(wanted))
    }
}
