//! RPC Request/Response Types
//!
//! Every method's params object carries `auth` next to the operation's own
//! fields. Records with no transport-specific shape reuse the core ones.

use chrono::{DateTime, Utc};
use courier_core::domain::Message;
use serde::{Deserialize, Serialize};

pub use courier_core::application::messaging::{
    CreateQueueRequest, CreateQueueResponse, DescribeQueuesRequest, PushMessageResponse,
    QueueRequest, QueueStatus, UpdateQueueTagsRequest,
};

/// Caller credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret: String,
}

/// Raw params: credentials plus the still-undecoded operation fields.
///
/// Fields are decoded only after authentication so that an anonymous
/// caller learns nothing about request validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcParams {
    #[serde(default)]
    pub auth: Option<Credentials>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// message.push.v1 - body travels as a UTF-8 string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushMessageParams {
    #[serde(default)]
    pub queue_id: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub body: String,
}

/// message.pop.v1 result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoppedMessage {
    pub id: String,
    pub queue_id: String,
    pub content_type: String,
    /// Decoded lossily: invalid UTF-8 becomes U+FFFD
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for PoppedMessage {
    fn from(message: Message) -> Self {
        Self {
            body: String::from_utf8_lossy(&message.body).into_owned(),
            id: message.id,
            queue_id: message.queue_id,
            content_type: message.content_type,
            created_at: message.created_at,
        }
    }
}

/// Result of operations that return nothing; serializes as `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_params_split_auth_from_fields() {
        let params: RpcParams = serde_json::from_value(json!({
            "auth": {"access_key": "alice", "secret": "pw"},
            "queue_id": "msg:queue:01",
            "tags": [{"key": "env", "value": "prod"}]
        }))
        .unwrap();

        assert_eq!(params.auth.unwrap().access_key, "alice");
        assert_eq!(params.fields.len(), 2);
        assert!(!params.fields.contains_key("auth"));
    }

    #[test]
    fn test_params_without_auth() {
        let params: RpcParams = serde_json::from_value(json!({"queue_id": "x"})).unwrap();
        assert!(params.auth.is_none());
    }

    #[test]
    fn test_popped_message_is_lossy_and_rfc3339() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let message = Message::new("msg:message:01", "msg:queue:01", "text/plain", vec![b'h', b'i', 0xff], created_at);

        let popped = PoppedMessage::from(message);
        assert_eq!(popped.body, "hi\u{fffd}");

        let value = serde_json::to_value(&popped).unwrap();
        assert_eq!(value["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_empty_serializes_as_object() {
        assert_eq!(serde_json::to_value(Empty {}).unwrap(), json!({}));
    }
}
