//! RPC Method Handlers
//!
//! Each method authenticates, decodes its fields, authorizes against the
//! policy engine, then dispatches to the messaging service.

use crate::error::{forbidden, invalid_params, to_rpc_error, unauthenticated};
use crate::permission::{all_queues, metrics_resource, Action};
use crate::types::{
    CreateQueueRequest, CreateQueueResponse, DescribeQueuesRequest, Empty, PoppedMessage,
    PushMessageParams, PushMessageResponse, QueueRequest, QueueStatus, RpcParams,
    UpdateQueueTagsRequest,
};
use courier_core::application::messaging::PushMessageRequest;
use courier_core::application::validate::validate_id;
use courier_core::application::{AccessManager, MessagingService};
use courier_core::domain::{IdKind, Queue};
use courier_core::error::AppError;
use courier_core::port::{CredentialVerifier, MetricsExporter};
use jsonrpsee::types::ErrorObjectOwned;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<MessagingService>,
    access: Arc<AccessManager>,
    credentials: Arc<dyn CredentialVerifier>,
    metrics: Arc<dyn MetricsExporter>,
}

impl RpcHandler {
    pub fn new(
        service: Arc<MessagingService>,
        access: Arc<AccessManager>,
        credentials: Arc<dyn CredentialVerifier>,
        metrics: Arc<dyn MetricsExporter>,
    ) -> Self {
        Self {
            service,
            access,
            credentials,
            metrics,
        }
    }

    /// Resolve the caller's subject name from the `auth` field
    fn authenticate(&self, params: &RpcParams) -> RpcResult<String> {
        let Some(auth) = params.auth.as_ref() else {
            debug!("Request without credentials");
            return Err(unauthenticated());
        };

        if auth.access_key.is_empty()
            || !self
                .credentials
                .valid_credentials(&auth.access_key, &auth.secret)
        {
            warn!(access_key = %auth.access_key, "Authentication failed");
            return Err(unauthenticated());
        }

        Ok(auth.access_key.clone())
    }

    fn authorize(&self, subject: &str, action: Action, resource: &str) -> RpcResult<()> {
        let permission = action.permission();
        let decision = self.access.evaluate(resource, subject, &permission);
        if !decision.granted {
            warn!(
                subject,
                permission = %permission,
                resource,
                policy = decision.policy_id.as_deref().unwrap_or("-"),
                "Access denied"
            );
            return Err(forbidden(&permission, resource));
        }
        Ok(())
    }

    /// Authenticate, then decode the operation's own fields
    fn open<T: DeserializeOwned>(&self, params: RpcParams) -> RpcResult<(String, T)> {
        let subject = self.authenticate(&params)?;
        let request = serde_json::from_value(serde_json::Value::Object(params.fields))
            .map_err(invalid_params)?;
        Ok((subject, request))
    }

    /// Reject a malformed queue id before it is used as a policy resource
    fn check_queue_id(queue_id: &str) -> RpcResult<()> {
        validate_id(queue_id, IdKind::Queue, "queue_id")
            .map_err(|e| to_rpc_error(AppError::from(e)))
    }

    /// queue.create.v1
    pub async fn create_queue(&self, params: RpcParams) -> RpcResult<CreateQueueResponse> {
        let (subject, req): (_, CreateQueueRequest) = self.open(params)?;
        self.authorize(&subject, Action::CreateQueue, &all_queues())?;

        self.service.create_queue(req).await.map_err(to_rpc_error)
    }

    /// queue.delete.v1
    pub async fn delete_queue(&self, params: RpcParams) -> RpcResult<Empty> {
        let (subject, req): (_, QueueRequest) = self.open(params)?;
        Self::check_queue_id(&req.queue_id)?;
        self.authorize(&subject, Action::DeleteQueue, &req.queue_id)?;

        self.service.delete_queue(req).await.map_err(to_rpc_error)?;
        Ok(Empty {})
    }

    /// queue.describe.v1
    pub async fn describe_queues(&self, params: RpcParams) -> RpcResult<Vec<Queue>> {
        let (subject, req): (_, DescribeQueuesRequest) = self.open(params)?;
        self.authorize(&subject, Action::DescribeQueues, &all_queues())?;

        self.service.describe_queues(req).await.map_err(to_rpc_error)
    }

    /// queue.status.v1
    pub async fn queue_status(&self, params: RpcParams) -> RpcResult<QueueStatus> {
        let (subject, req): (_, QueueRequest) = self.open(params)?;
        Self::check_queue_id(&req.queue_id)?;
        self.authorize(&subject, Action::DescribeQueueStatus, &req.queue_id)?;

        self.service
            .describe_queue_status(req)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.purge.v1
    pub async fn purge_queue(&self, params: RpcParams) -> RpcResult<Empty> {
        let (subject, req): (_, QueueRequest) = self.open(params)?;
        Self::check_queue_id(&req.queue_id)?;
        self.authorize(&subject, Action::PurgeQueue, &req.queue_id)?;

        self.service.purge_queue(req).await.map_err(to_rpc_error)?;
        Ok(Empty {})
    }

    /// queue.tags.update.v1
    pub async fn update_queue_tags(&self, params: RpcParams) -> RpcResult<Empty> {
        let (subject, req): (_, UpdateQueueTagsRequest) = self.open(params)?;
        Self::check_queue_id(&req.queue_id)?;
        self.authorize(&subject, Action::UpdateQueueTags, &req.queue_id)?;

        self.service
            .update_queue_tags(req)
            .await
            .map_err(to_rpc_error)?;
        Ok(Empty {})
    }

    /// message.push.v1
    pub async fn push_message(&self, params: RpcParams) -> RpcResult<PushMessageResponse> {
        let (subject, req): (_, PushMessageParams) = self.open(params)?;
        Self::check_queue_id(&req.queue_id)?;
        self.authorize(&subject, Action::PushMessage, &req.queue_id)?;

        self.service
            .push_message(PushMessageRequest {
                queue_id: req.queue_id,
                content_type: req.content_type,
                body: req.body.into_bytes(),
            })
            .await
            .map_err(to_rpc_error)
    }

    /// message.pop.v1
    pub async fn pop_message(&self, params: RpcParams) -> RpcResult<Option<PoppedMessage>> {
        let (subject, req): (_, QueueRequest) = self.open(params)?;
        Self::check_queue_id(&req.queue_id)?;
        self.authorize(&subject, Action::PopMessage, &req.queue_id)?;

        let message = self.service.pop_message(req).await.map_err(to_rpc_error)?;
        Ok(message.map(PoppedMessage::from))
    }

    /// admin.metrics.v1 - Prometheus text
    pub async fn metrics(&self, params: RpcParams) -> RpcResult<String> {
        let subject = self.authenticate(&params)?;
        self.authorize(&subject, Action::GetMetrics, &metrics_resource())?;

        self.service.record_gauges().await.map_err(to_rpc_error)?;
        Ok(self.metrics.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::KeyManager;
    use crate::error::code;
    use courier_core::domain::Policy;
    use courier_core::port::id_provider::SequentialIdProvider;
    use courier_core::port::time_provider::SystemTimeProvider;
    use courier_core::port::QueueStore;
    use courier_infra_memory::{InMemoryMessageStore, InMemoryQueueStore};
    use courier_infra_metrics::{sample_value, PrometheusStats};
    use serde_json::{json, Value};

    struct Fixture {
        handler: RpcHandler,
        queues: Arc<InMemoryQueueStore>,
    }

    fn fixture(policies: Vec<Policy>) -> Fixture {
        let queues = Arc::new(InMemoryQueueStore::new());
        let stats = Arc::new(PrometheusStats::new());
        let service = Arc::new(MessagingService::new(
            queues.clone(),
            Arc::new(InMemoryMessageStore::new()),
            stats.clone(),
            Arc::new(SequentialIdProvider::new()),
            Arc::new(SystemTimeProvider),
        ));

        let mut access = AccessManager::new();
        for policy in policies {
            access.add_policy(policy).unwrap();
        }

        let mut keys = KeyManager::new();
        keys.add_key("alice", "pw").unwrap();

        Fixture {
            handler: RpcHandler::new(service, Arc::new(access), Arc::new(keys), stats),
            queues,
        }
    }

    fn params(secret: &str, fields: Value) -> RpcParams {
        let mut value = fields;
        value["auth"] = json!({"access_key": "alice", "secret": secret});
        serde_json::from_value(value).unwrap()
    }

    fn allow_all() -> Vec<Policy> {
        vec![Policy::new().permission("msg::*")]
    }

    #[tokio::test]
    async fn test_full_flow() {
        let f = fixture(allow_all());

        let created = f
            .handler
            .create_queue(params("pw", json!({"tags": [{"key": "env", "value": "prod"}]})))
            .await
            .unwrap();
        let queue_id = created.id.clone();

        f.handler
            .push_message(params(
                "pw",
                json!({"queue_id": queue_id, "content_type": "text/plain", "body": "hello"}),
            ))
            .await
            .unwrap();

        let status = f
            .handler
            .queue_status(params("pw", json!({"queue_id": queue_id})))
            .await
            .unwrap();
        assert_eq!(status.message_count, 1);

        let popped = f
            .handler
            .pop_message(params("pw", json!({"queue_id": queue_id})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(popped.body, "hello");
        assert_eq!(popped.queue_id, queue_id);

        let empty = f
            .handler
            .pop_message(params("pw", json!({"queue_id": queue_id})))
            .await
            .unwrap();
        assert!(empty.is_none());

        let text = f.handler.metrics(params("pw", json!({}))).await.unwrap();
        assert_eq!(sample_value(&text, "msg_queue_created"), Some(1.0));
        assert_eq!(sample_value(&text, "msg_message_popped"), Some(1.0));
        assert_eq!(sample_value(&text, "msg_messages_pending"), Some(0.0));
        assert_eq!(sample_value(&text, "msg_queue_tag_count"), Some(1.0));
    }

    #[tokio::test]
    async fn test_bad_credentials_never_reach_storage() {
        let f = fixture(allow_all());

        let err = f
            .handler
            .create_queue(params("wrong", json!({"tags": []})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::UNAUTHENTICATED);

        let anonymous: RpcParams = serde_json::from_value(json!({"tags": []})).unwrap();
        let err = f.handler.create_queue(anonymous).await.unwrap_err();
        assert_eq!(err.code(), code::UNAUTHENTICATED);

        assert!(f.queues.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_never_reaches_storage() {
        let f = fixture(vec![
            Policy::new().permission("msg::*"),
            Policy::new().permission("msg::CreateQueue").deny(),
        ]);

        let err = f
            .handler
            .create_queue(params("pw", json!({"tags": []})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::FORBIDDEN);
        assert!(f.queues.list().await.unwrap().is_empty());

        // default deny when nothing matches
        let f = fixture(Vec::new());
        let err = f.handler.metrics(params("pw", json!({}))).await.unwrap_err();
        assert_eq!(err.code(), code::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_queue_scoped_resource() {
        let f = fixture(vec![
            Policy::new().permission("msg::CreateQueue"),
            Policy::new()
                .for_resource("msg:queue:*")
                .permission("msg::PushMessage"),
        ]);

        let created = f
            .handler
            .create_queue(params("pw", json!({"tags": []})))
            .await
            .unwrap();

        let pushed = f
            .handler
            .push_message(params(
                "pw",
                json!({"queue_id": created.id, "content_type": "text/plain", "body": "x"}),
            ))
            .await;
        assert!(pushed.is_ok());

        let err = f
            .handler
            .pop_message(params("pw", json!({"queue_id": created.id})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_error_codes() {
        let f = fixture(allow_all());

        let err = f
            .handler
            .update_queue_tags(params("pw", json!({"queue_id": "msg:queue:00", "tags": "nope"})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::INVALID_ARGUMENT);

        let err = f
            .handler
            .create_queue(params("pw", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::INVALID_ARGUMENT);

        let err = f
            .handler
            .queue_status(params("pw", json!({"queue_id": "msg:queue:00"})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::QUEUE_NOT_FOUND);

        let err = f
            .handler
            .push_message(params(
                "pw",
                json!({"queue_id": "msg:queue:00", "content_type": "text/plain", "body": ""}),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::INVALID_ARGUMENT);
    }

    #[tokio::test]
    async fn test_malformed_queue_id_beats_resource_scoped_policy() {
        let f = fixture(vec![Policy::new()
            .for_resource("msg:queue:*")
            .permission("msg::*")]);

        // missing queue_id decodes to "" which no queue-scoped policy matches
        let err = f.handler.purge_queue(params("pw", json!({}))).await.unwrap_err();
        assert_eq!(err.code(), code::INVALID_ARGUMENT);

        let err = f
            .handler
            .pop_message(params("pw", json!({"queue_id": "msg:message:01"})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::INVALID_ARGUMENT);

        for result in [
            f.handler.delete_queue(params("pw", json!({}))).await.map(|_| ()),
            f.handler.queue_status(params("pw", json!({}))).await.map(|_| ()),
            f.handler
                .update_queue_tags(params("pw", json!({"tags": []})))
                .await
                .map(|_| ()),
            f.handler
                .push_message(params("pw", json!({"content_type": "text/plain", "body": "x"})))
                .await
                .map(|_| ()),
        ] {
            assert_eq!(result.unwrap_err().code(), code::INVALID_ARGUMENT);
        }

        // a well-formed id still goes through the policy
        let err = f
            .handler
            .queue_status(params("pw", json!({"queue_id": "msg:queue:01"})))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::QUEUE_NOT_FOUND);
    }
}
