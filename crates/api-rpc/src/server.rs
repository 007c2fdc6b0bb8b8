//! JSON-RPC Server
//!
//! Serves the queue API as JSON-RPC 2.0 over HTTP.

use crate::handler::RpcHandler;
use courier_core::error::{AppError, Result};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 picks a free port
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// Register `$method` so that it parses `RpcParams` and calls `handler.$call`
macro_rules! register {
    ($module:expr, $handler:expr, $method:literal, $call:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($method, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: crate::types::RpcParams = params.parse()?;
                    handler.$call(req).await
                }
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }};
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, handler: RpcHandler) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
        }
    }

    /// Bind and start serving. Returns the bound address and the handle
    /// used to stop the server.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = server.local_addr()?;

        let mut module = RpcModule::new(());

        // Queue APIs
        register!(module, self.handler, "queue.create.v1", create_queue);
        register!(module, self.handler, "queue.delete.v1", delete_queue);
        register!(module, self.handler, "queue.describe.v1", describe_queues);
        register!(module, self.handler, "queue.status.v1", queue_status);
        register!(module, self.handler, "queue.purge.v1", purge_queue);
        register!(module, self.handler, "queue.tags.update.v1", update_queue_tags);

        // Message APIs
        register!(module, self.handler, "message.push.v1", push_message);
        register!(module, self.handler, "message.pop.v1", pop_message);

        // Admin APIs
        register!(module, self.handler, "admin.metrics.v1", metrics);

        info!(address = %local_addr, "JSON-RPC server started");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}
