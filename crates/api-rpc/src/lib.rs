//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for the Courier message queue.

pub mod auth;
pub mod error;
pub mod handler;
pub mod permission;
pub mod server;
pub mod types;

pub use auth::KeyManager;
pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
