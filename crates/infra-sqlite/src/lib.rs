// Courier Infrastructure - SQLite Adapter
// Implements: QueueStore, MessageStore

mod connection;
mod error;
mod message_store;
mod migration;
mod queue_store;

pub use connection::create_pool;
pub use message_store::SqliteMessageStore;
pub use migration::run_migrations;
pub use queue_store::SqliteQueueStore;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
