// Port Layer - Interfaces for external dependencies

pub mod credentials;
pub mod id_provider; // For deterministic testing
pub mod message_store;
pub mod queue_store;
pub mod stats;
pub mod time_provider;

// Re-exports
pub use credentials::CredentialVerifier;
pub use id_provider::IdProvider;
pub use message_store::MessageStore;
pub use queue_store::QueueStore;
pub use stats::{MetricsExporter, NoopStatsReporter, StatsReporter};
pub use time_provider::TimeProvider;
