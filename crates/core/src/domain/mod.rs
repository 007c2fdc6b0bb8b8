// Domain Layer - Pure business logic and entities

pub mod error;
pub mod identifier;
pub mod message;
pub mod pattern;
pub mod policy;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use identifier::{IdKind, NAMESPACE};
pub use message::{Message, MessageId};
pub use pattern::GlobPattern;
pub use policy::{Effect, Policy};
pub use queue::{Queue, QueueId, Tag};
