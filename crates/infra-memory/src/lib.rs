// Courier In-Memory Storage
// Volatile QueueStore / MessageStore implementations (tests, single-node dev)

pub mod message_store;
pub mod queue_store;

pub use message_store::InMemoryMessageStore;
pub use queue_store::InMemoryQueueStore;
