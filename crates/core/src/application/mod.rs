// Application Layer - Use Cases and Business Logic

pub mod access;
pub mod messaging;
pub mod validate;

// Re-exports
pub use access::{AccessManager, Decision};
pub use messaging::MessagingService;
