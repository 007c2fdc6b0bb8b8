// ID Provider Port (for deterministic testing)

use crate::domain::identifier::{self, IdKind};

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique namespaced ID of the given kind
    fn generate_id(&self, kind: IdKind) -> String;
}

/// CSPRNG-backed provider (production)
pub struct SecureIdProvider;

impl IdProvider for SecureIdProvider {
    fn generate_id(&self, kind: IdKind) -> String {
        identifier::new_id(kind)
    }
}

/// Sequential provider: `msg:<kind>:` followed by a zero-padded counter
pub struct SequentialIdProvider {
    counter: std::sync::atomic::AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self, kind: IdKind) -> String {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{}{:032x}", kind.prefix(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_are_well_formed() {
        let provider = SequentialIdProvider::new();
        let first = provider.generate_id(IdKind::Queue);
        let second = provider.generate_id(IdKind::Message);

        assert_eq!(first, format!("msg:queue:{:032x}", 1));
        assert_eq!(second, format!("msg:message:{:032x}", 2));
    }
}
