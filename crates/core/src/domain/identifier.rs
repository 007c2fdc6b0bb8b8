// Namespaced Identifiers
//
// Wire format: "<namespace>:<kind>:<hex>". Callers validate against the
// prefix, so the namespace and kind tokens must never change.

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// Namespace shared by every identifier this service hands out
pub const NAMESPACE: &str = "msg";

/// Random bytes per identifier (128 bits of entropy)
const ID_ENTROPY_BYTES: usize = 16;

/// Kind token embedded in an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Queue,
    Message,
}

impl IdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdKind::Queue => "queue",
            IdKind::Message => "message",
        }
    }

    /// Prefix every identifier of this kind starts with, e.g. `msg:queue:`
    pub fn prefix(&self) -> String {
        format!("{}:{}:", NAMESPACE, self.as_str())
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a fresh identifier from the OS CSPRNG
pub fn new_id(kind: IdKind) -> String {
    let mut bytes = [0u8; ID_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", kind.prefix(), hex::encode(bytes))
}

/// True if `value` is non-empty and carries the prefix for `kind`
pub fn has_kind(value: &str, kind: IdKind) -> bool {
    !value.is_empty() && value.starts_with(&kind.prefix())
}
