// Request Validation
//
// Runs before any storage access. Every failure names the offending field.

use crate::domain::identifier::{self, IdKind};
use crate::domain::DomainError;

type Result<T> = std::result::Result<T, DomainError>;

/// Reject empty strings and empty byte payloads
pub fn require_non_empty<T: AsRef<[u8]> + ?Sized>(value: &T, field: &str) -> Result<()> {
    if value.as_ref().is_empty() {
        return Err(DomainError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Require a list-shaped field to be present (it may be empty)
pub fn require_array<'a, T>(value: Option<&'a [T]>, field: &str) -> Result<&'a [T]> {
    value.ok_or_else(|| DomainError::NotAnArray(field.to_string()))
}

/// Require a well-formed `msg:<kind>:` identifier
pub fn validate_id(value: &str, kind: IdKind, field: &str) -> Result<()> {
    if !identifier::has_kind(value, kind) {
        return Err(DomainError::InvalidIdentifier {
            field: field.to_string(),
            expected: kind.prefix(),
            value: value.to_string(),
        });
    }
    Ok(())
}
