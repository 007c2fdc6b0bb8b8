// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Expected {field} to be of format '{expected}<id>', but got '{value}'")]
    InvalidIdentifier {
        field: String,
        expected: String,
        value: String,
    },

    #[error("Expected {0} to not be empty")]
    MissingField(String),

    #[error("Expected '{0}' to be an array")]
    NotAnArray(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
