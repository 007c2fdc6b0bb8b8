//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use courier_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const INVALID_ARGUMENT: i32 = 4000;
    pub const QUEUE_NOT_FOUND: i32 = 4004;
    pub const UNAUTHENTICATED: i32 = 4010;
    pub const FORBIDDEN: i32 = 4030;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::InvalidArgument(msg) => {
            ErrorObjectOwned::owned(code::INVALID_ARGUMENT, msg, None::<()>)
        }
        AppError::QueueNotFound(id) => ErrorObjectOwned::owned(
            code::QUEUE_NOT_FOUND,
            format!("Queue not found: {}", id),
            None::<()>,
        ),
        AppError::Storage(msg) => ErrorObjectOwned::owned(code::STORAGE_ERROR, msg, None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::STORAGE_ERROR, e.to_string(), None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// Request fields that do not decode into the operation's record
pub fn invalid_params(err: serde_json::Error) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code::INVALID_ARGUMENT, err.to_string(), None::<()>)
}

pub fn unauthenticated() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code::UNAUTHENTICATED, "Invalid access key or secret", None::<()>)
}

pub fn forbidden(permission: &str, resource: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::FORBIDDEN,
        format!("Not allowed to {} on {}", permission, resource),
        None::<()>,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_error_kind() {
        assert_eq!(to_rpc_error(AppError::InvalidArgument("x".into())).code(), 4000);
        assert_eq!(to_rpc_error(AppError::QueueNotFound("q".into())).code(), 4004);
        assert_eq!(to_rpc_error(AppError::Storage("disk".into())).code(), 5001);
        assert_eq!(to_rpc_error(AppError::Internal("bug".into())).code(), 5000);
        assert_eq!(unauthenticated().code(), 4010);
        assert_eq!(forbidden("msg::PopMessage", "msg:queue:1").code(), 4030);
    }
}
