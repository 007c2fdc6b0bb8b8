// sqlx::Error -> AppError::Storage

use courier_core::AppError;

/// Every sqlx failure is a storage failure; only contention gets its own message
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        // SQLITE_BUSY / SQLITE_LOCKED
        if matches!(db_err.code().as_deref(), Some("5") | Some("6")) {
            return AppError::Storage(format!("Database locked: {}", db_err.message()));
        }
    }
    AppError::Storage(err.to_string())
}
