use thiserror::Error;

use crate::database::manager::DatabaseError;

// SQLSTATE codes we classify instead of reporting as storage failures
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Kind-based failure of a service or engine operation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage failure: {0}")]
    Storage(DatabaseError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    /// Classify a failure raised while deleting: a foreign key violation there means
    /// the row is still referenced, not that a reference is missing.
    pub fn from_delete(err: DatabaseError) -> Self {
        match err.sqlstate().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => {
                ServiceError::conflict(format!("record is still referenced: {}", constraint_of(&err)))
            }
            _ => err.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::InvalidArgument(_) => "invalid_argument",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::Internal(_) => "internal",
            ServiceError::Storage(_) => "storage",
        }
    }
}

fn constraint_of(err: &DatabaseError) -> String {
    match err {
        DatabaseError::Sqlx(sqlx::Error::Database(db)) => db
            .constraint()
            .map(str::to_string)
            .unwrap_or_else(|| db.message().to_string()),
        other => other.to_string(),
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        if err.is_row_not_found() {
            return ServiceError::not_found("record not found");
        }
        match err.sqlstate().as_deref() {
            Some(UNIQUE_VIOLATION) => ServiceError::conflict(format!("duplicate value: {}", constraint_of(&err))),
            Some(FOREIGN_KEY_VIOLATION) => {
                ServiceError::not_found(format!("referenced record does not exist: {}", constraint_of(&err)))
            }
            Some(NOT_NULL_VIOLATION) | Some(CHECK_VIOLATION) | Some(INVALID_TEXT_REPRESENTATION) => {
                ServiceError::invalid_argument(constraint_of(&err))
            }
            _ => ServiceError::Storage(err),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_found() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn pool_timeouts_are_storage_failures() {
        let err: ServiceError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), "storage");
    }

    #[test]
    fn config_errors_are_storage_failures() {
        let err: ServiceError = DatabaseError::ConfigMissing("DATABASE_URL").into();
        assert!(matches!(err, ServiceError::Storage(DatabaseError::ConfigMissing(_))));
    }
}
