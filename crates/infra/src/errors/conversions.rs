//! Conversions from external infrastructure errors into domain errors.
//!
//! Anything that goes wrong below the gateway becomes
//! `CadenceError::PersistenceFailure`, except a missing row, which is
//! `NotFound`.

use cadence_domain::CadenceError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CadenceError);

impl From<InfraError> for CadenceError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CadenceError> for InfraError {
    fn from(value: CadenceError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCadenceError {
    fn into_cadence(self) -> CadenceError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CadenceError */
/* -------------------------------------------------------------------------- */

impl IntoCadenceError for SqlError {
    fn into_cadence(self) -> CadenceError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        CadenceError::PersistenceFailure("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        CadenceError::PersistenceFailure("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        CadenceError::PersistenceFailure("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        CadenceError::PersistenceFailure("foreign key constraint violation".into())
                    }
                    (ErrorCode::DiskFull, _) => {
                        CadenceError::PersistenceFailure("database disk is full".into())
                    }
                    _ => CadenceError::PersistenceFailure(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => CadenceError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                CadenceError::PersistenceFailure(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                CadenceError::PersistenceFailure(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => CadenceError::PersistenceFailure(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => CadenceError::PersistenceFailure(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_cadence())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → CadenceError */
/* -------------------------------------------------------------------------- */

impl IntoCadenceError for r2d2::Error {
    fn into_cadence(self) -> CadenceError {
        CadenceError::PersistenceFailure(format!("connection pool unavailable: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_cadence())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → CadenceError */
/* -------------------------------------------------------------------------- */

impl IntoCadenceError for JoinError {
    fn into_cadence(self) -> CadenceError {
        if self.is_cancelled() {
            CadenceError::PersistenceFailure("blocking database task cancelled".into())
        } else {
            CadenceError::PersistenceFailure(format!("blocking database task failed: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_cadence())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::ffi::{Error as FfiError, ErrorCode};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_persistence_failure() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: CadenceError = InfraError::from(err).into();
        match mapped {
            CadenceError::PersistenceFailure(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected persistence failure, got {:?}", other),
        }
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: CadenceError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, CadenceError::NotFound(_)));
        assert!(!mapped.is_retryable());
    }

    #[test]
    fn unique_violation_is_retryable_persistence_failure() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 2067 },
            None,
        );
        let mapped: CadenceError = InfraError::from(err).into();
        assert_eq!(mapped.label(), "persistence_failure");
        assert!(mapped.is_retryable());
    }
}
