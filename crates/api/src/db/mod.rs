//! Database access layer.
//!
//! Repositories are thin structs over a `PgPool` reference. Methods that must
//! run inside a caller-owned transaction are associated functions taking a
//! `&mut PgConnection`, so a service can compose several of them under one
//! `pool.begin()` boundary.
//!
//! All queries use the sqlx function-form API with explicit row structs.

pub mod carts;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors from the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation, otherwise
/// pass it through as a database error.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Map a sqlx error to `Conflict` when it is a foreign key violation,
/// otherwise pass it through as a database error.
///
/// Used on deletes where another table still points at the row; the caller's
/// message tells the client what is holding the reference.
pub(crate) fn conflict_on_reference(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    enum Violation {
        Unique,
        ForeignKey,
    }

    #[derive(Debug)]
    struct FakeDbError(Violation);

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violated")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                Violation::Unique => ErrorKind::UniqueViolation,
                Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(violation: Violation) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError(violation)))
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = conflict_on_unique(db_error(Violation::Unique), "name taken");
        assert!(matches!(err, RepositoryError::Conflict(msg) if msg == "name taken"));
    }

    #[test]
    fn test_unique_classifier_passes_other_violations_through() {
        let err = conflict_on_unique(db_error(Violation::ForeignKey), "name taken");
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_foreign_key_violation_becomes_conflict() {
        let err = conflict_on_reference(db_error(Violation::ForeignKey), "still referenced");
        assert!(matches!(err, RepositoryError::Conflict(msg) if msg == "still referenced"));
    }

    #[test]
    fn test_reference_classifier_passes_other_violations_through() {
        let err = conflict_on_reference(db_error(Violation::Unique), "still referenced");
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
