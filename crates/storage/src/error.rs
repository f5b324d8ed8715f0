use thiserror::Error;
use uuid::Uuid;

use crate::entity::EntityKind;
use crate::query::QueryError;
use crate::scope::AuthorizationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error("{entity} {id} does not exist")]
    InvalidReference { entity: EntityKind, id: Uuid },
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Turns unique and foreign key violations into [`StorageError::ConstraintViolation`].
    pub(crate) fn classify(self) -> Self {
        if !(self.is_unique_violation() || self.is_foreign_key_violation()) {
            return self;
        }
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => {
                let message = match e.constraint() {
                    Some(constraint) => format!("{} ({constraint})", e.message()),
                    None => e.message().to_string(),
                };
                StorageError::ConstraintViolation(message)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Operation;

    #[test]
    fn test_non_database_errors_are_not_classified() {
        assert!(matches!(
            StorageError::NotFound.classify(),
            StorageError::NotFound
        ));
        assert!(!StorageError::NotFound.is_unique_violation());
    }

    #[test]
    fn test_authorization_message_is_passed_through() {
        let error = StorageError::from(AuthorizationError::OperationDenied {
            entity: EntityKind::Coach,
            operation: Operation::Delete,
        });
        assert_eq!(error.to_string(), "not permitted to delete coach");
    }

    #[test]
    fn test_invalid_reference_message() {
        let id = Uuid::nil();
        let error = StorageError::InvalidReference {
            entity: EntityKind::Academy,
            id,
        };
        assert_eq!(error.to_string(), format!("academy {id} does not exist"));
    }
}
