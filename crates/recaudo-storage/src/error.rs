use thiserror::Error;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("duplicate entry")]
    Duplicate,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return Self::Duplicate;
            }
        }
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = StorageError::not_found("collector", 12);
        assert_eq!(err.to_string(), "collector 12 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn duplicate_message_does_not_leak_constraint_names() {
        assert_eq!(StorageError::Duplicate.to_string(), "duplicate entry");
    }

    #[test]
    fn row_not_found_maps_to_database_variant() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::Database(_)));
    }
}
