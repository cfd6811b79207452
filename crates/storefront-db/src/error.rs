use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    /// A uniqueness constraint rejected the write
    Conflict(String),
    /// A stored value could not be mapped back onto its domain type
    Decode(String),
}

impl StoreError {
    /// Map a unique violation to [`StoreError::Conflict`] with `message`,
    /// anything else to [`StoreError::Database`].
    pub(crate) fn conflict_or_database(e: sqlx::Error, message: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(message.to_string())
            }
            _ => Self::Database(e),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(e) => write!(f, "Database error: {e}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Decode(msg) => write!(f, "Decode error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e)
    }
}
