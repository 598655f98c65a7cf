use common::UnknownStatus;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored order row could not be interpreted.
    #[error("Corrupt order record: {0}")]
    Corrupt(#[from] UnknownStatus),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
