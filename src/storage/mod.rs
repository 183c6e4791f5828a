//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

/// Errors reported by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend rejected or failed an operation
    #[error("storage operation '{operation}' failed: {message}")]
    Backend { operation: String, message: String },

    /// Could not reach the backend
    #[error("storage connection failed: {0}")]
    Connection(String),

    /// Shared in-process state was poisoned by a panicking writer
    #[error("storage lock poisoned: {0}")]
    Lock(String),
}

impl StorageError {
    pub fn backend(operation: impl Into<String>, message: impl ToString) -> Self {
        StorageError::Backend {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}
