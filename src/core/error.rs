//! Typed error handling for the dashboard
//!
//! Form actions never surface these errors to the user directly: validation and
//! persistence failures are folded into a [`FormState`](crate::core::FormState).
//! `DashboardError` covers the paths that end a request with an HTTP error
//! status instead: the seed route, the legacy delete action and configuration.
//!
//! # Error Categories
//!
//! - [`SeedError`]: invalid table selection or a failed seeding run
//! - [`StorageError`]: failures reported by a storage backend
//! - `Config`: configuration could not be loaded
//! - `Internal`: unrecoverable failures raised by an action

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::storage::StorageError;

/// The main error type for the dashboard
#[derive(Debug)]
pub enum DashboardError {
    /// Seed route errors
    Seed(SeedError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(String),

    /// Unrecoverable action failure
    Internal(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Seed(e) => write!(f, "{}", e),
            DashboardError::Storage(e) => write!(f, "{}", e),
            DashboardError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DashboardError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Seed(e) => Some(e),
            DashboardError::Storage(e) => Some(e),
            DashboardError::Config(_) | DashboardError::Internal(_) => None,
        }
    }
}

/// Error body returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl DashboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Seed(e) => e.status_code(),
            DashboardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Seed(e) => e.error_code(),
            DashboardError::Storage(_) => "STORAGE_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Client errors carry their full message. Server-side failures are
    /// redacted: the detail only goes to the log.
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            DashboardError::Seed(SeedError::InvalidTable { .. }) => self.to_string(),
            DashboardError::Seed(SeedError::Failed { .. }) => "Database seeding failed".to_string(),
            DashboardError::Storage(_) => "Database error".to_string(),
            DashboardError::Config(_) => "Server misconfigured".to_string(),
            DashboardError::Internal(msg) => msg.clone(),
        };

        ErrorResponse {
            error,
            code: self.error_code().to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Seed Errors
// =============================================================================

/// Errors raised by the seed route
#[derive(Debug)]
pub enum SeedError {
    /// The `table` query parameter named an unknown table
    InvalidTable { table: String },

    /// A seeding run failed and was rolled back
    Failed { message: String },
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::InvalidTable { table } => write!(
                f,
                "Invalid table name: {}. Valid options are: users, customers, invoices, revenue",
                table
            ),
            SeedError::Failed { message } => write!(f, "Seeding failed: {}", message),
        }
    }
}

impl std::error::Error for SeedError {}

impl SeedError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SeedError::InvalidTable { .. } => StatusCode::BAD_REQUEST,
            SeedError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SeedError::InvalidTable { .. } => "INVALID_SEED_TABLE",
            SeedError::Failed { .. } => "SEED_FAILED",
        }
    }
}

impl From<SeedError> for DashboardError {
    fn from(err: SeedError) -> Self {
        DashboardError::Seed(err)
    }
}

impl From<StorageError> for DashboardError {
    fn from(err: StorageError) -> Self {
        DashboardError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_table_returns_400_with_full_message() {
        let err = DashboardError::from(SeedError::InvalidTable {
            table: "bogus".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = err.to_response();
        assert_eq!(
            body.error,
            "Invalid table name: bogus. Valid options are: users, customers, invoices, revenue"
        );
        assert_eq!(body.code, "INVALID_SEED_TABLE");
    }

    #[test]
    fn test_seed_failure_is_redacted() {
        let err = DashboardError::from(SeedError::Failed {
            message: "password authentication failed for user \"postgres\"".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = err.to_response();
        assert_eq!(body.error, "Database seeding failed");
        assert!(!body.error.contains("postgres"));
    }

    #[test]
    fn test_storage_error_is_redacted() {
        let err = DashboardError::from(StorageError::Backend {
            operation: "insert".to_string(),
            message: "relation \"invoices\" does not exist".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_response().error, "Database error");
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_internal_keeps_message() {
        let err = DashboardError::Internal("Failed to Delete Invoice".to_string());
        assert_eq!(err.to_response().error, "Failed to Delete Invoice");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = DashboardError::from(SeedError::Failed {
            message: "boom".to_string(),
        });
        assert!(err.source().is_some());
        assert!(DashboardError::Config("x".into()).source().is_none());
    }
}
