// Error types shared across the catalog, storage and HTTP layers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Failures talking to the catalog backend or turning paths into URLs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("Backend request failed: {message}")]
    Backend {
        message: String,
        transient: bool,
    },

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Catalog query for '{collection}' failed: {message}")]
    Query { collection: String, message: String },

    /// The caller's bucket/path pair is not a relative object reference.
    #[error("Invalid object reference {bucket}/{path}: {reason}")]
    InvalidReference {
        bucket: String,
        path: String,
        reason: String,
    },

    /// The backend answered but gave no usable URL.
    #[error("Could not resolve {bucket}/{path}: {reason}")]
    Resolution {
        bucket: String,
        path: String,
        reason: String,
    },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl CatalogError {
    pub fn invalid_reference(bucket: &str, path: &str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidReference {
            bucket: bucket.to_string(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn resolution(bucket: &str, path: &str, reason: impl Into<String>) -> Self {
        CatalogError::Resolution {
            bucket: bucket.to_string(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Network failures, rate limiting and server-side errors are transient;
    /// client errors (bad bucket, missing object, auth) are not.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Backend { transient, .. } => *transient,
            CatalogError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogError::Decode(err.to_string());
        }
        CatalogError::Backend {
            transient: err.is_timeout() || err.is_connect() || err.is_request(),
            message: err.to_string(),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Coarse error classification exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogErrorKind {
    /// The row query failed; no projects are available.
    Query,
    /// At least one row has media that could not be resolved.
    Resolution,
}

impl std::fmt::Display for CatalogErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogErrorKind::Query => write!(f, "query"),
            CatalogErrorKind::Resolution => write!(f, "resolution"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Catalog(CatalogError::InvalidReference { .. }) => StatusCode::BAD_REQUEST,
            AppError::Catalog(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match &self {
            AppError::Validation(errors) => serde_json::json!({
                "error": self.to_string(),
                "fields": errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>(),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let server_error = CatalogError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(server_error.is_transient());

        let rate_limited = CatalogError::Status {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(rate_limited.is_transient());

        let not_found = CatalogError::Status {
            status: 404,
            message: "Object not found".to_string(),
        };
        assert!(!not_found.is_transient());

        let bad_path = CatalogError::invalid_reference("images", "", "empty path");
        assert!(!bad_path.is_transient());
    }

    #[test]
    fn test_status_codes() {
        let err = AppError::Catalog(CatalogError::invalid_reference("videos", "/abs.mp4", "leading slash"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::Catalog(CatalogError::resolution("videos", "v1.mp4", "response carried no signedURL"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = AppError::Catalog(CatalogError::Backend {
            message: "connection refused".to_string(),
            transient: true,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = AppError::Catalog(CatalogError::Status {
            status: 404,
            message: "missing".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&CatalogErrorKind::Resolution).unwrap();
        assert_eq!(json, "\"resolution\"");
    }
}
