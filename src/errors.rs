use axum::http::StatusCode;
use thiserror::Error;

/// Failures the check-in store can report. Unreadable persisted data is
/// never one of them; loading falls back to defaults instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("prayer type must not be empty")]
    EmptyPrayerType,

    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyPrayerType => Self::bad_request(err.to_string()),
            other => {
                tracing::error!("store operation failed: {other}");
                Self::internal(other)
            }
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
