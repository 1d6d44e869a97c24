//! API Response wrapper

use axum::{http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use governo_core::error::{DomainError, TimeLabelError};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Map a domain error onto status code and error code.
pub fn domain_failure(err: &DomainError) -> ApiFailure {
    let (status, code) = match err {
        DomainError::Transport(_) | DomainError::Backend { .. } | DomainError::DatabaseError(_) => {
            (StatusCode::BAD_GATEWAY, "BACKEND_ERROR")
        }
        DomainError::MalformedResponse(_) | DomainError::Decode { .. } => {
            (StatusCode::BAD_GATEWAY, "DECODE_ERROR")
        }
    };
    (status, Json(ApiResponse::error(code, &err.to_string())))
}

/// A bad date is the caller's fault; a template failure is ours.
pub fn time_label_failure(err: &TimeLabelError) -> ApiFailure {
    let (status, code) = match err {
        TimeLabelError::InvalidDate { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        TimeLabelError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    (status, Json(ApiResponse::error(code, &err.to_string())))
}
