use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const GENERATE_FAILED: &str = "生成に失敗しました";
pub const BROADCAST_FAILED: &str = "LINE送信に失敗しました";
pub const MALFORMED_REQUEST: &str = "リクエストの形式が正しくありません";

/// Failure reported to the caller as `{ "error": ..., "details"?: ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn upstream(message: &str) -> Self {
        Self::Upstream {
            message: message.to_owned(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(message) => ErrorBody {
                error: message,
                details: None,
            },
            Self::Upstream { message, details } => ErrorBody {
                error: message,
                details: details.as_deref(),
            },
        };
        (status, Json(body)).into_response()
    }
}
