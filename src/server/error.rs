//! Error responses of the read API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, ErrorCode};

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    name: String,
    code: ErrorCode,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, kind, message) = match self {
            AppError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, "ResourceNotFound", message)
            }
            other => {
                tracing::error!("Request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            message,
            error: ErrorDetail {
                name: format!("{kind}: {code}"),
                code,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_sent() {
        let (status, body) = render(AppError::storage("tasks.jsonl:17", "expected value")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "message": "Internal server error",
                "error": {"name": "InternalError: UndefinedError", "code": -1},
            })
        );
        assert!(!body.to_string().contains("tasks.jsonl"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = render(AppError::task_not_found(7)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Task 7 not found");
        assert_eq!(body["error"]["code"], 10);
    }
}
