use crate::application::booking::BookingApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// アプリケーション層のエラー
    Application(BookingApplicationError),
    /// 操作者を示すヘッダーが無い、または不正
    MissingActingUser(String),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::MissingActingUser(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),

            ApiError::Application(err) => match err {
                BookingApplicationError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
                }
                BookingApplicationError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg)
                }
                BookingApplicationError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg)
                }
                BookingApplicationError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),

                // 500 Internal Server Error - システム障害
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                e @ (BookingApplicationError::RepositoryError(_)
                | BookingApplicationError::ItemDirectoryError(_)
                | BookingApplicationError::UserDirectoryError(_)) => {
                    tracing::error!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        "Unexpected error happened"
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An unexpected error occurred".to_string(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
