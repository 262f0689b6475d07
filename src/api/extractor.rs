use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::domain::value_objects::UserId;

use super::error::ApiError;

/// 操作者のユーザーIDを運ぶヘッダー
pub const ACTING_USER_HEADER: &str = "X-Sharer-User-Id";

/// ヘッダーから取り出した操作者
///
/// 認証はこのサービスの範囲外。前段で検証済みのユーザーIDが渡される前提。
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(ACTING_USER_HEADER).ok_or_else(|| {
            ApiError::MissingActingUser(format!("{} header is required", ACTING_USER_HEADER))
        })?;

        let user_id = value
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| {
                ApiError::MissingActingUser(format!("{} header must be a UUID", ACTING_USER_HEADER))
            })?;

        Ok(ActingUser(UserId::from_uuid(user_id)))
    }
}
