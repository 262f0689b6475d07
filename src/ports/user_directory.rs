use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザー情報（表示用の射影）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: String,
}

/// ユーザーディレクトリポート
///
/// 予約コンテキストはUserIDのみを知り、ユーザー詳細は知らない。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザーを取得する
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserRecord>>;

    /// ユーザーが存在するか確認する
    ///
    /// 予約作成・一覧取得前のバリデーションに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;
}
