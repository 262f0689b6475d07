use thiserror::Error;

/// 予約管理アプリケーション層のエラー
///
/// ビジネスルール違反（NotFound / Forbidden / InvalidRequest / Conflict）と
/// 各ポートのインフラ障害を区別する。インフラ障害は元のエラーをそのまま保持する。
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// アイテム・ユーザー・予約が存在しない（または閲覧権限がない）
    #[error("{0}")]
    NotFound(String),

    /// 操作する権限がない
    #[error("{0}")]
    Forbidden(String),

    /// リクエストが不正（期間、自己予約、状態遷移、ページ指定、状態フィルタ）
    #[error("{0}")]
    InvalidRequest(String),

    /// 既存の予約と期間が重なる
    #[error("{0}")]
    Conflict(String),

    /// BookingRepositoryのエラー
    #[error("Booking repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemDirectoryのエラー
    #[error("Item directory error")]
    ItemDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
