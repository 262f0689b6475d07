use crate::domain::value_objects::{ItemId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテム情報（アイテム管理コンテキストからの読み取り専用ビュー）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub name: String,
    pub available: bool,
}

/// アイテムディレクトリポート
///
/// 予約コンテキストとアイテム管理コンテキストの境界を維持する。
/// 予約コンテキストはItemIDを保持し、表示用の情報は読み取り時に解決する。
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    /// アイテムを取得する
    ///
    /// 存在しない場合は`None`を返す。
    async fn find_item(&self, item_id: ItemId) -> Result<Option<ItemRecord>>;

    /// 所有者のアイテムID一覧を取得する
    ///
    /// 所有者視点の予約一覧の範囲を決めるために使用される。
    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>>;
}
