use crate::domain::{
    Booking, BookingPeriod, BookingPredicate, BookingScope, BookingStatus, PageRequest,
    value_objects::{BookingId, ItemId},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約保存の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 保存された
    Inserted,
    /// 同じアイテムの有効な予約と期間が重なるため保存されなかった
    Overlapping,
}

/// 予約リポジトリポート
///
/// 予約の永続化と検索を抽象化する。
/// 実装は以下の直列化点を保証しなければならない：
/// - `insert`: 重複確認と保存を不可分に行う（同時リクエストによる二重予約の防止）
/// - `transition_status`: 現在のステータスを確認して更新する（compare-and-swap）
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 予約を保存する
    ///
    /// 同じアイテムのWAITING/APPROVEDの予約と期間が重なる場合は保存せず
    /// `InsertOutcome::Overlapping`を返す。
    async fn insert(&self, booking: Booking) -> Result<InsertOutcome>;

    /// IDで予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// 期間と重なる、枠を塞いでいる予約を取得する
    ///
    /// 空き状況確認（読み取りのみ）に使用される。
    async fn find_blocking(&self, item_id: ItemId, period: BookingPeriod) -> Result<Vec<Booking>>;

    /// ステータスを更新する（compare-and-swap）
    ///
    /// 現在のステータスが`expected`の場合のみ`updated`で置き換え、trueを返す。
    /// それ以外の場合は何も変更せずfalseを返す。
    async fn transition_status(&self, expected: BookingStatus, updated: &Booking) -> Result<bool>;

    /// 条件に一致する予約をページ単位で取得する
    ///
    /// 並び順は開始日時の降順（同時刻は予約IDの昇順）。
    async fn query(
        &self,
        scope: BookingScope,
        predicate: BookingPredicate,
        page: PageRequest,
    ) -> Result<Vec<Booking>>;

    /// アイテムの全予約を取得する
    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Booking>>;
}
