use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, BookingState, ItemId, UserId};

/// コマンド：アイテムの予約をリクエストする
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    pub booker_id: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約を承認または却下する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideBooking {
    pub booking_id: BookingId,
    pub acting_user_id: UserId,
    pub approved: bool,
    pub decided_at: DateTime<Utc>,
}

/// クエリ：予約一覧を取得する
///
/// `as_of` は呼び出しごとに1度だけ取得した現在時刻。
/// 一覧全体を同じ時点で評価するために使う。
/// `state` は外部入力のまま受け取り、アプリケーション層で検証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookings {
    pub user_id: UserId,
    pub state: String,
    pub page: i64,
    pub page_size: i64,
    pub as_of: DateTime<Utc>,
}

impl ListBookings {
    /// 状態フィルタ ALL・先頭ページでのクエリ
    pub fn all(user_id: UserId, page_size: i64, as_of: DateTime<Utc>) -> Self {
        Self {
            user_id,
            state: BookingState::All.as_str().to_string(),
            page: 0,
            page_size,
            as_of,
        }
    }
}
