use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Booking, BookingStatus, ItemId, UserId};

/// 予約一覧の状態フィルタ
///
/// 永続化されるBookingStatusとは別物。
/// CURRENT / PAST / FUTURE は `now` と予約期間の比較から導かれる。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    #[default]
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }
}

/// 未知の状態フィルタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBookingState(pub String);

impl fmt::Display for UnknownBookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown state: {}", self.0)
    }
}

impl FromStr for BookingState {
    type Err = UnknownBookingState;

    /// 大文字小文字を区別せずにパースする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(UnknownBookingState(s.to_string())),
        }
    }
}

/// 予約の検索条件（ストレージ非依存）
///
/// 状態フィルタと `now` から導いた期間の境界とステータス集合。
/// 各リポジトリ実装がこれを自分のクエリに変換する。
/// `None` の項目は制約なしを意味する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPredicate {
    /// start <= この値
    pub start_at_or_before: Option<DateTime<Utc>>,
    /// start > この値
    pub start_after: Option<DateTime<Utc>>,
    /// end >= この値
    pub end_at_or_after: Option<DateTime<Utc>>,
    /// end < この値
    pub end_before: Option<DateTime<Utc>>,
    /// ステータスがこの集合に含まれる
    pub statuses: Option<Vec<BookingStatus>>,
}

impl BookingPredicate {
    /// 純粋関数：状態フィルタを検索条件に変換する
    ///
    /// | フィルタ | 条件 |
    /// |---|---|
    /// | ALL | なし |
    /// | CURRENT | start <= now AND end >= now |
    /// | PAST | end < now AND status = APPROVED |
    /// | FUTURE | start > now |
    /// | WAITING | status = WAITING |
    /// | REJECTED | status = REJECTED |
    pub fn resolve(state: BookingState, now: DateTime<Utc>) -> Self {
        match state {
            BookingState::All => Self::default(),
            BookingState::Current => Self {
                start_at_or_before: Some(now),
                end_at_or_after: Some(now),
                ..Self::default()
            },
            BookingState::Past => Self {
                end_before: Some(now),
                statuses: Some(vec![BookingStatus::Approved]),
                ..Self::default()
            },
            BookingState::Future => Self {
                start_after: Some(now),
                ..Self::default()
            },
            BookingState::Waiting => Self {
                statuses: Some(vec![BookingStatus::Waiting]),
                ..Self::default()
            },
            BookingState::Rejected => Self {
                statuses: Some(vec![BookingStatus::Rejected]),
                ..Self::default()
            },
        }
    }

    /// 予約が条件を満たすか
    pub fn matches(&self, booking: &Booking) -> bool {
        let start = booking.start();
        let end = booking.end();

        self.start_at_or_before.is_none_or(|bound| start <= bound)
            && self.start_after.is_none_or(|bound| start > bound)
            && self.end_at_or_after.is_none_or(|bound| end >= bound)
            && self.end_before.is_none_or(|bound| end < bound)
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&booking.status))
    }
}

/// 検索対象の範囲（ロール別）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingScope {
    /// 予約者として行った予約
    Booker(UserId),
    /// 指定アイテム群（所有者のアイテム）に対する予約
    Items(Vec<ItemId>),
}

impl BookingScope {
    pub fn contains(&self, booking: &Booking) -> bool {
        match self {
            BookingScope::Booker(booker_id) => booking.booker_id == *booker_id,
            BookingScope::Items(item_ids) => item_ids.contains(&booking.item_id),
        }
    }
}

/// 一覧の並び順：開始日時の降順、同時刻は予約IDの昇順
pub fn sort_newest_first(bookings: &mut [Booking]) {
    bookings.sort_by_key(|booking| (Reverse(booking.start()), booking.booking_id));
}

/// 純粋関数：直近の承認済み予約と次の承認済み予約を求める
///
/// - last: start <= now のうち最も開始が遅いもの
/// - next: start > now のうち最も開始が早いもの
pub fn last_and_next_approved(
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> (Option<&Booking>, Option<&Booking>) {
    let approved = || {
        bookings
            .iter()
            .filter(|booking| booking.status == BookingStatus::Approved)
    };

    let last = approved()
        .filter(|booking| booking.start() <= now)
        .max_by_key(|booking| booking.start());
    let next = approved()
        .filter(|booking| booking.start() > now)
        .min_by_key(|booking| booking.start());

    (last, next)
}

/// 純粋関数：利用者がアイテムの貸出を終えているか
///
/// 承認済みかつ終了日時が `now` より前の予約があれば true。
pub fn has_completed_booking(
    bookings: &[Booking],
    booker_id: UserId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> bool {
    let past = BookingPredicate::resolve(BookingState::Past, now);
    bookings.iter().any(|booking| {
        booking.booker_id == booker_id && booking.item_id == item_id && past.matches(booking)
    })
}
