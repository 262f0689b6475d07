use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, DecideBookingError, ItemId, PeriodError, RequestBookingError, UserId};

/// 予約ステータス
///
/// WAITING → APPROVED | REJECTED の一方向のみ遷移する。
/// CANCELEDは承認フローからは到達しない終端状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// 承認待ち
    Waiting,
    /// 承認済み
    Approved,
    /// 却下
    Rejected,
    /// キャンセル済み
    Canceled,
}

impl BookingStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// この状態の予約が枠を占有するか
    ///
    /// ビジネスルール：承認待ち・承認済みの予約は枠を塞ぐ。
    /// 却下・キャンセル済みの予約は塞がない。
    pub fn blocks_slot(&self) -> bool {
        matches!(self, BookingStatus::Waiting | BookingStatus::Approved)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 予約期間 `[start, end)`
///
/// 不変条件：end > start
/// 終了日時は期間に含まれないため、隣接する期間は重ならない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    /// # エラー
    /// end <= start の場合は`PeriodError::EndNotAfterStart`を返す
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PeriodError> {
        if end <= start {
            return Err(PeriodError::EndNotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// 半開区間として重なるか
    pub fn overlaps(&self, other: &BookingPeriod) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// 予約判定に必要なアイテムの情報
///
/// 予約コンテキストはアイテムの詳細を持たず、ID・所有者・貸出可否のみを参照する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookableItem {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub available: bool,
}

/// Booking集約 - 1つのアイテムに対する1回の予約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    // 識別子
    pub booking_id: BookingId,

    // 他の集約への参照（IDのみ）
    pub item_id: ItemId,
    pub booker_id: UserId,

    // 予約管理の責務
    pub period: BookingPeriod,
    pub status: BookingStatus,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn start(&self) -> DateTime<Utc> {
        self.period.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.period.end()
    }
}

/// 純粋関数：予約をリクエストする
///
/// ビジネスルール（先に失敗したものを返す）：
/// - アイテムが貸出可能であること
/// - 予約者がアイテムの所有者でないこと
/// - 終了日時が開始日時より後であること
///
/// 空き状況の確認は永続化層の情報が必要なため、アプリケーション層で行う。
/// 副作用なし。WAITING状態の新しいBookingを返す。
pub fn request_booking(
    item: &BookableItem,
    booker_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    requested_at: DateTime<Utc>,
) -> Result<Booking, RequestBookingError> {
    if !item.available {
        return Err(RequestBookingError::ItemUnavailable);
    }

    if item.owner_id == booker_id {
        return Err(RequestBookingError::OwnItem);
    }

    let period = BookingPeriod::new(start, end)?;

    Ok(Booking {
        booking_id: BookingId::new(),
        item_id: item.item_id,
        booker_id,
        period,
        status: BookingStatus::Waiting,
        created_at: requested_at,
        updated_at: requested_at,
    })
}

/// 純粋関数：予約を承認または却下する
///
/// ビジネスルール：
/// - WAITING状態の予約のみ判断できる
/// - approved=true でAPPROVED、false でREJECTED
/// - 取り消しはない
///
/// 副作用なし。新しいBookingを返す。
pub fn decide_booking(
    booking: &Booking,
    approved: bool,
    decided_at: DateTime<Utc>,
) -> Result<Booking, DecideBookingError> {
    if booking.status != BookingStatus::Waiting {
        return Err(DecideBookingError::NotWaiting(booking.status));
    }

    let status = if approved {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking {
        status,
        updated_at: decided_at,
        ..booking.clone()
    })
}
