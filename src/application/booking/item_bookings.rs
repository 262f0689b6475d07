use chrono::{DateTime, Utc};

use crate::domain::{self, Booking, value_objects::*};

use super::booking_service::ServiceDependencies;
use super::details::{ensure_user_exists, load_item};
use super::errors::{BookingApplicationError, Result};

/// アイテム画面に表示する予約の枠
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSlot {
    pub booking_id: BookingId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Booking> for BookingSlot {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.booking_id,
            booker_id: booking.booker_id,
            start: booking.start(),
            end: booking.end(),
        }
    }
}

/// アイテムの直近・次回の承認済み予約
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBookingSummary {
    pub last: Option<BookingSlot>,
    pub next: Option<BookingSlot>,
}

async fn load_item_bookings(deps: &ServiceDependencies, item_id: ItemId) -> Result<Vec<Booking>> {
    deps.booking_repository
        .find_by_item(item_id)
        .await
        .map_err(BookingApplicationError::RepositoryError)
}

/// アイテムの予約サマリーを取得する
///
/// ビジネスルール：
/// - アイテムが存在すること（NotFound）
/// - 所有者のみが予約状況を見られる（それ以外には空のサマリー）
pub async fn item_booking_summary(
    deps: &ServiceDependencies,
    item_id: ItemId,
    acting_user_id: UserId,
    now: DateTime<Utc>,
) -> Result<ItemBookingSummary> {
    let item = load_item(deps, item_id).await?;
    if item.owner_id != acting_user_id {
        return Ok(ItemBookingSummary::default());
    }

    let bookings = load_item_bookings(deps, item_id).await?;
    let (last, next) = domain::last_and_next_approved(&bookings, now);

    Ok(ItemBookingSummary {
        last: last.map(BookingSlot::from),
        next: next.map(BookingSlot::from),
    })
}

/// 利用者がアイテムの貸出を終えているか確認する
///
/// コメント機能が「借りたことのある利用者のみ投稿可」を判定するために使用する。
///
/// ビジネスルール：
/// - 利用者・アイテムが存在すること（NotFound）
/// - 承認済みかつ終了日時が`now`より前の予約があれば true
pub async fn has_completed_booking(
    deps: &ServiceDependencies,
    booker_id: UserId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> Result<bool> {
    load_item(deps, item_id).await?;
    ensure_user_exists(deps, booker_id).await?;

    let bookings = load_item_bookings(deps, item_id).await?;
    Ok(domain::has_completed_booking(
        &bookings, booker_id, item_id, now,
    ))
}
