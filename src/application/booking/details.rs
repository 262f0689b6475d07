use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::domain::{Booking, BookingStatus, value_objects::*};
use crate::ports::{ItemRecord, UserRecord};

use super::booking_service::ServiceDependencies;
use super::errors::{BookingApplicationError, Result};

/// 予約ビューに含めるアイテムの射影
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub name: String,
}

/// 予約ビューに含める予約者の射影
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookerSummary {
    pub user_id: UserId,
    pub name: String,
}

/// 表示層に返す予約ビュー
///
/// 予約本体に、読み取り時に解決したアイテム名・予約者名を付加したもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub booking_id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item: ItemSummary,
    pub booker: BookerSummary,
}

impl BookingDetails {
    pub fn new(booking: &Booking, item: &ItemRecord, booker: &UserRecord) -> Self {
        Self {
            booking_id: booking.booking_id,
            start: booking.start(),
            end: booking.end(),
            status: booking.status,
            item: ItemSummary {
                item_id: item.item_id,
                name: item.name.clone(),
            },
            booker: BookerSummary {
                user_id: booker.user_id,
                name: booker.name.clone(),
            },
        }
    }
}

/// アイテムを取得する。存在しなければNotFound
pub(super) async fn load_item(deps: &ServiceDependencies, item_id: ItemId) -> Result<ItemRecord> {
    deps.item_directory
        .find_item(item_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?
        .ok_or_else(|| BookingApplicationError::NotFound(format!("item {} not found", item_id)))
}

/// ユーザーを取得する。存在しなければNotFound
pub(super) async fn load_user(deps: &ServiceDependencies, user_id: UserId) -> Result<UserRecord> {
    deps.user_directory
        .find_user(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?
        .ok_or_else(|| BookingApplicationError::NotFound(format!("user {} not found", user_id)))
}

/// ユーザーの存在を確認する。存在しなければNotFound
pub(super) async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_directory
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !exists {
        return Err(BookingApplicationError::NotFound(format!(
            "user {} not found",
            user_id
        )));
    }
    Ok(())
}

/// 予約にアイテム名・予約者名を付加する
///
/// アイテムと予約者の取得は並行して行う。
pub(super) async fn enrich(
    deps: &ServiceDependencies,
    booking: &Booking,
) -> Result<BookingDetails> {
    let (item, booker) = futures::try_join!(
        load_item(deps, booking.item_id),
        load_user(deps, booking.booker_id)
    )?;
    Ok(BookingDetails::new(booking, &item, &booker))
}

/// 予約一覧にアイテム名・予約者名を付加する（並び順は保持される）
pub(super) async fn enrich_all(
    deps: &ServiceDependencies,
    bookings: &[Booking],
) -> Result<Vec<BookingDetails>> {
    try_join_all(bookings.iter().map(|booking| enrich(deps, booking))).await
}
