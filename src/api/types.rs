use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::booking::{BookingDetails, BookingSlot, ItemBookingSummary};

/// ページ指定のデフォルト値
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// 予約作成リクエスト（POST /bookings）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// 承認・却下のクエリパラメータ（PATCH /bookings/:id）
#[derive(Debug, Deserialize)]
pub struct DecideBookingQuery {
    pub approved: bool,
}

/// 予約一覧取得のクエリパラメータ
///
/// `from` は0始まりのページ番号。
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BookerResponse {
    pub id: Uuid,
    pub name: String,
}

/// 予約レスポンス
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub item: ItemResponse,
    pub booker: BookerResponse,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            id: details.booking_id.value(),
            start: details.start,
            end: details.end,
            status: details.status.as_str().to_string(),
            item: ItemResponse {
                id: details.item.item_id.value(),
                name: details.item.name,
            },
            booker: BookerResponse {
                id: details.booker.user_id.value(),
                name: details.booker.name,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlotResponse {
    pub id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<BookingSlot> for BookingSlotResponse {
    fn from(slot: BookingSlot) -> Self {
        Self {
            id: slot.booking_id.value(),
            booker_id: slot.booker_id.value(),
            start: slot.start,
            end: slot.end,
        }
    }
}

/// アイテムの予約サマリーレスポンス（GET /items/:id/bookings/summary）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBookingSummaryResponse {
    pub last_booking: Option<BookingSlotResponse>,
    pub next_booking: Option<BookingSlotResponse>,
}

impl From<ItemBookingSummary> for ItemBookingSummaryResponse {
    fn from(summary: ItemBookingSummary) -> Self {
        Self {
            last_booking: summary.last.map(BookingSlotResponse::from),
            next_booking: summary.next.map(BookingSlotResponse::from),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
