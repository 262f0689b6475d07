use crate::application::booking::{
    ServiceDependencies, create_booking as execute_create_booking,
    decide_booking as execute_decide_booking, get_booking as execute_get_booking,
    item_booking_summary as execute_item_booking_summary, list_booker_bookings,
    list_owner_bookings,
};
use crate::domain::{
    commands::{CreateBooking, DecideBooking, ListBookings},
    value_objects::{BookingId, ItemId, UserId},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extractor::ActingUser,
    types::{
        BookingResponse, CreateBookingRequest, DEFAULT_PAGE_SIZE, DecideBookingQuery,
        ItemBookingSummaryResponse, ListBookingsQuery,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /bookings - 予約をリクエスト
///
/// 強制されるビジネスルール:
/// - アイテムと予約者が存在すること
/// - アイテムが貸出可能で、予約者が所有者でないこと
/// - 終了日時が開始日時より後であること
/// - 既存の予約と期間が重ならないこと
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(booker_id): ActingUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let cmd = CreateBooking {
        booker_id,
        item_id: ItemId::from_uuid(req.item_id),
        start: req.start,
        end: req.end,
        requested_at: Utc::now(),
    };

    let details = execute_create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(details))))
}

/// PATCH /bookings/:id?approved=true|false - 予約を承認または却下
///
/// 強制されるビジネスルール:
/// - 予約が存在すること
/// - 操作者がアイテムの所有者であること
/// - 予約がWAITING状態であること
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<DecideBookingQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = DecideBooking {
        booking_id: BookingId::from_uuid(booking_id),
        acting_user_id,
        approved: query.approved,
        decided_at: Utc::now(),
    };

    let details = execute_decide_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(details)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /bookings/:id - 予約詳細を取得
///
/// 予約者とアイテム所有者以外には404を返す。
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let details = execute_get_booking(
        &state.service_deps,
        BookingId::from_uuid(booking_id),
        acting_user_id,
    )
    .await?;

    Ok(Json(BookingResponse::from(details)))
}

/// 未指定のパラメータは ALL・先頭ページ・DEFAULT_PAGE_SIZE で補う
fn to_list_query(user_id: UserId, query: ListBookingsQuery) -> ListBookings {
    let defaults = ListBookings::all(user_id, DEFAULT_PAGE_SIZE, Utc::now());
    ListBookings {
        state: query.state.unwrap_or(defaults.state),
        page: query.from.unwrap_or(defaults.page),
        page_size: query.size.unwrap_or(defaults.page_size),
        ..defaults
    }
}

/// GET /bookings - 予約者としての予約一覧
///
/// クエリパラメータ:
/// - state: ALL / CURRENT / PAST / FUTURE / WAITING / REJECTED（デフォルト ALL）
/// - from: 0始まりのページ番号（デフォルト 0）
/// - size: ページサイズ（デフォルト 10）
pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings =
        list_booker_bookings(&state.service_deps, to_list_query(user_id, query)).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner - 自分のアイテムに対する予約一覧
///
/// クエリパラメータは`list_my_bookings`と同じ。
pub async fn list_bookings_on_my_items(
    State(state): State<Arc<AppState>>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings =
        list_owner_bookings(&state.service_deps, to_list_query(user_id, query)).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /items/:id/bookings/summary - アイテムの直近・次回の承認済み予約
///
/// 所有者以外には空のサマリーを返す。
pub async fn get_item_booking_summary(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemBookingSummaryResponse>, ApiError> {
    let summary = execute_item_booking_summary(
        &state.service_deps,
        ItemId::from_uuid(item_id),
        acting_user_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(ItemBookingSummaryResponse::from(summary)))
}
