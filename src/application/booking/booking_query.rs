use crate::domain::{
    BookingPredicate, BookingScope, BookingState, PageRequest, commands::ListBookings,
};

use super::booking_service::ServiceDependencies;
use super::details::{BookingDetails, enrich_all, ensure_user_exists};
use super::errors::{BookingApplicationError, Result};

/// クエリの入力を検証し、検索条件とページ指定に変換する
///
/// # エラー
/// - InvalidRequest: ページ指定が不正、または状態フィルタが未知
fn resolve_query(query: &ListBookings) -> Result<(BookingPredicate, PageRequest)> {
    let page = PageRequest::new(query.page, query.page_size)
        .map_err(|e| BookingApplicationError::InvalidRequest(e.to_string()))?;

    let state = query
        .state
        .parse::<BookingState>()
        .map_err(|e| BookingApplicationError::InvalidRequest(e.to_string()))?;

    let predicate = BookingPredicate::resolve(state, query.as_of);
    tracing::debug!(state = state.as_str(), ?predicate, "resolved booking filter");

    Ok((predicate, page))
}

/// 予約者としての予約一覧を取得する
///
/// ビジネスルール：
/// - 予約者が存在すること（NotFound）
/// - ページ番号 >= 0 かつ ページサイズ > 0（InvalidRequest）
/// - 状態フィルタは大文字小文字を区別せずに解釈（未知ならInvalidRequest）
///
/// 結果は開始日時の降順。`as_of` を基準に一貫して評価される。
pub async fn list_booker_bookings(
    deps: &ServiceDependencies,
    query: ListBookings,
) -> Result<Vec<BookingDetails>> {
    ensure_user_exists(deps, query.user_id).await?;
    let (predicate, page) = resolve_query(&query)?;

    let bookings = deps
        .booking_repository
        .query(BookingScope::Booker(query.user_id), predicate, page)
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    enrich_all(deps, &bookings).await
}

/// 所有者としての予約一覧（自分のアイテムに対する予約）を取得する
///
/// ビジネスルールは`list_booker_bookings()`と同じ。
/// 対象アイテムはアイテムディレクトリから解決する。
pub async fn list_owner_bookings(
    deps: &ServiceDependencies,
    query: ListBookings,
) -> Result<Vec<BookingDetails>> {
    ensure_user_exists(deps, query.user_id).await?;
    let (predicate, page) = resolve_query(&query)?;

    let item_ids = deps
        .item_directory
        .items_owned_by(query.user_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?;

    if item_ids.is_empty() {
        return Ok(Vec::new());
    }

    let bookings = deps
        .booking_repository
        .query(BookingScope::Items(item_ids), predicate, page)
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    enrich_all(deps, &bookings).await
}
