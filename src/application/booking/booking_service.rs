use crate::domain::{
    self, BookableItem, Booking, BookingPeriod, BookingStatus, availability, commands::*,
    value_objects::*,
};
use crate::ports::*;
use std::sync::Arc;

use super::details::{BookingDetails, enrich, ensure_user_exists, load_item};
use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、ユースケース関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_repository: Arc<dyn BookingRepository>,
    pub item_directory: Arc<dyn ItemDirectory>,
    pub user_directory: Arc<dyn UserDirectory>,
}

/// リポジトリから予約を取得するヘルパー関数
///
/// # エラー
/// - RepositoryError: 読み込み失敗
/// - NotFound: 予約が存在しない
pub(super) async fn load_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
) -> Result<Booking> {
    deps.booking_repository
        .find_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::RepositoryError)?
        .ok_or_else(|| booking_not_found(booking_id))
}

fn booking_not_found(booking_id: BookingId) -> BookingApplicationError {
    BookingApplicationError::NotFound(format!("booking {} not found", booking_id))
}

/// 空き状況確認：候補期間が既存の有効な予約と重なるか
///
/// 読み取りのみで副作用はない。
/// 重なり判定そのものはドメイン層の純粋関数で行う。
pub async fn has_conflict(
    deps: &ServiceDependencies,
    item_id: ItemId,
    period: BookingPeriod,
) -> Result<bool> {
    let candidates = deps
        .booking_repository
        .find_blocking(item_id, period)
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    Ok(availability::has_conflict(&candidates, item_id, &period))
}

/// アイテムを予約する
///
/// ビジネスルール（先に失敗したものを返す）：
/// - アイテムが存在すること（NotFound）
/// - 予約者が存在すること（NotFound）
/// - アイテムが貸出可能であること（InvalidRequest）
/// - 予約者がアイテムの所有者でないこと（InvalidRequest）
/// - 終了日時が開始日時より後であること（InvalidRequest）
/// - 既存の有効な予約と期間が重ならないこと（Conflict）
///
/// # 一貫性保証
///
/// バリデーションはすべて保存前に完了し、保存は1回だけ行う。
/// 空き状況確認と保存の間に別の予約が割り込んだ場合は、
/// リポジトリの直列化点が保存を拒否し、Conflictとして返す。
pub async fn create_booking(
    deps: &ServiceDependencies,
    cmd: CreateBooking,
) -> Result<BookingDetails> {
    // 1. アイテムの存在確認
    let item = load_item(deps, cmd.item_id).await?;

    // 2. 予約者の存在確認
    ensure_user_exists(deps, cmd.booker_id).await?;

    // 3. ドメイン層の純粋関数を呼び出し（貸出可否・自己予約・期間）
    let bookable = BookableItem {
        item_id: item.item_id,
        owner_id: item.owner_id,
        available: item.available,
    };
    let booking = domain::request_booking(
        &bookable,
        cmd.booker_id,
        cmd.start,
        cmd.end,
        cmd.requested_at,
    )
    .map_err(|e| BookingApplicationError::InvalidRequest(e.to_string()))?;

    // 4. 空き状況確認
    if has_conflict(deps, booking.item_id, booking.period).await? {
        return Err(period_taken(booking.item_id));
    }

    // 5. 保存（重複確認と不可分）
    let outcome = deps
        .booking_repository
        .insert(booking.clone())
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    if outcome == InsertOutcome::Overlapping {
        tracing::warn!(
            item_id = %booking.item_id,
            "concurrent booking took the requested period"
        );
        return Err(period_taken(booking.item_id));
    }

    tracing::info!(
        booking_id = %booking.booking_id,
        item_id = %booking.item_id,
        booker_id = %booking.booker_id,
        "booking requested"
    );

    enrich(deps, &booking).await
}

fn period_taken(item_id: ItemId) -> BookingApplicationError {
    BookingApplicationError::Conflict(format!(
        "item {} is already booked for the requested period",
        item_id
    ))
}

/// 予約を承認または却下する
///
/// ビジネスルール：
/// - 予約が存在すること（NotFound）
/// - 操作者がアイテムの所有者であること（Forbidden）
/// - 予約がWAITING状態であること（InvalidRequest）
///
/// ステータスの更新はWAITINGからのcompare-and-swapで行う。
/// 同時に別の判断が確定していた場合は、確定済みのステータスを示してInvalidRequestを返す。
pub async fn decide_booking(
    deps: &ServiceDependencies,
    cmd: DecideBooking,
) -> Result<BookingDetails> {
    // 1. 予約の取得
    let booking = load_booking(deps, cmd.booking_id).await?;

    // 2. 所有者の確認
    let item = load_item(deps, booking.item_id).await?;
    if item.owner_id != cmd.acting_user_id {
        return Err(BookingApplicationError::Forbidden(format!(
            "user {} is not the item owner",
            cmd.acting_user_id
        )));
    }

    // 3. ドメイン層の純粋関数を呼び出し（状態遷移）
    let decided = domain::decide_booking(&booking, cmd.approved, cmd.decided_at)
        .map_err(|e| BookingApplicationError::InvalidRequest(e.to_string()))?;

    // 4. WAITINGからのcompare-and-swap
    let swapped = deps
        .booking_repository
        .transition_status(BookingStatus::Waiting, &decided)
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    if !swapped {
        let current = load_booking(deps, cmd.booking_id).await?;
        tracing::warn!(
            booking_id = %cmd.booking_id,
            status = %current.status,
            "booking was decided concurrently"
        );
        return Err(BookingApplicationError::InvalidRequest(format!(
            "booking is already {}",
            current.status
        )));
    }

    tracing::info!(
        booking_id = %decided.booking_id,
        status = %decided.status,
        "booking decided"
    );

    enrich(deps, &decided).await
}

/// 予約を取得する
///
/// 予約者とアイテム所有者のみ閲覧できる。
/// それ以外の利用者には存在を明かさないため、Forbiddenではなく
/// 予約が存在しない場合と同じNotFoundを返す。
pub async fn get_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
    acting_user_id: UserId,
) -> Result<BookingDetails> {
    let booking = load_booking(deps, booking_id).await?;
    let item = load_item(deps, booking.item_id).await?;

    if booking.booker_id != acting_user_id && item.owner_id != acting_user_id {
        return Err(booking_not_found(booking_id));
    }

    enrich(deps, &booking).await
}
