use crate::domain::{
    Booking, BookingPeriod, BookingPredicate, BookingScope, BookingStatus, PageRequest,
    value_objects::{BookingId, ItemId, UserId},
};
use crate::ports::booking_repository::{
    BookingRepository as BookingRepositoryTrait, InsertOutcome, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;
use uuid::Uuid;

/// 排除制約違反（exclusion_violation）のSQLSTATE
const EXCLUSION_VIOLATION: &str = "23P01";

/// PostgreSQLの行データをBookingに変換する
///
/// statusの文字列からの変換と期間の検証でエラーハンドリングを行う。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let period = BookingPeriod::new(row.get("start_at"), row.get("end_at")).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        period,
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// OFFSETにバインドする件数
///
/// ページ番号×ページサイズはi64を超えうる。その場合は上限に丸め、空のページとして扱う。
fn offset_param(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}

fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(EXCLUSION_VIOLATION),
        _ => false,
    }
}

/// BookingRepositoryのPostgreSQL実装
///
/// 二重予約の防止は`bookings_no_overlap`排除制約に任せる。
/// 空き状況確認と保存の間に割り込まれても、制約違反として検出できる。
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// PostgreSQLコネクションプールから新しいBookingRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    /// 予約を保存
    ///
    /// 排除制約違反（SQLSTATE 23P01）はOverlappingとして返す。
    /// それ以外のエラーはそのまま伝播する。
    async fn insert(&self, booking: Booking) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.booking_id.value())
        .bind(booking.item_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.start())
        .bind(booking.end())
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) if is_exclusion_violation(&err) => Ok(InsertOutcome::Overlapping),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// 半開区間で重なる、WAITING/APPROVEDの予約を返す
    ///
    /// (item_id, start_at)のインデックスを使用する。
    async fn find_blocking(&self, item_id: ItemId, period: BookingPeriod) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE item_id = $1
              AND status IN ('WAITING', 'APPROVED')
              AND start_at < $3
              AND end_at > $2
            ORDER BY start_at DESC
            "#,
        )
        .bind(item_id.value())
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }

    /// 現在のステータスを条件にしたUPDATEで不可分に遷移させる
    async fn transition_status(&self, expected: BookingStatus, updated: &Booking) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $3,
                updated_at = $4
            WHERE booking_id = $1
              AND status = $2
            "#,
        )
        .bind(updated.booking_id.value())
        .bind(expected.as_str())
        .bind(updated.status.as_str())
        .bind(updated.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// 検索条件をWHERE句に変換して取得
    ///
    /// 未指定の条件はNULLとしてバインドし、SQL側で無視する。
    async fn query(
        &self,
        scope: BookingScope,
        predicate: BookingPredicate,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let (booker_id, item_ids): (Option<Uuid>, Option<Vec<Uuid>>) = match scope {
            BookingScope::Booker(booker_id) => (Some(booker_id.value()), None),
            BookingScope::Items(item_ids) => {
                (None, Some(item_ids.iter().map(|id| id.value()).collect()))
            }
        };

        let statuses: Option<Vec<String>> = predicate
            .statuses
            .map(|statuses| statuses.iter().map(|s| s.as_str().to_string()).collect());

        let limit = i64::from(page.size());
        let offset = offset_param(page);

        let rows = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE ($1::uuid IS NULL OR booker_id = $1)
              AND ($2::uuid[] IS NULL OR item_id = ANY($2))
              AND ($3::timestamptz IS NULL OR start_at <= $3)
              AND ($4::timestamptz IS NULL OR start_at > $4)
              AND ($5::timestamptz IS NULL OR end_at >= $5)
              AND ($6::timestamptz IS NULL OR end_at < $6)
              AND ($7::text[] IS NULL OR status = ANY($7))
            ORDER BY start_at DESC, booking_id ASC
            LIMIT $8 OFFSET $9
            "#,
        )
        .bind(booker_id)
        .bind(item_ids)
        .bind(predicate.start_at_or_before)
        .bind(predicate.start_after)
        .bind(predicate.end_at_or_after)
        .bind(predicate.end_before)
        .bind(statuses)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE item_id = $1
            ORDER BY start_at DESC, booking_id ASC
            "#,
        )
        .bind(item_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }
}
