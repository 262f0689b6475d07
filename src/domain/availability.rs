use super::{Booking, BookingPeriod, ItemId};

/// 純粋関数：候補期間と衝突する既存予約を探す
///
/// ビジネスルール：
/// - 同じアイテムの予約のみを対象とする
/// - 承認待ち・承認済みの予約だけが枠を塞ぐ（却下・キャンセルは無視）
/// - 期間は半開区間 `[start, end)` として比較する（接するだけなら衝突しない）
pub fn find_conflict<'a, I>(
    existing: I,
    item_id: ItemId,
    period: &BookingPeriod,
) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    existing.into_iter().find(|booking| {
        booking.item_id == item_id
            && booking.status.blocks_slot()
            && booking.period.overlaps(period)
    })
}

/// 純粋関数：候補期間が既存予約と衝突するか
pub fn has_conflict<'a, I>(existing: I, item_id: ItemId, period: &BookingPeriod) -> bool
where
    I: IntoIterator<Item = &'a Booking>,
{
    find_conflict(existing, item_id, period).is_some()
}
