use crate::domain::{
    Booking, BookingPeriod, BookingPredicate, BookingScope, BookingStatus, PageRequest,
    availability, sort_newest_first,
    value_objects::{BookingId, ItemId},
};
use crate::ports::booking_repository::{
    BookingRepository as BookingRepositoryTrait, InsertOutcome, Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// インメモリのBookingRepository実装
///
/// テスト用のバックエンド。1つのロックの中で重複確認と保存、
/// ステータスの確認と更新を行うことで、PostgreSQL実装と同じ直列化点を提供する。
pub struct BookingRepository {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl BookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }

    /// 保存されている全予約（テストの検証用）
    pub fn all(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().values().cloned().collect()
    }
}

impl Default for BookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn insert(&self, booking: Booking) -> Result<InsertOutcome> {
        let mut bookings = self.bookings.lock().unwrap();

        if availability::has_conflict(bookings.values(), booking.item_id, &booking.period) {
            return Ok(InsertOutcome::Overlapping);
        }

        bookings.insert(booking.booking_id, booking);
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.lock().unwrap().get(&booking_id).cloned())
    }

    async fn find_blocking(&self, item_id: ItemId, period: BookingPeriod) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| {
                b.item_id == item_id && b.status.blocks_slot() && b.period.overlaps(&period)
            })
            .cloned()
            .collect())
    }

    async fn transition_status(&self, expected: BookingStatus, updated: &Booking) -> Result<bool> {
        let mut bookings = self.bookings.lock().unwrap();

        match bookings.get_mut(&updated.booking_id) {
            Some(current) if current.status == expected => {
                current.status = updated.status;
                current.updated_at = updated.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn query(
        &self,
        scope: BookingScope,
        predicate: BookingPredicate,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let mut matched: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| scope.contains(b) && predicate.matches(b))
            .cloned()
            .collect();

        sort_newest_first(&mut matched);

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .collect())
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.item_id == item_id)
            .cloned()
            .collect();

        sort_newest_first(&mut bookings);
        Ok(bookings)
    }
}
