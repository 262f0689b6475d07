use chrono::{DateTime, TimeZone, Utc};
use rusty_sharing_ddd::adapters::mock::{BookingRepository, ItemDirectory, UserDirectory};
use rusty_sharing_ddd::application::booking::{
    BookingApplicationError, BookingDetails, ServiceDependencies, create_booking, decide_booking,
    list_booker_bookings, list_owner_bookings,
};
use rusty_sharing_ddd::domain::BookingStatus;
use rusty_sharing_ddd::domain::commands::*;
use rusty_sharing_ddd::domain::value_objects::*;
use std::sync::Arc;

// ============================================================================
// テスト用のセットアップ
// ============================================================================

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
}

struct Fixture {
    deps: ServiceDependencies,
    users: Arc<UserDirectory>,
    owner: UserId,
    booker: UserId,
    item: ItemId,
    other_item: ItemId,
}

impl Fixture {
    fn new() -> Self {
        let items = Arc::new(ItemDirectory::new());
        let users = Arc::new(UserDirectory::new());

        let owner = users.add_user("U1");
        let booker = users.add_user("U2");
        let item = items.add_item(owner, "Drill", true);
        let other_item = items.add_item(owner, "Ladder", true);

        let deps = ServiceDependencies {
            booking_repository: Arc::new(BookingRepository::new()),
            item_directory: items,
            user_directory: users.clone(),
        };

        Self {
            deps,
            users,
            owner,
            booker,
            item,
            other_item,
        }
    }

    async fn book(&self, item_id: ItemId, start: u32, end: u32) -> BookingDetails {
        let cmd = CreateBooking {
            booker_id: self.booker,
            item_id,
            start: at(start),
            end: at(end),
            requested_at: at(1),
        };
        create_booking(&self.deps, cmd).await.unwrap()
    }

    async fn decide(&self, booking: &BookingDetails, approved: bool) {
        let cmd = DecideBooking {
            booking_id: booking.booking_id,
            acting_user_id: self.owner,
            approved,
            decided_at: at(2),
        };
        decide_booking(&self.deps, cmd).await.unwrap();
    }

    /// 状態の異なる予約を一通り用意する（基準時刻は1月12日）
    ///
    /// - past: 3〜5日 承認済み
    /// - current: 10〜15日 承認済み
    /// - waiting: 20〜22日 承認待ち
    /// - rejected: 25〜27日 却下
    async fn seed(&self) -> [BookingDetails; 4] {
        let past = self.book(self.item, 3, 5).await;
        let current = self.book(self.item, 10, 15).await;
        let waiting = self.book(self.item, 20, 22).await;
        let rejected = self.book(self.other_item, 25, 27).await;

        self.decide(&past, true).await;
        self.decide(&current, true).await;
        self.decide(&rejected, false).await;

        [past, current, waiting, rejected]
    }

    fn query(&self, user_id: UserId, state: &str) -> ListBookings {
        ListBookings {
            state: state.to_string(),
            ..ListBookings::all(user_id, 10, at(12))
        }
    }
}

fn ids(bookings: &[BookingDetails]) -> Vec<BookingId> {
    bookings.iter().map(|b| b.booking_id).collect()
}

// ============================================================================
// 状態フィルタ
// ============================================================================

#[tokio::test]
async fn test_list_booker_bookings_by_state() {
    let fx = Fixture::new();
    let [past, current, waiting, rejected] = fx.seed().await;

    let cases = [
        (
            "ALL",
            vec![
                rejected.booking_id,
                waiting.booking_id,
                current.booking_id,
                past.booking_id,
            ],
        ),
        ("CURRENT", vec![current.booking_id]),
        ("PAST", vec![past.booking_id]),
        ("FUTURE", vec![rejected.booking_id, waiting.booking_id]),
        ("WAITING", vec![waiting.booking_id]),
        ("REJECTED", vec![rejected.booking_id]),
    ];

    for (state, expected) in cases {
        let result = list_booker_bookings(&fx.deps, fx.query(fx.booker, state))
            .await
            .unwrap();
        assert_eq!(ids(&result), expected, "state {}", state);
    }
}

#[tokio::test]
async fn test_list_owner_bookings_current() {
    // シナリオ4: 所有者から見た進行中の予約
    let fx = Fixture::new();
    let [_, current, _, _] = fx.seed().await;

    let result = list_owner_bookings(&fx.deps, fx.query(fx.owner, "CURRENT"))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].booking_id, current.booking_id);
    assert_eq!(result[0].status, BookingStatus::Approved);
    assert_eq!(result[0].item.name, "Drill");
    assert_eq!(result[0].booker.name, "U2");
}

#[tokio::test]
async fn test_list_owner_bookings_covers_all_owned_items() {
    let fx = Fixture::new();
    fx.seed().await;

    let result = list_owner_bookings(&fx.deps, fx.query(fx.owner, "ALL"))
        .await
        .unwrap();

    assert_eq!(result.len(), 4);
    assert!(result.iter().any(|b| b.item.item_id == fx.other_item));
}

#[tokio::test]
async fn test_state_is_case_insensitive() {
    let fx = Fixture::new();
    let [_, current, _, _] = fx.seed().await;

    let result = list_booker_bookings(&fx.deps, fx.query(fx.booker, "current"))
        .await
        .unwrap();

    assert_eq!(ids(&result), vec![current.booking_id]);
}

#[tokio::test]
async fn test_unknown_state() {
    // シナリオ5: 未知の状態フィルタ
    let fx = Fixture::new();

    let result = list_booker_bookings(&fx.deps, fx.query(fx.booker, "UNSUPPORTED")).await;

    match result.unwrap_err() {
        BookingApplicationError::InvalidRequest(msg) => {
            assert_eq!(msg, "unknown state: UNSUPPORTED")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_period_boundaries_at_now() {
    let fx = Fixture::new();
    let ends_now = fx.book(fx.item, 5, 12).await;
    let starts_now = fx.book(fx.item, 12, 14).await;
    fx.decide(&ends_now, true).await;

    // 終了時刻ちょうどはまだPASTではない
    let past = list_booker_bookings(&fx.deps, fx.query(fx.booker, "PAST"))
        .await
        .unwrap();
    assert!(past.is_empty());

    // 開始時刻・終了時刻ちょうどはどちらもCURRENT
    let current = list_booker_bookings(&fx.deps, fx.query(fx.booker, "CURRENT"))
        .await
        .unwrap();
    assert_eq!(ids(&current), vec![starts_now.booking_id, ends_now.booking_id]);

    // 開始時刻ちょうどはFUTUREではない
    let future = list_booker_bookings(&fx.deps, fx.query(fx.booker, "FUTURE"))
        .await
        .unwrap();
    assert!(future.is_empty());
}

// ============================================================================
// ページング
// ============================================================================

#[tokio::test]
async fn test_pagination_newest_first() {
    let fx = Fixture::new();
    let mut created = Vec::new();
    for day in [3, 7, 11, 15, 19] {
        created.push(fx.book(fx.item, day, day + 2).await.booking_id);
    }
    created.reverse();

    let mut pages = Vec::new();
    for page in 0..3 {
        let query = ListBookings {
            page,
            ..ListBookings::all(fx.booker, 2, at(1))
        };
        pages.push(ids(&list_booker_bookings(&fx.deps, query).await.unwrap()));
    }

    assert_eq!(pages[0], created[0..2].to_vec());
    assert_eq!(pages[1], created[2..4].to_vec());
    assert_eq!(pages[2], created[4..].to_vec());

    // 範囲外のページは空
    let query = ListBookings {
        page: 3,
        ..ListBookings::all(fx.booker, 2, at(1))
    };
    assert!(list_booker_bookings(&fx.deps, query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_page_request() {
    let fx = Fixture::new();

    for (page, page_size) in [(-1, 10), (0, 0), (0, -5)] {
        let query = ListBookings {
            page,
            page_size,
            ..ListBookings::all(fx.booker, 10, at(1))
        };
        let result = list_booker_bookings(&fx.deps, query).await;
        assert!(
            matches!(result, Err(BookingApplicationError::InvalidRequest(_))),
            "page {} size {}",
            page,
            page_size
        );
    }
}

#[tokio::test]
async fn test_largest_page_request_returns_empty_page() {
    let fx = Fixture::new();
    fx.seed().await;

    let max = i64::from(u32::MAX);
    let query = ListBookings {
        page: max,
        ..ListBookings::all(fx.booker, max, at(12))
    };
    let result = list_booker_bookings(&fx.deps, query).await.unwrap();
    assert!(result.is_empty());

    // u32に収まらない値は不正なリクエスト
    let query = ListBookings {
        page: max + 1,
        ..ListBookings::all(fx.booker, 10, at(12))
    };
    let result = list_booker_bookings(&fx.deps, query).await;
    match result.unwrap_err() {
        BookingApplicationError::InvalidRequest(msg) => {
            assert_eq!(msg, "page must not exceed 4294967295: 4294967296")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// ============================================================================
// 利用者の検証
// ============================================================================

#[tokio::test]
async fn test_unknown_user() {
    let fx = Fixture::new();
    let unknown = UserId::new();

    let as_booker = list_booker_bookings(&fx.deps, ListBookings::all(unknown, 10, at(1))).await;
    let as_owner = list_owner_bookings(&fx.deps, ListBookings::all(unknown, 10, at(1))).await;

    assert!(matches!(as_booker, Err(BookingApplicationError::NotFound(_))));
    assert!(matches!(as_owner, Err(BookingApplicationError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_user_wins_over_invalid_state() {
    let fx = Fixture::new();

    let query = ListBookings {
        state: "UNSUPPORTED".to_string(),
        ..ListBookings::all(UserId::new(), 10, at(1))
    };
    let result = list_booker_bookings(&fx.deps, query).await;

    assert!(matches!(result, Err(BookingApplicationError::NotFound(_))));
}

#[tokio::test]
async fn test_owner_without_items() {
    let fx = Fixture::new();
    fx.seed().await;
    let newcomer = fx.users.add_user("U3");

    let result = list_owner_bookings(&fx.deps, ListBookings::all(newcomer, 10, at(12)))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_booker_sees_only_own_bookings() {
    let fx = Fixture::new();
    fx.seed().await;

    // 所有者は予約者として何も予約していない
    let result = list_booker_bookings(&fx.deps, ListBookings::all(fx.owner, 10, at(12)))
        .await
        .unwrap();

    assert!(result.is_empty());
}
