use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use rusty_sharing_ddd::adapters::mock::{BookingRepository, ItemDirectory, UserDirectory};
use rusty_sharing_ddd::api::extractor::ACTING_USER_HEADER;
use rusty_sharing_ddd::api::handlers::AppState;
use rusty_sharing_ddd::api::router::create_router;
use rusty_sharing_ddd::application::booking::ServiceDependencies;
use rusty_sharing_ddd::domain::value_objects::*;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーション
///
/// 実際のAPIルーターにインメモリのアダプターを注入する。
struct TestApp {
    router: axum::Router,
    items: Arc<ItemDirectory>,
    owner: UserId,
    booker: UserId,
    stranger: UserId,
    item: ItemId,
}

fn setup_e2e_app() -> TestApp {
    let items = Arc::new(ItemDirectory::new());
    let users = Arc::new(UserDirectory::new());

    let owner = users.add_user("U1");
    let booker = users.add_user("U2");
    let stranger = users.add_user("U3");
    let item = items.add_item(owner, "Drill", true);

    let service_deps = ServiceDependencies {
        booking_repository: Arc::new(BookingRepository::new()),
        item_directory: items.clone(),
        user_directory: users,
    };

    let router = create_router(Arc::new(AppState { service_deps }));

    TestApp {
        router,
        items,
        owner,
        booker,
        stranger,
        item,
    }
}

impl TestApp {
    /// リクエストを送信し、ステータスとJSONボディを返す
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn create(&self, user: UserId, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/bookings")
            .header("content-type", "application/json")
            .header(ACTING_USER_HEADER, user.to_string())
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn decide(&self, user: UserId, booking_id: &str, approved: bool) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/bookings/{}?approved={}", booking_id, approved))
            .header(ACTING_USER_HEADER, user.to_string())
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, user: UserId, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(ACTING_USER_HEADER, user.to_string())
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// 開始・終了を現在時刻からの日数で指定した予約リクエスト
    fn booking_body(&self, start_days: i64, end_days: i64) -> Value {
        let now = Utc::now();
        json!({
            "itemId": self.item.to_string(),
            "start": now + Duration::days(start_days),
            "end": now + Duration::days(end_days),
        })
    }
}

// ============================================================================
// E2Eテスト
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = setup_e2e_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_e2e_booking_lifecycle() {
    let app = setup_e2e_app();

    // 1. 予約リクエスト
    let (status, created) = app.create(app.booker, app.booking_body(1, 3)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "WAITING");
    assert_eq!(created["item"]["name"], "Drill");
    assert_eq!(created["booker"]["name"], "U2");
    let booking_id = created["id"].as_str().unwrap().to_string();

    // 2. 所有者が承認
    let (status, approved) = app.decide(app.owner, &booking_id, true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    // 3. 再度の判断は400
    let (status, error) = app.decide(app.owner, &booking_id, false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "INVALID_REQUEST");

    // 4. 予約者・所有者は詳細を取得できる
    let uri = format!("/bookings/{}", booking_id);
    let (status, detail) = app.get(app.booker, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], booking_id.as_str());
    let (status, _) = app.get(app.owner, &uri).await;
    assert_eq!(status, StatusCode::OK);

    // 5. 第三者には404
    let (status, error) = app.get(app.stranger, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "NOT_FOUND");

    // 6. 一覧
    let (status, mine) = app.get(app.booker, "/bookings?state=FUTURE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, owned) = app.get(app.owner, "/bookings/owner").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().unwrap().len(), 1);
    assert_eq!(owned[0]["id"], booking_id.as_str());

    // 7. アイテムの予約サマリー
    let summary_uri = format!("/items/{}/bookings/summary", app.item);
    let (status, summary) = app.get(app.owner, &summary_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["nextBooking"]["id"], booking_id.as_str());
    assert!(summary["lastBooking"].is_null());

    let (status, summary) = app.get(app.booker, &summary_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(summary["nextBooking"].is_null());
}

#[tokio::test]
async fn test_e2e_overlapping_booking_conflict() {
    let app = setup_e2e_app();

    let (status, _) = app.create(app.booker, app.booking_body(1, 5)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = app.create(app.stranger, app.booking_body(2, 6)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "CONFLICT");
}

#[tokio::test]
async fn test_e2e_create_booking_validation() {
    let app = setup_e2e_app();

    // 自分のアイテム
    let (status, error) = app.create(app.owner, app.booking_body(1, 3)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "cannot book own item");

    // 終了が開始より前
    let (status, _) = app.create(app.booker, app.booking_body(3, 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 貸出不可のアイテム
    app.items.set_available(app.item, false);
    let (status, _) = app.create(app.booker, app.booking_body(1, 3)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 存在しないアイテム
    let body = json!({
        "itemId": ItemId::new().to_string(),
        "start": Utc::now() + Duration::days(1),
        "end": Utc::now() + Duration::days(2),
    });
    let (status, _) = app.create(app.booker, body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 存在しないユーザー
    let (status, _) = app.create(UserId::new(), app.booking_body(1, 3)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_e2e_decide_by_non_owner_is_forbidden() {
    let app = setup_e2e_app();

    let (_, created) = app.create(app.booker, app.booking_body(1, 3)).await;
    let booking_id = created["id"].as_str().unwrap().to_string();

    let (status, error) = app.decide(app.booker, &booking_id, true).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["error"], "FORBIDDEN");

    let (status, _) = app
        .decide(app.owner, &BookingId::new().to_string(), true)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_e2e_list_query_validation() {
    let app = setup_e2e_app();

    let (status, error) = app.get(app.booker, "/bookings?state=UNSUPPORTED").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "unknown state: UNSUPPORTED");

    let (status, _) = app.get(app.booker, "/bookings?from=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get(app.booker, "/bookings/owner?size=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, beyond) = app
        .get(app.booker, "/bookings?from=4294967295&size=4294967295")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(beyond, json!([]));

    let (status, empty) = app.get(app.stranger, "/bookings/owner").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));

    let (status, _) = app.get(UserId::new(), "/bookings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_e2e_acting_user_header_required() {
    let app = setup_e2e_app();

    let request = Request::builder()
        .uri("/bookings")
        .body(Body::empty())
        .unwrap();
    let (status, error) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "BAD_REQUEST");

    let request = Request::builder()
        .uri("/bookings")
        .header(ACTING_USER_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
