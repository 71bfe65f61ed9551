use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use bygdegard::config::AppConfig;
use bygdegard::db;
use bygdegard::handlers;
use bygdegard::services::notify::{Notification, Notifier};
use bygdegard::state::AppState;

// ── Mock Notifier ──

struct MockNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: &Notification) -> anyhow::Result<()> {
        anyhow::bail!("smtp down")
    }
}

// ── Helpers ──

const ADMIN_PASSWORD: &str = "test-password";

fn test_config() -> AppConfig {
    AppConfig {
        port: 8000,
        database_url: ":memory:".to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        session_ttl_hours: 1,
        cookie_secure: false,
        static_dir: "public".to_string(),
        notify_webhook_url: None,
        notify_timeout_secs: 5,
    }
}

fn test_state_from(config: AppConfig, notifier: Box<dyn Notifier>) -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        notifier,
    })
}

fn test_state_with(notifier: Box<dyn Notifier>) -> Arc<AppState> {
    test_state_from(test_config(), notifier)
}

fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<Notification>>>) {
    let sent = Arc::new(Mutex::new(vec![]));
    let state = test_state_with(Box::new(MockNotifier {
        sent: Arc::clone(&sent),
    }));
    (state, sent)
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("X-Admin-Key", ADMIN_PASSWORD)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Admin-Key", ADMIN_PASSWORD)
        .body(Body::empty())
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn book(
    state: &Arc<AppState>,
    name: &str,
    date: &str,
    booking_type: &str,
    slot: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut body = serde_json::json!({
        "name": name,
        "email": "a@x.se",
        "phone": "070-123 45 67",
        "date": date,
        "booking_type": booking_type,
    });
    if let Some(slot) = slot {
        body["time_slot"] = serde_json::json!(slot);
    }
    send(state, json_request("POST", "/api/book", body)).await
}

async fn public_events(state: &Arc<AppState>) -> Vec<serde_json::Value> {
    let (status, json) = send(
        state,
        Request::builder()
            .uri("/api/bookings")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    json["events"].as_array().unwrap().clone()
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let (status, json) = send(
        &state,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Direct booking ──

#[tokio::test]
async fn test_same_slot_twice_conflicts() {
    let (state, sent) = test_state();

    let (status, first) = book(&state, "Ann", "2024-06-01", "2h", Some("09:00")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["ok"], true);
    assert!(first["id"].as_i64().unwrap() > 0);

    let (status, second) = book(&state, "Ann", "2024-06-01", "2h", Some("09:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(second["ok"], false);
    assert_eq!(second["code"], "conflict");
    assert!(second.get("id").is_none());

    assert_eq!(public_events(&state).await.len(), 1);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_two_slots_same_day() {
    let (state, _) = test_state();
    let (a, _) = book(&state, "Ann", "2024-06-01", "2h", Some("09:00")).await;
    let (b, _) = book(&state, "Bo", "2024-06-01", "2h", Some("12:00-14:00")).await;
    assert_eq!(a, StatusCode::CREATED);
    assert_eq!(b, StatusCode::CREATED);

    let events = public_events(&state).await;
    assert_eq!(events[0]["title"], "Ann (09:00–11:00)");
    assert_eq!(events[0]["start"], "2024-06-01T09:00:00");
    assert_eq!(events[0]["end"], "2024-06-01T11:00:00");
    assert_eq!(events[0]["booking_type"], "2h");
    assert_eq!(events[1]["title"], "Bo (12:00–14:00)");
}

#[tokio::test]
async fn test_full_day_and_slot_order_independent() {
    let (state, _) = test_state();

    let (status, _) = book(&state, "Ann", "2024-06-01", "heldag", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = book(&state, "Bo", "2024-06-01", "2h", Some("15:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = book(&state, "Bo", "2024-06-02", "2h", Some("15:00")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = book(&state, "Ann", "2024-06-02", "heldag", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_weekend_booking() {
    let (state, _) = test_state();

    let (status, _) = book(&state, "Ann", "2024-03-02", "helg", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let events = public_events(&state).await;
    assert_eq!(events[0]["start"], "2024-03-02");
    assert_eq!(events[0]["end"], "2024-03-04");
    assert_eq!(events[0]["title"], "Ann (helhelg)");

    for date in ["2024-03-02", "2024-03-03"] {
        let (status, _) = book(&state, "Bo", date, "heldag", None).await;
        assert_eq!(status, StatusCode::CONFLICT, "{date} should be blocked");
        let (status, _) = book(&state, "Bo", date, "2h", Some("18:00")).await;
        assert_eq!(status, StatusCode::CONFLICT, "{date} slot should be blocked");
    }

    let (status, _) = book(&state, "Bo", "2024-03-04", "heldag", None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_full_day_omits_end() {
    let (state, _) = test_state();
    book(&state, "Ann", "2024-06-01", "heldag", None).await;

    let events = public_events(&state).await;
    assert_eq!(events[0]["title"], "Ann (heldag)");
    assert!(events[0].get("end").is_none());
}

#[tokio::test]
async fn test_direct_booking_validation_errors() {
    let (state, _) = test_state();

    let (status, json) = book(&state, "Ann", "01/06/2024", "heldag", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "validation");

    let (status, json) = book(&state, "Ann", "2024-06-01", "2h", Some("10:00")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("time slot"));

    let (status, json) = send(
        &state,
        json_request("POST", "/api/book", serde_json::json!({"date": "2024-06-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("name") && error.contains("email") && error.contains("booking_type"));

    let (status, _) = send(
        &state,
        Request::builder()
            .method("POST")
            .uri("/api/book")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(public_events(&state).await.is_empty());
}

#[tokio::test]
async fn test_extended_year_is_rejected_and_service_stays_up() {
    let (state, _) = test_state();

    for booking_type in ["helg", "heldag"] {
        let (status, json) = book(&state, "Ann", "+262142-12-31", booking_type, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "validation");
    }

    let (status, json) = send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/add",
            serde_json::json!({"title": "Långt bort", "start": "+262142-12-31"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "validation");

    assert!(public_events(&state).await.is_empty());
    let (status, _) = book(&state, "Ann", "2024-06-01", "heldag", None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_concurrent_same_slot_single_winner() {
    let (state, _) = test_state();

    let mut tasks = vec![];
    for i in 0..6 {
        let state = state.clone();
        tasks.push(tokio::spawn(async move {
            book(&state, &format!("Guest{i}"), "2024-06-01", "2h", Some("18:00"))
                .await
                .0
        }));
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap() == StatusCode::CREATED {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert_eq!(public_events(&state).await.len(), 1);
}

// ── Pending requests ──

#[tokio::test]
async fn test_pending_request_never_conflicts() {
    let (state, sent) = test_state();
    book(&state, "Ann", "2024-06-01", "heldag", None).await;

    let res = test_app(state.clone())
        .oneshot(form_request(
            "/api/booking",
            "name=Bo&email=b%40x.se&phone=&date=2024-06-01&type=heldag&message=Kalas",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("Tack!"));

    // pending rows stay off the public calendar
    assert_eq!(public_events(&state).await.len(), 1);

    let (_, all) = send(&state, admin_request("GET", "/api/admin/bookings")).await;
    let items = all["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["status"], "pending");
    assert_eq!(items[0]["title"], "Request: 2024-06-01");
    assert_eq!(items[0]["end"], serde_json::Value::Null);
    assert_eq!(items[0]["phone"], serde_json::Value::Null);

    let sent = sent.lock().unwrap();
    assert!(sent.iter().any(|n| matches!(
        n,
        Notification::BookingRequest { name, message, .. }
            if name == "Bo" && message.as_deref() == Some("Kalas")
    )));
}

#[tokio::test]
async fn test_pending_request_with_unknown_type() {
    let (state, sent) = test_state();

    let res = test_app(state.clone())
        .oneshot(form_request(
            "/api/booking",
            "name=Bo&email=b%40x.se&date=2024-06-01&type=fest",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (_, all) = send(&state, admin_request("GET", "/api/admin/bookings")).await;
    let items = all["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "pending");
    assert_eq!(items[0]["booking_type"], serde_json::Value::Null);

    let sent = sent.lock().unwrap();
    assert!(matches!(
        sent.first(),
        Some(Notification::BookingRequest { booking_type: Some(t), .. }) if t == "fest"
    ));
}

#[tokio::test]
async fn test_unreadable_form_gets_html_error() {
    let (state, _) = test_state();

    for uri in ["/api/booking", "/api/contact"] {
        let res = test_app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "text/plain")
                    .body(Body::from("name=Bo"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8_lossy(&body);
        assert!(page.contains("<html"), "{uri}");
        assert!(page.contains("kunde inte läsas"), "{uri}");
        assert!(!page.contains("namn, e-post och datum"), "{uri}");
    }
}

#[tokio::test]
async fn test_pending_request_missing_fields() {
    let (state, sent) = test_state();

    let res = test_app(state.clone())
        .oneshot(form_request("/api/booking", "name=Bo&email=&date="))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("namn, e-post och datum"));
    assert!(page.contains("email, date"));
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_request() {
    let state = test_state_with(Box::new(FailingNotifier));
    let res = test_app(state.clone())
        .oneshot(form_request(
            "/api/booking",
            "name=Bo&email=b%40x.se&date=2024-06-01",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

// ── Admin: bookings ──

#[tokio::test]
async fn test_admin_requires_auth() {
    let (state, _) = test_state();

    let (status, json) = send(
        &state,
        Request::builder()
            .uri("/api/admin/bookings")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["ok"], false);

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/admin/bookings")
                .header("X-Admin-Key", "wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_auth_checked_before_validation() {
    let (state, _) = test_state();

    // an invalid body would be a 400 for an admin, but anonymous callers get 401 first
    let (status, json) = send(
        &state,
        json_request("POST", "/api/admin/set-status", serde_json::json!({"id": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "unauthorized");

    let (status, _) = send(
        &state,
        json_request("POST", "/api/admin/add", serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_add_bypasses_collisions() {
    let (state, _) = test_state();
    book(&state, "Ann", "2024-06-01", "heldag", None).await;

    let (status, json) = send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/add",
            serde_json::json!({"title": "Loppis", "start": "2024-06-01", "end": ""}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["id"].as_i64().is_some());
    assert_eq!(public_events(&state).await.len(), 2);

    let (status, json) = send(
        &state,
        admin_json_request("POST", "/api/admin/add", serde_json::json!({"title": "Loppis"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("start"));
}

#[tokio::test]
async fn test_admin_add_blocks_direct_booking() {
    let (state, _) = test_state();
    send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/add",
            serde_json::json!({"title": "Sommarläger", "start": "2024-07-01", "end": "2024-07-05"}),
        ),
    )
    .await;

    let (status, _) = book(&state, "Ann", "2024-07-03", "2h", Some("12:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = book(&state, "Ann", "2024-07-05", "2h", Some("12:00")).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_admin_set_status_round_trip() {
    let (state, _) = test_state();
    let (_, created) = book(&state, "Ann", "2024-06-01", "2h", Some("09:00")).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/set-status",
            serde_json::json!({"id": id, "status": "denied"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(public_events(&state).await.is_empty());

    // denied rows no longer block the slot
    let (status, replacement) = book(&state, "Bo", "2024-06-01", "2h", Some("09:00")).await;
    assert_eq!(status, StatusCode::CREATED);
    let replacement_id = replacement["id"].as_i64().unwrap();
    send(
        &state,
        admin_request("DELETE", &format!("/api/admin/bookings/{replacement_id}")),
    )
    .await;

    let (status, _) = send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/set-status",
            serde_json::json!({"id": id, "status": "approved"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let events = public_events(&state).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], id);
    assert_eq!(events[0]["title"], "Ann (09:00–11:00)");
    assert_eq!(events[0]["end"], "2024-06-01T11:00:00");
}

#[tokio::test]
async fn test_admin_set_status_errors() {
    let (state, _) = test_state();

    let (status, json) = send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/set-status",
            serde_json::json!({"id": 77, "status": "approved"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "not_found");

    let (status, _) = send(
        &state,
        admin_json_request(
            "POST",
            "/api/admin/set-status",
            serde_json::json!({"id": 77, "status": "cancelled"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_delete_twice() {
    let (state, _) = test_state();
    let (_, created) = book(&state, "Ann", "2024-06-01", "heldag", None).await;
    let id = created["id"].as_i64().unwrap();

    let (status, json) = send(&state, admin_request("DELETE", &format!("/api/admin/bookings/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);

    let (status, json) = send(&state, admin_request("DELETE", &format!("/api/admin/bookings/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["ok"], false);

    // the day is free again
    let (status, _) = book(&state, "Bo", "2024-06-01", "heldag", None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_admin_delete_with_bad_id() {
    let (state, _) = test_state();

    for uri in [
        "/api/admin/bookings/abc",
        "/api/admin/messages/1.5",
        "/api/admin/members/x",
    ] {
        let (status, json) = send(&state, admin_request("DELETE", uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["ok"], false);
        assert_eq!(json["code"], "validation");
    }

    // still 401 first for anonymous callers
    let (status, _) = send(
        &state,
        Request::builder()
            .method("DELETE")
            .uri("/api/admin/bookings/abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_list_newest_first() {
    let (state, _) = test_state();
    book(&state, "Ann", "2024-08-01", "heldag", None).await;
    book(&state, "Bo", "2024-05-01", "heldag", None).await;

    let (status, json) = send(&state, admin_request("GET", "/api/admin/bookings")).await;
    assert_eq!(status, StatusCode::OK);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items[0]["name"], "Bo");
    assert_eq!(items[1]["name"], "Ann");
    assert_eq!(items[0]["email"], "a@x.se");
    assert!(items[0]["created_at"].as_str().unwrap().ends_with('Z'));
}

// ── Sessions ──

#[tokio::test]
async fn test_login_session_grants_admin() {
    let (state, _) = test_state();

    let (status, _) = send(
        &state,
        json_request("POST", "/api/login", serde_json::json!({"password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({"password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let with_cookie = |method: &str, uri: &str| {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie.clone())
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&state, with_cookie("GET", "/api/admin/bookings")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&state, with_cookie("POST", "/api/logout")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&state, with_cookie("GET", "/api/admin/bookings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_session_ttl_fails_cleanly() {
    let mut config = test_config();
    config.session_ttl_hours = 10_000_000_000;
    let state = test_state_from(
        config,
        Box::new(MockNotifier {
            sent: Arc::new(Mutex::new(vec![])),
        }),
    );

    let (status, json) = send(
        &state,
        json_request("POST", "/api/login", serde_json::json!({"password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "internal");

    // the database lock is still usable
    assert!(public_events(&state).await.is_empty());
}

// ── Contact & members ──

#[tokio::test]
async fn test_contact_message_flow() {
    let (state, sent) = test_state();

    let res = test_app(state.clone())
        .oneshot(form_request(
            "/api/contact",
            "name=Ann&email=a%40x.se&message=Finns+det+parkering%3F",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, json) = send(&state, admin_request("GET", "/api/admin/messages")).await;
    assert_eq!(status, StatusCode::OK);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["message"], "Finns det parkering?");
    assert!(matches!(
        sent.lock().unwrap().first(),
        Some(Notification::ContactMessage { .. })
    ));

    let id = items[0]["id"].as_i64().unwrap();
    let (status, _) = send(&state, admin_request("DELETE", &format!("/api/admin/messages/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&state, admin_request("DELETE", &format!("/api/admin/messages/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_message_incomplete() {
    let (state, _) = test_state();
    let res = test_app(state.clone())
        .oneshot(form_request("/api/contact", "name=Ann&email=a%40x.se"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_sign_up() {
    let (state, sent) = test_state();

    let (status, json) = send(
        &state,
        json_request(
            "POST",
            "/api/members",
            serde_json::json!({"name": "Ann", "email": "a@x.se", "phone": null}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_i64().unwrap();

    let (status, _) = send(
        &state,
        json_request("POST", "/api/members", serde_json::json!({"name": "Bo"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(&state, admin_request("GET", "/api/admin/members")).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(sent.lock().unwrap().len(), 1);

    let (status, _) = send(&state, admin_request("DELETE", &format!("/api/admin/members/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
}
