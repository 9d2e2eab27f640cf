#![allow(clippy::unwrap_used)]
// Integration tests for the `/staff` resource using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use timetable_api::{
    ApiClient, CreateStaffRequest, Error, MemoryTokenStore, Schedule, Session, SessionGuard,
    TimeSlot, TokenStore, TransportConfig, UpdateStaffRequest, Weekday,
};

const API_ROOT: &str = "/staff-timetable/api";

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    client: ApiClient,
    store: Arc<MemoryTokenStore>,
}

async fn setup_with(store: MemoryTokenStore) -> Harness {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}{API_ROOT}", server.uri())).unwrap();
    let store = Arc::new(store);
    let session = Arc::new(Session::new(store.clone()));
    let client = ApiClient::new(&base_url, session, &TransportConfig::default()).unwrap();
    Harness {
        server,
        client,
        store,
    }
}

async fn setup() -> Harness {
    setup_with(MemoryTokenStore::with_token("abc123")).await
}

fn api_path(suffix: &str) -> String {
    format!("{API_ROOT}/{suffix}")
}

fn staff_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": null,
        "schedule": Schedule::empty().encode(),
        "is_active": true,
        "created_at": "2025-03-01T10:00:00",
        "updated_at": "2025-03-01T10:00:00"
    })
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_and_content_type_are_sent() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/")))
        .and(header("authorization", "Bearer abc123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "staff": [] })))
        .expect(1)
        .mount(&h.server)
        .await;

    let resp = h.client.list_staff(None).await.unwrap();
    assert!(resp.staff.is_empty());
}

#[tokio::test]
async fn test_request_without_token_is_still_sent() {
    let h = setup_with(MemoryTokenStore::new()).await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "staff": [] })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.list_staff(None).await.unwrap();

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_token_set_after_construction_is_used() {
    let h = setup_with(MemoryTokenStore::new()).await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/")))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "staff": [] })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client
        .session()
        .set_token(SecretString::from("fresh".to_owned()))
        .unwrap();
    h.client.list_staff(None).await.unwrap();
    assert_eq!(h.store.load().unwrap().expose_secret(), "fresh");
}

// ── list ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_without_filter_has_no_query() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "staff": [staff_json("1", "Ana"), staff_json("2", "Luis")]
        })))
        .mount(&h.server)
        .await;

    let resp = h.client.list_staff(None).await.unwrap();
    assert_eq!(resp.staff.len(), 2);
    assert_eq!(resp.staff[1].name, "Luis");

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_list_with_filter_sends_exact_value() {
    for flag in [true, false] {
        let h = setup().await;

        Mock::given(method("GET"))
            .and(path(api_path("staff/")))
            .and(query_param("is_active", flag.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "staff": [] })))
            .expect(1)
            .mount(&h.server)
            .await;

        h.client.list_staff(Some(flag)).await.unwrap();

        let requests = h.server.received_requests().await.unwrap();
        let expected = format!("is_active={flag}");
        assert_eq!(requests[0].url.query(), Some(expected.as_str()));
    }
}

// ── create / get / update / delete ──────────────────────────────────

#[tokio::test]
async fn test_create_then_decode_empty_schedule() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("staff/")))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({ "name": "Ana" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(staff_json("42", "Ana")))
        .expect(1)
        .mount(&h.server)
        .await;

    let staff = h
        .client
        .create_staff(&CreateStaffRequest::new("Ana"))
        .await
        .unwrap();

    assert_eq!(staff.id, "42");
    assert_eq!(staff.name, "Ana");
    assert!(staff.is_active);

    let decoded = Schedule::decode(&staff.schedule().encode());
    assert_eq!(decoded, Schedule::empty());
    for day in [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ] {
        assert!(decoded.day(day).is_empty());
    }
}

#[tokio::test]
async fn test_get_by_id() {
    let h = setup().await;

    let mut schedule = Schedule::empty();
    schedule.monday.push(TimeSlot::new("09:00", "17:00"));
    let mut body = staff_json("abc-1", "Ana");
    body["email"] = json!("ana@example.com");
    body["schedule"] = json!(schedule.encode());

    Mock::given(method("GET"))
        .and(path(api_path("staff/abc-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&h.server)
        .await;

    let staff = h.client.get_staff("abc-1").await.unwrap();
    assert_eq!(staff.email.as_deref(), Some("ana@example.com"));
    assert_eq!(staff.schedule(), schedule);
}

#[tokio::test]
async fn test_update_sends_full_body_with_put() {
    let h = setup().await;

    let mut schedule = Schedule::empty();
    schedule.friday.push(TimeSlot::new("08:00", "12:00"));
    let request = UpdateStaffRequest::new("Ana María")
        .email("ana@example.com")
        .schedule(&schedule);

    let mut response = staff_json("7", "Ana María");
    response["schedule"] = json!(schedule.encode());

    Mock::given(method("PUT"))
        .and(path(api_path("staff/7")))
        .and(body_json(json!({
            "name": "Ana María",
            "email": "ana@example.com",
            "schedule": schedule.encode(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&h.server)
        .await;

    let staff = h.client.update_staff("7", &request).await.unwrap();
    assert_eq!(staff.schedule().friday, vec![TimeSlot::new("08:00", "12:00")]);
}

#[tokio::test]
async fn test_delete_returns_message() {
    let h = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api_path("staff/7")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Staff member deactivated" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let resp = h.client.delete_staff("7").await.unwrap();
    assert_eq!(resp.message, "Staff member deactivated");
}

#[tokio::test]
async fn test_blank_id_is_rejected_before_sending() {
    let h = setup().await;
    let update = UpdateStaffRequest {
        name: "Ada".into(),
        email: None,
        schedule: Some(Schedule::empty().encode()),
    };

    for id in ["", "  "] {
        let err = h.client.get_staff(id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)), "get {id:?}: {err:?}");
        let err = h.client.update_staff(id, &update).await.unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)), "update {id:?}: {err:?}");
        let err = h.client.delete_staff(id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)), "delete {id:?}: {err:?}");
    }

    assert!(h.server.received_requests().await.unwrap().is_empty());
    assert!(h.client.session().token().is_some());
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_clears_token_everywhere() {
    let h = setup().await;
    let guard = SessionGuard::new(h.store.clone());
    assert!(guard.is_authenticated());

    Mock::given(method("POST"))
        .and(path(api_path("staff/")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid token",
            "type": "authentication_error"
        })))
        .mount(&h.server)
        .await;

    let err = h
        .client
        .create_staff(&CreateStaffRequest::new("Ana"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    let api = err.to_api_error();
    assert_eq!(api.detail, "Invalid token");
    assert_eq!(api.kind.as_deref(), Some("authentication_error"));

    assert!(h.client.session().token().is_none());
    assert!(h.store.load().is_none());
    assert!(!guard.is_authenticated());
}

#[tokio::test]
async fn test_unauthorized_on_every_verb_clears_token() {
    let cases: [(&str, &str); 4] = [
        ("GET", "staff/1"),
        ("PUT", "staff/1"),
        ("DELETE", "staff/1"),
        ("GET", "staff/"),
    ];

    for (verb, suffix) in cases {
        let h = setup().await;
        Mock::given(method(verb))
            .and(path(api_path(suffix)))
            .respond_with(ResponseTemplate::new(401))
            .mount(&h.server)
            .await;

        let result = match (verb, suffix) {
            ("GET", "staff/") => h.client.list_staff(None).await.map(|_| ()),
            ("GET", _) => h.client.get_staff("1").await.map(|_| ()),
            ("PUT", _) => h
                .client
                .update_staff("1", &UpdateStaffRequest::new("x"))
                .await
                .map(|_| ()),
            _ => h.client.delete_staff("1").await.map(|_| ()),
        };

        let err = result.unwrap_err();
        assert!(err.is_unauthorized(), "{verb} {suffix}: {err:?}");
        assert_eq!(err.to_api_error().detail, "Request failed with status code 401");
        assert!(h.store.load().is_none(), "{verb} {suffix} left a token behind");
    }
}

#[tokio::test]
async fn test_non_auth_error_keeps_token() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/missing")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Staff not found" })),
        )
        .mount(&h.server)
        .await;

    let err = h.client.get_staff("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_api_error().detail, "Staff not found");
    assert!(err.to_api_error().kind.is_none());
    assert_eq!(h.store.load().unwrap().expose_secret(), "abc123");
}

#[tokio::test]
async fn test_validation_detail_list_is_rendered() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("staff/")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{ "loc": ["body", "name"], "msg": "field required" }]
        })))
        .mount(&h.server)
        .await;

    let err = h
        .client
        .create_staff(&CreateStaffRequest::new(""))
        .await
        .unwrap_err();

    let detail = err.to_api_error().detail;
    assert!(detail.contains("field required"), "got: {detail}");
}

#[tokio::test]
async fn test_non_json_error_body_falls_back_to_status() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/1")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&h.server)
        .await;

    let err = h.client.get_staff("1").await.unwrap_err();
    match err {
        Error::Api { status, ref detail, ref kind } => {
            assert_eq!(status, 502);
            assert_eq!(detail, "Request failed with status code 502");
            assert!(kind.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_deserialization_error() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": 1"))
        .mount(&h.server)
        .await;

    let err = h.client.get_staff("1").await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected Deserialization error, got: {err:?}"
    );
    assert!(err.to_api_error().kind.is_none());
}

#[tokio::test]
async fn test_timeout_is_normalized() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}{API_ROOT}", server.uri())).unwrap();
    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::with_token("abc123"))));
    let transport = TransportConfig {
        timeout: std::time::Duration::from_millis(100),
    };
    let client = ApiClient::new(&base_url, session, &transport).unwrap();

    Mock::given(method("GET"))
        .and(path(api_path("staff/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "staff": [] }))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.list_staff(None).await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
    let api = err.to_api_error();
    assert!(api.kind.is_none());
    assert_eq!(api.detail, "Request timed out after 100ms");
    assert!(client.session().token().is_some());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}{API_ROOT}")).unwrap();

    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::new())));
    let client = ApiClient::new(&base_url, session, &TransportConfig::default()).unwrap();

    let err = client.list_staff(None).await.unwrap_err();
    assert!(
        matches!(err, Error::Transport(_)),
        "expected Transport error, got: {err:?}"
    );
    assert!(err.to_api_error().kind.is_none());
}
