use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header::CACHE_CONTROL, header::CONTENT_TYPE},
    response::Response,
    routing::post,
};
use checkin_server::{
    app,
    config::Config,
    state::State,
    upstream::{AppsScript, BoxError, Upstream, UpstreamReply},
};
use http_body_util::BodyExt;
use intake::IntakePayload;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

enum Answer {
    Reply(StatusCode, &'static str),
    Unreachable,
}

struct FakeSheet {
    answer: Answer,
    calls: AtomicUsize,
    received: Mutex<Vec<Value>>,
}

impl FakeSheet {
    fn new(answer: Answer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for FakeSheet {
    async fn forward(&self, payload: &IntakePayload<'_>) -> Result<UpstreamReply, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .unwrap()
            .push(serde_json::to_value(payload).unwrap());

        match self.answer {
            Answer::Reply(status, body) => Ok(UpstreamReply {
                status,
                body: body.to_string(),
            }),
            Answer::Unreachable => Err("connection refused".into()),
        }
    }
}

fn config(upstream_url: Option<&str>) -> Config {
    Config {
        port: 0,
        upstream_url: upstream_url.map(str::to_string),
    }
}

fn relay(sheet: &Arc<FakeSheet>) -> Router {
    let upstream: Arc<dyn Upstream> = sheet.clone();
    app(State::with_upstream(config(Some("http://sheet")), Some(upstream)))
}

async fn post_checkin(app: Router, body: impl Into<Body>) -> (StatusCode, Response<Body>) {
    let request = Request::post("/checkin")
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    (response.status(), response)
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn jo_smith() -> Value {
    json!({
        "kind": "new",
        "name": "Jo Smith",
        "phone": "555-123-4567",
        "reason": "scheduled",
    })
}

#[tokio::test]
async fn test_forwards_valid_checkin() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let (status, response) = post_checkin(relay(&sheet), jo_smith().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
    assert_eq!(
        json_body(response).await,
        json!({ "ok": true, "result": { "ok": true } })
    );

    assert_eq!(sheet.calls(), 1);
    assert_eq!(
        sheet.received.lock().unwrap()[0],
        json!({
            "kind": "new",
            "reason": "scheduled",
            "name": "Jo Smith",
            "phone": "555-123-4567",
            "otherReason": "",
            "productName": "",
            "notes": "",
        })
    );
}

#[tokio::test]
async fn test_upstream_error_status() {
    let sheet = FakeSheet::new(Answer::Reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Exception: sheet not found",
    ));

    let (status, response) = post_checkin(relay(&sheet), jo_smith().to_string()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({
            "ok": false,
            "error": "GAS error",
            "details": "Exception: sheet not found",
        })
    );
}

#[tokio::test]
async fn test_upstream_failure_flag() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":false,"error":"locked"}"#));

    let (status, response) = post_checkin(relay(&sheet), jo_smith().to_string()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({
            "ok": false,
            "error": "GAS returned failure",
            "details": { "ok": false, "error": "locked" },
        })
    );
}

#[tokio::test]
async fn test_upstream_plain_text() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, "Row added"));

    let (status, response) = post_checkin(relay(&sheet), jo_smith().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "ok": true, "result": "Row added" })
    );
}

#[tokio::test]
async fn test_upstream_unreachable() {
    let sheet = FakeSheet::new(Answer::Unreachable);

    let (status, response) = post_checkin(relay(&sheet), jo_smith().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({
            "ok": false,
            "error": "Unexpected error",
            "details": "connection refused",
        })
    );
    assert_eq!(sheet.calls(), 1);
}

#[tokio::test]
async fn test_validation_failure() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let (status, response) = post_checkin(relay(&sheet), json!({ "name": "A" }).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("Validation failed"));
    assert_eq!(
        body["details"]["fieldErrors"],
        json!({
            "kind": "Required",
            "name": "Please enter a full name",
            "phone": "Required",
            "reason": "Required",
        })
    );
    assert_eq!(sheet.calls(), 0);
}

#[tokio::test]
async fn test_cross_field_rules_on_relay() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let mut checkin = jo_smith();
    checkin["reason"] = json!("pharma");

    let (status, response) = post_checkin(relay(&sheet), checkin.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["details"]["fieldErrors"],
        json!({ "productName": "Please list the product you represent." })
    );
    assert_eq!(sheet.calls(), 0);
}

#[tokio::test]
async fn test_honeypot_is_absorbed() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let mut checkin = jo_smith();
    checkin["company"] = json!("Cheap Pills Inc");

    let (status, response) = post_checkin(relay(&sheet), checkin.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "ok": true }));
    assert_eq!(sheet.calls(), 0);
}

#[tokio::test]
async fn test_honeypot_absorbs_invalid_bot_payload() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let (status, _) = post_checkin(
        relay(&sheet),
        json!({ "name": "x", "company": "bot" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sheet.calls(), 0);
}

#[tokio::test]
async fn test_missing_upstream_config() {
    let (status, response) = post_checkin(
        app(State::with_upstream(config(None), None)),
        jo_smith().to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("Missing APPS_SCRIPT_URL"));
}

#[tokio::test]
async fn test_malformed_json() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let (status, response) = post_checkin(relay(&sheet), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], json!("Malformed payload"));
    assert_eq!(sheet.calls(), 0);
}

#[tokio::test]
async fn test_non_object_payload() {
    let sheet = FakeSheet::new(Answer::Reply(StatusCode::OK, r#"{"ok":true}"#));

    let (status, response) = post_checkin(relay(&sheet), "[1, 2, 3]").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["details"]["formErrors"],
        json!(["Expected object, received array"])
    );
}

#[tokio::test]
async fn test_apps_script_posts_json() {
    let received: Arc<Mutex<Option<(String, Value)>>> = Arc::default();

    let captured = received.clone();
    let sheet = Router::new().route(
        "/exec",
        post(move |request: Request<Body>| {
            let captured = captured.clone();
            async move {
                let content_type = request.headers()[CONTENT_TYPE].to_str().unwrap().to_string();
                let bytes = request.into_body().collect().await.unwrap().to_bytes();
                let body: Value = serde_json::from_slice(&bytes).unwrap();
                *captured.lock().unwrap() = Some((content_type, body));

                Json(json!({ "ok": true, "row": 7 }))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, sheet).await.unwrap() });

    let url = format!("http://{address}/exec");
    let upstream: Arc<dyn Upstream> = Arc::new(AppsScript::new(url.clone()));
    let relay = app(State::with_upstream(config(Some(&url)), Some(upstream)));

    let (status, response) = post_checkin(relay, jo_smith().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "ok": true, "result": { "ok": true, "row": 7 } })
    );

    let (content_type, body) = received.lock().unwrap().clone().unwrap();
    assert_eq!(content_type, "application/json");
    assert_eq!(body["name"], json!("Jo Smith"));
    assert_eq!(body.get("company"), None);
}
