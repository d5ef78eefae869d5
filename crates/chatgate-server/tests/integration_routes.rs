//! Integration tests for the gateway router.
//!
//! These drive the full router through `tower::ServiceExt::oneshot` with a
//! scripted transport standing in for the upstream API, so every protocol
//! path is exercised without a network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use chatgate_core::{CompletionTransport, GatewayConfig, TransportError, WireResponse};
use chatgate_server::{AppState, create_router};

/// Upstream stand-in: replies with a fixed status/body and records calls.
#[derive(Debug)]
struct ScriptedTransport {
    status: u16,
    body: String,
    calls: AtomicUsize,
    payloads: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    fn replying(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    fn success() -> Arc<Self> {
        Self::replying(
            200,
            json!({
                "choices": [{"message": {"role": "assistant", "content": "hi there"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }),
        )
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_payload(&self) -> Value {
        self.payloads
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no payload captured")
    }
}

#[async_trait]
impl CompletionTransport for ScriptedTransport {
    async fn post_completion(
        &self,
        _endpoint: &str,
        _api_key: &str,
        payload: Vec<u8>,
    ) -> Result<WireResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::from_slice(&payload).unwrap());
        Ok(WireResponse::new(self.status, self.body.clone()))
    }
}

fn build_app(config: GatewayConfig, transport: Arc<ScriptedTransport>) -> axum::Router {
    create_router(AppState::new(config, transport as Arc<dyn CompletionTransport>))
}

fn configured() -> GatewayConfig {
    GatewayConfig::new(Some("sk-test".into()), None)
}

fn rest_request(body: &str, origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn graphql_request(query: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn unknown_route_is_a_bodyless_404() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn non_post_on_rest_path_is_405() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/chat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn preflight_echoes_allowed_origin_on_any_path() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/some/other/path")
                .header(header::ORIGIN, "https://a.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://a.com"
    );
    assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "POST, OPTIONS"
    );
}

#[tokio::test]
async fn preflight_omits_origin_header_for_disallowed_origin() {
    let config = GatewayConfig::new(Some("sk-test".into()), Some("https://a.com"));
    let app = build_app(config, ScriptedTransport::success());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header(header::ORIGIN, "https://b.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn rest_rejects_disallowed_origin_with_403() {
    let config = GatewayConfig::new(Some("sk-test".into()), Some("https://a.com"));
    let transport = ScriptedTransport::success();
    let app = build_app(config, transport.clone());

    let response = app
        .oneshot(rest_request(
            &json!({"message": "hello"}).to_string(),
            Some("https://b.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Origin not allowed");
    assert!(body.get("errorType").is_none());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn rest_rejects_malformed_json_before_validation() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(rest_request("{not json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["errorType"], "INVALID_JSON");
}

#[tokio::test]
async fn rest_rejects_missing_message() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(rest_request("{}", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["errorType"], "MISSING_MESSAGE");
}

#[tokio::test]
async fn rest_success_carries_cors_headers_and_usage() {
    let transport = ScriptedTransport::success();
    let app = build_app(configured(), transport.clone());

    let response = app
        .oneshot(rest_request(
            &json!({"message": "hello"}).to_string(),
            Some("https://anywhere.example"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );

    let body = json_body(response).await;
    assert_eq!(body["reply"], "hi there");
    assert_eq!(body["status"], "success");
    assert_eq!(body["usage"]["total_tokens"], 15);

    // The bare message became a system preamble plus user turn upstream
    assert_eq!(transport.call_count(), 1);
    let payload = transport.last_payload();
    let messages = payload["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "hello");
    assert_eq!(payload["stream"], false);
}

#[tokio::test]
async fn rest_maps_upstream_402_to_insufficient_balance() {
    let transport = ScriptedTransport::replying(402, json!({"error": {"message": "whatever"}}));
    let app = build_app(configured(), transport);

    let response = app
        .oneshot(rest_request(&json!({"message": "hello"}).to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    // Error responses carry the permissive CORS headers too
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    let body = json_body(response).await;
    assert_eq!(body["errorType"], "INSUFFICIENT_BALANCE");
    assert_eq!(body["reply"], "");
}

#[tokio::test]
async fn rest_missing_credential_never_touches_the_network() {
    let transport = ScriptedTransport::success();
    let config = GatewayConfig::new(None, None);
    let app = build_app(config, transport.clone());

    let response = app
        .oneshot(rest_request(&json!({"message": "hello"}).to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["errorType"], "MISSING_API_KEY");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn graphql_health_query_works() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(graphql_request("{ health { status version } }"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["health"]["status"], "OK");
    assert_eq!(body["data"]["health"]["version"], "2.0.0-graphql");
}

#[tokio::test]
async fn graphql_api_config_lists_models() {
    let app = build_app(configured(), ScriptedTransport::success());

    let response = app
        .oneshot(graphql_request(
            "{ apiConfig { supportedModels maxTokens } }",
        ))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(
        body["data"]["apiConfig"]["supportedModels"],
        json!(["deepseek-chat", "deepseek-coder"])
    );
    assert_eq!(body["data"]["apiConfig"]["maxTokens"], 32000);
}

#[tokio::test]
async fn graphql_send_message_succeeds() {
    let transport = ScriptedTransport::success();
    let app = build_app(configured(), transport.clone());

    let response = app
        .oneshot(graphql_request(
            r#"mutation { sendMessage(input: {message: "hello"}) { reply status usage { promptTokens totalTokens } } }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let sent = &body["data"]["sendMessage"];
    assert_eq!(sent["reply"], "hi there");
    assert_eq!(sent["status"], "SUCCESS");
    assert_eq!(sent["usage"]["promptTokens"], 10);
    assert_eq!(sent["usage"]["totalTokens"], 15);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn graphql_upstream_failure_stays_http_200() {
    let transport = ScriptedTransport::replying(402, json!({}));
    let app = build_app(configured(), transport);

    let response = app
        .oneshot(graphql_request(
            r#"mutation { sendMessage(input: {message: "hello"}) { reply status error errorType } }"#,
        ))
        .await
        .unwrap();

    // Domain errors never become GraphQL transport errors
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("errors").is_none());
    let sent = &body["data"]["sendMessage"];
    assert_eq!(sent["status"], "ERROR");
    assert_eq!(sent["errorType"], "INSUFFICIENT_BALANCE");
    assert_eq!(sent["reply"], "");
}

#[tokio::test]
async fn graphql_validation_failure_uses_the_error_envelope() {
    let transport = ScriptedTransport::success();
    let app = build_app(configured(), transport.clone());

    let response = app
        .oneshot(graphql_request(
            r#"mutation { sendMessage(input: {message: "   "}) { status errorType } }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let sent = &body["data"]["sendMessage"];
    assert_eq!(sent["status"], "ERROR");
    assert_eq!(sent["errorType"], "EMPTY_MESSAGE");
    assert_eq!(transport.call_count(), 0);
}
