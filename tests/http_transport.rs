//! HTTP transport and client tests against a local mock agent

use std::{net::TcpListener, time::Duration};

use a2a_delegate::{
    auth::TokenIssuer,
    client::{A2AClientBuilder, ClientConfig},
    codec::{Codec, EventKind, JsonRpcCodec},
    protocol::{A2AError, TaskOperation, TaskState},
    stream::{StreamAccumulator, StreamOutcome},
    transport::{HttpTransport, Transport, TransportRequest},
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const SECRET: &str = "integration-secret";

fn sse_body(events: &[(&str, Value)]) -> String {
    events
        .iter()
        .map(|(kind, data)| {
            if kind.is_empty() {
                format!("data: {}\n\n", data)
            } else {
                format!("event: {}\ndata: {}\n\n", kind, data)
            }
        })
        .collect()
}

fn status_event(text: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "req-sub-1",
        "result": {
            "id": "t1",
            "status": {
                "state": "working",
                "message": {"role": "agent", "parts": [{"type": "text", "text": text}]}
            }
        }
    })
}

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(format!("{}/a2a", server.uri()).parse().unwrap()).unwrap()
}

fn request(operation: &TaskOperation) -> TransportRequest {
    TransportRequest::new()
        .header("Content-Type", "application/json")
        .timeout(Some(Duration::from_secs(5)))
        .body(JsonRpcCodec::new().encode_request(operation).unwrap())
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(&format!("{}/a2a", server.uri()), SECRET).unwrap()
}

#[tokio::test]
async fn test_post_json_decodes_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/a2a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let value = assert_ok!(
        transport(&server)
            .post_json(request(&TaskOperation::get("t1")))
            .await
    );

    assert_eq!(value, json!({"ok": true}));
}

#[tokio::test]
async fn test_post_json_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("agent exploded"))
        .mount(&server)
        .await;

    match transport(&server)
        .post_json(request(&TaskOperation::get("t1")))
        .await
    {
        Err(A2AError::Http { status_code, body }) => {
            assert_eq!(status_code, 500);
            assert_eq!(body, "agent exploded");
        }
        other => panic!("Expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_json_rejects_non_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let result = transport(&server)
        .post_json(request(&TaskOperation::get("t1")))
        .await;

    let err = assert_err!(result);
    assert!(matches!(err, A2AError::Communication(_)));
}

/// Endpoint on a port nothing listens on
fn closed_endpoint() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/a2a", port).parse().unwrap()
}

#[tokio::test]
async fn test_connection_refused_is_communication_error() {
    let transport = HttpTransport::new(closed_endpoint()).unwrap();
    let result = transport.post_json(request(&TaskOperation::get("t1"))).await;

    let err = assert_err!(result);
    assert!(matches!(err, A2AError::Communication(_)), "got {err:?}");
}

#[tokio::test]
async fn test_subscribe_connection_refused_is_stream_error() {
    let transport = HttpTransport::new(closed_endpoint()).unwrap();
    let result = transport
        .subscribe(request(&TaskOperation::send_subscribe("t1", "s1", "hi")))
        .await;

    match result {
        Err(A2AError::Stream { message, .. }) => assert!(message.contains("SSE connection error")),
        Err(other) => panic!("Expected Stream error, got {other:?}"),
        Ok(_) => panic!("Expected Stream error, got a stream"),
    }
}

#[tokio::test]
async fn test_subscribe_parses_sse() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        ("", status_event("first")),
        ("message", status_event("second")),
        ("close", json!({})),
    ]);
    Mock::given(method("POST"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let stream = transport(&server)
        .subscribe(request(&TaskOperation::send_subscribe("t1", "s1", "hi")))
        .await
        .unwrap();
    let events: Vec<_> = stream.collect().await;

    assert_eq!(events.len(), 3);
    let kinds: Vec<_> = events
        .into_iter()
        .map(|event| event.unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![EventKind::Message, EventKind::Message, EventKind::Close]
    );
}

#[tokio::test]
async fn test_subscribe_http_error_is_stream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let result = transport(&server)
        .subscribe(request(&TaskOperation::send_subscribe("t1", "s1", "hi")))
        .await;

    match result {
        Err(A2AError::Stream { message, .. }) => assert!(message.contains("401")),
        Err(other) => panic!("Expected Stream error, got {other:?}"),
        Ok(_) => panic!("Expected Stream error, got a stream"),
    }
}

#[tokio::test]
async fn test_subscribe_rejects_plain_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let result = transport(&server)
        .subscribe(request(&TaskOperation::send_subscribe("t1", "s1", "hi")))
        .await;

    assert!(matches!(result, Err(A2AError::Stream { .. })));
}

#[tokio::test]
async fn test_client_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/a2a"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({"method": "tasks/get", "params": {"id": "t42"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-get-1",
            "result": {"id": "t42", "status": {"state": "completed"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = A2AClientBuilder::from_config(config(&server).with_user_context("tester"))
        .build()
        .unwrap();
    let task = client.get_task("t42").await.unwrap();
    assert_eq!(task.status.state, TaskState::Completed);

    let requests = server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    let token = authorization.strip_prefix("Bearer ").unwrap();

    let claims = TokenIssuer::new(SECRET, "tester")
        .unwrap()
        .verify(token)
        .unwrap();
    assert_eq!(claims.context.user, "tester");
}

#[tokio::test]
async fn test_client_subscribe_and_accumulate() {
    let server = MockServer::start().await;
    let artifact = json!({
        "jsonrpc": "2.0",
        "result": {"id": "t1", "artifact": {"parts": [{"type": "text", "text": "42M"}]}}
    });
    let body = sse_body(&[
        ("", status_event("looking up revenue")),
        ("", json!("not an envelope")),
        ("", artifact),
    ]);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "tasks/sendSubscribe"})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut client = A2AClientBuilder::from_config(config(&server)).build().unwrap();
    let stream = client
        .send_subscribe_task("t1", "find revenue", Some("s1".into()))
        .await
        .unwrap();

    let outcome = StreamAccumulator::accumulate(stream).await;
    assert_eq!(
        outcome,
        StreamOutcome::Text("looking up revenue\n42M".into())
    );
}

#[tokio::test]
async fn test_client_stream_error_event() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        ("", status_event("starting")),
        ("error", json!({"message": "boom"})),
        ("", status_event("never delivered")),
    ]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut client = A2AClientBuilder::from_config(config(&server)).build().unwrap();
    let stream = client.send_subscribe_task("t1", "q", None).await.unwrap();

    match StreamAccumulator::accumulate(stream).await {
        StreamOutcome::Failed(message) => assert!(message.contains("boom")),
        other => panic!("Expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_send_task_rpc_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-send-1",
            "error": {"code": -32001, "message": "Task not found"}
        })))
        .mount(&server)
        .await;

    let mut client = A2AClientBuilder::from_config(config(&server)).build().unwrap();
    let result = client.send_task("t1", "hi", None).await;

    assert!(matches!(result, Err(A2AError::Rpc { code: -32001, .. })));
}

#[tokio::test]
async fn test_client_get_task_with_naive_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-get-1",
            "result": {
                "id": "t1",
                "status": {
                    "state": "completed",
                    "message": {"role": "agent", "parts": [{"type": "text", "text": "ready"}]},
                    "timestamp": "2025-04-01T12:34:56.123456"
                }
            }
        })))
        .mount(&server)
        .await;

    let mut client = A2AClientBuilder::from_config(config(&server)).build().unwrap();
    let task = assert_ok!(client.get_task("t1").await);

    assert_eq!(task.status.state, TaskState::Completed);
    assert!(task.status.timestamp.is_some());
    assert_eq!(task.render_text().unwrap(), "ready");
}
