//! Gemini backend against a local fake endpoint

use std::net::SocketAddr;
use std::time::Duration;

use homeroom_core::{BackendError, CommentGenerator, CompletionBackend, CompletionRequest, GenerationError};
use homeroom_gemini::{GeminiBackend, GeminiConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

fn spawn<F, R>(routes: F) -> SocketAddr
where
    F: Filter<Extract = (R,), Error = warp::Rejection> + Clone + Send + Sync + 'static,
    R: warp::Reply,
{
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn backend(addr: SocketAddr, timeout: Duration) -> GeminiBackend {
    GeminiBackend::new(GeminiConfig {
        base_url: format!("http://{addr}"),
        timeout,
        use_system_proxy: false,
    })
    .unwrap()
}

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        api_key: "secret-key".to_string(),
        model: "gemini-test".to_string(),
        prompt: prompt.to_string(),
    }
}

/// Echoes what it received so tests can assert on the request
fn echo_route() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::post()
        .and(warp::path!("v1beta" / "models" / String))
        .and(warp::header::<String>("x-goog-api-key"))
        .and(warp::body::json())
        .map(|model: String, key: String, body: Value| {
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            warp::reply::json(&json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": format!("{model}|{key}|{prompt}")}]},
                    "finishReason": "STOP"
                }]
            }))
        })
}

#[tokio::test]
async fn sends_key_header_model_path_and_prompt() {
    let addr = spawn(echo_route());
    let text = backend(addr, Duration::from_secs(5))
        .complete(request("write a comment"))
        .await
        .unwrap();
    assert_eq!(text, "gemini-test:generateContent|secret-key|write a comment");
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let routes = warp::post().map(|| {
        warp::reply::with_status(
            warp::reply::json(&json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
            })),
            StatusCode::BAD_REQUEST,
        )
    });
    let addr = spawn(routes);

    let err = backend(addr, Duration::from_secs(5))
        .complete(request("x"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        }
    );
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let routes = warp::post().map(|| {
        warp::reply::json(&json!({"promptFeedback": {"blockReason": "SAFETY"}}))
    });
    let addr = spawn(routes);

    let err = backend(addr, Duration::from_secs(5))
        .complete(request("x"))
        .await
        .unwrap_err();
    assert_eq!(err, BackendError::Blocked("SAFETY".to_string()));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let routes = warp::post().map(|| "not json");
    let addr = spawn(routes);

    let err = backend(addr, Duration::from_secs(5))
        .complete(request("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let routes = warp::post().then(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    });
    let addr = spawn(routes);

    let err = backend(addr, Duration::from_secs(1))
        .complete(request("x"))
        .await
        .unwrap_err();
    assert_eq!(err, BackendError::Timeout { secs: 1 });
}

#[tokio::test]
async fn unreachable_endpoint_is_upstream_failure_for_generator() {
    // Bind then drop to obtain a port with nothing listening
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let generator = CommentGenerator::new(backend(addr, Duration::from_secs(2)));
    let err = generator
        .generate("secret-key", ["responsibility"])
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Upstream(detail) if detail.starts_with("transport error")));
}

#[tokio::test]
async fn generator_end_to_end_through_http() {
    let addr = spawn(echo_route());
    let generator = CommentGenerator::new(backend(addr, Duration::from_secs(5)))
        .with_model("gemini-1.5-flash-latest");

    let text = generator
        .generate("secret-key", ["consideration", "responsibility"])
        .await
        .unwrap();
    assert!(text.starts_with("gemini-1.5-flash-latest:generateContent|secret-key|"));
    assert!(text.contains("[consideration, responsibility]"));
}
