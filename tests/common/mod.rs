// Shared helpers: an in-process stand-in for the chat completions service

#![allow(dead_code)]

use anyhow::Result;
use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use voice_chat::config::ChatConfig;
use voice_chat::{encode_samples, ChatClient};

/// Requests seen by the mock upstream: authorization header and JSON body
pub type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Serve `body` with `status` for every chat completion request
pub async fn spawn_upstream(status: StatusCode, body: Value) -> Result<(String, Seen)> {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(req): Json<Value>| {
            let recorded = Arc::clone(&recorded);
            let body = body.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                recorded.lock().await.push((auth, req));
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}/v1/chat/completions", addr), seen))
}

pub fn client_for(endpoint: &str) -> Result<ChatClient> {
    let config = ChatConfig {
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        ..ChatConfig::default()
    };

    Ok(ChatClient::new(config, "test-key".to_string())?)
}

/// A short canonical WAV reply
pub fn reply_wav() -> Vec<u8> {
    encode_samples(&[0.25; 32]).into_bytes()
}

pub fn audio_reply_body(transcript: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "audio": {
                    "id": "audio_1",
                    "data": base64::engine::general_purpose::STANDARD.encode(reply_wav()),
                    "transcript": transcript,
                    "expires_at": 1729000000
                }
            },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    })
}

pub fn text_reply_body(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}
