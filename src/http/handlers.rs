use super::state::AppState;
use crate::audio::WavHeader;
use crate::chat::{ChatReply, ChatRequest};
use crate::error::Error;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

fn error_response(status: StatusCode, error: &str, details: String) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service_name.clone(),
    })
}

/// POST /api/chat
/// Forward a prompt and optional recording to the chat service
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let status = rejection.status();
            warn!("Rejected chat request body: {}", rejection.body_text());
            return error_response(
                status,
                status.canonical_reason().unwrap_or("Bad Request"),
                rejection.body_text(),
            );
        }
    };

    if req.message.trim().is_empty() && req.audio.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Bad Request",
            Error::EmptyMessage.to_string(),
        );
    }

    if let Some(audio) = &req.audio {
        let validated = base64::engine::general_purpose::STANDARD
            .decode(audio.as_bytes())
            .map_err(|e| Error::InvalidAudio(format!("Audio is not base64: {}", e)))
            .and_then(|bytes| WavHeader::parse(&bytes));

        match validated {
            Ok(header) => info!(
                "Chat request with {} bytes of {}Hz audio",
                header.data_len, header.sample_rate
            ),
            Err(e) => {
                warn!("Rejected chat request: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Bad Request", e.to_string());
            }
        }
    }

    let reply = match state.chat.complete(&req.message, req.audio.as_deref()).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Error processing request: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                e.to_string(),
            );
        }
    };

    let audio_url = match &reply.audio {
        Some(bytes) => match state.replies.save(bytes).await {
            Ok(stored) => Some(stored.url),
            Err(e) => {
                error!("Failed to store reply audio: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    e.to_string(),
                );
            }
        },
        None => None,
    };

    (
        StatusCode::OK,
        Json(ChatReply {
            transcript: reply.transcript,
            audio_url,
        }),
    )
        .into_response()
}
