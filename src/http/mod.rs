//! HTTP API for browser clients
//!
//! - POST /api/chat - Send a prompt and optional WAV recording, get the reply
//! - GET /uploads/* - Stored reply audio
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, HealthResponse};
pub use routes::create_router;
pub use state::AppState;
