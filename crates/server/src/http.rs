//! HTTP endpoints
//!
//! REST API the widget front-end calls once per visitor message. The
//! boundary discards empty input and renders whatever the engine
//! returns; all conversational decisions stay in the engine.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::websocket::WebSocketHandler;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let ws_route = format!("{}/:session_id", config.server.ws_path);
    drop(config); // Release lock before building router

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(delete_session))
        // Chat endpoint (non-streaming)
        .route("/api/chat/:session_id", post(chat))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // WebSocket
        .route(&ws_route, get(WebSocketHandler::handle))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns a permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Trim a raw visitor message, discarding empty input
///
/// Empty and whitespace-only messages never reach the engine.
pub(crate) fn sanitize_message(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Session creation response
#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    session_id: String,
    greeting: String,
}

/// Create a new visitor session
async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, StatusCode> {
    let session = state.create_session().map_err(StatusCode::from)?;

    Ok(Json(CreateSessionResponse {
        session_id: session.id.clone(),
        greeting: state.messages.greeting.clone(),
    }))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "state": session.state(),
        "turn_count": session.turn_count(),
    })))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

/// Chat response
#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
    show_menu: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    quick_questions: Vec<String>,
    state: chat_widget_core::ConversationState,
    turn_count: usize,
}

/// Chat endpoint
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    let Some(message) = sanitize_message(&request.message) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let reply = session.handle(message);

    if reply.onboarding_just_completed {
        state.dispatch_lead(&session);
    }

    let quick_questions = if reply.show_menu {
        state.quick_questions.as_ref().clone()
    } else {
        Vec::new()
    };

    Ok(Json(ChatResponse {
        reply: reply.text,
        show_menu: reply.show_menu,
        quick_questions,
        state: session.state(),
        turn_count: session.turn_count(),
    }))
}

/// Health check
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ready",
        "sessions": state.sessions.count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_message() {
        assert_eq!(sanitize_message("hello"), Some("hello"));
        assert_eq!(sanitize_message("  hello  "), Some("hello"));
        assert_eq!(sanitize_message(""), None);
        assert_eq!(sanitize_message("   "), None);
        assert_eq!(sanitize_message("\n\t"), None);
    }

    #[test]
    fn test_chat_response_omits_hidden_menu() {
        let response = ChatResponse {
            reply: "Please share your contact number:".to_string(),
            show_menu: false,
            quick_questions: Vec::new(),
            state: chat_widget_core::ConversationState::AwaitingPhone,
            turn_count: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("quick_questions").is_none());
        assert_eq!(json["state"], "awaiting_phone");
    }
}
