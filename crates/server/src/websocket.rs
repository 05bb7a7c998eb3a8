//! WebSocket handler
//!
//! Real-time message exchange with the widget front-end. The handler
//! applies the artificial typing delay before delivering each reply;
//! the engine itself stays synchronous and delay-free.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::http::sanitize_message;
use crate::session::Session;
use crate::state::AppState;

/// WebSocket message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Visitor text input
    Text { content: String },
    /// Widget reply
    Reply {
        text: String,
        show_menu: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        quick_questions: Vec<String>,
    },
    /// Session info sent on connect
    SessionInfo { session_id: String },
    /// Status update
    Status { state: String },
    /// Error
    Error { message: String },
    /// Ping/Pong
    Ping,
    Pong,
    /// End session
    EndSession,
}

/// WebSocket handler
pub struct WebSocketHandler;

impl WebSocketHandler {
    /// Handle WebSocket upgrade
    pub async fn handle(
        ws: WebSocketUpgrade,
        State(state): State<AppState>,
        Path(session_id): Path<String>,
    ) -> Result<Response, axum::http::StatusCode> {
        let session = state
            .sessions
            .get(&session_id)
            .ok_or(axum::http::StatusCode::NOT_FOUND)?;

        Ok(ws.on_upgrade(move |socket| Self::handle_socket(socket, session, state)))
    }

    /// Handle WebSocket connection
    async fn handle_socket(mut socket: WebSocket, session: Arc<Session>, state: AppState) {
        let typing_delay = Duration::from_millis(state.config.read().server.typing_delay_ms);

        // Send session info and current state
        let info = WsMessage::SessionInfo {
            session_id: session.id.clone(),
        };
        if Self::send(&mut socket, &info).await.is_err() {
            return;
        }
        let status = WsMessage::Status {
            state: session.state().to_string(),
        };
        if Self::send(&mut socket, &status).await.is_err() {
            return;
        }

        while let Some(message) = socket.recv().await {
            let message = match message {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(session_id = %session.id, error = %e, "WebSocket error");
                    break;
                }
            };

            match message {
                Message::Text(raw) => {
                    let parsed: WsMessage = match serde_json::from_str(&raw) {
                        Ok(m) => m,
                        Err(e) => {
                            let error = WsMessage::Error {
                                message: format!("Malformed message: {}", e),
                            };
                            if Self::send(&mut socket, &error).await.is_err() {
                                break;
                            }
                            continue;
                        }
                    };

                    match parsed {
                        WsMessage::Text { content } => {
                            // Empty input is discarded at the boundary,
                            // exactly like the REST path
                            let Some(input) = sanitize_message(&content) else {
                                continue;
                            };

                            let reply = session.handle(input);

                            if reply.onboarding_just_completed {
                                state.dispatch_lead(&session);
                            }

                            // "Typing" presentation effect
                            if !typing_delay.is_zero() {
                                tokio::time::sleep(typing_delay).await;
                            }

                            let quick_questions = if reply.show_menu {
                                state.quick_questions.as_ref().clone()
                            } else {
                                Vec::new()
                            };
                            let outgoing = WsMessage::Reply {
                                text: reply.text,
                                show_menu: reply.show_menu,
                                quick_questions,
                            };
                            if Self::send(&mut socket, &outgoing).await.is_err() {
                                break;
                            }
                        }
                        WsMessage::Ping => {
                            if Self::send(&mut socket, &WsMessage::Pong).await.is_err() {
                                break;
                            }
                        }
                        WsMessage::EndSession => {
                            tracing::info!(session_id = %session.id, "Session ended by client");
                            state.sessions.remove(&session.id);
                            break;
                        }
                        _ => {
                            // Server-to-client variants are ignored on receive
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }

        tracing::debug!(session_id = %session.id, "WebSocket closed");
    }

    async fn send(socket: &mut WebSocket, message: &WsMessage) -> Result<(), axum::Error> {
        let payload = serde_json::to_string(message)
            .map_err(|e| axum::Error::new(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        socket.send(Message::Text(payload)).await
    }
}
