//! JSON API handlers for chat sessions.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::service::{send_message, ChatOutcome};
use crate::chat::session::{Session, SharedSession};
use crate::errors::AppError;
use crate::models::chat::ChatTurn;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Visible turns only; the seed instruction is never exposed.
    pub transcript: Vec<ChatTurn>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            transcript: session.transcript().visible_turns().to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    #[serde(flatten)]
    pub outcome: ChatOutcome,
    pub transcript: Vec<ChatTurn>,
}

pub(crate) async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Chat session {id} not found")))
}

/// POST /api/v1/chat/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (_, session) = state.sessions.create().await;
    let session = session.lock().await;
    (StatusCode::CREATED, Json(SessionResponse::from(&*session)))
}

/// GET /api/v1/chat/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut session = session.lock().await;
    session.touch();
    Ok(Json(SessionResponse::from(&*session)))
}

/// POST /api/v1/chat/sessions/:id/messages
///
/// The credential is checked before the session is touched, so a degraded
/// service never mutates a transcript.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let llm = state.completion()?;
    let Json(request) = payload?;
    let session = find_session(&state, id).await?;
    let mut session = session.lock().await;

    let outcome = send_message(&mut session, &request.message, llm).await?;

    Ok(Json(SendMessageResponse {
        outcome,
        transcript: session.transcript().visible_turns().to_vec(),
    }))
}

/// DELETE /api/v1/chat/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Chat session {id} not found")))
    }
}
