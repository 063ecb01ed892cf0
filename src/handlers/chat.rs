use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::chat::{ChatRequest, CoachReply, VoiceRequest};
use crate::AppState;

pub async fn chat(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<CoachReply>> {
    body.validate()?;
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".into()));
    }

    let mode = body.mode;
    let reply = state.coach.chat(body).await;
    tracing::info!(
        user_id = %auth_user.id,
        mode = ?mode,
        source = ?reply.source,
        "Coach chat reply sent"
    );

    Ok(Json(reply))
}

pub async fn voice(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<VoiceRequest>,
) -> AppResult<Json<CoachReply>> {
    body.validate()?;
    if body.transcript.trim().is_empty() {
        return Err(AppError::Validation("Transcript is required".into()));
    }

    let reply = state
        .coach
        .voice(body.transcript, body.context.as_deref())
        .await;
    tracing::info!(user_id = %auth_user.id, source = ?reply.source, "Coach voice reply sent");

    Ok(Json(reply))
}
