use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::goal::{
    CreateGoalRequest, Goal, GoalChanges, ProgressRequest, UpdateGoalRequest,
};
use crate::AppState;

fn goal_not_found() -> AppError {
    AppError::NotFound("Goal not found".into())
}

pub async fn list_goals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Goal>>> {
    let goals = state.goals.list(auth_user.id).await?;
    Ok(Json(goals))
}

pub async fn get_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<Goal>> {
    let goal = state
        .goals
        .get(auth_user.id, goal_id)
        .await?
        .ok_or_else(goal_not_found)?;

    Ok(Json(goal))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateGoalRequest>,
) -> AppResult<Json<Goal>> {
    body.validate()?;
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("Goal title is required".into()));
    }

    let goal = state.goals.create(auth_user.id, body).await?;
    tracing::info!(user_id = %auth_user.id, goal_id = %goal.id, "Goal created");

    Ok(Json(goal))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(body): Json<UpdateGoalRequest>,
) -> AppResult<Json<Goal>> {
    body.validate()?;
    if body.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("Goal title is required".into()));
    }

    apply_changes(&state, &auth_user, goal_id, body.into()).await
}

pub async fn update_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
    Json(body): Json<ProgressRequest>,
) -> AppResult<Json<Goal>> {
    body.validate()?;
    apply_changes(&state, &auth_user, goal_id, GoalChanges::progress(body.progress)).await
}

pub async fn complete_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<Goal>> {
    apply_changes(&state, &auth_user, goal_id, GoalChanges::complete()).await
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(goal_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.goals.delete(auth_user.id, goal_id).await? {
        return Err(goal_not_found());
    }

    Ok(Json(serde_json::json!({ "deleted": true, "id": goal_id })))
}

async fn apply_changes(
    state: &AppState,
    auth_user: &AuthUser,
    goal_id: Uuid,
    changes: GoalChanges,
) -> AppResult<Json<Goal>> {
    let goal = state
        .goals
        .update(auth_user.id, goal_id, changes)
        .await?
        .ok_or_else(goal_not_found)?;

    Ok(Json(goal))
}
