use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::mood::{CreateMoodRequest, MoodListQuery, MoodSample, TrendQuery};
use crate::services::trend::{self, TrendResult};
use crate::AppState;

/// Matches the dashboard's default "30" view.
const DEFAULT_TREND_WINDOW: usize = 30;

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    #[serde(flatten)]
    pub result: TrendResult,
    pub label: &'static str,
    /// Requested window in samples, after clamping.
    pub window: usize,
    /// Samples actually averaged; 0 means the neutral default.
    pub sample_count: usize,
}

impl TrendResponse {
    pub fn compute(samples: &[MoodSample], window: usize) -> Self {
        let result = trend::analyze(samples, window);
        Self {
            label: result.trend.label(),
            result,
            window,
            sample_count: samples.len().min(window),
        }
    }
}

pub async fn list_mood_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MoodListQuery>,
) -> AppResult<Json<Vec<MoodSample>>> {
    let max = state.config.mood_fetch_limit;
    let limit = query.limit.unwrap_or(max).min(max);

    let samples = state.moods.recent(auth_user.id, limit).await?;
    Ok(Json(samples))
}

pub async fn create_mood_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateMoodRequest>,
) -> AppResult<Json<MoodSample>> {
    body.validate()?;
    let sample = body.into_new_sample().map_err(AppError::Validation)?;

    let created = state.moods.create(auth_user.id, sample).await?;
    tracing::info!(
        user_id = %auth_user.id,
        mood_score = created.mood_score,
        energy_level = created.energy_level,
        "Mood entry logged"
    );

    Ok(Json(created))
}

pub async fn delete_mood_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.moods.delete(auth_user.id, entry_id).await? {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true, "id": entry_id })))
}

/// Windowed by sample count: `window=7` is the last seven entries, not the last week.
pub async fn get_mood_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<TrendResponse>> {
    let window = query
        .window
        .unwrap_or(DEFAULT_TREND_WINDOW)
        .min(state.config.mood_fetch_limit);

    let samples = state.moods.recent(auth_user.id, window).await?;
    Ok(Json(TrendResponse::compute(&samples, window)))
}
