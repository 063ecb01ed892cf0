use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::handlers::mood::TrendResponse;
use crate::models::goal::{Goal, GoalStatus};
use crate::services::affirmations::affirmation_for;
use crate::AppState;

const SHORT_WINDOW: usize = 7;
const LONG_WINDOW: usize = 30;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub mood_short: TrendResponse,
    pub mood_long: TrendResponse,
    pub goals: GoalSummary,
    pub affirmation: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GoalSummary {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Mean progress across goals, 0 when there are none.
    pub average_progress: f64,
}

impl GoalSummary {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let total = goals.len();
        let completed = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count();
        let active = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .count();
        let average_progress = if total > 0 {
            let sum: i64 = goals.iter().map(|g| g.progress as i64).sum();
            (sum as f64 / total as f64 * 10.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            active,
            average_progress,
        }
    }
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<DashboardResponse>> {
    // One fetch covers both windows: the short one is a prefix of the long one.
    let samples = state.moods.recent(auth_user.id, LONG_WINDOW).await?;
    let goals = state.goals.list(auth_user.id).await?;

    Ok(Json(DashboardResponse {
        mood_short: TrendResponse::compute(&samples, SHORT_WINDOW),
        mood_long: TrendResponse::compute(&samples, LONG_WINDOW),
        goals: GoalSummary::from_goals(&goals),
        affirmation: affirmation_for(auth_user.id, Utc::now().date_naive()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::goal::{GoalCategory, GoalPriority};
    use uuid::Uuid;

    fn goal(progress: i32, status: GoalStatus) -> Goal {
        let now = Utc::now();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: "goal".into(),
            description: None,
            category: GoalCategory::Personal,
            priority: GoalPriority::Medium,
            progress,
            completed: status == GoalStatus::Completed,
            status,
            target_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_goal_summary_empty() {
        assert_eq!(
            GoalSummary::from_goals(&[]),
            GoalSummary {
                total: 0,
                completed: 0,
                active: 0,
                average_progress: 0.0,
            }
        );
    }

    #[test]
    fn test_goal_summary_counts() {
        let summary = GoalSummary::from_goals(&[
            goal(100, GoalStatus::Completed),
            goal(20, GoalStatus::Active),
            goal(0, GoalStatus::Active),
        ]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.average_progress, 40.0);
    }

    #[test]
    fn test_goal_summary_paused_is_not_active() {
        let summary = GoalSummary::from_goals(&[
            goal(100, GoalStatus::Completed),
            goal(50, GoalStatus::Paused),
        ]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.active, 0);
    }
}
