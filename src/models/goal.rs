use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: GoalCategory,
    pub priority: GoalPriority,
    pub progress: i32,
    pub completed: bool,
    pub status: GoalStatus,
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "goal_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Health,
    Career,
    #[default]
    Personal,
    Financial,
    Learning,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "goal_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be under 2000 characters"))]
    pub description: Option<String>,

    pub category: Option<GoalCategory>,
    pub priority: Option<GoalPriority>,
    pub target_date: Option<NaiveDate>,
}

/// PUT /api/goals/:id. Partial update, all fields optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be under 2000 characters"))]
    pub description: Option<String>,

    pub category: Option<GoalCategory>,
    pub priority: Option<GoalPriority>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,

    pub completed: Option<bool>,
    pub status: Option<GoalStatus>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProgressRequest {
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: i32,
}

/// Column changes applied by the goal repository; `None` leaves a column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<GoalCategory>,
    pub priority: Option<GoalPriority>,
    pub progress: Option<i32>,
    pub completed: Option<bool>,
    pub status: Option<GoalStatus>,
    pub target_date: Option<NaiveDate>,
}

impl GoalChanges {
    pub fn progress(progress: i32) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn complete() -> Self {
        Self {
            progress: Some(100),
            completed: Some(true),
            status: Some(GoalStatus::Completed),
            ..Default::default()
        }
    }

    pub fn apply(&self, goal: &mut Goal) {
        if let Some(title) = &self.title {
            goal.title = title.clone();
        }
        if let Some(description) = &self.description {
            goal.description = Some(description.clone());
        }
        if let Some(category) = self.category {
            goal.category = category;
        }
        if let Some(priority) = self.priority {
            goal.priority = priority;
        }
        if let Some(progress) = self.progress {
            goal.progress = progress;
        }
        if let Some(completed) = self.completed {
            goal.completed = completed;
        }
        if let Some(status) = self.status {
            goal.status = status;
        }
        if let Some(target_date) = self.target_date {
            goal.target_date = Some(target_date);
        }
    }
}

/// `status` and `completed` always move together; `status` wins when both are sent.
/// Completing a goal pins progress at 100.
impl From<UpdateGoalRequest> for GoalChanges {
    fn from(req: UpdateGoalRequest) -> Self {
        let status = match (req.status, req.completed) {
            (Some(status), _) => Some(status),
            (None, Some(true)) => Some(GoalStatus::Completed),
            (None, Some(false)) => Some(GoalStatus::Active),
            (None, None) => None,
        };
        let completed = status.map(|s| s == GoalStatus::Completed);
        let progress = if completed == Some(true) {
            Some(100)
        } else {
            req.progress
        };

        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            priority: req.priority,
            progress,
            completed,
            status,
            target_date: req.target_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> Goal {
        let now = Utc::now();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Run a 10k".into(),
            description: None,
            category: GoalCategory::Health,
            priority: GoalPriority::Medium,
            progress: 40,
            completed: false,
            status: GoalStatus::Active,
            target_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_complete_sets_progress_and_status() {
        let mut g = goal();
        GoalChanges::complete().apply(&mut g);
        assert!(g.completed);
        assert_eq!(g.progress, 100);
        assert_eq!(g.status, GoalStatus::Completed);
    }

    #[test]
    fn test_progress_leaves_other_fields() {
        let mut g = goal();
        GoalChanges::progress(75).apply(&mut g);
        assert_eq!(g.progress, 75);
        assert!(!g.completed);
        assert_eq!(g.status, GoalStatus::Active);
        assert_eq!(g.title, "Run a 10k");
    }

    #[test]
    fn test_update_completed_flag_sets_status() {
        let mut g = goal();
        let req: UpdateGoalRequest = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        GoalChanges::from(req).apply(&mut g);
        assert!(g.completed);
        assert_eq!(g.status, GoalStatus::Completed);
        assert_eq!(g.progress, 100);
    }

    #[test]
    fn test_update_status_sets_completed_flag() {
        let mut g = goal();
        let req: UpdateGoalRequest = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        GoalChanges::from(req).apply(&mut g);
        assert!(g.completed);
        assert_eq!(g.progress, 100);

        let req: UpdateGoalRequest = serde_json::from_str(r#"{"status": "paused"}"#).unwrap();
        GoalChanges::from(req).apply(&mut g);
        assert!(!g.completed);
        assert_eq!(g.status, GoalStatus::Paused);
        assert_eq!(g.progress, 100);
    }

    #[test]
    fn test_update_status_wins_over_completed_flag() {
        let req: UpdateGoalRequest =
            serde_json::from_str(r#"{"status": "paused", "completed": true}"#).unwrap();
        let changes = GoalChanges::from(req);
        assert_eq!(changes.status, Some(GoalStatus::Paused));
        assert_eq!(changes.completed, Some(false));
        assert_eq!(changes.progress, None);
    }

    #[test]
    fn test_update_without_state_fields_leaves_them() {
        let req: UpdateGoalRequest = serde_json::from_str(r#"{"progress": 30}"#).unwrap();
        let changes = GoalChanges::from(req);
        assert_eq!(changes.status, None);
        assert_eq!(changes.completed, None);
        assert_eq!(changes.progress, Some(30));
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateGoalRequest = serde_json::from_str(r#"{"title": "Read 12 books"}"#).unwrap();
        assert!(req.category.is_none());
        assert_eq!(req.category.unwrap_or_default(), GoalCategory::Personal);
        assert_eq!(req.priority.unwrap_or_default(), GoalPriority::Medium);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let res: Result<CreateGoalRequest, _> =
            serde_json::from_str(r#"{"title": "x", "category": "hobby"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_progress_request_range() {
        assert!(ProgressRequest { progress: 100 }.validate().is_ok());
        assert!(ProgressRequest { progress: 101 }.validate().is_err());
        assert!(ProgressRequest { progress: -1 }.validate().is_err());
    }
}
