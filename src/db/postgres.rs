use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{GoalRepository, MoodRepository};
use crate::error::AppResult;
use crate::models::goal::{CreateGoalRequest, Goal, GoalChanges};
use crate::models::mood::{MoodSample, NewMoodSample};

/// Newest first; `id` breaks ties between equal timestamps so windows are stable.
const RECENT_SAMPLES_SQL: &str = r#"
    SELECT * FROM mood_entries
    WHERE user_id = $1
    ORDER BY created_at DESC, id DESC
    LIMIT $2
"#;

#[derive(Clone)]
pub struct PgMoodRepository {
    db: PgPool,
}

impl PgMoodRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MoodRepository for PgMoodRepository {
    async fn recent(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<MoodSample>> {
        let samples = sqlx::query_as::<_, MoodSample>(RECENT_SAMPLES_SQL)
            .bind(user_id)
            .bind(limit as i64)
            .fetch_all(&self.db)
            .await?;

        Ok(samples)
    }

    async fn create(&self, user_id: Uuid, sample: NewMoodSample) -> AppResult<MoodSample> {
        let created = sqlx::query_as::<_, MoodSample>(
            r#"
            INSERT INTO mood_entries (id, user_id, mood_score, energy_level, stress_level, tags, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sample.mood_score)
        .bind(sample.energy_level)
        .bind(sample.stress_level)
        .bind(&sample.tags)
        .bind(&sample.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgGoalRepository {
    db: PgPool,
}

impl PgGoalRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>(
            "SELECT * FROM goals WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(goals)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Goal>> {
        let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(goal)
    }

    async fn create(&self, user_id: Uuid, goal: CreateGoalRequest) -> AppResult<Goal> {
        let created = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (id, user_id, title, description, category, priority, target_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(goal.title.trim())
        .bind(&goal.description)
        .bind(goal.category.unwrap_or_default())
        .bind(goal.priority.unwrap_or_default())
        .bind(goal.target_date)
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, changes: GoalChanges) -> AppResult<Option<Goal>> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                progress = COALESCE($7, progress),
                completed = COALESCE($8, completed),
                status = COALESCE($9, status),
                target_date = COALESCE($10, target_date),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.category)
        .bind(changes.priority)
        .bind(changes.progress)
        .bind(changes.completed)
        .bind(changes.status)
        .bind(changes.target_date)
        .fetch_optional(&self.db)
        .await?;

        Ok(goal)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
