//! Process-local stores used when no database is configured, and by tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{GoalRepository, MoodRepository};
use crate::error::AppResult;
use crate::models::goal::{CreateGoalRequest, Goal, GoalChanges, GoalStatus};
use crate::models::mood::{MoodSample, NewMoodSample};

/// Samples in insertion order; `created_at` strictly increases.
#[derive(Default)]
pub struct MemoryMoodRepository {
    samples: RwLock<Vec<MoodSample>>,
}

impl MemoryMoodRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoodRepository for MemoryMoodRepository {
    async fn recent(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<MoodSample>> {
        let samples = self.samples.read().await;
        Ok(samples
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(&self, user_id: Uuid, sample: NewMoodSample) -> AppResult<MoodSample> {
        let mut samples = self.samples.write().await;

        let mut created_at = Utc::now();
        if let Some(last) = samples.last() {
            if created_at <= last.created_at {
                created_at = last.created_at + Duration::microseconds(1);
            }
        }

        let created = MoodSample {
            id: Uuid::new_v4(),
            user_id,
            mood_score: sample.mood_score,
            energy_level: sample.energy_level,
            stress_level: sample.stress_level,
            tags: sample.tags,
            notes: sample.notes,
            created_at,
        };
        samples.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut samples = self.samples.write().await;
        let before = samples.len();
        samples.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(samples.len() != before)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryGoalRepository {
    goals: RwLock<Vec<Goal>>,
}

impl MemoryGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalRepository for MemoryGoalRepository {
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        let goals = self.goals.read().await;
        Ok(goals
            .iter()
            .rev()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Goal>> {
        let goals = self.goals.read().await;
        Ok(goals
            .iter()
            .find(|g| g.id == id && g.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, goal: CreateGoalRequest) -> AppResult<Goal> {
        let now = Utc::now();
        let created = Goal {
            id: Uuid::new_v4(),
            user_id,
            title: goal.title.trim().to_string(),
            description: goal.description,
            category: goal.category.unwrap_or_default(),
            priority: goal.priority.unwrap_or_default(),
            progress: 0,
            completed: false,
            status: GoalStatus::Active,
            target_date: goal.target_date,
            created_at: now,
            updated_at: now,
        };
        self.goals.write().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, changes: GoalChanges) -> AppResult<Option<Goal>> {
        let mut goals = self.goals.write().await;
        let Some(goal) = goals.iter_mut().find(|g| g.id == id && g.user_id == user_id) else {
            return Ok(None);
        };
        changes.apply(goal);
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut goals = self.goals.write().await;
        let before = goals.len();
        goals.retain(|g| !(g.id == id && g.user_id == user_id));
        Ok(goals.len() != before)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
