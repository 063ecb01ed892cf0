//! Storage seams. Handlers only see the traits; `main` picks Postgres when
//! `DATABASE_URL` is set and the in-memory stores otherwise.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::goal::{CreateGoalRequest, Goal, GoalChanges};
use crate::models::mood::{MoodSample, NewMoodSample};

pub mod memory;
pub mod pool;
pub mod postgres;

pub use memory::{MemoryGoalRepository, MemoryMoodRepository};
pub use postgres::{PgGoalRepository, PgMoodRepository};

#[async_trait]
pub trait MoodRepository: Send + Sync {
    /// Newest first, at most `limit` rows.
    async fn recent(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<MoodSample>>;

    async fn create(&self, user_id: Uuid, sample: NewMoodSample) -> AppResult<MoodSample>;

    /// `false` when the sample does not exist or belongs to someone else.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<Goal>>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Goal>>;

    async fn create(&self, user_id: Uuid, goal: CreateGoalRequest) -> AppResult<Goal>;

    async fn update(&self, user_id: Uuid, id: Uuid, changes: GoalChanges) -> AppResult<Option<Goal>>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;
}
