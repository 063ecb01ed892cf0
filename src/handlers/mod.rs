pub mod affirmations;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod goals;
pub mod health;
pub mod mood;
