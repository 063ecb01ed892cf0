pub mod affirmations;
pub mod coach;
pub mod trend;
