use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LEN: usize = 32;

/// One mood/energy observation. Rows are never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodSample {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_score: i32,
    pub energy_level: i32,
    pub stress_level: Option<i32>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodRequest {
    #[validate(range(min = 1, max = 10, message = "Mood must be between 1 and 10"))]
    pub mood_score: i32,

    #[validate(range(min = 1, max = 10, message = "Energy must be between 1 and 10"))]
    pub energy_level: i32,

    #[validate(range(min = 1, max = 10, message = "Stress must be between 1 and 10"))]
    pub stress_level: Option<i32>,

    /// Counted against `MAX_TAGS` after normalization.
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(max = 2000, message = "Notes must be under 2000 characters"))]
    pub notes: Option<String>,
}

/// Insert payload after validation and tag normalization.
#[derive(Debug, Clone)]
pub struct NewMoodSample {
    pub mood_score: i32,
    pub energy_level: i32,
    pub stress_level: Option<i32>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl CreateMoodRequest {
    pub fn into_new_sample(self) -> Result<NewMoodSample, String> {
        let tags = normalize_tags(&self.tags);
        if tags.len() > MAX_TAGS {
            return Err(format!("At most {} tags", MAX_TAGS));
        }
        if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LEN) {
            return Err(format!("Tag '{}' exceeds {} characters", tag, MAX_TAG_LEN));
        }

        Ok(NewMoodSample {
            mood_score: self.mood_score,
            energy_level: self.energy_level,
            stress_level: self.stress_level,
            tags,
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }
}

/// Tags form a set: trimmed, empties dropped, first occurrence wins.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}

#[derive(Debug, Deserialize)]
pub struct MoodListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// Number of most recent samples, not days.
    pub window: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tags: &[&str]) -> CreateMoodRequest {
        CreateMoodRequest {
            mood_score: 6,
            energy_level: 4,
            stress_level: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            notes: Some("  slept well  ".into()),
        }
    }

    #[test]
    fn test_normalize_tags_dedupes_and_trims() {
        let tags = normalize_tags(&[
            " work ".to_string(),
            "gym".to_string(),
            "work".to_string(),
            "   ".to_string(),
        ]);
        assert_eq!(tags, vec!["work".to_string(), "gym".to_string()]);
    }

    #[test]
    fn test_into_new_sample_trims_notes() {
        let sample = request(&["focus"]).into_new_sample().unwrap();
        assert_eq!(sample.notes.as_deref(), Some("slept well"));
        assert_eq!(sample.tags, vec!["focus".to_string()]);
    }

    #[test]
    fn test_into_new_sample_rejects_long_tag() {
        let long = "x".repeat(MAX_TAG_LEN + 1);
        assert!(request(&[long.as_str()]).into_new_sample().is_err());
    }

    #[test]
    fn test_tag_limit_applies_after_dedupe() {
        let raw = [
            "work", "gym", "sleep", "work", "gym", "sleep", "work", "gym", "sleep", " work ", "gym",
        ];
        let sample = request(&raw).into_new_sample().unwrap();
        assert_eq!(sample.tags.len(), 3);

        let distinct: Vec<String> = (0..=MAX_TAGS).map(|i| format!("tag{}", i)).collect();
        let distinct: Vec<&str> = distinct.iter().map(String::as_str).collect();
        assert!(request(&distinct).into_new_sample().is_err());
    }

    #[test]
    fn test_validation_ranges() {
        let mut req = request(&[]);
        assert!(req.validate().is_ok());
        req.mood_score = 11;
        assert!(req.validate().is_err());
        req.mood_score = 5;
        req.energy_level = 0;
        assert!(req.validate().is_err());
        req.energy_level = 5;
        req.stress_level = Some(12);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_tags_default_empty() {
        let req: CreateMoodRequest =
            serde_json::from_str(r#"{"mood_score": 7, "energy_level": 6}"#).unwrap();
        assert!(req.tags.is_empty());
        assert!(req.notes.is_none());
    }
}
