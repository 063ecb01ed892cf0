use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Which coaching prompt frames the conversation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoachMode {
    #[default]
    General,
    DailyCheckIn,
    GoalSetting,
    MotivationalSupport,
    ProgressReview,
}

/// POST /api/chat
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,

    #[validate(length(max = 50, message = "At most 50 history messages"))]
    #[serde(default, alias = "conversationHistory")]
    pub conversation_history: Vec<ChatMessage>,

    #[validate(length(max = 2000, message = "Context must be under 2000 characters"))]
    pub context: Option<String>,

    #[serde(default)]
    pub mode: CoachMode,
}

/// POST /api/voice
#[derive(Debug, Deserialize, Validate)]
pub struct VoiceRequest {
    #[validate(length(min = 1, max = 4000, message = "Transcript must be 1-4000 characters"))]
    pub transcript: String,

    #[validate(length(max = 2000, message = "Context must be under 2000 characters"))]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Openai,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachReply {
    pub reply: String,
    pub source: ReplySource,
}
