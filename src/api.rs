use serde::{Deserialize, Serialize};

// -- Conversation types -----------------------------------------------------

/// Author of a conversation turn. Serialized lowercase, as the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One message in a chat session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

// -- POST /upload -----------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub filename: String,
}

// -- POST /chat -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub document_id: String,
    pub message: String,
    /// Turns preceding `message`; never includes `message` itself.
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

// -- POST /analyze/ ---------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub filename: Option<String>,
}

// -- GET / ------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

// -- Error body (any endpoint, non-2xx) -------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
