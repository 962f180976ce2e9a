//! Wire types for the mock chat completions endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional per-request model settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Incoming chat request.
///
/// Fields are read leniently: a value of the wrong type is treated as absent,
/// the same way a missing field is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChatConfig>,

    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config = Some(ChatConfig {
            model: Some(model.into()),
        });
        self
    }

    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Build a request from an already-parsed JSON body.
    pub fn from_json(body: &Value) -> Self {
        let string_field = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_owned);

        let model = string_field(body.get("config").and_then(|c| c.get("model")));
        Self {
            message: string_field(body.get("message")).unwrap_or_default(),
            config: model.map(|m| ChatConfig { model: Some(m) }),
            session_id: string_field(body.get("session_id")),
        }
    }

    /// Requested model name, if present and non-empty.
    pub fn requested_model(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|c| c.model.as_deref())
            .filter(|m| !m.is_empty())
    }

    /// Session id to echo back; empty ids are dropped.
    pub fn echoed_session(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.is_empty())
    }
}

/// Token accounting attached to each response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Response envelope returned by the mock endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub response: String,
    pub model: String,
    pub tokens_used: u64,
    pub session_id: Option<String>,
    /// Unix seconds
    pub created: i64,
    pub usage: Usage,
}
