use std::fmt;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// Author of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// Opaque conversation token, either generated locally or taken from the
/// backend's session list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub const PREFIX: &'static str = "user-session-";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draws `user-session-<n>` with `n` in `0..=999999`. There is no
    /// collision check against ids the backend already knows.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let n: u32 = rng.gen_range(0..1_000_000);
        Self(format!("{}{}", Self::PREFIX, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// Wire types for the chat API.

/// A list field that may be missing or `null`; both read as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session_ids: Vec<SessionId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a SessionId,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body the backend sends alongside a failed `POST /api/chat`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
