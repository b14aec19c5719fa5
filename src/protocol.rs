use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier the agent service hands out on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "enabled")]
    pub use_long_term_memory: bool,
    #[serde(default = "enabled")]
    pub use_redis_cache: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            use_long_term_memory: true,
            use_redis_cache: true,
        }
    }
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub llm_provider: String,
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub memory_config: MemoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub agent_name: String,
    pub agent_config: AgentConfig,
    pub memory_config: MemoryConfig,
    pub initial_prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAgentResponse {
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub agent_id: AgentId,
    pub content: String,
}

/// Pulls the agent's reply out of a `/message/send` body.
pub fn response_text(body: &Value) -> Option<&str> {
    body.get("response").and_then(Value::as_str)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionRequest {
    pub agent_id: AgentId,
    pub function_name: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    #[serde(default)]
    pub result: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    ShortTerm,
    LongTerm,
}

impl MemoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl MemoryEntry {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryAddRequest {
    pub agent_id: AgentId,
    pub memory_type: MemoryType,
    pub entry: MemoryEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryAddResponse {
    pub agent_id: AgentId,
    pub memory_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemorySearchRequest {
    pub agent_id: AgentId,
    pub memory_type: MemoryType,
    pub query: String,
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemorySearchResponse {
    pub agent_id: AgentId,
    pub results: Vec<MemoryEntry>,
    #[serde(default)]
    pub relevance_scores: Option<Vec<f64>>,
}

/// Sent as query parameters on `GET /agent/retrieve`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryRetrieveRequest {
    pub agent_id: AgentId,
    pub memory_type: MemoryType,
    pub memory_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryRetrieveResponse {
    pub agent_id: AgentId,
    pub memory: MemoryEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryDeleteRequest {
    pub agent_id: AgentId,
    pub memory_type: MemoryType,
    pub memory_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryDeleteResponse {
    pub agent_id: AgentId,
    #[serde(default)]
    pub message: Option<String>,
}
