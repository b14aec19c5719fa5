//! Agent profile loading
//!
//! A profile describes the agent the client asks the service to create. It is
//! read from a TOML file; any key left out falls back to the demo defaults.
//!
//! ```toml
//! agent_name = "RustTestAgent"
//! initial_prompt = "You are a helpful assistant."
//!
//! [llm]
//! provider = "openai"
//! model = "gpt-3.5-turbo"
//! temperature = 0.7
//! max_tokens = 150
//!
//! [memory]
//! use_long_term_memory = true
//! use_redis_cache = true
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::protocol::{AgentConfig, CreateAgentRequest, MemoryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_KEY: &str = "your_api_key_here";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    pub agent_name: String,
    pub initial_prompt: String,
    pub llm: LlmSettings,
    pub memory: MemoryConfig,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            agent_name: "RustTestAgent".to_string(),
            initial_prompt: "You are a helpful assistant.".to_string(),
            llm: LlmSettings::default(),
            memory: MemoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

impl AgentProfile {
    /// Load the profile at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The service expects the memory flags both inside `agent_config` and at the top level.
    pub fn to_request(&self) -> CreateAgentRequest {
        CreateAgentRequest {
            agent_name: self.agent_name.clone(),
            agent_config: AgentConfig {
                llm_provider: self.llm.provider.clone(),
                model_name: self.llm.model.clone(),
                temperature: self.llm.temperature,
                max_tokens: self.llm.max_tokens,
                memory_config: self.memory,
            },
            memory_config: self.memory,
            initial_prompt: self.initial_prompt.clone(),
        }
    }
}
