use crate::client::AgentClient;
use crate::config::AgentProfile;
use crate::error::RequestError;
use crate::protocol::{AgentId, response_text};
use anyhow::Result;
use serde_json::Value;
use std::io::Write;
use tracing::info;

pub const DEMO_PROMPT: &str = "Hello, what can you help me with today?";

/// What a successful demo run produced: the new agent's id, its info as
/// returned by the service, and the reply to [`DEMO_PROMPT`].
#[derive(Debug)]
pub struct DemoOutcome {
    pub agent_id: AgentId,
    pub info: Value,
    pub response: String,
}

/// Create an agent, look it up, then talk to it once.
///
/// Each result is written to `out` before the next call is made; the first
/// failure stops the run.
pub async fn run<W: Write>(
    client: &AgentClient,
    profile: &AgentProfile,
    out: &mut W,
) -> Result<DemoOutcome> {
    info!(base_url = client.base_url(), agent = %profile.agent_name, "starting demo");

    let agent_id = client.create_agent(&profile.to_request()).await?;
    writeln!(out, "Created agent with ID: {}", agent_id)?;

    let info = client.get_agent_info(&agent_id).await?;
    writeln!(out, "Agent info: {}", serde_json::to_string_pretty(&info)?)?;

    let reply = client.send_message(&agent_id, DEMO_PROMPT).await?;
    let response = response_text(&reply)
        .ok_or(RequestError::MissingField("response"))?
        .to_string();
    writeln!(out, "Agent response: {}", response)?;

    info!(%agent_id, "demo finished");
    Ok(DemoOutcome {
        agent_id,
        info,
        response,
    })
}
