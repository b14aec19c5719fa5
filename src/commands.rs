use crate::client::{AgentClient, ClientConfig};
use crate::config::{AgentProfile, DEFAULT_API_KEY, DEFAULT_BASE_URL};
use crate::demo;
use crate::error::RequestError;
use crate::protocol::{AgentId, MemoryEntry, MemoryType, response_text};
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Where the service lives and how to authenticate against it
#[derive(ClapArgs, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the agent service
    #[arg(long, env = "AGENT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key sent as X-API-Key
    #[arg(long, env = "AGENT_API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// TOML profile describing the agent to create
    #[arg(long, env = "AGENT_PROFILE")]
    pub profile: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an agent, fetch its info and send it one message
    Demo,
    /// Create an agent from the profile and print its id
    Create,
    /// Print the service's description of an agent
    Info { agent_id: String },
    /// Send a message to an agent and print its reply
    Send { agent_id: String, content: String },
    /// Check that the service is reachable
    Ping,
    /// Ask an agent to run one of its functions
    Function {
        agent_id: String,
        name: String,
        /// Function parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Work with an agent's memory
    #[command(subcommand)]
    Memory(MemoryCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum MemoryCommand {
    /// Store a memory entry
    Add {
        agent_id: String,
        content: String,
        /// Store in long-term memory instead of short-term
        #[arg(long)]
        long_term: bool,
    },
    /// Search stored memories
    Search {
        agent_id: String,
        query: String,
        #[arg(long)]
        long_term: bool,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Print a single memory entry by id
    Get {
        agent_id: String,
        memory_id: String,
        #[arg(long)]
        long_term: bool,
    },
    /// Remove a memory entry by id
    Delete {
        agent_id: String,
        memory_id: String,
        #[arg(long)]
        long_term: bool,
    },
}

fn memory_type(long_term: bool) -> MemoryType {
    if long_term {
        MemoryType::LongTerm
    } else {
        MemoryType::ShortTerm
    }
}

pub async fn run<W: Write>(
    connection: &ConnectionArgs,
    command: Command,
    out: &mut W,
) -> Result<()> {
    let client = AgentClient::new(connection.client_config());

    match command {
        Command::Demo => {
            let profile = AgentProfile::load(connection.profile.as_deref())?;
            demo::run(&client, &profile, out).await?;
        }
        Command::Create => {
            let profile = AgentProfile::load(connection.profile.as_deref())?;
            let agent_id = client.create_agent(&profile.to_request()).await?;
            info!(%agent_id, "agent created");
            writeln!(out, "{}", agent_id)?;
        }
        Command::Info { agent_id } => {
            let info = client.get_agent_info(&AgentId::from(agent_id)).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
        }
        Command::Send { agent_id, content } => {
            let reply = client
                .send_message(&AgentId::from(agent_id), &content)
                .await?;
            let response = response_text(&reply).ok_or(RequestError::MissingField("response"))?;
            writeln!(out, "{}", response)?;
        }
        Command::Ping => {
            let message = client.ping().await?;
            writeln!(out, "{}", message)?;
        }
        Command::Function {
            agent_id,
            name,
            params,
        } => {
            let parameters: Value = serde_json::from_str(&params)
                .with_context(|| format!("Invalid --params JSON: {}", params))?;
            let result = client
                .execute_function(&AgentId::from(agent_id), &name, parameters)
                .await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        Command::Memory(MemoryCommand::Add {
            agent_id,
            content,
            long_term,
        }) => {
            let added = client
                .add_memory(
                    &AgentId::from(agent_id),
                    memory_type(long_term),
                    MemoryEntry::text(content),
                )
                .await?;
            writeln!(out, "{}", added.memory_id)?;
        }
        Command::Memory(MemoryCommand::Search {
            agent_id,
            query,
            long_term,
            limit,
        }) => {
            let found = client
                .search_memory(&AgentId::from(agent_id), memory_type(long_term), &query, limit)
                .await?;
            let scores = found.relevance_scores.unwrap_or_default();
            for (index, entry) in found.results.iter().enumerate() {
                match scores.get(index) {
                    Some(score) => writeln!(out, "{:.3}\t{}", score, entry.content)?,
                    None => writeln!(out, "{}", entry.content)?,
                }
            }
        }
        Command::Memory(MemoryCommand::Get {
            agent_id,
            memory_id,
            long_term,
        }) => {
            let found = client
                .retrieve_memory(&AgentId::from(agent_id), memory_type(long_term), &memory_id)
                .await?;
            writeln!(out, "{}", found.memory.content)?;
        }
        Command::Memory(MemoryCommand::Delete {
            agent_id,
            memory_id,
            long_term,
        }) => {
            let deleted = client
                .delete_memory(&AgentId::from(agent_id), memory_type(long_term), &memory_id)
                .await?;
            writeln!(
                out,
                "{}",
                deleted.message.as_deref().unwrap_or("Memory deleted")
            )?;
        }
    }

    Ok(())
}

/// Log a failed command once and turn the outcome into the process exit status.
pub fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("An error occurred: {err:#}");
            ExitCode::FAILURE
        }
    }
}
