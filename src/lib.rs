//! Client for the agent service's REST API.
//!
//! [`client::AgentClient`] wraps the HTTP calls, [`demo::run`] strings the
//! create → info → send sequence together, and [`commands`] exposes both on
//! the command line.

pub mod client;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod protocol;
#[cfg(test)]
mod test_support;

pub use client::{AgentClient, ClientConfig};
pub use error::{ConfigError, RequestError};
pub use protocol::AgentId;
