use agentic_client::commands::{self, Command, ConnectionArgs};
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Example client for the agent service
#[derive(Parser, Debug)]
#[command(name = "agentic-client")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(file).with_ansi(false))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(err) = init_tracing(args.log_file.as_deref()) {
        eprintln!("Failed to set up logging: {err:#}");
        return ExitCode::FAILURE;
    }

    let command = args.command.unwrap_or(Command::Demo);
    let mut stdout = std::io::stdout();

    commands::report(commands::run(&args.connection, command, &mut stdout).await)
}
