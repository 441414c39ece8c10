use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use unsplash_mcp::cli::{Cli, LogFormat};
use unsplash_mcp::Server;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // stdout belongs to the JSON-RPC transport, so help goes to stderr
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            eprint!("{}", e.render());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => e.exit(),
    };

    init_logging(&cli.log_level, cli.log_format);

    let config = match cli.into_config(Cli::env_access_key()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            eprint!("{}", Cli::command().render_help());
            return Ok(ExitCode::FAILURE);
        }
    };

    let server = Server::new(config);
    info!(
        "Unsplash MCP server starting with response format: {}",
        server.config().response_format
    );

    if let Err(e) = server.run().await {
        error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_ansi(false).init(),
    }
}
