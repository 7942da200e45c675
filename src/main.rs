/// Main entry point for the Chronicle reading tracker MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use chronicle_mcp::{default_database_path, prepare_database_path, ReadingTrackerServer, TrackerConfig};

/// Command line arguments for the Chronicle MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Identity whose reading goal is read and saved
    /// If not provided, the "default" identity is used
    #[arg(long)]
    identity: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("chronicle_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting Chronicle MCP server");

    let db_path = match args.database {
        Some(path) => prepare_database_path(path)?,
        None => default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let config = TrackerConfig::for_identity(db_path, args.identity.as_deref());
    let server = ReadingTrackerServer::new(config).await?;

    server.run().await?;

    info!("Chronicle MCP server shutdown complete");
    Ok(())
}
