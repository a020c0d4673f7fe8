//! Sluice CLI - command-line interface for the sluice stream registry.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sluice_manager::api::DEFAULT_PORT;
use sluice_manager::observability::{TracingConfig, TracingGuard, init_tracing};

/// Sluice - run and manage named streams at runtime.
#[derive(Parser)]
#[command(name = "sluice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the stream API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory of stream configs to start on boot
        #[arg(short, long, env = "SLUICE_STREAMS_DIR")]
        streams_dir: Option<String>,

        /// Bound on each stream operation, in milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,
    },

    /// Check a directory of stream configs
    Lint {
        /// Directory to scan
        dir: String,

        /// Also start and stop every stream on the idle runtime
        #[arg(long)]
        dry_run: bool,
    },
}

fn setup_logging(verbosity: u8) -> Result<TracingGuard> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // SLUICE_LOG_LEVEL / RUST_LOG win over -v
    init_tracing(TracingConfig::from_env_or_filter(filter))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _tracing_guard = setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            streams_dir,
            timeout_ms,
        } => {
            commands::serve::run(commands::serve::ServeOptions {
                host: &host,
                port,
                streams_dir: streams_dir.as_deref(),
                timeout_ms,
            })
            .await
        }
        Commands::Lint { dir, dry_run } => commands::lint::run(&dir, dry_run).await,
    }
}
