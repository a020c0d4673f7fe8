//! Serve command - run the stream API server.

use anyhow::{Context, Result};
use sluice_core::ManagerConfig;
use sluice_manager::api::{ApiServer, ServerConfig};
use sluice_manager::loader::DirectoryLoader;
use sluice_manager::manager::StreamManager;
use sluice_manager::runtime::IdleRuntime;
use std::sync::Arc;
use std::time::Duration;

/// Options for the serve command.
pub struct ServeOptions<'a> {
    /// Host to bind to.
    pub host: &'a str,
    /// Port to listen on.
    pub port: u16,
    /// Directory of stream configs to start with.
    pub streams_dir: Option<&'a str>,
    /// Override of the per-operation timeout.
    pub timeout_ms: Option<u64>,
}

/// Run the serve command.
pub async fn run(options: ServeOptions<'_>) -> Result<()> {
    let ServeOptions {
        host,
        port,
        streams_dir,
        timeout_ms,
    } = options;

    tracing::info!(host = %host, port = %port, "Starting sluice API server");

    let mut config = ManagerConfig::from_env_or_default();
    if let Some(ms) = timeout_ms {
        config = config.with_operation_timeout(Duration::from_millis(ms));
    }
    let timeout = config.operation_timeout;

    let manager = Arc::new(StreamManager::new(Arc::new(IdleRuntime::new()), config));

    if let Some(dir) = streams_dir {
        let streams = DirectoryLoader::new(dir)
            .load()
            .into_result()
            .with_context(|| format!("Failed to load streams from {}", dir))?;

        let count = streams.len();
        manager
            .set_all(streams, timeout)
            .await
            .context("Failed to start streams")?;
        println!("Started {} stream(s) from {}", count, dir);
    }

    let server = ApiServer::new(ServerConfig::new(host, port), Arc::clone(&manager));

    println!("Starting sluice API server...");
    println!();
    println!("Server: http://{}:{}", host, port);
    println!();
    println!("Endpoints:");
    println!("  GET    http://{}:{}/streams      - List streams", host, port);
    println!("  POST   http://{}:{}/streams      - Replace all streams", host, port);
    println!("  GET    http://{}:{}/stream/{{id}} - Read a stream", host, port);
    println!("  POST   http://{}:{}/stream/{{id}} - Create a stream", host, port);
    println!("  PUT    http://{}:{}/stream/{{id}} - Update a stream", host, port);
    println!("  DELETE http://{}:{}/stream/{{id}} - Delete a stream", host, port);
    println!("  GET    http://{}:{}/health       - Health check", host, port);
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    println!();
    println!("Shutting down...");

    manager
        .stop_all(timeout)
        .await
        .context("Failed to stop streams")?;

    Ok(())
}
