//! Lint command - check a directory of stream configurations.

use anyhow::Result;
use sluice_core::ManagerConfig;
use sluice_manager::loader::DirectoryLoader;
use sluice_manager::manager::StreamManager;
use sluice_manager::runtime::IdleRuntime;
use std::path::Path;
use std::sync::Arc;

/// Run the lint command.
///
/// With `dry_run`, every stream is also started and stopped on the idle
/// runtime.
pub async fn run(dir: &str, dry_run: bool) -> Result<()> {
    let path = Path::new(dir);

    if !path.is_dir() {
        anyhow::bail!("Streams directory not found: {}", dir);
    }

    tracing::info!(dir = %dir, dry_run = dry_run, "Linting streams");

    println!("Lint Results for: {}", dir);
    println!("==================={}", "=".repeat(dir.len()));
    println!();

    let load = DirectoryLoader::new(path).load();

    for (id, config) in &load.streams {
        println!(
            "✓ {}: {} -> {} ({} processor(s), {} thread(s))",
            id,
            config.input.kind,
            config.output.kind,
            config.pipeline.processors.len(),
            config.pipeline.threads
        );
    }

    if let Some(e) = &load.error {
        println!();
        println!("✗ LOAD ERROR:");
        println!("  {}", e);
        anyhow::bail!("Stream configuration is invalid");
    }

    let streams = load.streams;
    let count = streams.len();
    println!();

    if count == 0 {
        println!("⚠ No stream configurations found");
        return Ok(());
    }

    if dry_run {
        let config = ManagerConfig::from_env_or_default();
        let timeout = config.operation_timeout;
        let manager = StreamManager::new(Arc::new(IdleRuntime::new()), config);

        if let Err(e) = manager.set_all(streams, timeout).await {
            println!("✗ DRY RUN FAILED:");
            println!("  {}", e);
            let _ = manager.stop_all(timeout).await;
            anyhow::bail!("Dry run failed");
        }

        manager.stop_all(timeout).await?;
        println!("✓ Dry run started and stopped {} stream(s)", count);
    }

    println!("✓ {} stream(s) valid", count);
    Ok(())
}
