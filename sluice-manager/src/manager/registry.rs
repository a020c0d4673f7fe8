//! Stream registry and lifecycle operations.

use super::snapshot::{StreamStatus, StreamSummary};
use chrono::{DateTime, Utc};
use sluice_core::error::{Operation, Result, StreamError};
use sluice_core::traits::{StreamHandle, StreamRuntime};
use sluice_core::{ManagerConfig, StreamConfig, StreamMap};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

type StreamTable = HashMap<String, StreamRecord>;

/// A registered, running stream.
struct StreamRecord {
    config: StreamConfig,
    handle: Arc<dyn StreamHandle>,
    created_at: DateTime<Utc>,
    started: Instant,
}

/// Registry of named, independently running streams.
///
/// Mutating operations take a `timeout` that bounds the whole call,
/// including the wait for the registry lock. A timed out or failed
/// operation leaves the registry as it was before the failing step.
pub struct StreamManager {
    streams: Mutex<StreamTable>,
    runtime: Arc<dyn StreamRuntime>,
    config: ManagerConfig,
}

impl StreamManager {
    /// Create an empty registry driving the given runtime.
    pub fn new(runtime: Arc<dyn StreamRuntime>, config: ManagerConfig) -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            runtime,
            config,
        }
    }

    /// Get the registry configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Build and start a new stream.
    ///
    /// Fails with `Conflict` if `id` is already registered.
    pub async fn create(&self, id: &str, config: StreamConfig, timeout: Duration) -> Result<()> {
        ensure_id(id)?;
        let deadline = Instant::now() + timeout;
        let mut streams = self.lock(id, deadline, timeout).await?;

        self.create_locked(&mut streams, id, config, deadline, timeout)
            .await
    }

    /// Get the status of a stream.
    pub async fn read(&self, id: &str) -> Result<StreamStatus> {
        let (handle, config, created_at, started) = {
            let streams = self.streams.lock().await;
            let record = streams.get(id).ok_or_else(|| not_found(id))?;
            (
                Arc::clone(&record.handle),
                record.config.clone(),
                record.created_at,
                record.started,
            )
        };

        Ok(StreamStatus {
            active: handle.is_active(),
            uptime: started.elapsed(),
            created_at,
            started_at: handle.started_at(),
            config,
        })
    }

    /// Replace a stream with a new generation built from `config`.
    ///
    /// The old stream is stopped first. If it cannot be stopped the record
    /// is left untouched. If it stops but the replacement fails to start,
    /// the record is removed.
    pub async fn update(&self, id: &str, config: StreamConfig, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut streams = self.lock(id, deadline, timeout).await?;

        self.update_locked(&mut streams, id, config, deadline, timeout)
            .await
    }

    /// Stop a stream and remove it.
    ///
    /// If the stream cannot be stopped it stays registered.
    pub async fn delete(&self, id: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut streams = self.lock(id, deadline, timeout).await?;

        self.delete_locked(&mut streams, id, deadline, timeout)
            .await
    }

    /// List every registered stream.
    pub async fn list(&self) -> BTreeMap<String, StreamSummary> {
        let entries: Vec<(String, Arc<dyn StreamHandle>, Instant)> = {
            let streams = self.streams.lock().await;
            streams
                .iter()
                .map(|(id, record)| (id.clone(), Arc::clone(&record.handle), record.started))
                .collect()
        };

        entries
            .into_iter()
            .map(|(id, handle, started)| {
                let summary = StreamSummary {
                    active: handle.is_active(),
                    uptime: started.elapsed(),
                };
                (id, summary)
            })
            .collect()
    }

    /// Make the registry hold exactly the streams in `desired`.
    ///
    /// Streams absent from `desired` are deleted first. Then every desired
    /// stream is created or, if already registered, updated, in identifier
    /// order. A failing identifier does not stop the others; all failures
    /// are returned together as `Reconcile` and successes are kept.
    pub async fn set_all(&self, desired: StreamMap, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut streams = self.lock("*", deadline, timeout).await?;
        let mut failures = Vec::new();

        let mut removed: Vec<String> = streams
            .keys()
            .filter(|id| !desired.contains_key(*id))
            .cloned()
            .collect();
        removed.sort();

        for id in removed {
            if let Err(e) = self
                .delete_locked(&mut streams, &id, deadline, timeout)
                .await
            {
                failures.push((id, e));
            }
        }

        for (id, config) in desired {
            let result = if id.is_empty() {
                ensure_id(&id)
            } else if streams.contains_key(&id) {
                self.update_locked(&mut streams, &id, config, deadline, timeout)
                    .await
            } else {
                self.create_locked(&mut streams, &id, config, deadline, timeout)
                    .await
            };

            if let Err(e) = result {
                failures.push((id, e));
            }
        }

        if failures.is_empty() {
            tracing::info!(streams = streams.len(), "Streams reconciled");
            Ok(())
        } else {
            tracing::warn!(
                streams = streams.len(),
                failed = failures.len(),
                "Stream reconciliation finished with failures"
            );
            Err(StreamError::Reconcile { failures })
        }
    }

    /// Stop and remove every stream.
    ///
    /// Streams that fail to stop stay registered and are reported together.
    pub async fn stop_all(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut streams = self.lock("*", deadline, timeout).await?;
        let mut failures = Vec::new();

        let mut ids: Vec<String> = streams.keys().cloned().collect();
        ids.sort();

        for id in ids {
            if let Err(e) = self
                .delete_locked(&mut streams, &id, deadline, timeout)
                .await
            {
                failures.push((id, e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(StreamError::Reconcile { failures })
        }
    }

    /// Number of registered streams.
    pub async fn len(&self) -> usize {
        self.streams.lock().await.len()
    }

    /// Check if no streams are registered.
    pub async fn is_empty(&self) -> bool {
        self.streams.lock().await.is_empty()
    }

    /// Registered identifiers, sorted.
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.streams.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn lock(
        &self,
        id: &str,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<MutexGuard<'_, StreamTable>> {
        tokio::time::timeout_at(deadline, self.streams.lock())
            .await
            .map_err(|_| timed_out(id, Operation::Lock, timeout))
    }

    async fn create_locked(
        &self,
        streams: &mut StreamTable,
        id: &str,
        config: StreamConfig,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<()> {
        if streams.contains_key(id) {
            return Err(StreamError::Conflict { id: id.to_string() });
        }

        let record = self.launch(id, config, deadline, timeout).await?;
        streams.insert(id.to_string(), record);

        tracing::info!(stream_id = %id, "Stream created");
        Ok(())
    }

    async fn update_locked(
        &self,
        streams: &mut StreamTable,
        id: &str,
        config: StreamConfig,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<()> {
        let handle = streams
            .get(id)
            .map(|record| Arc::clone(&record.handle))
            .ok_or_else(|| not_found(id))?;

        self.halt(id, handle.as_ref(), deadline, timeout).await?;

        match self.launch(id, config, deadline, timeout).await {
            Ok(record) => {
                streams.insert(id.to_string(), record);
                tracing::info!(stream_id = %id, "Stream updated");
                Ok(())
            }
            Err(e) => {
                streams.remove(id);
                tracing::warn!(
                    stream_id = %id,
                    error = %e,
                    "Replacement stream failed to start, stream removed"
                );
                Err(e)
            }
        }
    }

    async fn delete_locked(
        &self,
        streams: &mut StreamTable,
        id: &str,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<()> {
        let handle = streams
            .get(id)
            .map(|record| Arc::clone(&record.handle))
            .ok_or_else(|| not_found(id))?;

        self.halt(id, handle.as_ref(), deadline, timeout).await?;
        streams.remove(id);

        tracing::info!(stream_id = %id, "Stream deleted");
        Ok(())
    }

    /// Build and start a stream, producing its record.
    async fn launch(
        &self,
        id: &str,
        config: StreamConfig,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<StreamRecord> {
        let handle = tokio::time::timeout_at(deadline, self.runtime.build(id, config.clone()))
            .await
            .map_err(|_| timed_out(id, Operation::Build, timeout))
            .and_then(|built| built)
            .inspect_err(|e| {
                tracing::warn!(stream_id = %id, error = %e, "Failed to build stream");
            })?;

        match tokio::time::timeout_at(deadline, handle.start(deadline)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(stream_id = %id, error = %e, "Failed to start stream");
                self.reclaim(id, handle);
                return Err(e);
            }
            Err(_) => {
                let e = timed_out(id, Operation::Start, timeout);
                tracing::warn!(stream_id = %id, error = %e, "Stream start timed out");
                self.reclaim(id, handle);
                return Err(e);
            }
        }

        Ok(StreamRecord {
            config,
            handle,
            created_at: Utc::now(),
            started: Instant::now(),
        })
    }

    /// Stop a stream within the deadline.
    async fn halt(
        &self,
        id: &str,
        handle: &dyn StreamHandle,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<()> {
        let result = match tokio::time::timeout_at(deadline, handle.stop(deadline)).await {
            Ok(result) => result,
            Err(_) => Err(timed_out(id, Operation::Stop, timeout)),
        };

        if let Err(e) = &result {
            tracing::warn!(stream_id = %id, error = %e, "Failed to stop stream");
        }
        result
    }

    /// Stop a stream whose start was abandoned, in the background.
    fn reclaim(&self, id: &str, handle: Arc<dyn StreamHandle>) {
        let grace = self.config.reclaim_grace;
        let id = id.to_string();

        tokio::spawn(async move {
            let deadline = Instant::now() + grace;
            match tokio::time::timeout_at(deadline, handle.stop(deadline)).await {
                Ok(Ok(())) => {
                    tracing::debug!(stream_id = %id, "Reclaimed abandoned stream");
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        stream_id = %id,
                        error = %e,
                        "Failed to reclaim abandoned stream"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        stream_id = %id,
                        grace_ms = grace.as_millis() as u64,
                        "Abandoned stream did not stop within grace period"
                    );
                }
            }
        });
    }
}

fn ensure_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(StreamError::bad_request("stream id must not be empty"));
    }
    Ok(())
}

fn not_found(id: &str) -> StreamError {
    StreamError::NotFound { id: id.to_string() }
}

fn timed_out(id: &str, operation: Operation, timeout: Duration) -> StreamError {
    StreamError::Timeout {
        id: id.to_string(),
        operation,
        timeout_ms: timeout.as_millis() as u64,
    }
}
