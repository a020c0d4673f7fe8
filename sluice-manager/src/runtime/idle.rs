//! Idle stream runtime.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sluice_core::error::StreamError;
use sluice_core::traits::{BuildFuture, RuntimeFuture, StreamHandle, StreamRuntime};
use sluice_core::StreamConfig;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runtime whose streams run an idle task until stopped.
#[derive(Debug, Default, Clone)]
pub struct IdleRuntime;

impl IdleRuntime {
    /// Create a new idle runtime.
    pub fn new() -> Self {
        Self
    }
}

impl StreamRuntime for IdleRuntime {
    fn build<'a>(&'a self, id: &'a str, config: StreamConfig) -> BuildFuture<'a> {
        Box::pin(async move {
            config.validate().map_err(|e| StreamError::Construction {
                id: id.to_string(),
                cause: e.to_string(),
            })?;

            let stream: Arc<dyn StreamHandle> = Arc::new(IdleStream::new(id, config));
            Ok(stream)
        })
    }
}

#[derive(Default)]
struct IdleState {
    started_at: Option<DateTime<Utc>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// A stream that holds a task open but processes nothing.
pub struct IdleStream {
    id: String,
    config: StreamConfig,
    state: Mutex<IdleState>,
}

impl IdleStream {
    /// Create a stopped stream.
    pub fn new(id: impl Into<String>, config: StreamConfig) -> Self {
        Self {
            id: id.into(),
            config,
            state: Mutex::new(IdleState::default()),
        }
    }
}

impl StreamHandle for IdleStream {
    fn start(&self, _deadline: Instant) -> RuntimeFuture<'_> {
        Box::pin(async move {
            let mut state = self.state.lock();
            if state.task.as_ref().is_some_and(|task| !task.is_finished()) {
                return Ok(());
            }

            let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
            let id = self.id.clone();
            let input = self.config.input.kind.clone();
            let output = self.config.output.kind.clone();

            state.task = Some(tokio::spawn(async move {
                tracing::trace!(stream_id = %id, %input, %output, "Idle stream running");
                let _ = shutdown_rx.await;
                tracing::trace!(stream_id = %id, "Idle stream exiting");
            }));
            state.shutdown = Some(shutdown_tx);
            state.started_at = Some(Utc::now());

            Ok(())
        })
    }

    fn stop(&self, _deadline: Instant) -> RuntimeFuture<'_> {
        Box::pin(async move {
            let (shutdown, task) = {
                let mut state = self.state.lock();
                (state.shutdown.take(), state.task.take())
            };

            if let Some(shutdown) = shutdown {
                let _ = shutdown.send(());
            }

            if let Some(task) = task {
                task.await.map_err(|e| StreamError::Teardown {
                    id: self.id.clone(),
                    cause: e.to_string(),
                })?;
            }

            Ok(())
        })
    }

    fn is_active(&self) -> bool {
        self.state
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().started_at
    }

    fn config(&self) -> &StreamConfig {
        &self.config
    }
}
