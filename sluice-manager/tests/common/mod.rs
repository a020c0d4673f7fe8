//! Common test utilities for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sluice_core::error::StreamError;
use sluice_core::traits::{BuildFuture, RuntimeFuture, StreamHandle, StreamRuntime};
use sluice_core::{ComponentConfig, ManagerConfig, StreamConfig};
use sluice_manager::manager::StreamManager;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// How a [`ScriptedRuntime`] and its streams behave.
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Delay before `build` resolves.
    pub build_delay: Duration,
    /// Delay before `start` resolves.
    pub start_delay: Duration,
    /// Delay before `stop` resolves.
    pub stop_delay: Duration,
    /// Identifiers whose build fails.
    pub failing_builds: Vec<String>,
    /// Every start fails.
    pub fail_start: bool,
    /// Every stop fails.
    pub fail_stop: bool,
}

#[derive(Default)]
struct Shared {
    behavior: Mutex<Behavior>,
    builds: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

/// Runtime whose timing and failures are set by the test.
///
/// Behavior changes apply to streams that were already built.
#[derive(Clone, Default)]
pub struct ScriptedRuntime {
    shared: Arc<Shared>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(behavior: Behavior) -> Self {
        let runtime = Self::default();
        *runtime.shared.behavior.lock() = behavior;
        runtime
    }

    /// Change behavior in place.
    pub fn set(&self, f: impl FnOnce(&mut Behavior)) {
        f(&mut self.shared.behavior.lock());
    }

    pub fn builds(&self) -> usize {
        self.shared.builds.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.shared.starts.load(Ordering::SeqCst)
    }

    /// Stop attempts, successful or not.
    pub fn stops(&self) -> usize {
        self.shared.stops.load(Ordering::SeqCst)
    }

    fn behavior(&self) -> Behavior {
        self.shared.behavior.lock().clone()
    }
}

impl StreamRuntime for ScriptedRuntime {
    fn build<'a>(&'a self, id: &'a str, config: StreamConfig) -> BuildFuture<'a> {
        Box::pin(async move {
            let behavior = self.behavior();
            tokio::time::sleep(behavior.build_delay).await;
            self.shared.builds.fetch_add(1, Ordering::SeqCst);

            if behavior.failing_builds.iter().any(|f| f == id) {
                return Err(StreamError::Construction {
                    id: id.to_string(),
                    cause: "scripted build failure".to_string(),
                });
            }

            let stream: Arc<dyn StreamHandle> = Arc::new(ScriptedStream {
                id: id.to_string(),
                config,
                shared: Arc::clone(&self.shared),
                active: AtomicBool::new(false),
                started_at: Mutex::new(None),
            });
            Ok(stream)
        })
    }
}

struct ScriptedStream {
    id: String,
    config: StreamConfig,
    shared: Arc<Shared>,
    active: AtomicBool,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl StreamHandle for ScriptedStream {
    fn start(&self, _deadline: Instant) -> RuntimeFuture<'_> {
        Box::pin(async move {
            let behavior = self.shared.behavior.lock().clone();
            tokio::time::sleep(behavior.start_delay).await;

            if behavior.fail_start {
                return Err(StreamError::Construction {
                    id: self.id.clone(),
                    cause: "scripted start failure".to_string(),
                });
            }

            self.shared.starts.fetch_add(1, Ordering::SeqCst);
            self.active.store(true, Ordering::SeqCst);
            *self.started_at.lock() = Some(Utc::now());
            Ok(())
        })
    }

    fn stop(&self, _deadline: Instant) -> RuntimeFuture<'_> {
        Box::pin(async move {
            self.shared.stops.fetch_add(1, Ordering::SeqCst);
            let behavior = self.shared.behavior.lock().clone();
            tokio::time::sleep(behavior.stop_delay).await;

            if behavior.fail_stop {
                return Err(StreamError::Teardown {
                    id: self.id.clone(),
                    cause: "scripted stop failure".to_string(),
                });
            }

            self.active.store(false, Ordering::SeqCst);
            Ok(())
        })
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn started_at(&self) -> Option<DateTime<Utc>> {
        *self.started_at.lock()
    }

    fn config(&self) -> &StreamConfig {
        &self.config
    }
}

/// Manager over a scripted runtime.
pub fn scripted_manager(runtime: &ScriptedRuntime) -> Arc<StreamManager> {
    let config = ManagerConfig::default().with_reclaim_grace(Duration::from_millis(200));
    Arc::new(StreamManager::new(Arc::new(runtime.clone()), config))
}

/// A config that does nothing interesting.
pub fn harmless_config() -> StreamConfig {
    StreamConfig::default()
        .with_input(ComponentConfig::new("http_server").with_option("path", "/post"))
        .with_output(ComponentConfig::new("drop"))
}

/// [`harmless_config`] with a memory buffer.
pub fn buffered_config() -> StreamConfig {
    harmless_config().with_buffer(ComponentConfig::new("memory"))
}
