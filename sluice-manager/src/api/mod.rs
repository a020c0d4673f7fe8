//! HTTP API for stream management.
//!
//! | Verb | Path | Operation |
//! |---|---|---|
//! | GET | /streams | list every stream |
//! | POST | /streams | replace the whole set of streams |
//! | GET | /stream/{id} | read one stream |
//! | POST | /stream/{id} | create a stream |
//! | PUT | /stream/{id} | update a stream |
//! | DELETE | /stream/{id} | delete a stream |
//! | GET | /health | liveness |
//!
//! Request bodies may be JSON or YAML. Responses are JSON unless the
//! `Accept` header asks for YAML.
//!
//! # Architecture
//!
//! The API uses Hyper 1.x directly.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      ApiServer                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐   │
//! │  │   router     │──│   handlers   │──│    state     │   │
//! │  └──────────────┘  └──────────────┘  └──────────────┘   │
//! │         │                  │                 │          │
//! │         ▼                  ▼                 ▼          │
//! │  ┌──────────────────────────────────────────────────┐   │
//! │  │                 StreamManager                    │   │
//! │  └──────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sluice_manager::api::{ApiServer, ServerConfig};
//! use sluice_manager::manager::StreamManager;
//! use sluice_manager::runtime::IdleRuntime;
//! use std::sync::Arc;
//!
//! let manager = Arc::new(StreamManager::new(
//!     Arc::new(IdleRuntime::new()),
//!     ManagerConfig::default(),
//! ));
//!
//! let mut server = ApiServer::new(ServerConfig::default(), manager);
//! server.run().await?;
//! ```

mod error;
pub mod handlers;
mod request;
mod response;
mod router;
mod server;
mod state;
pub mod yaml_security;

pub use error::ApiError;
pub use response::Format;
pub use router::route;
pub use server::{ApiServer, DEFAULT_PORT, ServerConfig};
pub use state::AppState;
