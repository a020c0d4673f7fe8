//! Stream management handlers.

use crate::api::error::ApiError;
use crate::api::request;
use crate::api::response::{self, Format};
use crate::api::state::AppState;
use crate::manager::StreamSummary;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Request, Response};
use serde::Serialize;
use sluice_core::StreamConfig;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Listing entry for one stream.
#[derive(Debug, Serialize)]
struct StreamInfo {
    active: bool,
    uptime: f64,
    uptime_str: String,
}

impl From<&StreamSummary> for StreamInfo {
    fn from(summary: &StreamSummary) -> Self {
        Self {
            active: summary.active,
            uptime: summary.uptime_secs(),
            uptime_str: summary.uptime_str(),
        }
    }
}

/// Status of one stream including its configuration.
#[derive(Debug, Serialize)]
struct StreamDetail {
    active: bool,
    uptime: f64,
    uptime_str: String,
    config: StreamConfig,
}

/// GET /streams
///
/// List every stream with its status.
pub async fn list(state: Arc<AppState>, format: Format) -> Response<Full<Bytes>> {
    let streams = state.manager.list().await;
    let body: BTreeMap<&str, StreamInfo> = streams
        .iter()
        .map(|(id, summary)| (id.as_str(), StreamInfo::from(summary)))
        .collect();

    response::ok(&body, format)
}

/// POST /streams
///
/// Replace the whole set of streams with the id → config mapping in the body.
pub async fn set_all<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let text = match request::read_body_string(req).await {
        Ok(t) => t,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let desired = match StreamConfig::map_from_document(&text) {
        Ok(d) => d,
        Err(e) => return ApiError::bad_request(e.code(), e.to_string()).into_response(),
    };

    match state
        .manager
        .set_all(desired, state.operation_timeout())
        .await
    {
        Ok(()) => response::ok_empty(),
        Err(e) => ApiError::bad_request(e.code(), e.to_string()).into_response(),
    }
}

/// GET /stream/{id}
pub async fn get(state: Arc<AppState>, id: &str, format: Format) -> Response<Full<Bytes>> {
    match state.manager.read(id).await {
        Ok(status) => {
            let summary = status.summary();
            let body = StreamDetail {
                active: summary.active,
                uptime: summary.uptime_secs(),
                uptime_str: summary.uptime_str(),
                config: status.config,
            };
            response::ok(&body, format)
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /stream/{id}
///
/// Create a stream from the config in the body.
pub async fn create<B>(req: Request<B>, state: Arc<AppState>, id: &str) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let config = match read_config(req).await {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    match state
        .manager
        .create(id, config, state.operation_timeout())
        .await
    {
        Ok(()) => response::ok_empty(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// PUT /stream/{id}
///
/// Replace a stream with the config in the body.
pub async fn update<B>(req: Request<B>, state: Arc<AppState>, id: &str) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let config = match read_config(req).await {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    match state
        .manager
        .update(id, config, state.operation_timeout())
        .await
    {
        Ok(()) => response::ok_empty(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// DELETE /stream/{id}
pub async fn delete(state: Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    match state.manager.delete(id, state.operation_timeout()).await {
        Ok(()) => response::ok_empty(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn read_config<B>(req: Request<B>) -> Result<StreamConfig, ApiError>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let text = request::read_body_string(req).await?;
    StreamConfig::from_document(&text).map_err(|e| ApiError::bad_request(e.code(), e.to_string()))
}
