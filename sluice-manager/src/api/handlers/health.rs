//! Health endpoint handler.

use crate::api::response::{self, Format};
use crate::api::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::sync::Arc;

/// GET /health
///
/// Returns 200 OK with server uptime and the number of registered streams.
pub async fn get_health(state: Arc<AppState>, format: Format) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "status": "healthy",
        "service": "sluice",
        "uptime_seconds": state.uptime_secs(),
        "streams": state.manager.len().await
    });

    response::ok(&body, format)
}
