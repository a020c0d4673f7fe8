//! Request routing for the API.
//!
//! Routes requests to handlers based on method and path.

use super::handlers;
use super::response::{self, Format};
use super::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Path of the collection endpoint.
const STREAMS_PATH: &str = "/streams";

/// Prefix of the per-stream endpoint.
const STREAM_PREFIX: &str = "/stream/";

/// Route a request to the appropriate handler.
///
/// Generic over the body so tests can drive it with in-memory bodies.
pub async fn route<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let format = Format::negotiate(req.headers());

    tracing::debug!(method = %method, path = %path, "Routing request");

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/health") => handlers::health::get_health(state, format).await,

        // Collection endpoint
        (&Method::GET, STREAMS_PATH) => handlers::streams::list(state, format).await,
        (&Method::POST, STREAMS_PATH) => handlers::streams::set_all(req, state).await,
        (_, STREAMS_PATH) => response::unsupported_method(&method, &["GET", "POST"]),

        // Per-stream endpoint
        (_, p) if p.starts_with(STREAM_PREFIX) => {
            match urlencoding::decode(&p[STREAM_PREFIX.len()..]) {
                Ok(id) => route_stream(req, state, &id, format).await,
                Err(_) => response::not_found(),
            }
        }

        _ => response::not_found(),
    };

    tracing::debug!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "Request handled"
    );

    Ok(response)
}

/// Route requests under /stream/{id}.
///
/// `id` is already percent-decoded.
async fn route_stream<B>(
    req: Request<B>,
    state: Arc<AppState>,
    id: &str,
    format: Format,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    if id.is_empty() || id.contains('/') {
        return response::not_found();
    }

    match req.method().clone() {
        Method::GET => handlers::streams::get(state, id, format).await,
        Method::POST => handlers::streams::create(req, state, id).await,
        Method::PUT => handlers::streams::update(req, state, id).await,
        Method::DELETE => handlers::streams::delete(state, id).await,
        other => response::unsupported_method(&other, &["GET", "POST", "PUT", "DELETE"]),
    }
}
