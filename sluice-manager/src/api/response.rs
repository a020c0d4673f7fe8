//! Response builders for the API.
//!
//! Bodies are JSON unless the request's `Accept` header names YAML.

use bytes::Bytes;
use http_body_util::Full;
use hyper::http::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Media types that select a YAML response.
const YAML_MEDIA_TYPES: &[&str] = &["application/yaml", "application/x-yaml", "text/yaml"];

/// Encoding of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `application/json`
    #[default]
    Json,
    /// `application/yaml`
    Yaml,
}

impl Format {
    /// Pick the response format from request headers.
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let accepts_yaml = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(|v| v.split(';').next().unwrap_or("").trim())
            .any(|media| YAML_MEDIA_TYPES.contains(&media));

        if accepts_yaml { Self::Yaml } else { Self::Json }
    }

    /// The `Content-Type` for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
        }
    }
}

fn apply_security_headers(mut response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}

/// Build a response in the given format.
pub fn encode<T: Serialize>(status: StatusCode, body: &T, format: Format) -> Response<Full<Bytes>> {
    match format {
        Format::Json => json_response(status, body),
        Format::Yaml => match serde_yaml::to_string(body) {
            Ok(yaml) => yaml_response(status, yaml),
            Err(e) => serialization_error(e.to_string()),
        },
    }
}

/// Build a JSON response with status code.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(body) {
        Ok(json) => raw_response(status, Format::Json, json),
        Err(e) => serialization_error(e.to_string()),
    }
}

/// Build a YAML response with status code.
pub fn yaml_response(status: StatusCode, yaml: impl Into<String>) -> Response<Full<Bytes>> {
    raw_response(status, Format::Yaml, yaml.into())
}

/// Build a 200 OK response.
pub fn ok<T: Serialize>(body: &T, format: Format) -> Response<Full<Bytes>> {
    encode(StatusCode::OK, body, format)
}

/// Build an empty 200 OK response.
pub fn ok_empty() -> Response<Full<Bytes>> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(Bytes::new()))
        .expect("response builder should not fail");
    apply_security_headers(response)
}

/// Build a 404 Not Found response.
pub fn not_found() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": {
            "code": "E000",
            "message": "Not found",
            "status": 404
        }
    });
    json_response(StatusCode::NOT_FOUND, &body)
}

/// Build a 400 response for a verb the path does not support.
pub fn unsupported_method(method: &hyper::Method, allowed: &[&str]) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": {
            "code": "E503",
            "message": format!(
                "Verb not supported: {}. Allowed: {}",
                method,
                allowed.join(", ")
            ),
            "status": 400
        }
    });

    let mut response = json_response(StatusCode::BAD_REQUEST, &body);
    if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

fn raw_response(status: StatusCode, format: Format, body: String) -> Response<Full<Bytes>> {
    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, format.content_type())
        .body(Full::new(Bytes::from(body)))
        .expect("response builder should not fail");
    apply_security_headers(response)
}

fn serialization_error(cause: String) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": {
            "code": "E804",
            "message": format!("Serialization error: {}", cause),
            "status": 500
        }
    });
    raw_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        Format::Json,
        body.to_string(),
    )
}
