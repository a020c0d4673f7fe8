//! Request body reading.

use super::yaml_security::{MAX_DOCUMENT_SIZE, validate_document};
use http_body_util::{BodyExt, Limited};
use hyper::Request;
use hyper::body::Body;
use sluice_core::error::StreamError;

/// Read a request body as UTF-8 text and run the document guards on it.
pub async fn read_body_string<B>(req: Request<B>) -> Result<String, StreamError>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    // One byte over the limit so oversized bodies reach the size check.
    let body = Limited::new(req.into_body(), MAX_DOCUMENT_SIZE + 1);
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return Err(StreamError::bad_request(format!(
                "failed to read request body: {}",
                e
            )));
        }
    };

    let text = String::from_utf8(bytes.to_vec())
        .map_err(|e| StreamError::bad_request(format!("request body is not UTF-8: {}", e)))?;

    validate_document(&text)?;
    Ok(text)
}
