//! Request/response transcript logging.
//!
//! The response body is a forward-only stream, so the middleware collects
//! it into an in-memory buffer, renders the transcript from the buffer,
//! and splices the exact same bytes back into the response. The client
//! receives identical status, headers, and body whether or not this layer
//! is installed. Buffers are per request; nothing is shared across calls.

use axum::{
    body::Body,
    extract::Request,
    http::{request, response, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http_body_util::BodyExt;

pub async fn transcript(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!("failed to buffer request body: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    tracing::info!("- REQUEST:\n{}", format_request(&parts, &body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!("failed to buffer response body: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!("- RESPONSE:\n{}\n", format_response(&parts, &body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn format_request(parts: &request::Parts, body: &Bytes) -> String {
    let uri = &parts.uri;
    let scheme = uri.scheme_str().unwrap_or("http");
    let host = uri
        .host()
        .map(str::to_owned)
        .or_else(|| host_header(&parts.headers))
        .unwrap_or_default();
    let query = uri.query().map(|q| format!("?{q}")).unwrap_or_default();

    let mut out = format!(
        "{} {scheme}://{host}{}{query}\n",
        parts.method,
        uri.path()
    );
    out.push_str(&format_headers(&parts.headers));
    if !body.is_empty() {
        out.push_str(&format!("Body:\t{}", String::from_utf8_lossy(body)));
    }
    out
}

fn format_response(parts: &response::Parts, body: &Bytes) -> String {
    let status = parts.status;
    let mut out = format!(
        "Status Code: {} ({})\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    out.push_str(&format_headers(&parts.headers));
    let rendered = render_body(body);
    if !rendered.is_empty() {
        out.push_str(&format!("\nBody:\n{rendered}"));
    }
    out
}

fn host_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn format_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        out.push_str(&format!(
            "\t{name}: {}\n",
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
    out
}

/// JSON bodies are re-serialized pretty for the transcript only; the bytes
/// sent to the client are never touched. Anything else renders verbatim,
/// and an empty body renders as an empty segment.
fn render_body(body: &Bytes) -> String {
    if body.is_empty() {
        return String::new();
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_default(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
