//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// How many bytes of a body to log at the `info` level before truncating.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level. Bodies
/// longer than 64 bytes are truncated and logged in full at the `debug`
/// level. Password fields in JSON bodies are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        log_request(&parts, &redact_json_string_field(&body_text, "password"));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Replace the value of the JSON string field `field_name` with asterisks.
///
/// Works on the raw body text so that bodies that are not valid JSON pass
/// through unchanged. Escaped quotes inside the secret are handled; other
/// value types are left alone since secrets are always strings.
fn redact_json_string_field(body_text: &str, field_name: &str) -> String {
    let key = format!("\"{field_name}\"");

    let Some(key_start) = body_text.find(&key) else {
        return body_text.to_string();
    };

    let after_key = &body_text[key_start + key.len()..];
    let Some(colon_offset) = after_key.find(':') else {
        return body_text.to_string();
    };

    let after_colon = &after_key[colon_offset + 1..];
    let Some(quote_offset) = after_colon.find('"') else {
        return body_text.to_string();
    };

    let value = &after_colon[quote_offset + 1..];
    let mut escaped = false;
    for (index, character) in value.char_indices() {
        match character {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                let value_start =
                    key_start + key.len() + colon_offset + 1 + quote_offset + 1;
                let value_end = value_start + index;

                return format!(
                    "{}********{}",
                    &body_text[..value_start],
                    &body_text[value_end..]
                );
            }
            _ => escaped = false,
        }
    }

    body_text.to_string()
}

async fn extract_parts_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {:}...",
            parts.method,
            parts.uri,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {:}...",
            parts.status,
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}
