//! Request correlation middleware.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request correlation ID, extractable from `Request::extensions()`.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Tag each request with an id: the caller's `x-request-id` when it is
/// usable, otherwise a fresh one. The id is echoed on the response.
pub async fn inject_request_id(mut request: Request, next: Next) -> Response {
    let id = request_id(request.headers());
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn request_id(headers: &HeaderMap) -> String {
    match headers.get(REQUEST_ID_HEADER).map(HeaderValue::to_str) {
        Some(Ok(id)) if !id.is_empty() => id.to_owned(),
        _ => format!("dapp-{:016x}", rand::random::<u64>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_id_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_missing_or_empty_id_is_generated() {
        let generated = request_id(&HeaderMap::new());
        assert!(generated.starts_with("dapp-"));
        assert_eq!(generated.len(), "dapp-".len() + 16);

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert!(request_id(&headers).starts_with("dapp-"));
    }
}
