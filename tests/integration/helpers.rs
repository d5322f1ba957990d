//! Test helpers and utilities

#![allow(dead_code)]

use bytes::Bytes;
use http::{Response, StatusCode};
use unflare::{Error, Handler};

/// Build a platform request.
pub fn request(method: &str, uri: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .expect("valid test request")
}

/// GET request for `uri`.
pub fn get(uri: &str) -> http::Request<Bytes> {
    request("GET", uri)
}

/// Request with a body; sets `Content-Type` and `Content-Length`.
pub fn with_body(method: &str, uri: &str, content_type: &str, body: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .header("content-length", body.len().to_string())
        .body(Bytes::copy_from_slice(body.as_bytes()))
        .expect("valid test request")
}

/// Route handler that sends a fixed body.
pub fn send(body: &'static str) -> Handler {
    Handler::route_sync(move |_, res| {
        res.send(body);
        Ok(())
    })
}

/// Middleware that sets a header and continues.
pub fn tag(name: &'static str, value: &'static str) -> Handler {
    Handler::middleware(move |req, res, next| {
        res.set_header(name, value);
        Box::pin(async move {
            next.run(req, res).await;
            Ok(())
        })
    })
}

/// Route handler that fails with `message`.
pub fn fail(message: &'static str) -> Handler {
    Handler::route_sync(move |_, _| Err(Error::Custom(message.to_string())))
}

/// Assert response status
pub fn assert_status(resp: &Response<Bytes>, expected: StatusCode) {
    assert_eq!(
        resp.status(),
        expected,
        "expected status {}, got {} with body {:?}",
        expected,
        resp.status(),
        body_text(resp)
    );
}

/// Response body as UTF-8
pub fn body_text(resp: &Response<Bytes>) -> String {
    String::from_utf8_lossy(resp.body()).into_owned()
}

/// Assert response body equals `expected`
pub fn assert_body(resp: &Response<Bytes>, expected: &str) {
    assert_eq!(body_text(resp), expected);
}

/// Assert header value
pub fn assert_header(resp: &Response<Bytes>, name: &str, expected: &str) {
    let value = resp
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("header {} not found", name))
        .to_str()
        .expect("header is not valid UTF-8");
    assert_eq!(value, expected, "header {} mismatch", name);
}
