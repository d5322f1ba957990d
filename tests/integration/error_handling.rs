//! Error propagation tests: error handlers, recovery, 500 fallback, panics.

use std::sync::{Arc, Mutex};

use crate::helpers::*;
use http::StatusCode;
use unflare::{App, Error, Handler, Router};

fn handled_403() -> Handler {
    Handler::error_sync(|err, _, res| {
        res.status(403).send(format!("handled: {}", err));
        Ok(())
    })
}

/// Test that a route error reaches a registered error handler
#[tokio::test]
async fn test_error_handler_resolves() {
    let mut app = App::new();
    app.get("/boom", fail("boom")).unwrap();
    app.add(handled_403());

    let resp = app.fetch(get("/boom")).await;
    assert_status(&resp, StatusCode::FORBIDDEN);
    assert_body(&resp, "handled: Error: boom");
}

/// Test that an unresolved error becomes a 500 carrying its message
#[tokio::test]
async fn test_unresolved_error_is_500() {
    let mut app = App::new();
    app.get("/boom", fail("database offline")).unwrap();

    let resp = app.fetch(get("/boom")).await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body(&resp, "Error: database offline");
}

/// Test that errors skip ordinary handlers on the way to an error handler
#[tokio::test]
async fn test_error_skips_middleware_and_routes() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut app = App::new();
    app.get("/boom", fail("boom")).unwrap();

    let skipped = trace.clone();
    app.add(Handler::middleware(move |req, res, next| {
        skipped.lock().unwrap().push("middleware");
        Box::pin(async move {
            next.run(req, res).await;
            Ok(())
        })
    }));
    let route_trace = trace.clone();
    app.get(
        "*",
        Handler::route_sync(move |_, res| {
            route_trace.lock().unwrap().push("catch-all");
            res.send("catch-all");
            Ok(())
        }),
    )
    .unwrap();
    app.add(handled_403());

    let resp = app.fetch(get("/boom")).await;
    assert_status(&resp, StatusCode::FORBIDDEN);
    assert!(trace.lock().unwrap().is_empty());
}

/// Test that an error handler can recover and continue the chain
#[tokio::test]
async fn test_error_handler_recovers_with_next() {
    let mut app = App::new();
    app.add(Handler::middleware(|_, _, _| {
        Box::pin(async { Err(Error::Custom("soft failure".to_string())) })
    }));
    app.add(Handler::error(|err, req, res, next| {
        res.set_header("X-Recovered", err.to_string());
        Box::pin(async move {
            next.run(req, res).await;
            Ok(())
        })
    }));
    app.get("/", send("recovered")).unwrap();

    let resp = app.fetch(get("/")).await;
    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "x-recovered", "Error: soft failure");
    assert_body(&resp, "recovered");
}

/// Test that an error handler can rethrow to a later one
#[tokio::test]
async fn test_error_handler_chain_with_fail() {
    let mut app = App::new();
    app.get("/boom", fail("inner")).unwrap();
    app.add(Handler::error(|err, req, res, next| {
        Box::pin(async move {
            next.fail(req, res, format!("wrapped({})", err)).await;
            Ok(())
        })
    }));
    app.add(Handler::error_sync(|err, _, res| {
        res.status(502).send(err.to_string());
        Ok(())
    }));

    let resp = app.fetch(get("/boom")).await;
    assert_status(&resp, StatusCode::BAD_GATEWAY);
    assert_body(&resp, "Error: wrapped(Error: inner)");
}

/// Test that a middleware error is caught the same way as a route error
#[tokio::test]
async fn test_middleware_error_reaches_error_handler() {
    let mut app = App::new();
    app.add(Handler::middleware(|_, _, _| {
        Box::pin(async { Err(Error::Custom("denied".to_string())) })
    }));
    app.get("/", send("unreachable")).unwrap();
    app.add(handled_403());

    let resp = app.fetch(get("/")).await;
    assert_body(&resp, "handled: Error: denied");
}

/// Test that an error in a nested router bubbles to the parent's error handler
#[tokio::test]
async fn test_nested_error_bubbles_up() {
    let mut api = Router::new();
    api.get("/fail", fail("nested")).unwrap();

    let mut app = App::new();
    app.nest("/api", api).unwrap();
    app.add(handled_403());

    let resp = app.fetch(get("/api/fail")).await;
    assert_status(&resp, StatusCode::FORBIDDEN);
    assert_body(&resp, "handled: Error: nested");
}

/// Test that an error handler inside a nested router stays local
#[tokio::test]
async fn test_nested_error_handled_locally() {
    let mut api = Router::new();
    api.get("/fail", fail("nested")).unwrap();
    api.add(Handler::error_sync(|_, _, res| {
        res.status(418).send("local");
        Ok(())
    }));

    let mut app = App::new();
    app.nest("/api", api).unwrap();
    app.add(handled_403());

    let resp = app.fetch(get("/api/fail")).await;
    assert_status(&resp, StatusCode::IM_A_TEAPOT);
    assert_body(&resp, "local");
}

/// Test that an error handler which neither responds nor continues leaves the error in flight
#[tokio::test]
async fn test_silent_error_handler_still_yields_500() {
    let mut app = App::new();
    app.get("/boom", fail("boom")).unwrap();
    app.add(Handler::error_sync(|_, _, _| Ok(())));

    let resp = app.fetch(get("/boom")).await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert_body(&resp, "Error: boom");
}

/// Test that the error skips routes after a silent error handler and reaches the next one
#[tokio::test]
async fn test_silent_error_handler_passes_error_along() {
    let mut app = App::new();
    app.get("/boom", fail("boom")).unwrap();
    app.add(Handler::error_sync(|_, _, res| {
        res.set_header("X-Logged", "yes");
        Ok(())
    }));
    app.get("/boom", send("unreachable")).unwrap();
    app.add(handled_403());

    let resp = app.fetch(get("/boom")).await;
    assert_status(&resp, StatusCode::FORBIDDEN);
    assert_header(&resp, "x-logged", "yes");
    assert_body(&resp, "handled: Error: boom");
}

fn explode() -> unflare::Result<()> {
    panic!("kaboom")
}

/// Test that a panicking handler becomes an error rather than tearing down the host
#[tokio::test]
async fn test_panic_is_caught() {
    let mut app = App::new();
    app.get("/panic", Handler::route_sync(|_, _| explode())).unwrap();

    let resp = app.fetch(get("/panic")).await;
    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(&resp).contains("kaboom"), "{}", body_text(&resp));
}

/// Test that an error raised after the response was sent does not override it
#[tokio::test]
async fn test_error_after_send_is_dropped() {
    let mut app = App::new();
    app.get(
        "/late",
        Handler::route_sync(|_, res| {
            res.send("sent");
            Err(Error::Custom("too late".to_string()))
        }),
    )
    .unwrap();

    let resp = app.fetch(get("/late")).await;
    assert_status(&resp, StatusCode::OK);
    assert_body(&resp, "sent");
}

/// Test that registering a verb with no handlers fails
#[test]
fn test_registration_without_handlers_fails() {
    let mut app = App::new();
    let err = app.get("/", Vec::<Handler>::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidArguments(_)));
}
