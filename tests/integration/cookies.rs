//! Cookie tests: parsing request cookies and accumulating Set-Cookie.

use crate::helpers::*;
use bytes::Bytes;
use unflare::{App, CookieOptions, Handler, SameSite};

/// Test request cookie parsing
#[tokio::test]
async fn test_request_cookies() {
    let mut app = App::new();
    app.get(
        "/",
        Handler::route_sync(|req, res| {
            res.send(format!(
                "{} {}",
                req.cookie("session").unwrap_or("?"),
                req.cookie("theme").unwrap_or("?")
            ));
            Ok(())
        }),
    )
    .unwrap();

    let raw = http::Request::builder()
        .uri("/")
        .header("cookie", "session=abc%20123; theme=\"dark\"")
        .body(Bytes::new())
        .unwrap();
    assert_body(&app.fetch(raw).await, "abc 123 dark");
}

/// Test that several cookies share one comma-joined Set-Cookie header
#[tokio::test]
async fn test_cookies_accumulate_in_one_header() {
    let mut app = App::new();
    app.get(
        "/",
        Handler::route_sync(|_, res| {
            res.cookie("a", "1", None)?.cookie("b", "2", None)?;
            res.send("ok");
            Ok(())
        }),
    )
    .unwrap();

    let resp = app.fetch(get("/")).await;
    assert_eq!(resp.headers().get_all("set-cookie").iter().count(), 1);
    assert_header(&resp, "set-cookie", "a=1,b=2");
}

/// Test that options without a domain default to the request host
#[tokio::test]
async fn test_cookie_options_default_domain() {
    let mut app = App::new();
    app.get(
        "/login",
        Handler::route_sync(|_, res| {
            res.cookie(
                "session",
                "tok en",
                Some(
                    CookieOptions::new()
                        .path("/")
                        .http_only()
                        .same_site(SameSite::Strict),
                ),
            )?;
            res.send("ok");
            Ok(())
        }),
    )
    .unwrap();

    let resp = app.fetch(get("https://shop.example.com/login")).await;
    assert_header(
        &resp,
        "set-cookie",
        "session=tok%20en; Domain=shop.example.com; Path=/; HttpOnly; SameSite=Strict",
    );
}

/// Test clearing a cookie
#[tokio::test]
async fn test_clear_cookie() {
    let mut app = App::new();
    app.get(
        "/logout",
        Handler::route_sync(|_, res| {
            res.clear_cookie("session", Some(CookieOptions::new().domain("example.com")))?;
            res.send("bye");
            Ok(())
        }),
    )
    .unwrap();

    let resp = app.fetch(get("/logout")).await;
    assert_header(
        &resp,
        "set-cookie",
        "session=; Domain=example.com; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
    );
}

/// Test that an invalid cookie name surfaces as a 500
#[tokio::test]
async fn test_invalid_cookie_name_is_an_error() {
    let mut app = App::new();
    app.get(
        "/",
        Handler::route_sync(|_, res| {
            res.cookie("bad name", "x", None)?;
            res.send("unreachable");
            Ok(())
        }),
    )
    .unwrap();

    let resp = app.fetch(get("/")).await;
    assert_status(&resp, http::StatusCode::INTERNAL_SERVER_ERROR);
}
