//! Routing tests: patterns, verbs, nesting.

use crate::helpers::*;
use http::StatusCode;
use unflare::{App, AppConfig, Handler, Pattern, Router};

fn echo_param(name: &'static str) -> Handler {
    Handler::route_sync(move |req, res| {
        res.send(req.param(name).unwrap_or("?").to_string());
        Ok(())
    })
}

/// Test that overlapping prefixes dispatch to the right route
#[tokio::test]
async fn test_overlapping_routes() {
    let mut app = App::new();
    app.get("/", send("h1")).unwrap();
    app.get("/user/:id", echo_param("id")).unwrap();
    app.get("/users", send("h3")).unwrap();

    assert_body(&app.fetch(get("/user/keeser")).await, "keeser");
    assert_body(&app.fetch(get("/users")).await, "h3");
    assert_body(&app.fetch(get("/")).await, "h1");
}

/// Test multi-param extraction
#[tokio::test]
async fn test_multiple_params() {
    let mut app = App::new();
    app.get(
        "/api/users/:id/email/:email",
        Handler::route_sync(|req, res| {
            res.send(format!(
                "{} {}",
                req.param("id").unwrap_or("?"),
                req.param("email").unwrap_or("?")
            ));
            Ok(())
        }),
    )
    .unwrap();

    let resp = app.fetch(get("/api/users/42/email/a@b.com")).await;
    assert_body(&resp, "42 a@b.com");
}

/// Test that a wildcard matches every path
#[tokio::test]
async fn test_wildcard_matches_everything() {
    let mut app = App::new();
    app.get("*", send("caught")).unwrap();

    for path in ["/", "/a/b/c", "http://example.com"] {
        let resp = app.fetch(get(path)).await;
        assert_status(&resp, StatusCode::OK);
        assert_body(&resp, "caught");
    }
}

/// Test that verbs are matched
#[tokio::test]
async fn test_verb_mismatch_falls_through() {
    let mut app = App::new();
    app.post("/items", send("created")).unwrap();
    app.all("/items", send("any")).unwrap();

    assert_body(&app.fetch(request("POST", "/items")).await, "created");
    assert_body(&app.fetch(get("/items")).await, "any");
    assert_body(&app.fetch(request("DELETE", "/items")).await, "any");
}

/// Test one route carrying several verbs
#[tokio::test]
async fn test_route_with_several_verbs() {
    let mut app = App::new();
    app.route("/item")
        .unwrap()
        .get(send("read"))
        .unwrap()
        .put(send("write"))
        .unwrap();

    assert_body(&app.fetch(get("/item")).await, "read");
    assert_body(&app.fetch(request("PUT", "/item")).await, "write");
    assert_status(&app.fetch(request("PATCH", "/item")).await, StatusCode::NOT_FOUND);
}

/// Test loose and strict trailing slashes and case
#[tokio::test]
async fn test_strict_and_loose_matching() {
    let mut loose = App::new();
    loose.get("/Users", send("users")).unwrap();
    assert_body(&loose.fetch(get("/users/")).await, "users");
    assert_body(&loose.fetch(get("/USERS")).await, "users");

    let mut strict = App::with_config(AppConfig {
        strict_routing: true,
        ..AppConfig::default()
    });
    strict.get("/users", send("users")).unwrap();
    assert_body(&strict.fetch(get("/users")).await, "users");
    assert_status(&strict.fetch(get("/users/")).await, StatusCode::NOT_FOUND);
}

/// Test raw regex patterns with named groups
#[tokio::test]
async fn test_raw_pattern() {
    let mut app = App::new();
    app.get(Pattern::raw(r"^/v(?P<version>\d+)/status$"), echo_param("version"))
        .unwrap();

    assert_body(&app.fetch(get("/v2/status")).await, "2");
    assert_status(&app.fetch(get("/vx/status")).await, StatusCode::NOT_FOUND);
}

/// Test nested routers under a parameterized prefix
#[tokio::test]
async fn test_nested_router() {
    let mut users = Router::new();
    users.add(tag("X-Scope", "users"));
    users.get("/", send("list")).unwrap();
    users.get("/:id", echo_param("id")).unwrap();

    let mut orgs = Router::new();
    orgs.nest("/users", users).unwrap();

    let mut app = App::new();
    app.nest("/orgs/:org", orgs).unwrap();
    app.get("/orgs/:org/about", echo_param("org")).unwrap();

    let resp = app.fetch(get("/orgs/acme/users/42")).await;
    assert_body(&resp, "42");
    assert_header(&resp, "x-scope", "users");

    assert_body(&app.fetch(get("/orgs/acme/users")).await, "list");
    assert_body(&app.fetch(get("/orgs/acme/about")).await, "acme");
}

/// Test that nested params are visible to the child
#[tokio::test]
async fn test_prefix_params_reach_child() {
    let mut child = Router::new();
    child.get("/profile", echo_param("org")).unwrap();

    let mut app = App::new();
    app.nest("/orgs/:org", child).unwrap();

    assert_body(&app.fetch(get("/orgs/initech/profile")).await, "initech");
}

/// Test that a router mounted without prefix shares the parent's paths
#[tokio::test]
async fn test_mounted_router() {
    let mut health = Router::new();
    health.get("/health", send("ok")).unwrap();

    let mut app = App::new();
    app.mount(health);
    app.get("/", send("root")).unwrap();

    assert_body(&app.fetch(get("/health")).await, "ok");
    assert_body(&app.fetch(get("/")).await, "root");
}

/// Test that a route re-registered with an equivalent path extends the same route
#[tokio::test]
async fn test_route_dedup_across_registrations() {
    let mut app = App::new();
    app.get("/dup/", send("first")).unwrap();
    app.post("dup", send("second")).unwrap();
    assert_eq!(app.len(), 1);

    assert_body(&app.fetch(get("/dup")).await, "first");
    assert_body(&app.fetch(request("POST", "/dup")).await, "second");
}

/// Test that an extension method gets 400
#[tokio::test]
async fn test_unknown_method_is_bad_request() {
    let mut app = App::new();
    app.all("*", send("any")).unwrap();

    assert_status(&app.fetch(request("PURGE", "/")).await, StatusCode::BAD_REQUEST);
}

/// Test that strict routing takes a nest prefix as written
#[tokio::test]
async fn test_strict_nest_prefix() {
    fn users() -> Router {
        let mut users = Router::new();
        users.get("/users", send("users")).unwrap();
        users.get("/", send("index")).unwrap();
        users
    }

    let mut loose = App::new();
    loose.nest("/api/", users()).unwrap();
    assert_body(&loose.fetch(get("/api/users")).await, "users");
    assert_body(&loose.fetch(get("/api")).await, "index");

    let mut strict = App::with_config(AppConfig {
        strict_routing: true,
        ..AppConfig::default()
    });
    strict.nest("/api/", users()).unwrap();
    assert_body(&strict.fetch(get("/API/users")).await, "users");
    assert_status(&strict.fetch(get("/api")).await, StatusCode::NOT_FOUND);
}
