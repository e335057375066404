mod common;

use common::{MIDDLEWARE_HEADER, TestMiddleware, get};
use std::fmt;
use wren::{
    Application, BoxError, Middleware, Next, Request, Response, RouteRegistrar, async_callback,
    callback,
    http::{Method, StatusCode},
    middleware::from_fn,
    testing::{CompletionCounter, FailingResponder, OrderLog, RecordingMiddleware, StaticResponder},
};

#[derive(Debug, PartialEq)]
struct Teapot;

impl fmt::Display for Teapot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("short and stout")
    }
}

impl std::error::Error for Teapot {}

struct Unauthorized;

impl Middleware for Unauthorized {
    async fn apply(&self, _request: Request, _next: Next) -> Result<Response, BoxError> {
        Ok(Response::new(StatusCode::UNAUTHORIZED))
    }
}

#[tokio::test]
async fn test_root_then_group_then_handler() {
    let log = OrderLog::new();
    let mut app = Application::new();
    app.middlewares
        .add(RecordingMiddleware::new("A", log.clone()))
        .add(RecordingMiddleware::new("B", log.clone()));
    app.router
        .group()
        .add(RecordingMiddleware::new("G", log.clone()))
        .get(
            "/grouped",
            StaticResponder::new(StatusCode::OK).recording("H", log.clone()),
        );
    let dispatcher = app.build().unwrap();

    get(&dispatcher, Method::GET, "/grouped").await.unwrap();
    assert_eq!(
        log.entries(),
        ["A:in", "B:in", "G:in", "H", "G:out", "B:out", "A:out"]
    );
}

#[tokio::test]
async fn test_short_circuit_never_reaches_handler() {
    let log = OrderLog::new();
    let mut app = Application::new();
    app.middlewares
        .add(RecordingMiddleware::new("A", log.clone()))
        .add(Unauthorized);
    app.router.get(
        "/secret",
        StaticResponder::new(StatusCode::OK).recording("H", log.clone()),
    );
    let dispatcher = app.build().unwrap();

    let outcome = get(&dispatcher, Method::GET, "/secret").await.unwrap();
    assert_eq!(outcome.status, StatusCode::UNAUTHORIZED);
    assert_eq!(log.entries(), ["A:in", "A:out"]);
}

#[tokio::test]
async fn test_failure_skips_post_processing() {
    let mut app = Application::new();
    app.middlewares.add(TestMiddleware);
    app.router.get("/broken", FailingResponder::new("broken"));
    let dispatcher = app.build().unwrap();

    let err = get(&dispatcher, Method::GET, "/broken").await.err().unwrap();
    assert_eq!(err.to_string(), "broken");
}

#[tokio::test]
async fn test_async_error_identity_through_chain() {
    let log = OrderLog::new();
    let mut app = Application::new();
    app.middlewares
        .add(RecordingMiddleware::new("A", log.clone()));
    app.router.get(
        "/teapot",
        async_callback(|_request: Request| async {
            tokio::task::yield_now().await;
            Err::<(), _>(Teapot)
        }),
    );
    let dispatcher = app.build().unwrap();

    let err = get(&dispatcher, Method::GET, "/teapot").await.err().unwrap();
    assert_eq!(err.downcast_ref::<Teapot>(), Some(&Teapot));
    assert_eq!(log.entries(), ["A:in", "A:err"]);
}

#[tokio::test]
async fn test_each_request_completes_exactly_once() {
    let counter = CompletionCounter::new();
    let mut app = Application::new();
    app.middlewares.add(counter.clone()).add(TestMiddleware);
    app.router
        .get("/ok", StaticResponder::new(StatusCode::OK))
        .get("/fail", FailingResponder::new("nope"));
    let dispatcher = app.build().unwrap();

    for _ in 0..3 {
        get(&dispatcher, Method::GET, "/ok").await.unwrap();
    }
    for _ in 0..2 {
        assert!(get(&dispatcher, Method::GET, "/fail").await.is_err());
    }
    assert_eq!(counter.successes(), 3);
    assert_eq!(counter.failures(), 2);
    assert_eq!(counter.total(), 5);
}

#[tokio::test]
async fn test_nested_groups() {
    let log = OrderLog::new();
    let mut app = Application::new();
    app.middlewares
        .add(RecordingMiddleware::new("root", log.clone()));
    let mut api = app
        .router
        .group()
        .add(RecordingMiddleware::new("api", log.clone()));
    api.get("/api/ping", StaticResponder::new(StatusCode::OK));
    api.group()
        .add(RecordingMiddleware::new("admin", log.clone()))
        .add(TestMiddleware)
        .delete("/api/users/{id}", StaticResponder::new(StatusCode::NO_CONTENT));
    let dispatcher = app.build().unwrap();

    let ping = get(&dispatcher, Method::GET, "/api/ping").await.unwrap();
    assert!(!ping.headers.contains_key(MIDDLEWARE_HEADER));
    assert_eq!(log.entries(), ["root:in", "api:in", "api:out", "root:out"]);

    log.clear();
    let deleted = get(&dispatcher, Method::DELETE, "/api/users/7").await.unwrap();
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.headers[MIDDLEWARE_HEADER], "TestMiddleware");
    assert_eq!(
        log.entries(),
        [
            "root:in",
            "api:in",
            "admin:in",
            "admin:out",
            "api:out",
            "root:out"
        ]
    );
}

#[tokio::test]
async fn test_closure_middleware_sees_route_parameters() {
    let mut app = Application::new();
    app.router
        .group()
        .add(from_fn(|request: Request, next: Next| async move {
            let response = next.run(request).await?;
            Ok::<_, BoxError>(response.with_status(StatusCode::CREATED))
        }))
        .put(
            "/items/{id}",
            callback(|request: Request| {
                let id = request.parameters().get("id").unwrap_or_default().to_owned();
                request
                    .event_loop()
                    .make_succeeded_future(Response::ok().with_body(id))
            }),
        );
    let dispatcher = app.build().unwrap();

    let outcome = get(&dispatcher, Method::PUT, "/items/abc").await.unwrap();
    assert_eq!(outcome.status, StatusCode::CREATED);
    assert_eq!(outcome.body, "abc");
}
