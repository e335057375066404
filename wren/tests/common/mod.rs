#![allow(dead_code)]

use wren::{
    Application, BoxError, Dispatcher, Middleware, Next, Request, Response, RouteRegistrar,
    async_callback,
    bytes::Bytes,
    callback,
    http::{HeaderName, HeaderValue, Method, StatusCode, header::HeaderMap},
    testing::test_request,
};

// ============================================================================
// Fixtures
// ============================================================================

pub const MIDDLEWARE_HEADER: HeaderName = HeaderName::from_static("middleware");

/// Deterministic pseudo-random payload.
pub fn random_buffer(size: usize) -> Bytes {
    let mut state: u32 = 0x2545_f491;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect::<Vec<_>>()
        .into()
}

/// Sets the `middleware` header on every response passing through.
pub struct TestMiddleware;

impl Middleware for TestMiddleware {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        let response = next.run(request).await?;
        Ok(response.with_header(MIDDLEWARE_HEADER, HeaderValue::from_static("TestMiddleware")))
    }
}

/// The application every dispatch test starts from.
pub fn create_app() -> Application {
    let mut app = Application::new();
    app.router
        .get(
            "/hello",
            callback(|request: Request| {
                let body = request.allocator().buffer_from_str("GET: Hello");
                request
                    .event_loop()
                    .make_succeeded_future(Response::ok().with_body(body))
            }),
        )
        .get(
            "/accepted",
            async_callback(|_request: Request| async { Ok::<_, BoxError>(StatusCode::ACCEPTED) }),
        )
        .post(
            "/hello",
            async_callback(|_request: Request| async { Ok::<_, BoxError>("POST: Hello") }),
        )
        .get(
            "/query",
            async_callback(|request: Request| async move {
                Ok::<_, BoxError>(request.query().unwrap_or_default().to_owned())
            }),
        )
        .post(
            "/echo-body",
            async_callback(|request: Request| async move {
                let event_loop = request.event_loop().clone();
                request.into_body().collect(&event_loop).await
            }),
        );
    app
}

// ============================================================================
// Driving requests
// ============================================================================

pub struct Outcome {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Dispatch `request` and drain the response body.
pub async fn send(dispatcher: &Dispatcher, request: Request) -> Result<Outcome, BoxError> {
    let event_loop = request.event_loop().clone();
    let (status, headers, body) = dispatcher.dispatch(request).await?.into_parts();
    let body = body.collect(&event_loop).await?;
    Ok(Outcome {
        status,
        headers,
        body,
    })
}

/// Dispatch a bodiless request.
pub async fn get(dispatcher: &Dispatcher, method: Method, uri: &str) -> Result<Outcome, BoxError> {
    send(dispatcher, test_request(method, uri)).await
}
