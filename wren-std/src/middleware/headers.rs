//! Response header middleware.

use wren_core::{
    BoxError, Middleware, Next, Request, Response,
    http::{HeaderName, HeaderValue},
};

/// How [`SetHeaderMiddleware`] treats an existing header of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Replace any existing values.
    Override,
    /// Leave the response alone if the header is already present.
    IfMissing,
    /// Add the value next to any existing ones.
    Append,
}

/// A middleware that sets a header on every successful response.
///
/// Failures pass through untouched.
#[derive(Debug, Clone)]
pub struct SetHeaderMiddleware {
    name: HeaderName,
    value: HeaderValue,
    mode: HeaderMode,
}

impl SetHeaderMiddleware {
    /// Set `name` to `value`, replacing existing values.
    pub fn overriding(name: HeaderName, value: HeaderValue) -> Self {
        Self::new(name, value, HeaderMode::Override)
    }

    /// Set `name` to `value` only when the response does not carry it.
    pub fn if_missing(name: HeaderName, value: HeaderValue) -> Self {
        Self::new(name, value, HeaderMode::IfMissing)
    }

    /// Append `value` to `name`.
    pub fn appending(name: HeaderName, value: HeaderValue) -> Self {
        Self::new(name, value, HeaderMode::Append)
    }

    /// Set `name` to `value` with an explicit mode.
    pub fn new(name: HeaderName, value: HeaderValue, mode: HeaderMode) -> Self {
        Self { name, value, mode }
    }
}

impl Middleware for SetHeaderMiddleware {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        let mut response = next.run(request).await?;
        let headers = response.headers_mut();
        match self.mode {
            HeaderMode::Override => {
                headers.insert(self.name.clone(), self.value.clone());
            }
            HeaderMode::IfMissing => {
                if !headers.contains_key(&self.name) {
                    headers.insert(self.name.clone(), self.value.clone());
                }
            }
            HeaderMode::Append => {
                headers.append(self.name.clone(), self.value.clone());
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chain::MiddlewareGroup, responders::async_callback, testing::test_request};
    use wren_core::{
        Responder, shared,
        http::{Method, StatusCode},
    };

    const MIDDLEWARE: HeaderName = HeaderName::from_static("middleware");

    fn tagged(value: &'static str) -> impl Responder {
        async_callback(move |_request: Request| async move {
            Ok::<_, BoxError>(
                Response::new(StatusCode::OK)
                    .with_header(MIDDLEWARE, HeaderValue::from_static(value)),
            )
        })
    }

    async fn run(middleware: SetHeaderMiddleware) -> Vec<String> {
        let mut group = MiddlewareGroup::new();
        group.add(middleware);
        let response = group
            .construct_responder(shared(tagged("handler")))
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap();
        response
            .headers()
            .get_all(MIDDLEWARE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_modes() {
        let value = HeaderValue::from_static("TestMiddleware");
        assert_eq!(
            run(SetHeaderMiddleware::overriding(MIDDLEWARE, value.clone())).await,
            ["TestMiddleware"]
        );
        assert_eq!(
            run(SetHeaderMiddleware::if_missing(MIDDLEWARE, value.clone())).await,
            ["handler"]
        );
        assert_eq!(
            run(SetHeaderMiddleware::appending(MIDDLEWARE, value)).await,
            ["handler", "TestMiddleware"]
        );
    }
}
