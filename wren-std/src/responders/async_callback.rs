//! Suspend-style closure responder.

use futures::{
    FutureExt,
    future::{self, Either},
};
use std::{
    future::Future,
    panic::{self, AssertUnwindSafe},
    pin::pin,
};
use wren_core::{BoxError, IntoResponse, Request, Responder, ResponderError, Response};

/// Responder that runs a straight-line async routine on the request's event loop.
///
/// For every request the adapter:
///
/// 1. allocates a single-use [`Promise`] on the request's event loop;
/// 2. runs the routine to completion as a task on that loop, capturing its
///    return value, its error, or a panic;
/// 3. resolves the promise exactly once and hands back its future.
///
/// An `Err` returned by the routine reaches the caller as the same error
/// value. A panic becomes [`ResponderError::Panic`]. If the caller stops
/// waiting (for example after a timeout), the routine is dropped at its next
/// suspension point.
///
/// # Example
///
/// ```rust,ignore
/// let echo = AsyncCallbackResponder::new(|request: Request| async move {
///     let event_loop = request.event_loop().clone();
///     let body = request.into_body().collect(&event_loop).await?;
///     Ok::<_, BoxError>(body)
/// });
/// ```
///
/// [`Promise`]: wren_core::Promise
#[derive(Clone)]
pub struct AsyncCallbackResponder<F> {
    callback: F,
}

impl<F> AsyncCallbackResponder<F> {
    /// Wrap an async routine.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F, Fut, R, E> Responder for AsyncCallbackResponder<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn respond(&self, request: Request) -> impl Future<Output = Result<Response, BoxError>> + Send {
        let event_loop = request.event_loop().clone();
        let (promise, response) = event_loop.make_promise::<Response>();

        match panic::catch_unwind(AssertUnwindSafe(|| (self.callback)(request))) {
            Ok(routine) => event_loop.execute(async move {
                let mut promise = promise;
                if promise.is_canceled() {
                    return;
                }
                let routine = pin!(AssertUnwindSafe(routine).catch_unwind());
                let result = {
                    let canceled = pin!(promise.cancellation());
                    match future::select(routine, canceled).await {
                        Either::Left((result, _)) => result,
                        Either::Right(_) => {
                            #[cfg(feature = "tracing")]
                            tracing::debug!("caller went away, routine dropped");
                            return;
                        }
                    }
                };
                let outcome = match result {
                    Ok(Ok(output)) => Ok(output.into_response()),
                    Ok(Err(error)) => Err(error.into()),
                    Err(payload) => Err(captured_panic(payload)),
                };
                promise.complete(outcome);
            }),
            Err(payload) => promise.fail(captured_panic(payload)),
        }

        response
    }
}

fn captured_panic(payload: Box<dyn std::any::Any + Send>) -> BoxError {
    let error = ResponderError::from_panic(payload);
    #[cfg(feature = "tracing")]
    tracing::error!(%error, "responder panicked");
    Box::new(error)
}

/// Shorthand for [`AsyncCallbackResponder::new`].
pub fn async_callback<F, Fut, R, E>(callback: F) -> AsyncCallbackResponder<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    AsyncCallbackResponder::new(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_loop::EventLoopGroup, testing::test_request};
    use std::{
        fmt,
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };
    use wren_core::http::{Method, StatusCode, Uri};

    #[derive(Debug, PartialEq)]
    struct Teapot(u32);

    impl fmt::Display for Teapot {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "teapot #{}", self.0)
        }
    }

    impl std::error::Error for Teapot {}

    #[tokio::test]
    async fn test_routine_value_becomes_response() {
        let responder = async_callback(|_request: Request| async {
            tokio::task::yield_now().await;
            Ok::<_, BoxError>(StatusCode::ACCEPTED)
        });
        let response = responder
            .respond(test_request(Method::GET, "/accepted"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_routine_error_value_is_preserved() {
        let responder = async_callback(|_request: Request| async {
            tokio::task::yield_now().await;
            Err::<(), _>(Teapot(418))
        });
        let err = responder
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<Teapot>(), Some(&Teapot(418)));
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let responder = async_callback(|_request: Request| async {
            if true {
                panic!("routine exploded");
            }
            Ok::<_, BoxError>(())
        });
        let err = responder
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap_err();
        match err.downcast_ref::<ResponderError>() {
            Some(ResponderError::Panic(message)) => assert_eq!(message, "routine exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_eager_panic_is_captured() {
        let responder = async_callback(|_request: Request| -> std::future::Ready<Result<(), BoxError>> {
            panic!("before the routine started")
        });
        let err = responder
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("before the routine started"));
    }

    #[tokio::test]
    async fn test_completes_once_per_request() {
        let completions = Arc::new(AtomicUsize::new(0));
        let counter = completions.clone();
        let responder = async_callback(move |_request: Request| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(())
            }
        });
        for _ in 0..3 {
            responder
                .respond(test_request(Method::GET, "/"))
                .await
                .unwrap();
        }
        assert_eq!(completions.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_routine_runs_on_request_event_loop() {
        let group = EventLoopGroup::new(2).unwrap();
        let responder = async_callback(|_request: Request| async {
            let name = thread::current().name().unwrap_or_default().to_owned();
            Ok::<_, BoxError>(name)
        });
        let request = Request::new(
            Method::GET,
            Uri::from_static("/"),
            group.get(1).unwrap().clone(),
        );
        let event_loop = request.event_loop().clone();
        let body = responder
            .respond(request)
            .await
            .unwrap()
            .into_body()
            .collect(&event_loop)
            .await
            .unwrap();
        assert_eq!(body, "wren-event-loop-1");
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_routine_dropped_when_caller_gives_up() {
        let dropped = Arc::new(AtomicBool::new(false));
        let flag = dropped.clone();
        let responder = async_callback(move |_request: Request| {
            let guard = SetOnDrop(flag.clone());
            async move {
                let _guard = guard;
                futures::future::pending::<()>().await;
                Ok::<_, BoxError>(())
            }
        });

        let waited = tokio::time::timeout(
            Duration::from_millis(20),
            responder.respond(test_request(Method::GET, "/slow")),
        )
        .await;
        assert!(waited.is_err());

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }
}
