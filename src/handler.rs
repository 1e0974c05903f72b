//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! A router holds handlers of *different* concrete types in one `Vec`, so we
//! use trait objects (`dyn ErasedHandler`) to hide the concrete type behind a
//! common interface and store everything uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(req: Request, res: Response) -> Result<Response, Error>
//!        ↓ router.on(Method::Get, "/", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req, res)  at request time          ← one vtable dispatch
//! ```
//!
//! The handler receives the request as routed (parameters attached) and the
//! in-flight response the middleware chain produced. Returning that response
//! keeps everything middleware set on it; building a fresh one discards it
//! deliberately.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to the handler's outcome.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, request: Request, response: Response) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request, res: Response) -> Result<impl IntoResponse, impl Into<Error>>
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R, E> private::Sealed for F
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<Error> + Send + 'static,
{
}

impl<F, Fut, R, E> Handler for F
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R, E> ErasedHandler for FnHandler<F>
where
    F: Fn(Request, Response) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    fn call(&self, request: Request, response: Response) -> BoxFuture {
        let fut = (self.0)(request, response);
        Box::pin(async move {
            fut.await
                .map(IntoResponse::into_response)
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[tokio::test]
    async fn erased_handler_maps_into_response_and_error() {
        async fn greet(_req: Request, _res: Response) -> Result<&'static str, Error> {
            Ok("hi")
        }

        let handler = greet.into_boxed_handler();
        let response = handler
            .call(Request::new(Method::Get, "/", true), Response::new())
            .await
            .unwrap();
        assert_eq!(response.body().as_bytes(), b"hi");
        assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn handler_errors_propagate() {
        async fn fail(_req: Request, _res: Response) -> Result<Response, Error> {
            Err(Error::other("boom"))
        }

        let handler = fail.into_boxed_handler();
        let result = handler
            .call(Request::new(Method::Get, "/", true), Response::new())
            .await;
        assert!(matches!(result, Err(Error::Handler(_))));
    }
}
