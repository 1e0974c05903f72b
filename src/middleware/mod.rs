//! Middleware layer.
//!
//! Middleware intercepts the in-flight request/response pair and is the right
//! place for cross-cutting concerns: header injection, authentication
//! rejection, static-file short-circuits. Each step produces exactly one of
//! two outcomes, modeled by [`Flow`]:
//!
//! - [`Flow::Stop`] — the chain ends here; the carried response is final and
//!   no later middleware or route handler runs.
//! - [`Flow::Continue`] — the (possibly rewritten) pair becomes the state the
//!   next middleware, and eventually routing, observes.
//!
//! Chains execute **last-registered first**: registering A then B wraps A
//! around B, so B's logic observes the request before A's does.
//!
//! Implement [`Middleware`] on a struct, or wrap a closure with [`from_fn`]:
//!
//! ```rust
//! use ace::{Error, Flow, Request, Response};
//!
//! let tag = ace::middleware::from_fn(|req: Request, mut res: Response| async move {
//!     res.set_header("X-Request-Tag", "1");
//!     Ok::<_, Error>(Flow::Continue(req, res))
//! });
//! ```

mod chain;
mod serve_static;

pub(crate) use chain::Chain;
pub use serve_static::ServeStatic;

use std::future::Future;

use async_trait::async_trait;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Outcome of one middleware step.
#[derive(Debug)]
pub enum Flow {
    /// Short-circuit: this response is final.
    Stop(Response),
    /// Pass control onward with the updated request/response pair.
    Continue(Request, Response),
}

/// A request/response interceptor.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn respond(&self, request: Request, response: Response) -> Result<Flow, Error>;
}

/// Adapts a closure into a [`Middleware`].
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Flow, Error>> + Send + 'static,
{
    FromFn(f)
}

/// Closure-based middleware. Built by [`from_fn`].
pub struct FromFn<F>(F);

#[async_trait]
impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Flow, Error>> + Send + 'static,
{
    async fn respond(&self, request: Request, response: Response) -> Result<Flow, Error> {
        (self.0)(request, response).await
    }
}
