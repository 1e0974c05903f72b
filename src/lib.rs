//! # ace
//!
//! A minimal HTTP request-dispatch engine. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The transport layer handles sockets, TLS, wire parsing, and keep-alive
//! bookkeeping. ace does not — by design. It starts where the transport
//! stops: an already-parsed [`Request`] comes in, runs through a chain of
//! middleware and then a matched route handler, and the resulting
//! [`Response`] leaves through the transport's [`ResponseWriter`] callback.
//! Every error, from an unmatched route to a failing handler, lands at one
//! recovery point.
//!
//! What ace owns:
//!
//! - **Route matching** — `:name` path patterns, first match wins in
//!   registration order
//! - **Middleware chaining** — stop/continue semantics via [`Flow`],
//!   last-registered executes first
//! - **Error recovery** — a single [`ErrorHandler`] seam, with a safe
//!   404/500 fallback when none is registered
//!
//! ## Quick start
//!
//! ```rust
//! use ace::{App, Error, Flow, Method, Request, Response, Router, StatusCode};
//!
//! async fn get_user(req: Request, _res: Response) -> Result<Response, Error> {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Ok(Response::json(format!(r#"{{"id":"{id}"}}"#)))
//! }
//!
//! async fn create_user(_req: Request, _res: Response) -> Result<Response, Error> {
//!     Ok(Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("Location", "/users/99")
//!         .json(r#"{"id":"99"}"#))
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let router = Router::new()
//!     .on(Method::Get, "/users/:id", get_user)?
//!     .on(Method::Post, "/users", create_user)?;
//!
//! let app = App::builder()
//!     .middleware(ace::middleware::from_fn(|req: Request, mut res: Response| async move {
//!         res.set_header("X-Request-Tag", "1");
//!         Ok::<_, Error>(Flow::Continue(req, res))
//!     }))
//!     .router(router)
//!     .build();
//! # let _ = app;
//! # Ok(()) }
//! ```
//!
//! The transport then drives it with
//! `app.handle(request, &mut writer).await` once per inbound request, where
//! `writer` is its implementation of [`ResponseWriter`].

mod app;
mod error;
mod handler;
mod matcher;
mod method;
mod request;
mod response;
mod route;
mod router;

pub mod middleware;

pub use app::{App, AppBuilder, ErrorHandler, ResponseWriter};
pub use error::{BoxError, Error};
pub use handler::Handler;
pub use http::StatusCode;
pub use method::Method;
pub use middleware::{Flow, Middleware};
pub use request::{Params, Request, Storage};
pub use response::{Body, ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
