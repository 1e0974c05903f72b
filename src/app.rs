//! Top-level dispatcher.
//!
//! [`App`] is the entry point the transport layer drives: it owns the global
//! middleware chain, the routers, and the single error-recovery point. One
//! process can hold any number of independent instances; [`App::handle`]
//! takes `&self` and every request is an owned value, so a transport may
//! invoke it concurrently for distinct requests without locking.
//!
//! # Dispatch algorithm
//!
//! 1. Run the global middleware chain against the request and a
//!    default-constructed response.
//! 2. If it stopped, finalize and serialize that response.
//! 3. Otherwise scan routers in registration order for the first match.
//! 4. On a match, run the route's own chain (seeded with the continuation
//!    response), then the handler; serialize the result.
//! 5. No match raises [`Error::RouteNotFound`].
//!
//! Every error lands at one recovery point: the registered [`ErrorHandler`]
//! maps it to a response, or — with none registered — a built-in fallback
//! answers 404 for unmatched routes and 500 for everything else. Only a
//! failing error handler (or an unwritable connection) closes without a
//! response.

use async_trait::async_trait;
use http::StatusCode;
use tracing::{debug, error};

use crate::error::{BoxError, Error};
use crate::middleware::{Chain, Flow, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// The transport layer's side of the boundary.
///
/// The dispatcher never touches the wire: it hands finalized responses to
/// `serialize` and asks for `close` when the request was not keep-alive or
/// recovery failed. The transport owns the byte stream and the connection
/// lifecycle behind these two calls.
#[async_trait]
pub trait ResponseWriter: Send {
    async fn serialize(&mut self, response: Response) -> Result<(), BoxError>;
    async fn close(&mut self);
}

// ── ErrorHandler ──────────────────────────────────────────────────────────────

/// Maps a dispatch error to a response.
///
/// Registered once per [`App`] via [`AppBuilder::catch`]. Satisfied by any
/// `Fn(Error) -> Result<Response, Error>` closure; returning `Err` gives up
/// on the request and the connection closes without a response.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(&self, error: Error) -> Result<Response, Error>;
}

impl<F> ErrorHandler for F
where
    F: Fn(Error) -> Result<Response, Error> + Send + Sync + 'static,
{
    fn handle(&self, error: Error) -> Result<Response, Error> {
        (self)(error)
    }
}

// ── App ──────────────────────────────────────────────────────────────────────

/// The dispatcher: global middleware, routers, error recovery.
///
/// ```rust
/// use ace::{App, Error, Method, Request, Response, Router, StatusCode};
///
/// async fn root(_req: Request, mut res: Response) -> Result<Response, Error> {
///     res.set_status(StatusCode::OK);
///     Ok(res)
/// }
///
/// # fn main() -> Result<(), Error> {
/// let app = App::builder()
///     .router(Router::new().on(Method::Get, "/", root)?)
///     .catch(|error: Error| match error {
///         Error::RouteNotFound(_) => Ok(Response::status(StatusCode::NOT_FOUND)),
///         _ => Ok(Response::status(StatusCode::INTERNAL_SERVER_ERROR)),
///     })
///     .build();
/// # let _ = app;
/// # Ok(()) }
/// ```
pub struct App {
    chain: Chain,
    routers: Vec<Router>,
    catch: Option<Box<dyn ErrorHandler>>,
}

impl App {
    /// Starts a builder. Registration happens on the builder; the built
    /// `App` is immutable, which is what makes concurrent `handle` calls
    /// safe without locking.
    pub fn builder() -> AppBuilder {
        AppBuilder {
            middlewares: Vec::new(),
            routers: Vec::new(),
            catch: None,
        }
    }

    /// Dispatches one request, writing the outcome through `writer`.
    ///
    /// Side-effecting rather than value-returning: the transport layer owns
    /// the output stream, so the response leaves through its callback.
    pub async fn handle<W: ResponseWriter>(&self, request: Request, writer: &mut W) {
        let keep_alive = request.keep_alive();
        let response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(error) => match self.recover(error) {
                Some(response) => response,
                None => {
                    writer.close().await;
                    return;
                }
            },
        };

        if let Err(error) = self.serialize(response, keep_alive, writer).await {
            // The write itself failed; give the error handler one shot at a
            // replacement response before giving up on the connection.
            match self.recover(Error::other(error)) {
                Some(response) => {
                    if self.serialize(response, keep_alive, writer).await.is_err() {
                        writer.close().await;
                    }
                }
                None => writer.close().await,
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response, Error> {
        let (mut request, response) = match self.chain.run(request, Response::new()).await? {
            Flow::Stop(stop) => return Ok(stop),
            Flow::Continue(request, response) => (request, response),
        };

        for router in &self.routers {
            if let Some(route) = router.matched(&mut request) {
                debug!(
                    method = %request.method(),
                    pattern = route.pattern(),
                    "route matched"
                );
                return route.respond(request, response).await;
            }
        }

        Err(Error::RouteNotFound(request.path().unwrap_or("/").to_owned()))
    }

    fn recover(&self, error: Error) -> Option<Response> {
        match &self.catch {
            Some(handler) => match handler.handle(error) {
                Ok(response) => Some(response),
                Err(error) => {
                    error!(%error, "error handler failed, closing connection");
                    None
                }
            },
            None => {
                debug!(%error, "no error handler registered, using fallback response");
                Some(fallback(&error))
            }
        }
    }

    async fn serialize<W: ResponseWriter>(
        &self,
        mut response: Response,
        keep_alive: bool,
        writer: &mut W,
    ) -> Result<(), BoxError> {
        response.finalize();
        writer.serialize(response).await?;
        if !keep_alive {
            writer.close().await;
        }
        Ok(())
    }
}

/// Safe default when no error handler is registered. Closing the connection
/// silently would be within contract, but a generic status response is better
/// service behavior.
fn fallback(error: &Error) -> Response {
    match error {
        Error::RouteNotFound(_) => Response::status(StatusCode::NOT_FOUND),
        _ => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

// ── AppBuilder ───────────────────────────────────────────────────────────────

/// Mutable setup-time counterpart of [`App`].
///
/// Collects global middleware, routers, and the error handler, then freezes
/// them with [`AppBuilder::build`]. Setup must fully precede serving; the
/// builder is not meant to be touched once requests are in flight.
pub struct AppBuilder {
    middlewares: Vec<Box<dyn Middleware>>,
    routers: Vec<Router>,
    catch: Option<Box<dyn ErrorHandler>>,
}

impl AppBuilder {
    /// Appends a global middleware. The last-registered middleware executes
    /// first.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Appends a router. Routers are consulted in registration order.
    pub fn router(mut self, router: Router) -> Self {
        self.routers.push(router);
        self
    }

    /// Sets the error handler. At most one; the last call wins.
    pub fn catch(mut self, handler: impl ErrorHandler) -> Self {
        self.catch = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> App {
        App {
            chain: Chain::new(self.middlewares),
            routers: self.routers,
            catch: self.catch,
        }
    }
}
