//! Ordered request router.
//!
//! A router is an ordered list of routes checked as a unit: first match wins,
//! in registration order. There is no priority system beyond that, so
//! register specific routes before catch-all ones.

use crate::error::Error;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::route::Route;

/// An ordered collection of routes.
///
/// Built once at startup, read-only while serving. Each registration returns
/// `Result<Self, _>` so an invalid pattern fails before serving starts:
///
/// ```rust
/// use ace::{Error, Method, Request, Response, Router};
///
/// async fn get_user(req: Request, _res: Response) -> Result<Response, Error> {
///     let id = req.param("id").unwrap_or("unknown");
///     Ok(Response::json(format!(r#"{{"id":"{id}"}}"#)))
/// }
///
/// # fn main() -> Result<(), Error> {
/// let router = Router::new()
///     .on(Method::Get, "/users/:id", get_user)?
///     .on(Method::Delete, "/users/:id", get_user)?;
/// # Ok(()) }
/// ```
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler for a method + pattern pair.
    ///
    /// Patterns use `:name` placeholders — `req.param("name")` retrieves the
    /// captured value inside the handler.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Result<Self, Error> {
        self.on_with(method, pattern, Vec::new(), handler)
    }

    /// Registers a handler with route-scoped middleware.
    ///
    /// The middleware runs only when this route matches, after the global
    /// chain, with the same stop/continue semantics.
    pub fn on_with(
        mut self,
        method: Method,
        pattern: &str,
        middlewares: Vec<Box<dyn Middleware>>,
        handler: impl Handler,
    ) -> Result<Self, Error> {
        self.routes.push(Route::new(method, pattern, middlewares, handler)?);
        Ok(self)
    }

    /// First route, in registration order, whose method and pattern both
    /// match. Populates the request's parameter storage on a hit.
    ///
    /// A request without a path never matches.
    pub(crate) fn matched(&self, request: &mut Request) -> Option<&Route> {
        let path = request.path()?.to_owned();
        let route = self
            .routes
            .iter()
            .find(|route| route.method() == request.method() && route.matches(&path))?;
        let params = route.extract_params(request);
        request.set_params(params);
        Some(route)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use http::StatusCode;

    async fn ok(_req: Request, res: Response) -> Result<Response, Error> {
        Ok(res)
    }

    #[test]
    fn registration_order_determines_precedence() {
        let router = Router::new()
            .on(Method::Get, "/users/:id", ok)
            .unwrap()
            .on(Method::Get, "/users/me", ok)
            .unwrap();

        // `/users/me` satisfies both patterns; the first registered wins.
        let mut request = Request::new(Method::Get, "/users/me", true);
        let route = router.matched(&mut request).unwrap();
        assert_eq!(route.pattern(), "/users/:id");
        assert_eq!(request.param("id"), Some("me"));
    }

    #[test]
    fn method_must_match() {
        let router = Router::new().on(Method::Get, "/ping", ok).unwrap();
        let mut request = Request::new(Method::Post, "/ping", true);
        assert!(router.matched(&mut request).is_none());
    }

    #[test]
    fn extension_methods_match_by_normalized_string() {
        let router = Router::new()
            .on(Method::Other("purge".to_owned()), "/cache", ok)
            .unwrap();
        let mut request = Request::new(Method::from("PURGE"), "/cache", true);
        assert!(router.matched(&mut request).is_some());
    }

    #[test]
    fn pathless_request_never_matches() {
        let router = Router::new().on(Method::Get, "/ping", ok).unwrap();
        let mut request = Request::without_path(Method::Get, true);
        assert!(router.matched(&mut request).is_none());
    }

    #[test]
    fn invalid_pattern_fails_registration() {
        let result = Router::new().on(Method::Get, "/broken/:", ok);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[tokio::test]
    async fn matched_route_responds() {
        async fn pong(_req: Request, mut res: Response) -> Result<Response, Error> {
            res.set_status(StatusCode::OK);
            res.set_body("pong");
            Ok(res)
        }
        let router = Router::new().on(Method::Get, "/ping", pong).unwrap();
        let mut request = Request::new(Method::Get, "/ping", true);
        let route = router.matched(&mut request).unwrap();
        let response = route.respond(request, Response::new()).await.unwrap();
        assert_eq!(response.body().as_bytes(), b"pong");
    }
}
