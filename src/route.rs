//! A single (method, pattern, handler) binding.

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::matcher::PathPattern;
use crate::method::Method;
use crate::middleware::{Chain, Flow, Middleware};
use crate::request::{Params, Request};
use crate::response::Response;

/// One registered route. Immutable once constructed.
pub(crate) struct Route {
    method: Method,
    pattern: String,
    matcher: PathPattern,
    chain: Chain,
    handler: BoxedHandler,
}

impl Route {
    pub(crate) fn new(
        method: Method,
        pattern: &str,
        middlewares: Vec<Box<dyn Middleware>>,
        handler: impl Handler,
    ) -> Result<Self, Error> {
        let matcher = PathPattern::compile(pattern)?;
        Ok(Self {
            method,
            pattern: pattern.to_owned(),
            matcher,
            chain: Chain::new(middlewares),
            handler: handler.into_boxed_handler(),
        })
    }

    pub(crate) fn method(&self) -> &Method {
        &self.method
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Pairs placeholder names with the captures for the request's path.
    ///
    /// A request without a path yields empty params. A placeholder name that
    /// appears twice keeps its first position and takes the last capture.
    pub(crate) fn extract_params(&self, request: &Request) -> Params {
        let mut params = Params::new();
        let Some(path) = request.path() else {
            return params;
        };
        let values = self.matcher.captures(path);
        for (name, value) in self.matcher.names().iter().zip(values) {
            params.insert(name, value);
        }
        params
    }

    /// Runs the route-scoped middleware chain, then the handler.
    ///
    /// The chain is seeded with the response the global chain carried in; if
    /// it stops, the handler never runs.
    pub(crate) async fn respond(
        &self,
        request: Request,
        response: Response,
    ) -> Result<Response, Error> {
        match self.chain.run(request, response).await? {
            Flow::Stop(stop) => Ok(stop),
            Flow::Continue(request, response) => self.handler.call(request, response).await,
        }
    }
}
