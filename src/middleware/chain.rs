//! Ordered middleware execution.

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

use super::{Flow, Middleware};

/// An ordered collection of middleware executed as a unit.
///
/// Registration order is wrap order: the last-registered middleware executes
/// first. The chain threads the `(request, response)` pair through each step
/// until one stops or all have run.
pub(crate) struct Chain {
    stack: Vec<Box<dyn Middleware>>,
}

impl Chain {
    pub(crate) fn new(stack: Vec<Box<dyn Middleware>>) -> Self {
        Self { stack }
    }

    pub(crate) async fn run(&self, request: Request, response: Response) -> Result<Flow, Error> {
        let (mut request, mut response) = (request, response);
        for middleware in self.stack.iter().rev() {
            match middleware.respond(request, response).await? {
                Flow::Stop(stop) => return Ok(Flow::Stop(stop)),
                Flow::Continue(next_request, next_response) => {
                    request = next_request;
                    response = next_response;
                }
            }
        }
        Ok(Flow::Continue(request, response))
    }
}
