//! Unified error type.
//!
//! Two of the variants are structural: [`Error::InvalidPattern`] is a setup
//! bug and surfaces from route registration, before serving starts;
//! [`Error::RouteNotFound`] is raised per-request when no router matches.
//! Everything else a middleware or handler can fail with travels as
//! [`Error::Handler`] and is mapped to a response at the dispatcher's single
//! recovery point.

/// A type-erased error, for handler and middleware failures of any shape.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type returned by ace's fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The route pattern handed to [`Router::on`](crate::Router::on) is not a
    /// valid path template. Never swallowed: registration returns it so the
    /// process fails before serving starts.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No router/route matched the request path and method.
    #[error("no route matched `{0}`")]
    RouteNotFound(String),

    /// A middleware or handler failed.
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),
}

impl Error {
    /// Wraps any error (or message) as a handler failure.
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Handler(error.into())
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern { pattern: pattern.to_owned(), reason: reason.into() }
    }
}

impl From<BoxError> for Error {
    fn from(error: BoxError) -> Self {
        Self::Handler(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Handler(Box::new(error))
    }
}
