//! Static file leaf middleware.
//!
//! The only middleware in the crate that performs I/O. It short-circuits
//! requests whose path looks like a file with a known MIME type and lets
//! everything else fall through to routing, so it can sit in front of an API
//! router without any route knowledge.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use http::StatusCode;
use tracing::debug;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

use super::{Flow, Middleware};

/// Serves files from a filesystem root.
///
/// For a request path whose extension maps to a known MIME type, reads
/// `<root>/<path>` and stops the chain with the file bytes and that content
/// type. Paths without a recognized extension continue to routing. A missing
/// file is an error, surfaced to the dispatcher's error handler.
///
/// ```rust,no_run
/// use ace::{App, middleware::ServeStatic};
///
/// let app = App::builder()
///     .middleware(ServeStatic::new("/var/www/public"))
///     .build();
/// ```
pub struct ServeStatic {
    root: PathBuf,
}

impl ServeStatic {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Middleware for ServeStatic {
    async fn respond(&self, request: Request, response: Response) -> Result<Flow, Error> {
        let path = request.path().unwrap_or("/");

        let Some(mime) = Path::new(path)
            .extension()
            .and_then(|ext| mime_guess::from_ext(&ext.to_string_lossy()).first_raw())
        else {
            return Ok(Flow::Continue(request, response));
        };

        // The request path must stay under the root.
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Error::other(format!("refusing traversal outside root: `{path}`")));
        }

        let file = self.root.join(relative);
        let contents = tokio::fs::read(&file)
            .await
            .map_err(|e| Error::other(format!("static resource `{path}`: {e}")))?;

        debug!(path, mime, bytes = contents.len(), "serving static file");
        let mut response = Response::status(StatusCode::OK);
        response.set_content_type(mime);
        response.set_body(contents);
        Ok(Flow::Stop(response))
    }
}
