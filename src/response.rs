//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] starts life either default-constructed (the seed the
//! middleware chain threads through) or built by a handler. Middleware and
//! handlers mutate it in place; the dispatcher finalizes it (default `Server`
//! header, default content type, content-length sync) right before handing it
//! to the transport layer's writer.

use bytes::Bytes;
use http::StatusCode;

/// Value of the default `Server` header added at finalization.
pub(crate) const SERVER: &str = concat!("ace/", env!("CARGO_PKG_VERSION"));

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::bytes`].
pub enum ContentType {
    Csv,         // text/csv
    Html,        // text/html; charset=utf-8
    Json,        // application/json
    OctetStream, // application/octet-stream  (binary / file download)
    Text,        // text/plain; charset=utf-8
    Xml,         // application/xml
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv         => "text/csv",
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Body ─────────────────────────────────────────────────────────────────────

/// Response payload: nothing, or an in-memory buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Buffer(Bytes),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Buffer(buffer) => buffer,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use ace::{Response, StatusCode};
///
/// Response::json(r#"{"id":1}"#);
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use ace::{ContentType, Response, StatusCode};
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("Location", "/users/42")
///     .json(r#"{"id":42}"#);
///
/// Response::builder()
///     .status(StatusCode::OK)
///     .bytes(ContentType::Xml, "<ok/>");
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    content_length: Option<usize>,
    body: Body,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            content_type: None,
            content_length: None,
            body: Body::Empty,
        }
    }
}

impl Response {
    /// `200 OK`, no headers, no body — the seed a middleware chain starts from.
    pub fn new() -> Self {
        Self::default()
    }

    /// `200 OK` — `application/json`.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::with_body(ContentType::Json, body.into())
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body(ContentType::Text, Bytes::from(body.into()))
    }

    /// `200 OK` — `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_body(ContentType::Html, Bytes::from(body.into()))
    }

    /// Response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, ..Self::default() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: StatusCode::OK, headers: Vec::new() }
    }

    fn with_body(content_type: ContentType, body: Bytes) -> Self {
        Self {
            content_length: Some(body.len()),
            content_type: Some(content_type.as_str().to_owned()),
            body: Body::Buffer(body),
            ..Self::default()
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Exact-key header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any existing value under the same key
    /// (last write wins; keys compare exactly as written).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.headers.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value.into(),
            None => self.headers.push((name, value.into())),
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = Some(content_type.into());
    }

    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Replaces the body and synchronizes the content length with it.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        let body = body.into();
        self.content_length = Some(body.len());
        self.body = Body::Buffer(body);
    }

    /// Finalization step, run before every serialization.
    ///
    /// Idempotent: already-set values are never overridden.
    pub(crate) fn finalize(&mut self) {
        if self.header("Server").is_none() {
            self.set_header("Server", SERVER);
        }
        if self.content_type.is_none() {
            self.content_type = Some(ContentType::Html.as_str().to_owned());
        }
        self.content_length = match &self.body {
            Body::Buffer(buffer) => Some(buffer.len()),
            Body::Empty => Some(self.content_length.unwrap_or(0)),
        };
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`. Terminated by a
/// typed body method, or [`ResponseBuilder::no_body`].
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.finish(ContentType::Json, body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text, Bytes::from(body.into()))
    }

    /// Terminate with a typed body. Use this for XML, HTML, CSV, binary.
    pub fn bytes(self, content_type: ContentType, body: impl Into<Bytes>) -> Response {
        self.finish(content_type, body.into())
    }

    /// Terminate with no body (e.g. `204 No Content`, redirects).
    pub fn no_body(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            ..Response::default()
        }
    }

    fn finish(self, content_type: ContentType, body: Bytes) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            content_type: Some(content_type.as_str().to_owned()),
            content_length: Some(body.len()),
            body: Body::Buffer(body),
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`StatusCode`] directly from a handler for a body-less response.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}
