//! Incoming HTTP request type.
//!
//! The transport layer owns wire parsing; by the time a [`Request`] exists it
//! is a plain value: method, optional path, keep-alive flag, and a typed
//! [`Storage`] bag the dispatch pipeline uses to attach derived data. The
//! only storage entry ace writes itself is the extracted path parameters,
//! stored as a [`Params`] value once a route matches.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::method::Method;

pub(crate) const PARAMS_KEY: &str = "params";

/// An incoming HTTP request, handed over by the transport layer.
///
/// Each request is an independent value — nothing in it is shared across
/// concurrent requests, so middleware may mutate it freely.
pub struct Request {
    method: Method,
    path: Option<String>,
    keep_alive: bool,
    storage: Storage,
}

impl Request {
    /// A request for `path`. The transport layer sets `keep_alive` from the
    /// connection headers it already parsed.
    pub fn new(method: Method, path: impl Into<String>, keep_alive: bool) -> Self {
        Self { method, path: Some(path.into()), keep_alive, storage: Storage::default() }
    }

    /// A request without a path. It can never match a route; routing treats
    /// it as `/` for diagnostics only.
    pub fn without_path(method: Method, keep_alive: bool) -> Self {
        Self { method, path: None, keep_alive, storage: Storage::default() }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// Path parameters extracted by the matched route, if routing has run.
    pub fn params(&self) -> Option<&Params> {
        self.storage.get::<Params>(PARAMS_KEY)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params().and_then(|params| params.get(name))
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.storage.set(PARAMS_KEY, params);
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("keep_alive", &self.keep_alive)
            .finish_non_exhaustive()
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

/// String-keyed bag of typed values attached to a request in flight.
///
/// Middleware uses it to pass derived data downstream (an authenticated user,
/// a request id) without the request type having to know about any of it.
#[derive(Default)]
pub struct Storage(HashMap<String, Box<dyn Any + Send + Sync>>);

impl Storage {
    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.0.insert(key.into(), Box::new(value));
    }

    /// Returns the entry under `key`, if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.0.get(key).and_then(|value| value.downcast_ref())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

// ── Params ───────────────────────────────────────────────────────────────────

/// Extracted path parameters, iterable in pattern order.
///
/// Keys keep the position of their first appearance; inserting a duplicate
/// placeholder name replaces the value in place, so the last capture wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: String) {
        match self.0.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_iterate_in_insertion_order() {
        let mut params = Params::new();
        params.insert("x", "1".to_owned());
        params.insert("y", "2".to_owned());
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("x", "1"), ("y", "2")]);
    }

    #[test]
    fn duplicate_param_keeps_position_and_takes_last_value() {
        let mut params = Params::new();
        params.insert("id", "1".to_owned());
        params.insert("other", "2".to_owned());
        params.insert("id", "3".to_owned());
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("id", "3"), ("other", "2")]);
    }

    #[test]
    fn storage_is_typed() {
        let mut request = Request::new(Method::Get, "/", true);
        request.storage_mut().set("user_id", 42u64);
        assert_eq!(request.storage().get::<u64>("user_id"), Some(&42));
        assert_eq!(request.storage().get::<String>("user_id"), None);
        assert!(request.storage_mut().remove("user_id"));
        assert!(!request.storage_mut().remove("user_id"));
    }

    #[test]
    fn params_are_absent_before_routing() {
        let request = Request::new(Method::Get, "/users/42", true);
        assert!(request.params().is_none());
        assert_eq!(request.param("id"), None);
    }
}
