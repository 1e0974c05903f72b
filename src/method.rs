//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods plus an [`Method::Other`] variant for
//! extension methods, so the transport layer never has to reject a request
//! before the dispatcher sees it.
//!
//! Equality and hashing go through the canonical uppercase string form, not
//! the structural variant: `Method::Other("get".into()) == Method::Get`.
//! Route matching compares methods, and an extension method carrying an
//! arbitrary string must compare the same way the enumerated ones do.

use std::fmt;
use std::hash::{Hash, Hasher};

/// An HTTP request method.
#[derive(Clone, Debug)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    /// An extension method. The payload is uppercased on construction via
    /// [`From<&str>`]; building the variant by hand with other casing is
    /// still handled by the case-insensitive comparisons below.
    Other(String),
}

impl Method {
    /// Returns the canonical wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect  => "CONNECT",
            Self::Delete   => "DELETE",
            Self::Get      => "GET",
            Self::Head     => "HEAD",
            Self::Options  => "OPTIONS",
            Self::Patch    => "PATCH",
            Self::Post     => "POST",
            Self::Put      => "PUT",
            Self::Trace    => "TRACE",
            Self::Other(m) => m,
        }
    }
}

/// Total conversion: unknown method strings become [`Method::Other`].
impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "CONNECT" => Self::Connect,
            "DELETE"  => Self::Delete,
            "GET"     => Self::Get,
            "HEAD"    => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH"   => Self::Patch,
            "POST"    => Self::Post,
            "PUT"     => Self::Put,
            "TRACE"   => Self::Trace,
            other     => Self::Other(other.to_owned()),
        }
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.as_str().bytes() {
            state.write_u8(byte.to_ascii_uppercase());
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_is_total() {
        assert_eq!(Method::from("GET"), Method::Get);
        assert_eq!(Method::from("get"), Method::Get);
        assert_eq!(Method::from("PURGE"), Method::Other("PURGE".to_owned()));
    }

    #[test]
    fn extension_methods_compare_by_normalized_string() {
        assert_eq!(Method::Other("get".to_owned()), Method::Get);
        assert_eq!(
            Method::Other("purge".to_owned()),
            Method::Other("PURGE".to_owned()),
        );
        assert_ne!(Method::Other("PURGE".to_owned()), Method::Post);
    }

    #[test]
    fn display_is_the_wire_form() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::from("notify").to_string(), "NOTIFY");
    }
}
