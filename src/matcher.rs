//! Path pattern compilation and matching.
//!
//! A route pattern is a slash-delimited literal where `:name` introduces a
//! capture placeholder. The identifier is ASCII alphanumerics plus
//! underscore; the placeholder itself matches one or more of alphanumeric,
//! underscore, or hyphen. Everything else in the pattern is literal text.
//! Compilation anchors the expression to the whole path, so `/users/:id`
//! matches `/users/42` but neither `/users/` nor `/users/42/x`.
//!
//! Placeholders may sit inside a segment: `/files/:name.html` captures the
//! stem and requires the literal `.html` suffix.

use regex::Regex;

use crate::error::Error;

/// A compiled route pattern.
pub(crate) struct PathPattern {
    regex: Regex,
    names: Vec<String>,
}

impl PathPattern {
    /// Compiles `pattern` into an anchored matcher.
    ///
    /// The template grammar admits any literal text, but route patterns are
    /// additionally required to begin with `/` — a deliberate tightening,
    /// not part of the grammar itself: every request path the transport
    /// hands over starts with a slash, so a slashless pattern could never
    /// match and is caught at registration instead of silently 404ing.
    ///
    /// Fails with [`Error::InvalidPattern`] if the pattern does not begin
    /// with `/` or a `:` is not followed by a placeholder identifier.
    pub(crate) fn compile(pattern: &str) -> Result<Self, Error> {
        if !pattern.starts_with('/') {
            return Err(Error::invalid_pattern(pattern, "must begin with `/`"));
        }

        let mut source = String::with_capacity(pattern.len() + 16);
        source.push('^');
        let mut names = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != ':' {
                literal.push(c);
                continue;
            }
            source.push_str(&regex::escape(&literal));
            literal.clear();

            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(Error::invalid_pattern(
                    pattern,
                    "`:` must be followed by a placeholder identifier",
                ));
            }
            names.push(name);
            source.push_str("([[:alnum:]_-]+)");
        }
        source.push_str(&regex::escape(&literal));
        source.push('$');

        let regex = Regex::new(&source)
            .map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self { regex, names })
    }

    /// Placeholder names, in left-to-right order of appearance.
    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Captured placeholder values for `path`, in placeholder order.
    /// Empty when the path does not match.
    pub(crate) fn captures(&self, path: &str) -> Vec<String> {
        match self.regex.captures(path) {
            Some(captures) => captures
                .iter()
                .skip(1)
                .flatten()
                .map(|group| group.as_str().to_owned())
                .collect(),
            None => Vec::new(),
        }
    }
}
