// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permit-all route allow-list.
//!
//! Requests matching a rule here may proceed without a principal even if
//! they carry a bad token. Everything else is protected.
//!
//! Patterns are path globs:
//! - `*` inside a segment matches any run of characters in that segment
//! - a lone `**` segment matches zero or more whole segments

use axum::http::Method;

/// One allow-list entry. `method: None` matches every method.
#[derive(Debug, Clone)]
pub struct PermitRule {
    method: Option<Method>,
    segments: Vec<String>,
}

impl PermitRule {
    pub fn new(method: Option<Method>, pattern: &str) -> Self {
        Self {
            method,
            segments: split_path(pattern).map(str::to_string).collect(),
        }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(expected) = &self.method {
            if expected != method {
                return false;
            }
        }
        let path: Vec<&str> = split_path(path).collect();
        let pattern: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        match_segments(&pattern, &path)
    }
}

/// Ordered set of permit-all rules.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<PermitRule>,
}

impl AccessPolicy {
    /// Policy with no public routes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permit(mut self, method: Method, pattern: &str) -> Self {
        self.rules.push(PermitRule::new(Some(method), pattern));
        self
    }

    pub fn permit_any_method(mut self, pattern: &str) -> Self {
        self.rules.push(PermitRule::new(None, pattern));
        self
    }

    /// Whether the route is reachable without authentication.
    pub fn is_permitted(&self, method: &Method, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(method, path))
    }

    /// Public routes of the service.
    pub fn service_defaults() -> Self {
        Self::new()
            // static resources
            .permit(Method::GET, "/")
            .permit(Method::GET, "/*.html")
            .permit(Method::GET, "/favicon.ico")
            .permit(Method::GET, "/**/*.html")
            .permit(Method::GET, "/**/*.css")
            .permit(Method::GET, "/**/*.js")
            // registration and account recovery
            .permit(Method::POST, "/v1/users")
            .permit(Method::GET, "/v1/users/avatar")
            .permit(Method::GET, "/v1/users/*/activation")
            .permit(Method::GET, "/v1/users/*/password/reset_validation")
            .permit(Method::PUT, "/v1/users/*/password")
            .permit(Method::GET, "/v1/users/*/duplication")
            // login
            .permit(Method::POST, "/v1/tokens")
            .permit(Method::GET, "/v1/captchas")
            // operations
            .permit(Method::GET, "/health")
            .permit(Method::GET, "/health/live")
            .permit(Method::GET, "/health/ready")
            .permit(Method::GET, "/docs/**")
            .permit(Method::GET, "/api-doc/**")
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((head, rest)) => match path.split_first() {
            Some((segment, path_rest)) => {
                wildcard_match(head, segment) && match_segments(rest, path_rest)
            }
            None => false,
        },
    }
}

/// Match one segment against a pattern where `*` spans any characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut pieces = pattern.split('*');
    let first = pieces.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let pieces: Vec<&str> = pieces.collect();
    let Some((last, middle)) = pieces.split_last() else {
        // No `*` at all: exact match
        return rest.is_empty();
    };

    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_segments() {
        assert!(wildcard_match("*.html", "index.html"));
        assert!(wildcard_match("*", "anything"));
        assert!(wildcard_match("a*c", "abbbc"));
        assert!(!wildcard_match("*.html", "index.css"));
        assert!(wildcard_match("exact", "exact"));
        assert!(!wildcard_match("exact", "exactly"));
    }

    #[test]
    fn double_star_spans_segments() {
        let policy = AccessPolicy::new().permit(Method::GET, "/**/*.css");
        assert!(policy.is_permitted(&Method::GET, "/site.css"));
        assert!(policy.is_permitted(&Method::GET, "/static/deep/site.css"));
        assert!(!policy.is_permitted(&Method::GET, "/static/site.js"));
    }

    #[test]
    fn method_must_match() {
        let policy = AccessPolicy::service_defaults();
        assert!(policy.is_permitted(&Method::POST, "/v1/tokens"));
        assert!(!policy.is_permitted(&Method::DELETE, "/v1/tokens"));
        assert!(policy.is_permitted(&Method::PUT, "/v1/users/alice/password"));
        assert!(!policy.is_permitted(&Method::GET, "/v1/users/alice/password"));
    }

    #[test]
    fn single_star_is_one_segment() {
        let policy = AccessPolicy::service_defaults();
        assert!(policy.is_permitted(&Method::GET, "/v1/users/alice/activation"));
        assert!(!policy.is_permitted(&Method::GET, "/v1/users/a/b/activation"));
    }

    #[test]
    fn protected_by_default() {
        let policy = AccessPolicy::service_defaults();
        assert!(!policy.is_permitted(&Method::GET, "/v1/users/me"));
        assert!(policy.is_permitted(&Method::GET, "/"));
        assert!(policy.is_permitted(&Method::GET, "/health"));
    }

    #[test]
    fn any_method_rule() {
        let policy = AccessPolicy::new().permit_any_method("/public/**");
        assert!(policy.is_permitted(&Method::DELETE, "/public/x"));
        assert!(policy.is_permitted(&Method::GET, "/public"));
    }
}
