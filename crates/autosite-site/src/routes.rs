//! Registered route table.

use std::collections::HashMap;

use crate::page::Page;

/// Immutable mapping from route pattern to page.
///
/// In development a pattern is the page URI (`/Foo`). Live, it is the live
/// domain followed by the URI (`example.com/Foo`), and only requests for that
/// host match.
#[derive(Debug)]
pub struct Routes {
    live_domain: Option<String>,
    routes: HashMap<String, Page>,
}

impl Routes {
    pub(crate) fn new(
        live_domain: Option<String>,
        pages: impl IntoIterator<Item = Page>,
    ) -> Self {
        let live_domain = live_domain.map(|d| d.to_ascii_lowercase());
        let routes = pages
            .into_iter()
            .map(|page| {
                let pattern = match &live_domain {
                    Some(domain) => format!("{domain}{}", page.uri()),
                    None => page.uri().to_owned(),
                };
                (pattern, page)
            })
            .collect();
        Self {
            live_domain,
            routes,
        }
    }

    /// Find the page routed for a request.
    ///
    /// `host` is the request host, with or without a port; it is ignored in
    /// development. `path` excludes the query string.
    pub fn lookup(&self, host: Option<&str>, path: &str) -> Option<&Page> {
        match &self.live_domain {
            None => self.routes.get(path),
            Some(_) => {
                let host = strip_port(host?).to_ascii_lowercase();
                self.routes.get(&format!("{host}{path}"))
            }
        }
    }

    /// Whether routes are qualified by the live domain.
    pub fn is_live(&self) -> bool {
        self.live_domain.is_some()
    }

    /// Routes sorted by pattern.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Page)> {
        let mut routes: Vec<_> = self
            .routes
            .iter()
            .map(|(pattern, page)| (pattern.as_str(), page))
            .collect();
        routes.sort_unstable_by_key(|(pattern, _)| *pattern);
        routes.into_iter()
    }

    /// Sorted route patterns.
    pub fn patterns(&self) -> Vec<&str> {
        self.iter().map(|(pattern, _)| pattern).collect()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether there are no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Strip the port from a `Host` value (`example.com:8080`, `[::1]:8080`).
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.find(']').map_or(host, |end| &host[..end + 2]);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}
