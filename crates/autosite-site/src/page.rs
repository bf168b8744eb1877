//! Pages and per-request dispatch.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::date::Date;
use crate::error::RenderError;
use crate::template::CompiledTemplate;

/// What a page serves.
#[derive(Debug)]
pub enum PageKind {
    /// Rendered from a compiled template.
    Template(CompiledTemplate),
    /// Redirects to another URI.
    Redirect(String),
}

/// A routable HTML resource.
#[derive(Debug)]
pub struct Page {
    pub(crate) title: String,
    pub(crate) uri: String,
    pub(crate) date: Date,
    pub(crate) is_live: bool,
    pub(crate) data: Value,
    pub(crate) kind: PageKind,
}

/// Outcome of dispatching a request to a page.
#[derive(Debug, PartialEq, Eq)]
pub enum PageResponse<'a> {
    /// The request URI does not match the page URI.
    NotFound,
    /// Redirect (302) to the target.
    Redirect(&'a str),
    /// Rendered HTML body.
    Html(String),
}

/// Values exposed to templates.
///
/// A view over [`Page`] so templates do not depend on how pages are stored.
/// Field names match what templates reference: `{{ Title }}`, `{{ URI }}`,
/// `{{ Date.Year }}`, `{{ Date.Month }}`, `{{ IsLive }}`, `{{ Data }}`.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    #[serde(rename = "Title")]
    pub title: &'a str,
    #[serde(rename = "URI")]
    pub uri: &'a str,
    #[serde(rename = "Date")]
    pub date: Date,
    #[serde(rename = "IsLive")]
    pub is_live: bool,
    #[serde(rename = "Data")]
    pub data: &'a Value,
}

impl Page {
    /// Site title, for `<head>`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// URI the page is served on.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Publication date (year 0 when absent).
    pub fn date(&self) -> Date {
        self.date
    }

    /// Whether the page was built for the live site.
    pub fn is_live(&self) -> bool {
        self.is_live
    }

    /// Custom data attached to the page.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// What the page serves.
    pub fn kind(&self) -> &PageKind {
        &self.kind
    }

    /// Redirect target, for redirect pages.
    pub fn redirect_uri(&self) -> Option<&str> {
        match &self.kind {
            PageKind::Redirect(target) => Some(target),
            PageKind::Template(_) => None,
        }
    }

    /// Template context for this page.
    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            title: &self.title,
            uri: &self.uri,
            date: self.date,
            is_live: self.is_live,
            data: &self.data,
        }
    }

    /// Dispatch a request for `request_uri` (path plus query string).
    ///
    /// The request URI must equal the page URI exactly; a trailing slash or
    /// any query string makes it a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template fails to render.
    pub fn respond(&self, request_uri: &str) -> Result<PageResponse<'_>, RenderError> {
        if request_uri != self.uri {
            return Ok(PageResponse::NotFound);
        }
        match &self.kind {
            PageKind::Redirect(target) => Ok(PageResponse::Redirect(target)),
            PageKind::Template(template) => template
                .render(self.render_context())
                .map(PageResponse::Html)
                .map_err(|source| RenderError {
                    uri: self.uri.clone(),
                    source,
                }),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page [{}]", self.uri)?;
        if self.date.is_set() {
            write!(f, ", published on {}", self.date.year)?;
            if let Some(month) = self.date.month_name() {
                write!(f, ", {month}")?;
            }
        }
        if let PageKind::Redirect(target) = &self.kind {
            write!(f, ", redirects to {target}")?;
        }
        Ok(())
    }
}
