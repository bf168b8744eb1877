//! Error types for site construction and page rendering.

use std::path::PathBuf;

/// Error raised while building the site.
///
/// Every variant is a configuration or deployment defect: a site that fails
/// to build must not be registered or served.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The page glob is not a valid pattern.
    #[error("Invalid page pattern {pattern}: {source}")]
    Pattern {
        /// Pattern as configured.
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A glob entry could not be read.
    #[error("Failed to read page entry: {0}")]
    Glob(#[from] glob::GlobError),

    /// The page glob matched nothing usable.
    #[error("No pages found matching {0}")]
    NoPages(String),

    /// A path is not valid UTF-8 and cannot become a URI.
    #[error("Non UTF-8 path: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// A page path has neither the `dir/name` nor the `dir/yyyy/mm/name` shape.
    #[error("Bad template path: {0}")]
    MalformedPath(String),

    /// The year directory is not a plausible year.
    #[error("Bad year: {0}")]
    BadYear(String),

    /// The month directory is not in 1..=12.
    #[error("Bad month: {0}")]
    BadMonth(String),

    /// A template file could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    TemplateIo {
        /// Template file path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template file failed to parse.
    #[error("Failed to parse template {}: {source}", path.display())]
    TemplateSyntax {
        /// Template file path.
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// Two templates for a page would be registered under the same name.
    #[error(
        "Templates {} and {} are both named {name}",
        first.display(),
        second.display()
    )]
    DuplicateTemplate {
        /// Template name.
        name: String,
        /// Template registered first.
        first: PathBuf,
        /// Template that would replace it.
        second: PathBuf,
    },

    /// None of the templates for a page provide the base template.
    #[error("Base template {name} not found for page {uri}")]
    MissingBaseTemplate {
        /// Base template name.
        name: String,
        /// Page being compiled.
        uri: String,
    },

    /// `change_uri` was called for a URI that is not registered.
    #[error("No page with URI {0}")]
    UnknownUri(String),

    /// `add_redirect` or `change_uri` targets a URI that is already registered.
    #[error("Page with URI {0} is already registered")]
    DuplicateUri(String),
}

/// Error raised while rendering a page for a request.
#[derive(Debug, thiserror::Error)]
#[error("Failed to render {uri}: {source}")]
pub struct RenderError {
    /// URI of the page that failed.
    pub uri: String,
    #[source]
    pub source: minijinja::Error,
}
