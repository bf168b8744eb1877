//! The page registry.
//!
//! A [`Site`] is built once from disk, optionally adjusted with
//! [`Site::change_uri`] and [`Site::add_redirect`], and then consumed by
//! [`Site::register`]. There is no mutation after registration, so the
//! resulting [`Routes`] can be shared by request workers without locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::date::Date;
use crate::discovery::get_files;
use crate::error::SiteError;
use crate::page::{Page, PageKind};
use crate::path::parse_path;
use crate::routes::Routes;
use crate::template::{CompiledTemplate, TemplateHelpers};

/// Hosting environment the site runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development: pages are routed by path only.
    #[default]
    Development,
    /// Production: pages are routed under the live domain.
    Live,
}

impl Environment {
    /// Environment for a "running live" flag.
    #[must_use]
    pub fn from_live(live: bool) -> Self {
        if live { Self::Live } else { Self::Development }
    }

    /// Whether this is the live environment.
    #[must_use]
    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

/// Site configuration.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Title of the site, for `<head>`.
    pub title: String,
    /// Directory the page glob and template paths are relative to.
    pub base_dir: PathBuf,
    /// Glob for page templates (e.g. `pages/*.tmpl`).
    pub pages: String,
    /// Live domain (e.g. `example.com`).
    pub live_domain: String,
    /// Templates compiled into every page, in order.
    pub templates: Vec<PathBuf>,
    /// Name of the template rendering starts from.
    pub base_template: String,
    /// Hosting environment.
    pub environment: Environment,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            base_dir: PathBuf::from("."),
            pages: "pages/*.tmpl".to_owned(),
            live_domain: String::new(),
            templates: Vec::new(),
            base_template: "base".to_owned(),
            environment: Environment::Development,
        }
    }
}

/// Page registry, keyed by URI.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    pages: HashMap<String, Page>,
}

impl Site {
    /// Build a site from the pages on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery finds nothing, a page path is malformed,
    /// or any template fails to compile. A site that fails to build must not
    /// be served.
    pub fn new(config: SiteConfig) -> Result<Self, SiteError> {
        let mut site = Self::empty(config);
        site.read()?;
        Ok(site)
    }

    /// Create a site with no pages.
    fn empty(config: SiteConfig) -> Self {
        Self {
            config,
            pages: HashMap::new(),
        }
    }

    /// Discover, parse and compile all pages.
    fn read(&mut self) -> Result<(), SiteError> {
        let files = get_files(&self.config.base_dir, &self.config.pages)?;
        tracing::info!(pattern = %self.config.pages, count = files.len(), "Discovered pages");

        for file in files {
            let (uri, date) = parse_path(&file)?;
            let mut templates = self.config.templates.clone();
            templates.push(PathBuf::from(file));
            self.add_page(uri, date, Value::Null, &templates)?;
        }
        Ok(())
    }

    /// Compile a page from `templates` and store it under `uri`.
    ///
    /// `templates` lists the shared templates first and the page template
    /// last; relative paths are resolved against the base directory. An
    /// existing page at `uri` is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if a template cannot be read or parsed.
    pub fn add_page(
        &mut self,
        uri: String,
        date: Date,
        data: Value,
        templates: &[PathBuf],
    ) -> Result<(), SiteError> {
        let paths: Vec<PathBuf> = templates.iter().map(|t| self.resolve(t)).collect();
        let template =
            CompiledTemplate::compile(&self.config.base_template, &self.helpers(), &paths, &uri)?;

        let page = Page {
            title: self.config.title.clone(),
            uri: uri.clone(),
            date,
            is_live: self.config.environment.is_live(),
            data,
            kind: PageKind::Template(template),
        };
        tracing::debug!(page = %page, "Added page");
        self.pages.insert(uri, page);
        Ok(())
    }

    /// Move the page at `uri` to `new_uri`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::UnknownUri`] if no page is registered at `uri`,
    /// and [`SiteError::DuplicateUri`] if another page holds `new_uri`.
    pub fn change_uri(&mut self, uri: &str, new_uri: &str) -> Result<(), SiteError> {
        let mut page = self
            .pages
            .remove(uri)
            .ok_or_else(|| SiteError::UnknownUri(uri.to_owned()))?;
        if self.pages.contains_key(new_uri) {
            self.pages.insert(uri.to_owned(), page);
            return Err(SiteError::DuplicateUri(new_uri.to_owned()));
        }
        new_uri.clone_into(&mut page.uri);
        tracing::info!(page = %page, from = %uri, "Remapped page");
        self.pages.insert(new_uri.to_owned(), page);
        Ok(())
    }

    /// Serve a redirect to `redirect_uri` at `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::DuplicateUri`] if a page is already registered at
    /// `uri`.
    pub fn add_redirect(&mut self, uri: &str, redirect_uri: &str) -> Result<(), SiteError> {
        if self.pages.contains_key(uri) {
            return Err(SiteError::DuplicateUri(uri.to_owned()));
        }
        let page = Page {
            title: self.config.title.clone(),
            uri: uri.to_owned(),
            date: Date::default(),
            is_live: self.config.environment.is_live(),
            data: Value::Null,
            kind: PageKind::Redirect(redirect_uri.to_owned()),
        };
        tracing::info!(page = %page, "Added redirect");
        self.pages.insert(uri.to_owned(), page);
        Ok(())
    }

    /// Page registered at `uri`.
    pub fn page(&self, uri: &str) -> Option<&Page> {
        self.pages.get(uri)
    }

    /// All pages, in no particular order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Number of registered pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages are registered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Site configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Finish building and produce the route table.
    ///
    /// In development each page is routed at its URI; live, at the live
    /// domain followed by the URI.
    pub fn register(self) -> Routes {
        let live_domain = self
            .config
            .environment
            .is_live()
            .then_some(self.config.live_domain);
        let routes = Routes::new(live_domain, self.pages.into_values());
        for (pattern, page) in routes.iter() {
            tracing::info!(pattern = %pattern, page = %page, "Registered handler");
        }
        routes
    }

    fn helpers(&self) -> TemplateHelpers {
        TemplateHelpers {
            live: self.config.environment.is_live(),
            live_domain: self.config.live_domain.clone(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.config.base_dir.join(path)
    }
}
