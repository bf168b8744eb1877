//! Route discovery and page registry for autosite.
//!
//! This crate turns a directory of templates into a routing table:
//! - [`get_files`]: glob expansion with editor lock files filtered out
//! - [`parse_path`]: file path to URI and publication [`Date`]
//! - [`Site`]: the page registry, built once and then registered
//! - [`Routes`]: the immutable route table handed to the HTTP server
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use autosite_site::{Environment, Site, SiteConfig};
//!
//! let config = SiteConfig {
//!     title: "Some title".to_owned(),
//!     pages: "pages/*.tmpl".to_owned(),
//!     live_domain: "domain.com".to_owned(),
//!     templates: vec![PathBuf::from("base.tmpl"), PathBuf::from("other.tmpl")],
//!     environment: Environment::Development,
//!     ..SiteConfig::default()
//! };
//! let mut site = Site::new(config)?;
//! site.add_redirect("/old", "/new")?;
//!
//! // Pages are served at /Foo, /Bar, ... for pages/Foo.tmpl, pages/Bar.tmpl
//! let routes = site.register();
//! # Ok(())
//! # }
//! ```

mod date;
mod discovery;
mod error;
mod page;
mod path;
mod routes;
mod site;
mod template;

pub use date::Date;
pub use discovery::get_files;
pub use error::{RenderError, SiteError};
pub use page::{Page, PageKind, PageResponse, RenderContext};
pub use path::{get_date, parse_path};
pub use routes::Routes;
pub use site::{Environment, Site, SiteConfig};
pub use template::{CompiledTemplate, TemplateHelpers};
