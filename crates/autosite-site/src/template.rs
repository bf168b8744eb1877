//! Template compilation and rendering.
//!
//! Each page owns a [`CompiledTemplate`]: a minijinja environment holding the
//! site's shared templates plus the page's own template. Shared templates are
//! registered under their file stem (`base.tmpl` becomes `base`), the page
//! template under the name `page`. Rendering always starts at the base
//! template, which pulls in the page with `{% include "page" %}` or by
//! importing its macros.
//!
//! Booleans print as `true`/`false`, so `var live = {{ live() }};` is valid
//! JavaScript.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use minijinja::value::{Value, ValueKind};
use minijinja::{AutoEscape, Environment, Output, State};
use serde::Serialize;

use crate::error::SiteError;

/// Name the page-specific template is registered under.
pub(crate) const PAGE_TEMPLATE: &str = "page";

/// Values behind the `live()` and `domain()` template functions.
#[derive(Clone, Debug, Default)]
pub struct TemplateHelpers {
    /// Whether the site is running live.
    pub live: bool,
    /// Live domain, e.g. `example.com`.
    pub live_domain: String,
}

impl TemplateHelpers {
    /// The live domain when running live, otherwise empty.
    #[must_use]
    pub fn domain(&self) -> &str {
        if self.live { &self.live_domain } else { "" }
    }
}

/// A page's compiled templates.
pub struct CompiledTemplate {
    env: Environment<'static>,
    base: String,
}

impl CompiledTemplate {
    /// Compile `paths` into a renderable unit.
    ///
    /// The last path is the page template; all earlier paths are shared
    /// templates. Every file is read and parsed up front.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::TemplateIo`] if a file cannot be read,
    /// [`SiteError::TemplateSyntax`] if it fails to parse,
    /// [`SiteError::DuplicateTemplate`] if two files share a name, and
    /// [`SiteError::MissingBaseTemplate`] if no file provides `base`.
    pub fn compile(
        base: &str,
        helpers: &TemplateHelpers,
        paths: &[PathBuf],
        uri: &str,
    ) -> Result<Self, SiteError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_formatter(format_value);

        let live = helpers.live;
        env.add_function("live", move || live);
        let domain = helpers.domain().to_owned();
        env.add_function("domain", move || domain.clone());

        if let Some((page, shared)) = paths.split_last() {
            let mut registered: HashMap<String, &Path> = HashMap::new();
            for path in shared {
                let name = template_name(path);
                if let Some(first) = registered.get(&name) {
                    return Err(duplicate_template(name, first, path));
                }
                if name == PAGE_TEMPLATE {
                    return Err(duplicate_template(name, path, page));
                }
                add_template(&mut env, name.clone(), path)?;
                registered.insert(name, path);
            }
            add_template(&mut env, PAGE_TEMPLATE.to_owned(), page)?;
        }

        if env.get_template(base).is_err() {
            return Err(SiteError::MissingBaseTemplate {
                name: base.to_owned(),
                uri: uri.to_owned(),
            });
        }

        Ok(Self {
            env,
            base: base.to_owned(),
        })
    }

    /// Render the base template with `context`.
    ///
    /// # Errors
    ///
    /// Returns the template engine's error if rendering fails.
    pub fn render<S: Serialize>(&self, context: S) -> Result<String, minijinja::Error> {
        self.env.get_template(&self.base)?.render(context)
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// Default formatting, except booleans print in lowercase.
fn format_value(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), minijinja::Error> {
    if value.kind() == ValueKind::Bool {
        out.write_str(if value.is_true() { "true" } else { "false" })?;
        return Ok(());
    }
    minijinja::escape_formatter(out, state, value)
}

fn duplicate_template(name: String, first: &Path, second: &Path) -> SiteError {
    SiteError::DuplicateTemplate {
        name,
        first: first.to_path_buf(),
        second: second.to_path_buf(),
    }
}

fn add_template(env: &mut Environment<'static>, name: String, path: &Path) -> Result<(), SiteError> {
    let source = std::fs::read_to_string(path).map_err(|source| SiteError::TemplateIo {
        path: path.to_path_buf(),
        source,
    })?;
    env.add_template_owned(name, source)
        .map_err(|source| SiteError::TemplateSyntax {
            path: path.to_path_buf(),
            source,
        })
}

/// Template name for a shared template file: its file stem.
fn template_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
