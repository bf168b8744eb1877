//! `autosite routes` command implementation.
//!
//! Prints the registered route table: one pattern per line, with the
//! redirect target or publication date when there is one.

use std::path::PathBuf;

use autosite_config::{CliSettings, Config};
use autosite_site::{Page, PageKind};
use clap::Args;

use super::build_site;
use super::serve::resolve_flag;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    /// Path to configuration file (default: auto-discover autosite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List live routes, qualified by the live domain.
    #[arg(long)]
    live: bool,

    /// List development routes.
    #[arg(long, conflicts_with = "live")]
    no_live: bool,

    /// Enable verbose output (log discovery).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the site cannot be built.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            live: resolve_flag(self.live, self.no_live),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let routes = build_site(&config)?.register();
        for (pattern, page) in routes.iter() {
            output.row(pattern, &route_note(page));
        }
        output.info(&format!("{} routes", routes.len()));

        Ok(())
    }
}

/// Note shown next to a route pattern.
fn route_note(page: &Page) -> String {
    match page.kind() {
        PageKind::Redirect(target) => format!("-> {target}"),
        PageKind::Template(_) if page.date().is_set() => page.date().to_string(),
        PageKind::Template(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::tests::create_config;

    #[test]
    fn test_route_note() {
        let (_dir, mut config) = create_config();
        config.redirects.push(autosite_config::RedirectConfig {
            from: "/old".to_owned(),
            to: "/Foo".to_owned(),
        });
        let site = build_site(&config).unwrap();

        assert_eq!(route_note(site.page("/Foo").unwrap()), "");
        assert_eq!(route_note(site.page("/old").unwrap()), "-> /Foo");
    }

    #[test]
    fn test_route_note_dated() {
        let (dir, mut config) = create_config();
        std::fs::create_dir_all(dir.path().join("posts/2014/03")).unwrap();
        std::fs::write(dir.path().join("posts/2014/03/hello.tmpl"), "hello").unwrap();
        config.site.pages = "posts/*/*/*.tmpl".to_owned();
        let site = build_site(&config).unwrap();

        let page = site.page("/posts/2014/03/hello").unwrap();

        assert_eq!(route_note(page), "2014, March");
    }
}
