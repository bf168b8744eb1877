//! `autosite serve` command implementation.

use std::path::PathBuf;

use autosite_config::{CliSettings, Config};
use autosite_server::{run_server, server_config_from_config};
use autosite_site::Site;
use clap::Args;

use super::build_site;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover autosite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve the live site, routed by the live domain.
    #[arg(long)]
    live: bool,

    /// Serve the development site.
    #[arg(long, conflicts_with = "live")]
    no_live: bool,

    /// Enable verbose output (log every request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the site cannot be built, or
    /// the server fails or is stopped by a render failure.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host.clone(),
            port: self.port,
            live: self.resolve_live(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site = build_site(&config)?;

        output.highlight(&site_summary(&site));
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));

        let server_config = server_config_from_config(&config);
        run_server(server_config, site.register()).await?;

        Ok(())
    }

    /// Resolve `live` from --live/--no-live flags.
    fn resolve_live(&self) -> Option<bool> {
        resolve_flag(self.live, self.no_live)
    }
}

/// One-line description of a built site for startup output.
fn site_summary(site: &Site) -> String {
    let config = site.config();
    let environment = if config.environment.is_live() {
        format!("live on {}", config.live_domain)
    } else {
        "development".to_owned()
    };
    format!("{} ({} pages, {environment})", config.title, site.len())
}

/// Resolve an on/off flag pair; `None` when neither was given.
pub(crate) fn resolve_flag(on: bool, off: bool) -> Option<bool> {
    off.then_some(false).or(on.then_some(true))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::tests::create_config;

    #[test]
    fn test_resolve_flag() {
        assert_eq!(resolve_flag(false, false), None);
        assert_eq!(resolve_flag(true, false), Some(true));
        assert_eq!(resolve_flag(false, true), Some(false));
    }

    #[test]
    fn test_site_summary() {
        let (_dir, mut config) = create_config();
        let site = build_site(&config).unwrap();
        assert_eq!(site_summary(&site), "Test Site (2 pages, development)");

        config.site.live = true;
        let site = build_site(&config).unwrap();
        assert_eq!(site_summary(&site), "Test Site (2 pages, live on example.com)");
    }
}
