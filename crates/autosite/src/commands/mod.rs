//! CLI command implementations.

pub(crate) mod routes;
pub(crate) mod serve;

use std::path::PathBuf;

use autosite_config::Config;
use autosite_site::{Environment, Site, SiteConfig};

use crate::error::CliError;

pub(crate) use routes::RoutesArgs;
pub(crate) use serve::ServeArgs;

/// Create site configuration from autosite config.
pub(crate) fn site_config_from_config(config: &Config) -> SiteConfig {
    SiteConfig {
        title: config.site.title.clone(),
        base_dir: config.base_dir.clone(),
        pages: config.site.pages.clone(),
        live_domain: config.site.live_domain.clone(),
        templates: config.site.templates.iter().map(PathBuf::from).collect(),
        base_template: config.site.base_template.clone(),
        environment: Environment::from_live(config.site.live),
    }
}

/// Discover pages, then apply `[[remap]]` and `[[redirects]]` in file order.
///
/// Remaps run before redirects so a redirect may take over a remapped page's
/// old URI.
pub(crate) fn build_site(config: &Config) -> Result<Site, CliError> {
    let mut site = Site::new(site_config_from_config(config))?;
    for remap in &config.remap {
        site.change_uri(&remap.from, &remap.to)?;
    }
    for redirect in &config.redirects {
        site.add_redirect(&redirect.from, &redirect.to)?;
    }
    tracing::info!(
        pages = site.len(),
        remapped = config.remap.len(),
        redirects = config.redirects.len(),
        "Site built"
    );
    Ok(site)
}
