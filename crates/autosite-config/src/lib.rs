//! Configuration management for autosite.
//!
//! Parses `autosite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [site]
//! title = "Some title"
//! pages = "pages/*.tmpl"
//! live_domain = "domain.com"
//! templates = ["base.tmpl", "other.tmpl"]
//!
//! [server]
//! port = 8080
//!
//! [[redirects]]
//! from = "/feed"
//! to = "/atom.xml"
//!
//! [[remap]]
//! from = "/index"
//! to = "/"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `site.live_domain` and `server.host` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the live flag.
    pub live: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "autosite.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration.
    pub site: SiteSettings,
    /// Server configuration.
    pub server: ServerConfig,
    /// Static redirects, applied after remaps.
    pub redirects: Vec<RedirectConfig>,
    /// URI remaps, applied in file order before redirects.
    pub remap: Vec<RemapConfig>,

    /// Directory page and template paths are relative to (set after loading).
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Site title, for `<head>`.
    pub title: String,
    /// Glob for page templates.
    pub pages: String,
    /// Production domain.
    pub live_domain: String,
    /// Templates compiled into every page, in order.
    pub templates: Vec<String>,
    /// Template rendering starts from.
    pub base_template: String,
    /// Whether the site runs live.
    pub live: bool,
    /// Stop the server when a page fails to render.
    pub exit_on_render_error: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            pages: "pages/*.tmpl".to_owned(),
            live_domain: String::new(),
            templates: Vec::new(),
            base_template: "base".to_owned(),
            live: false,
            exit_on_render_error: true,
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// A static redirect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedirectConfig {
    /// URI the redirect is served on.
    pub from: String,
    /// Redirect target.
    pub to: String,
}

/// A page moved to a new URI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemapConfig {
    /// URI the page was discovered at.
    pub from: String,
    /// URI the page is served on instead.
    pub to: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.live_domain`").
        field: String,
        /// Error message (e.g., "${`DOMAIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URI field to be an absolute path.
fn require_absolute_uri(uri: &str, field: &str) -> Result<(), ConfigError> {
    if !uri.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start with /, got {uri:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `autosite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if no config file is found, parsing fails, or the
    /// resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::discover_config().ok_or_else(|| {
                ConfigError::NotFound(
                    std::env::current_dir()
                        .unwrap_or_default()
                        .join(CONFIG_FILENAME),
                )
            })?,
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let mut config = Self::load_from_file(&path)?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(live) = settings.live {
            self.site.live = live;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        expand::expand_config(&mut config)?;

        config.base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_server()?;
        self.validate_routes()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.pages, "site.pages")?;
        require_non_empty(&self.site.base_template, "site.base_template")?;

        let domain = &self.site.live_domain;
        if self.site.live {
            require_non_empty(domain, "site.live_domain")?;
        }
        if domain.contains('/') {
            return Err(ConfigError::Validation(format!(
                "site.live_domain must be a host name without scheme or path, got {domain:?}"
            )));
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_routes(&self) -> Result<(), ConfigError> {
        for remap in &self.remap {
            require_absolute_uri(&remap.from, "remap.from")?;
            require_absolute_uri(&remap.to, "remap.to")?;
        }
        for redirect in &self.redirects {
            require_absolute_uri(&redirect.from, "redirects.from")?;
            require_non_empty(&redirect.to, "redirects.to")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const MINIMAL: &str = r#"
[site]
title = "Test"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.site.title, "Test");
        assert_eq!(config.site.pages, "pages/*.tmpl");
        assert_eq!(config.site.base_template, "base");
        assert!(config.site.templates.is_empty());
        assert!(!config.site.live);
        assert!(config.site.exit_on_render_error);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.redirects.is_empty());
        assert!(config.remap.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
title = "Some title"
pages = "posts/*/*/*.tmpl"
live_domain = "domain.com"
templates = ["base.tmpl", "other.tmpl"]
base_template = "layout"
live = true
exit_on_render_error = false

[server]
host = "0.0.0.0"
port = 9000

[[redirects]]
from = "/feed"
to = "/atom.xml"

[[redirects]]
from = "/old-blog"
to = "https://blog.domain.com/"

[[remap]]
from = "/posts/2014/03/hello"
to = "/hello"

[[remap]]
from = "/index"
to = "/"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.pages, "posts/*/*/*.tmpl");
        assert_eq!(config.site.live_domain, "domain.com");
        assert_eq!(config.site.templates, vec!["base.tmpl", "other.tmpl"]);
        assert_eq!(config.site.base_template, "layout");
        assert!(config.site.live);
        assert!(!config.site.exit_on_render_error);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.redirects,
            vec![
                RedirectConfig {
                    from: "/feed".to_owned(),
                    to: "/atom.xml".to_owned(),
                },
                RedirectConfig {
                    from: "/old-blog".to_owned(),
                    to: "https://blog.domain.com/".to_owned(),
                },
            ]
        );
        assert_eq!(
            config.remap,
            vec![
                RemapConfig {
                    from: "/posts/2014/03/hello".to_owned(),
                    to: "/hello".to_owned(),
                },
                RemapConfig {
                    from: "/index".to_owned(),
                    to: "/".to_owned(),
                },
            ]
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_requires_title() {
        let config: Config = toml::from_str("").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.title"));
    }

    #[test]
    fn test_validate_live_requires_domain() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.site.live = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.live_domain"));
    }

    #[test]
    fn test_validate_domain_without_scheme() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.site.live_domain = "https://domain.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.live_domain"));
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_relative_redirect_source() {
        let toml = r#"
[site]
title = "Test"

[[redirects]]
from = "feed"
to = "/atom.xml"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redirects.from"));
    }

    #[test]
    fn test_validate_relative_remap_target() {
        let toml = r#"
[site]
title = "Test"

[[remap]]
from = "/index"
to = "home"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("remap.to"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            live: Some(true),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.site.live);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(!config.site.live);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("autosite.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Test");
        assert_eq!(config.base_dir, temp_dir.path());
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_validates_after_cli_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("autosite.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let settings = CliSettings {
            live: Some(true),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(err.to_string().contains("site.live_domain"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/autosite.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("autosite.toml");
        std::fs::write(&path, "[site\ntitle = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_expand_env_vars_live_domain() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("AUTOSITE_CONFIG_TEST_DOMAIN", "domain.com");
        }

        let toml = r#"
[site]
title = "Test"
live_domain = "${AUTOSITE_CONFIG_TEST_DOMAIN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        expand::expand_config(&mut config).unwrap();

        assert_eq!(config.site.live_domain, "domain.com");

        unsafe {
            std::env::remove_var("AUTOSITE_CONFIG_TEST_DOMAIN");
        }
    }
}
