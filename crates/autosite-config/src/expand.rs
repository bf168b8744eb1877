//! `${VAR}` expansion for deployment-specific settings.
//!
//! Only `site.live_domain` and `server.host` are expanded. They change
//! between a workstation and the production host; page globs and template
//! paths belong to the site itself and are taken literally.

use std::borrow::Cow;

use crate::{Config, ConfigError};

/// Expand `${VAR}` and `${VAR:-default}` in the deployment fields of `config`.
pub(crate) fn expand_config(config: &mut Config) -> Result<(), ConfigError> {
    let fields = [
        ("site.live_domain", &mut config.site.live_domain),
        ("server.host", &mut config.server.host),
    ];
    for (field, value) in fields {
        *value = expand_env(value, field)?;
    }
    Ok(())
}

/// Expand one value. A bare `$VAR` without braces is kept as written.
fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }
    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}}: {}", err.var_name, err.cause),
        })
}
