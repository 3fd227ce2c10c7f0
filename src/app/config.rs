use directories::BaseDirs;
use figment::{providers::Serialized, Figment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG, ENV_REFRESH_TOKEN, ENV_TOKEN, ENV_URL,
    LEGACY_CONFIG_FILE, REDACTED,
};
use crate::utils::{OcmError, Result};

/// Contents of the OCM configuration file
///
/// Shared with the `ocm` command line tool, so the JSON keys must not change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcmConfig {
    /// Bearer access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// OpenID client identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// OpenID client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Disables verification of TLS certificates and host names
    #[serde(default, skip_serializing_if = "is_false")]
    pub insecure: bool,

    /// User password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Offline or refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// OpenID scopes; when set they replace the default scopes completely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,

    /// OpenID token URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    /// API gateway URL, either complete or one of the environment aliases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// User name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Pager command, for example `less`; none means output is not paged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pager: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl OcmConfig {
    /// Turn empty strings into absent values
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            access_token: present(self.access_token),
            client_id: present(self.client_id),
            client_secret: present(self.client_secret),
            insecure: self.insecure,
            password: present(self.password),
            refresh_token: present(self.refresh_token),
            scopes: self.scopes.into_iter().filter(|s| !s.is_empty()).collect(),
            token_url: present(self.token_url),
            url: present(self.url),
            user: present(self.user),
            pager: present(self.pager),
        }
    }

    /// Copy safe to print: secrets are replaced, presence is kept
    pub fn redacted(&self) -> Self {
        let hide = |value: &Option<String>| value.as_ref().map(|_| REDACTED.to_string());

        Self {
            access_token: hide(&self.access_token),
            client_secret: hide(&self.client_secret),
            password: hide(&self.password),
            refresh_token: hide(&self.refresh_token),
            ..self.clone()
        }
    }

    /// Write the configuration as pretty JSON, readable by the owner only
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| OcmError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!("Saved OCM configuration to {}", path.display());
        Ok(())
    }
}

/// Values taken from the environment that override the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvOverrides {
    #[serde(rename = "access_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl EnvOverrides {
    /// Read `OCM_TOKEN`, `OCM_URL` and `OCM_REFRESH_TOKEN`; empty counts as unset
    pub fn from_env() -> Self {
        Self {
            token: env_value(ENV_TOKEN),
            url: env_value(ENV_URL),
            refresh_token: env_value(ENV_REFRESH_TOKEN),
        }
    }

    /// Whether every override is set, making the file unnecessary
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.url.is_some() && self.refresh_token.is_some()
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Load the effective configuration: file first, environment on top
pub fn load_config() -> Result<OcmConfig> {
    ocm_configuration(load_config_file)
}

/// Layer the process environment over whatever `loader` produces
pub fn ocm_configuration<F>(loader: F) -> Result<OcmConfig>
where
    F: FnOnce() -> Result<OcmConfig>,
{
    layer_configuration(EnvOverrides::from_env(), loader)
}

/// Layer `overrides` over the configuration produced by `loader`
///
/// The loader only runs when some override is missing, since users may
/// configure everything through the environment and have no file at all.
pub fn layer_configuration<F>(overrides: EnvOverrides, loader: F) -> Result<OcmConfig>
where
    F: FnOnce() -> Result<OcmConfig>,
{
    let mut figment = Figment::from(Serialized::defaults(OcmConfig::default()));

    if overrides.is_complete() {
        debug!("All OCM settings come from the environment, skipping config file");
    } else {
        let file_config = loader().map_err(|e| OcmError::ConfigFile(Box::new(e)))?;
        figment = figment.merge(Serialized::defaults(file_config));
    }

    figment = figment.merge(Serialized::defaults(overrides));

    let config: OcmConfig = figment.extract()?;
    Ok(config.normalized())
}

/// Location of the configuration file
///
/// `OCM_CONFIG` wins; otherwise the legacy `~/.ocm.json` when it exists,
/// and the standard `<config dir>/ocm/ocm.json` when it does not.
pub fn config_location() -> Result<PathBuf> {
    if let Some(path) = env_value(ENV_CONFIG) {
        return Ok(PathBuf::from(path));
    }

    let dirs = BaseDirs::new().ok_or(OcmError::NoHomeDir)?;

    let legacy = dirs.home_dir().join(LEGACY_CONFIG_FILE);
    if legacy.exists() {
        return Ok(legacy);
    }

    Ok(dirs.config_dir().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration file from its default location
pub fn load_config_file() -> Result<OcmConfig> {
    let path = config_location()?;
    load_config_from(&path)
}

/// Load a configuration file; a missing or empty file is an empty config
pub fn load_config_from(path: &Path) -> Result<OcmConfig> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No OCM config file at {}", path.display());
            return Ok(OcmConfig::default());
        }
        Err(source) => {
            return Err(OcmError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(OcmConfig::default());
    }

    let config: OcmConfig = serde_json::from_slice(&data).map_err(|source| OcmError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded OCM config from {}", path.display());
    Ok(config.normalized())
}
