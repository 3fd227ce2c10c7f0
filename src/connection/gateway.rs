use std::fmt;

use crate::constants::{INTEGRATION_URL, PRODUCTION_URL, STAGING_URL};
use crate::utils::{OcmError, Result};

/// Accepted spellings of each gateway, including the full URLs themselves
const URL_ALIASES: &[(&str, &str)] = &[
    ("production", PRODUCTION_URL),
    ("prod", PRODUCTION_URL),
    ("prd", PRODUCTION_URL),
    (PRODUCTION_URL, PRODUCTION_URL),
    ("staging", STAGING_URL),
    ("stage", STAGING_URL),
    ("stg", STAGING_URL),
    (STAGING_URL, STAGING_URL),
    ("integration", INTEGRATION_URL),
    ("int", INTEGRATION_URL),
    (INTEGRATION_URL, INTEGRATION_URL),
];

/// Resolve a gateway alias or URL to the canonical gateway URL
pub fn resolve_gateway_url(value: &str) -> Result<&'static str> {
    let trimmed = value.trim().trim_end_matches('/');

    URL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, url)| *url)
        .ok_or_else(|| OcmError::InvalidUrl(value.to_string()))
}

/// OCM environment a gateway belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Stage,
    Integration,
}

impl Environment {
    /// Guess the environment from a gateway URL; unknown hosts count as production
    pub fn from_url(url: &str) -> Self {
        if url.contains("stage") {
            Environment::Stage
        } else if url.contains("integration") {
            Environment::Integration
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Stage => "stage",
            Environment::Integration => "integration",
        }
    }

    pub fn gateway_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_URL,
            Environment::Stage => STAGING_URL,
            Environment::Integration => INTEGRATION_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        for alias in ["production", "prod", "prd", "https://api.openshift.com/"] {
            assert_eq!(resolve_gateway_url(alias).unwrap(), PRODUCTION_URL);
        }
        for alias in ["staging", "stage", "stg", STAGING_URL] {
            assert_eq!(resolve_gateway_url(alias).unwrap(), STAGING_URL);
        }
        for alias in ["integration", "int", INTEGRATION_URL] {
            assert_eq!(resolve_gateway_url(alias).unwrap(), INTEGRATION_URL);
        }
    }

    #[test]
    fn test_unknown_alias_rejected() {
        let err = resolve_gateway_url("qa").unwrap_err();
        assert!(err.to_string().starts_with("Invalid OCM_URL found: qa\n"));
        assert!(resolve_gateway_url("https://example.com").is_err());
        assert!(resolve_gateway_url("").is_err());
    }

    #[test]
    fn test_environment_from_url() {
        assert_eq!(Environment::from_url(STAGING_URL), Environment::Stage);
        assert_eq!(Environment::from_url(INTEGRATION_URL), Environment::Integration);
        assert_eq!(Environment::from_url(PRODUCTION_URL), Environment::Production);
        assert_eq!(Environment::from_url("http://localhost:8000"), Environment::Production);
        assert_eq!(Environment::Stage.to_string(), "stage");
        assert_eq!(Environment::Integration.gateway_url(), INTEGRATION_URL);
    }
}
