use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::client::Connection;
use super::gateway::resolve_gateway_url;
use super::tokens::{Credentials, TokenState};
use crate::app::{load_config, OcmConfig};
use crate::constants::{DEFAULT_TOKEN_URL, HTTP_REQUEST_TIMEOUT_SECS, PRODUCTION_URL};
use crate::utils::{OcmError, Result};

/// Builder for [`Connection`]
#[derive(Debug, Clone, Default)]
pub struct ConnectionBuilder {
    url: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    user: Option<String>,
    password: Option<String>,
    token_url: Option<String>,
    scopes: Vec<String>,
    insecure: bool,
}

impl ConnectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from everything in `config` except the gateway URL
    pub fn from_config(config: &OcmConfig) -> Self {
        Self::new()
            .tokens(config.access_token.clone(), config.refresh_token.clone())
            .client(config.client_id.clone(), config.client_secret.clone())
            .user(config.user.clone(), config.password.clone())
            .token_url(config.token_url.clone())
            .scopes(config.scopes.clone())
            .insecure(config.insecure)
    }

    /// Gateway URL; defaults to production
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn tokens(mut self, access: Option<String>, refresh: Option<String>) -> Self {
        self.access_token = access;
        self.refresh_token = refresh;
        self
    }

    pub fn client(mut self, id: Option<String>, secret: Option<String>) -> Self {
        self.client_id = id;
        self.client_secret = secret;
        self
    }

    pub fn user(mut self, user: Option<String>, password: Option<String>) -> Self {
        self.user = user;
        self.password = password;
        self
    }

    pub fn token_url(mut self, token_url: Option<String>) -> Self {
        self.token_url = token_url;
        self
    }

    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Skip TLS certificate verification
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn build(self) -> Result<Connection> {
        let raw_url = self.url.as_deref().unwrap_or(PRODUCTION_URL);
        let url = parse_http_url(raw_url)?;

        let credentials = Credentials {
            token_url: self
                .token_url
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            client_id: self.client_id,
            client_secret: self.client_secret,
            user: self.user,
            password: self.password,
            scopes: self.scopes,
        };

        if self.access_token.is_none()
            && self.refresh_token.is_none()
            && !credentials.has_client_credentials()
            && !credentials.has_password()
        {
            return Err(OcmError::NotLoggedIn);
        }

        parse_http_url(&credentials.token_url)?;

        let client = Client::builder()
            .user_agent(concat!("ocm-util/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(self.insecure)
            .build()
            .map_err(|e| OcmError::Connection(e.to_string()))?;

        if self.insecure {
            debug!("TLS verification disabled for {}", url);
        }

        let tokens = TokenState {
            access: self.access_token,
            refresh: self.refresh_token,
        };

        Ok(Connection::new(client, url, tokens, credentials))
    }
}

fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| OcmError::Connection(format!("invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(OcmError::Connection(format!(
            "unsupported scheme '{}' in URL '{}'",
            scheme, raw
        ))),
    }
}

/// Create a connection from the layered OCM configuration
pub fn create_connection() -> Result<Connection> {
    let config = load_config().map_err(|e| {
        debug!("Loading OCM configuration failed: {}", e);
        OcmError::ConfigUnavailable
    })?;

    connection_from_config(&config)
}

/// Create a connection from an already loaded configuration
pub fn connection_from_config(config: &OcmConfig) -> Result<Connection> {
    let url = config.url.as_deref().ok_or(OcmError::ConfigUnavailable)?;
    let gateway = resolve_gateway_url(url)?;

    match ConnectionBuilder::from_config(config).url(gateway).build() {
        Ok(connection) => Ok(connection),
        Err(OcmError::NotLoggedIn) => Err(OcmError::ConfigUnavailable),
        Err(e @ OcmError::Connection(_)) => Err(e),
        Err(e) => Err(OcmError::Connection(e.to_string())),
    }
}
