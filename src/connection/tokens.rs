use base64::Engine;
use serde::Deserialize;

use crate::constants::{DEFAULT_CLIENT_ID, DEFAULT_SCOPES, TOKEN_EXPIRY_MARGIN_SECS};

/// Tokens currently held by a connection
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenState {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Everything needed to obtain new tokens from the OpenID server
#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub token_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub scopes: Vec<String>,
}

impl Credentials {
    fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID)
    }

    fn scope(&self) -> String {
        if self.scopes.is_empty() {
            DEFAULT_SCOPES.join(" ")
        } else {
            self.scopes.join(" ")
        }
    }

    pub fn has_client_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    pub fn has_password(&self) -> bool {
        self.user.is_some() && self.password.is_some()
    }

    /// Form parameters for the best grant available, if any
    ///
    /// Order: refresh token, client credentials, then user and password.
    pub fn grant_params(&self, refresh_token: Option<&str>) -> Option<Vec<(&'static str, String)>> {
        let mut params = if let Some(refresh) = refresh_token {
            vec![
                ("grant_type", "refresh_token".to_string()),
                ("refresh_token", refresh.to_string()),
            ]
        } else if self.has_client_credentials() {
            vec![("grant_type", "client_credentials".to_string())]
        } else if let (Some(user), Some(password)) = (&self.user, &self.password) {
            vec![
                ("grant_type", "password".to_string()),
                ("username", user.clone()),
                ("password", password.clone()),
            ]
        } else {
            return None;
        };

        params.push(("client_id", self.client_id().to_string()));
        if let Some(secret) = &self.client_secret {
            params.push(("client_secret", secret.clone()));
        }
        params.push(("scope", self.scope()));

        Some(params)
    }
}

/// Successful reply of the token endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Error reply of the token endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Expiry of a JWT in seconds since the epoch, if it can be read
pub(crate) fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}

/// Whether a token can still be used at `now`
///
/// Opaque tokens and tokens without an expiry claim are trusted as-is.
pub(crate) fn is_usable(token: &str, now: i64) -> bool {
    match token_expiry(token) {
        Some(exp) => exp.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS) > now,
        None => true,
    }
}

#[cfg(test)]
pub(crate) fn fake_jwt(exp: i64) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = engine.encode(format!(r#"{{"exp":{},"sub":"jdoe"}}"#, exp));
    format!("{}.{}.", header, payload)
}
