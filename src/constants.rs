/// Constants module to avoid magic strings in the codebase

// Gateway URLs
pub const PRODUCTION_URL: &str = "https://api.openshift.com";
pub const STAGING_URL: &str = "https://api.stage.openshift.com";
pub const INTEGRATION_URL: &str = "https://api.integration.openshift.com";

// Environment variables
pub const ENV_TOKEN: &str = "OCM_TOKEN";
pub const ENV_URL: &str = "OCM_URL";
pub const ENV_REFRESH_TOKEN: &str = "OCM_REFRESH_TOKEN";
pub const ENV_CONFIG: &str = "OCM_CONFIG";

// Config file locations
pub const LEGACY_CONFIG_FILE: &str = ".ocm.json";
pub const CONFIG_DIR_NAME: &str = "ocm";
pub const CONFIG_FILE_NAME: &str = "ocm.json";

// OpenID defaults
pub const DEFAULT_TOKEN_URL: &str =
    "https://sso.redhat.com/auth/realms/redhat-external/protocol/openid-connect/token";
pub const DEFAULT_CLIENT_ID: &str = "cloud-services";
pub const DEFAULT_SCOPES: &[&str] = &["openid"];

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60; // Renew tokens this close to expiry

// API paths
pub const SUBSCRIPTIONS_PATH: &str = "/api/accounts_mgmt/v1/subscriptions";
pub const ACCOUNTS_PATH: &str = "/api/accounts_mgmt/v1/accounts";
pub const CLUSTERS_PATH: &str = "/api/clusters_mgmt/v1/clusters";

// User-facing messages
pub const OCM_CONFIG_ERROR: &str = "Unable to load OCM config\nLogin with 'ocm login' or set OCM_TOKEN, OCM_URL and OCM_REFRESH_TOKEN environment variables";
pub const NOT_LOGGED_IN: &str = "Not logged in, run the 'ocm login' command";
pub const REDACTED: &str = "redacted";
