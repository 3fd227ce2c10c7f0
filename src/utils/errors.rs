use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{NOT_LOGGED_IN, OCM_CONFIG_ERROR};

/// Main error type for ocm-util
#[derive(Error, Debug)]
pub enum OcmError {
    /// Layered configuration could not be assembled
    #[error("{}", OCM_CONFIG_ERROR)]
    ConfigUnavailable,

    #[error("could not load OCM configuration file")]
    ConfigFile(#[source] Box<OcmError>),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("can't read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse config file '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid OCM_URL found: {0}\nValid URL aliases are: 'production', 'staging', 'integration'")]
    InvalidUrl(String),

    #[error("{}", NOT_LOGGED_IN)]
    NotLoggedIn,

    #[error("failed to create OCM connection: {0}")]
    Connection(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Error body returned by the gateway
    #[error("status is {status}, identifier is '{}', code is '{}' and operation identifier is '{}': {reason}",
        .id.as_deref().unwrap_or_default(),
        .code.as_deref().unwrap_or_default(),
        .operation_id.as_deref().unwrap_or_default())]
    Api {
        status: u16,
        id: Option<String>,
        code: Option<String>,
        reason: String,
        operation_id: Option<String>,
    },

    #[error("can't retrieve {what} for {label} '{key}': {source}")]
    Retrieve {
        what: &'static str,
        label: &'static str,
        key: String,
        #[source]
        source: Box<OcmError>,
    },

    /// A search that should single out one record matched some other number
    #[error("there are {total} {kind} with {qualifier} '{key}'{}", expected_suffix(.expected_one))]
    MatchCount {
        kind: &'static str,
        qualifier: &'static str,
        key: String,
        total: u64,
        expected_one: bool,
    },

    /// The server counted one match but sent no item for it
    #[error("search for {kind} with {qualifier} '{key}' reported 1 match but returned no items")]
    EmptyPage {
        kind: &'static str,
        qualifier: &'static str,
        key: String,
    },

    #[error("Unable to retrieve shard for cluster {0}")]
    MissingShard(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl OcmError {
    /// Wrap an API failure with the lookup that caused it
    pub fn retrieve(what: &'static str, label: &'static str, key: &str, source: OcmError) -> Self {
        OcmError::Retrieve {
            what,
            label,
            key: key.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<figment::Error> for OcmError {
    fn from(err: figment::Error) -> Self {
        OcmError::Config(Box::new(err))
    }
}

fn expected_suffix(expected_one: &bool) -> &'static str {
    if *expected_one {
        ", expected 1"
    } else {
        ""
    }
}

pub type Result<T> = std::result::Result<T, OcmError>;
