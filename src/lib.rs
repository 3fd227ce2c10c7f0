//! Helpers for the OpenShift Cluster Manager (OCM) API.
//!
//! Resolves cluster names, subscription keys and account usernames to full
//! records, and builds authenticated connections from the `ocm` tool's
//! configuration file layered under `OCM_*` environment variables.

pub mod api;
pub mod app;
pub mod cli;
pub mod connection;
pub mod constants;
pub mod lookup;
pub mod utils;

pub use api::OcmApi;
pub use app::{load_config, OcmConfig};
pub use connection::{create_connection, current_env, Connection, ConnectionBuilder, Environment};
pub use lookup::{
    get_account, get_active_cluster, get_cluster, get_hive_shard, get_subscription,
    is_cluster_ccs, is_valid_cluster_key,
};
pub use utils::OcmError;
