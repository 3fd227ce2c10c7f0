use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::output::{emit, render_account, render_cluster, render_subscription};
use super::{Cli, Commands, OutputFormat};
use crate::{
    app::{config_location, load_config},
    connection::{connection_from_config, current_env, Connection},
    lookup::{
        get_account, get_active_cluster, get_hive_shard, get_subscription, is_cluster_ccs,
        is_valid_cluster_key,
    },
    utils::OcmError,
};

/// Connection plus the presentation settings from the same configuration
struct Session {
    connection: Connection,
    pager: Option<String>,
    format: OutputFormat,
}

impl Session {
    fn open(format: OutputFormat) -> Result<Self> {
        let config = load_config().map_err(|e| {
            debug!("Loading OCM configuration failed: {}", e);
            OcmError::ConfigUnavailable
        })?;
        let connection = connection_from_config(&config)?;

        Ok(Self {
            connection,
            pager: config.pager,
            format,
        })
    }

    fn print<T: Serialize>(&self, value: &T, render: impl Fn(&T) -> String) -> Result<()> {
        let text = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Text => render(value),
        };
        emit(&text, self.pager.as_deref())
    }
}

fn ensure_cluster_key(key: &str) -> Result<()> {
    if !is_valid_cluster_key(key) {
        bail!(
            "Invalid cluster key '{}': only letters, digits, '_' and '-' are allowed",
            key
        );
    }
    Ok(())
}

/// Handle CLI subcommands
pub async fn handle_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Cluster { key } => {
            ensure_cluster_key(key)?;
            let session = Session::open(cli.output)?;
            let cluster = get_active_cluster(&session.connection, key).await?;
            session.print(&cluster, render_cluster)
        }
        Commands::Subscription { key } => {
            ensure_cluster_key(key)?;
            let session = Session::open(cli.output)?;
            let subscription = get_subscription(&session.connection, key).await?;
            session.print(&subscription, render_subscription)
        }
        Commands::Account { key } => {
            let session = Session::open(cli.output)?;
            let account = get_account(&session.connection, key).await?;
            session.print(&account, render_account)
        }
        Commands::Ccs { cluster_id } => {
            ensure_cluster_key(cluster_id)?;
            let session = Session::open(cli.output)?;
            let ccs = is_cluster_ccs(&session.connection, cluster_id).await?;
            session.print(&json!({ "cluster_id": cluster_id, "ccs": ccs }), |_| {
                ccs.to_string()
            })
        }
        Commands::Shard { cluster_id } => {
            ensure_cluster_key(cluster_id)?;
            let session = Session::open(cli.output)?;
            let shard = get_hive_shard(&session.connection, cluster_id).await?;
            session.print(&json!({ "cluster_id": cluster_id, "shard": shard }), |_| {
                shard.clone()
            })
        }
        Commands::Env => {
            let session = Session::open(cli.output)?;
            let env = current_env(&session.connection);
            session.print(
                &json!({ "environment": env.as_str(), "url": session.connection.url() }),
                |_| env.to_string(),
            )
        }
        Commands::Config => show_config(),
        Commands::ConfigPath => {
            println!("{}", config_location()?.display());
            Ok(())
        }
        Commands::Version => {
            show_version();
            Ok(())
        }
    }
}

/// Print the effective configuration with secrets redacted
///
/// The record is JSON on disk, so both output formats print it as JSON.
fn show_config() -> Result<()> {
    let config = load_config()?.redacted();
    let text = serde_json::to_string_pretty(&config)?;
    emit(&text, config.pager.as_deref())
}

/// Show version information
pub fn show_version() {
    println!("ocm-util v{}", env!("CARGO_PKG_VERSION"));
    println!("   Resolve OpenShift Cluster Manager identifiers");
}
