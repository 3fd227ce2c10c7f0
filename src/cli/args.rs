use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ocm-util")]
#[command(version)]
#[command(about = "Resolve OpenShift Cluster Manager clusters, subscriptions and accounts", long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active cluster with this name, id or external id
    Cluster {
        /// Cluster name, OCM id or external id
        key: String,
    },
    /// Show the subscription for a cluster name, cluster id or subscription id
    Subscription {
        /// Display name, cluster id, external cluster id or subscription id
        key: String,
    },
    /// Show the account with this username or id
    Account {
        /// Username or account id
        key: String,
    },
    /// Tell whether a cluster runs in a customer cloud account (CCS)
    Ccs {
        /// OCM cluster id
        cluster_id: String,
    },
    /// Show the Hive shard a cluster was provisioned from
    Shard {
        /// OCM cluster id
        cluster_id: String,
    },
    /// Show the OCM environment of the configured gateway
    Env,
    /// Show the effective configuration, with secrets redacted
    Config,
    /// Show where the configuration file is read from
    ConfigPath,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable text
    Text,
    /// JSON as returned by the API
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ocm-util", "cluster", "my-cluster", "-o", "json", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Cluster { key } => assert_eq!(key, "my-cluster"),
            other => panic!("Expected cluster command, got {:?}", other),
        }
    }

    #[test]
    fn test_key_is_required() {
        assert!(Cli::try_parse_from(["ocm-util", "account"]).is_err());
    }
}
