/// Resolve human-provided identifiers to OCM records - Gateway
mod accounts;
mod clusters;
mod matching;

pub use accounts::{get_account, get_subscription};
pub use clusters::{
    get_active_cluster, get_cluster, get_hive_shard, is_cluster_ccs, is_valid_cluster_key,
};
