use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::matching::single_match;
use crate::api::{search, Cluster, OcmApi};
use crate::utils::{OcmError, Result};

// ASCII word characters and dashes, like the keys OCM itself generates
static CLUSTER_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("cluster key pattern is valid"));

/// Whether `key` can be used as a cluster name or identifier in a search
pub fn is_valid_cluster_key(key: &str) -> bool {
    CLUSTER_KEY.is_match(key)
}

/// Find the one cluster whose id, name or external id is `key`
pub async fn get_cluster<A>(api: &A, key: &str) -> Result<Cluster>
where
    A: OcmApi + ?Sized,
{
    search_cluster(api, key, "clusterId").await
}

/// Resolve `key` to a cluster, preferring reserved or active subscriptions
///
/// Clusters that do not report metrics have no external id in the accounts
/// service, so when no subscription matches, the clusters service is searched
/// directly.
pub async fn get_active_cluster<A>(api: &A, key: &str) -> Result<Cluster>
where
    A: OcmApi + ?Sized,
{
    let subscriptions = api
        .list_subscriptions(&search::active_subscription_by_cluster(key), Some(1))
        .await
        .map_err(|e| OcmError::retrieve("subscription", "key", key, e))?;

    let total = subscriptions.total;
    if total == 1 {
        let cluster_id = subscriptions
            .items
            .first()
            .and_then(|sub| sub.cluster_id())
            .map(str::to_string);

        if let Some(id) = cluster_id {
            debug!("Key '{}' matched subscription for cluster {}", key, id);
            return api
                .get_cluster(&id)
                .await
                .map_err(|e| OcmError::retrieve("cluster", "key", key, e));
        }
    }

    if total > 1 {
        return Err(OcmError::MatchCount {
            kind: "subscriptions",
            qualifier: "cluster identifier or name",
            key: key.to_string(),
            total,
            expected_one: false,
        });
    }

    debug!("No active subscription for '{}', searching clusters", key);
    search_cluster(api, key, "key").await
}

async fn search_cluster<A>(api: &A, key: &str, label: &'static str) -> Result<Cluster>
where
    A: OcmApi + ?Sized,
{
    let page = api
        .list_clusters(&search::cluster_by_key(key), Some(1))
        .await
        .map_err(|e| OcmError::retrieve("clusters", label, key, e))?;

    single_match(page, "clusters", "identifier or name", key)
}

/// Whether the cluster runs in a customer-provided cloud account
pub async fn is_cluster_ccs<A>(api: &A, cluster_id: &str) -> Result<bool>
where
    A: OcmApi + ?Sized,
{
    let cluster = api.get_cluster(cluster_id).await?;
    Ok(cluster.is_ccs())
}

/// API server of the Hive shard the cluster was provisioned from
pub async fn get_hive_shard<A>(api: &A, cluster_id: &str) -> Result<String>
where
    A: OcmApi + ?Sized,
{
    let shard = api.get_provision_shard(cluster_id).await?;

    shard
        .server()
        .map(str::to_string)
        .ok_or_else(|| OcmError::MissingShard(cluster_id.to_string()))
}
