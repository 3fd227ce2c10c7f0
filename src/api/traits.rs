use async_trait::async_trait;

use super::types::{Account, Cluster, ListPage, ProvisionShard, Subscription};
use crate::utils::Result;

/// The OCM endpoints the lookups rely on
///
/// `Connection` talks to the real gateway; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcmApi: Send + Sync {
    /// Search subscriptions in the accounts management service
    async fn list_subscriptions(
        &self,
        search: &str,
        size: Option<u32>,
    ) -> Result<ListPage<Subscription>>;

    /// Search accounts in the accounts management service
    async fn list_accounts(&self, search: &str, size: Option<u32>) -> Result<ListPage<Account>>;

    /// Search clusters in the clusters management service
    async fn list_clusters(&self, search: &str, size: Option<u32>) -> Result<ListPage<Cluster>>;

    /// Fetch a cluster by its OCM identifier
    async fn get_cluster(&self, id: &str) -> Result<Cluster>;

    /// Fetch the provision shard a cluster lives on
    async fn get_provision_shard(&self, cluster_id: &str) -> Result<ProvisionShard>;
}
