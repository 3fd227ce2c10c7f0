use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage<T> {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub size: u64,
    /// Number of matching records on the server, not just on this page
    #[serde(default)]
    pub total: u64,
    // A bare `default` would make serde require `T: Default`
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> ListPage<T> {
    /// The single record of a search, when the server found exactly one
    pub fn into_single(self) -> Option<T> {
        if self.total == 1 {
            self.items.into_iter().next()
        } else {
            None
        }
    }
}

/// Reference to another object, as embedded by the accounts service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Billing/registration record linking a cluster to an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_cluster_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Every other attribute the service returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subscription {
    /// Cluster identifier, if the subscription has been bound to a cluster
    pub fn cluster_id(&self) -> Option<&str> {
        self.cluster_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<ObjectRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterConsole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Customer cloud subscription settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ccs {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ClusterApi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<ClusterConsole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccs: Option<Ccs>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cluster {
    /// Whether the cluster runs in the customer's own cloud account
    pub fn is_ccs(&self) -> bool {
        self.ccs.as_ref().is_some_and(|ccs| ccs.enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiveConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

/// Hive shard a cluster was provisioned on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionShard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hive_config: Option<HiveConfig>,
}

impl ProvisionShard {
    pub fn server(&self) -> Option<&str> {
        self.hive_config
            .as_ref()
            .and_then(|hive| hive.server.as_deref())
            .filter(|server| !server.is_empty())
    }
}

/// Error body returned by the gateway on failed requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
}
