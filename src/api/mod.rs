// Gateway module for api - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod traits;
mod types;

// Search expressions are useful on their own for ad-hoc queries
pub mod search;

// Public re-exports - the ONLY way to access api functionality
#[cfg(test)]
pub use traits::MockOcmApi;
pub use traits::OcmApi;
pub use types::{
    Account, ApiErrorBody, Ccs, Cluster, ClusterApi, ClusterConsole, HiveConfig, ListPage,
    ObjectRef, ProvisionShard, Subscription,
};
