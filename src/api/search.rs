//! Search expressions understood by the OCM list endpoints

/// Quote a value as a search literal, doubling embedded single quotes
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Subscriptions whose name or any cluster/subscription identifier is `key`
pub fn subscription_by_key(key: &str) -> String {
    let k = literal(key);
    format!(
        "(display_name = {k} or cluster_id = {k} or external_cluster_id = {k} or id = {k})"
    )
}

/// Reserved or active subscriptions for the cluster named or identified by `key`
pub fn active_subscription_by_cluster(key: &str) -> String {
    let k = literal(key);
    format!(
        "(display_name = {k} or cluster_id = {k} or external_cluster_id = {k}) and \
         status in ('Reserved', 'Active')"
    )
}

/// Accounts whose username or identifier is `key`
pub fn account_by_key(key: &str) -> String {
    let k = literal(key);
    format!("(username = {k} or id = {k})")
}

/// Clusters whose identifier, name or external identifier is `key`
pub fn cluster_by_key(key: &str) -> String {
    let k = literal(key);
    format!("id = {k} or name = {k} or external_id = {k}")
}
