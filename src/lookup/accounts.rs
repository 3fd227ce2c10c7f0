use tracing::debug;

use super::matching::single_match;
use crate::api::{search, Account, OcmApi, Subscription};
use crate::utils::{OcmError, Result};

/// Find the one subscription whose name, cluster id, external id or id is `key`
pub async fn get_subscription<A>(api: &A, key: &str) -> Result<Subscription>
where
    A: OcmApi + ?Sized,
{
    let page = api
        .list_subscriptions(&search::subscription_by_key(key), None)
        .await
        .map_err(|e| OcmError::retrieve("subscription", "key", key, e))?;

    debug!("Subscription search for '{}' matched {}", key, page.total);
    single_match(page, "subscriptions", "cluster identifier or name", key)
}

/// Find the one account whose username or id is `key`
pub async fn get_account<A>(api: &A, key: &str) -> Result<Account>
where
    A: OcmApi + ?Sized,
{
    let page = api
        .list_accounts(&search::account_by_key(key), None)
        .await
        .map_err(|e| OcmError::retrieve("account", "key", key, e))?;

    single_match(page, "accounts", "id or username", key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockOcmApi;
    use crate::lookup::test_support::page;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn account(id: &str, username: &str) -> Account {
        Account {
            id: id.to_string(),
            username: Some(username.to_string()),
            ..Account::default()
        }
    }

    #[tokio::test]
    async fn test_get_account_single_match() {
        let mut api = MockOcmApi::new();
        api.expect_list_accounts()
            .with(eq("(username = 'jdoe' or id = 'jdoe')"), eq(None::<u32>))
            .times(1)
            .returning(|_, _| Ok(page(1, vec![account("1abc", "jdoe")])));

        let found = get_account(&api, "jdoe").await.unwrap();
        assert_eq!(found.id, "1abc");
    }

    #[tokio::test]
    async fn test_get_account_counts() {
        let mut api = MockOcmApi::new();
        api.expect_list_accounts()
            .returning(|_, _| Ok(page(0, Vec::new())));

        let err = get_account(&api, "ghost").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "there are 0 accounts with id or username 'ghost', expected 1"
        );

        let mut api = MockOcmApi::new();
        api.expect_list_accounts().returning(|_, _| {
            Ok(page(2, vec![account("1", "dup"), account("2", "dup")]))
        });

        let err = get_account(&api, "dup").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "there are 2 accounts with id or username 'dup', expected 1"
        );
    }

    #[tokio::test]
    async fn test_get_account_api_failure() {
        let mut api = MockOcmApi::new();
        api.expect_list_accounts()
            .returning(|_, _| Err(OcmError::Token("invalid_grant".to_string())));

        let err = get_account(&api, "jdoe").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't retrieve account for key 'jdoe': Token error: invalid_grant"
        );
    }

    #[tokio::test]
    async fn test_get_subscription() {
        let mut api = MockOcmApi::new();
        api.expect_list_subscriptions()
            .withf(|search, size| search.contains("or id = 'sub-1')") && size.is_none())
            .returning(|_, _| {
                Ok(page(
                    1,
                    vec![Subscription {
                        id: "sub-1".to_string(),
                        cluster_id: Some("c1".to_string()),
                        ..Subscription::default()
                    }],
                ))
            });

        let sub = get_subscription(&api, "sub-1").await.unwrap();
        assert_eq!(sub.cluster_id(), Some("c1"));
    }

    #[tokio::test]
    async fn test_get_subscription_many() {
        let mut api = MockOcmApi::new();
        api.expect_list_subscriptions()
            .returning(|_, _| Ok(page(3, Vec::new())));

        let err = get_subscription(&api, "prod").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "there are 3 subscriptions with cluster identifier or name 'prod', expected 1"
        );
    }

    #[tokio::test]
    async fn test_get_subscription_counted_but_missing() {
        let mut api = MockOcmApi::new();
        api.expect_list_subscriptions()
            .returning(|_, _| Ok(page(1, Vec::new())));

        let err = get_subscription(&api, "prod").await.unwrap_err();
        assert!(matches!(err, OcmError::EmptyPage { .. }));
        assert!(!err.to_string().contains("there are 1"));
    }
}
