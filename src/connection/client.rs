use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use super::gateway::Environment;
use super::tokens::{is_usable, Credentials, TokenErrorResponse, TokenResponse, TokenState};
use crate::api::{
    Account, ApiErrorBody, Cluster, ListPage, OcmApi, ProvisionShard, Subscription,
};
use crate::constants::{ACCOUNTS_PATH, CLUSTERS_PATH, SUBSCRIPTIONS_PATH};
use crate::utils::{OcmError, Result};

/// Authenticated connection to an OCM gateway
pub struct Connection {
    client: Client,
    url: Url,
    tokens: Mutex<TokenState>,
    credentials: Credentials,
}

// Tokens stay out of debug output
impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url.as_str())
            .field("token_url", &self.credentials.token_url)
            .finish_non_exhaustive()
    }
}

impl Connection {
    pub(crate) fn new(client: Client, url: Url, tokens: TokenState, credentials: Credentials) -> Self {
        Self {
            client,
            url,
            tokens: Mutex::new(tokens),
            credentials,
        }
    }

    /// Gateway URL, without a trailing slash
    pub fn url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Environment the gateway belongs to
    pub fn environment(&self) -> Environment {
        Environment::from_url(self.url())
    }

    /// A valid access token, renewed from the OpenID server when needed
    pub async fn access_token(&self) -> Result<String> {
        let mut tokens = self.tokens.lock().await;

        if let Some(access) = tokens
            .access
            .as_deref()
            .filter(|token| is_usable(token, Utc::now().timestamp()))
        {
            return Ok(access.to_string());
        }

        let params = self
            .credentials
            .grant_params(tokens.refresh.as_deref())
            .ok_or(OcmError::NotLoggedIn)?;

        debug!(
            "Requesting access token from {} ({} grant)",
            self.credentials.token_url, params[0].1
        );

        let response = self
            .client
            .post(&self.credentials.token_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<TokenErrorResponse>(&error_text) {
                Ok(err) => OcmError::Token(err.error_description.unwrap_or(err.error)),
                Err(_) => OcmError::Token(format!(
                    "token request failed with status {}: {}",
                    status, error_text
                )),
            });
        }

        let reply: TokenResponse = response.json().await?;
        tokens.access = Some(reply.access_token.clone());
        if let Some(refresh) = reply.refresh_token {
            tokens.refresh = Some(refresh);
        }

        Ok(reply.access_token)
    }

    /// Absolute URL for `base` followed by extra path segments
    pub(crate) fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.url.clone();
        url.set_path(base);
        url.path_segments_mut()
            .map_err(|_| OcmError::Connection(format!("URL '{}' cannot be a base", self.url)))?
            .extend(segments);
        Ok(url)
    }

    /// Authenticated GET returning the decoded JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let token = self.access_token().await?;

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = api_error(status.as_u16(), &error_text);
            warn!("OCM request failed: {}", err);
            return Err(err);
        }

        Ok(response.json().await?)
    }

    async fn search<T: DeserializeOwned>(
        &self,
        base: &str,
        search: &str,
        size: Option<u32>,
    ) -> Result<ListPage<T>> {
        let mut query = vec![("search", search.to_string())];
        if let Some(size) = size {
            query.push(("size", size.to_string()));
        }

        let url = self.endpoint(base, &[])?;
        self.get_json(url, &query).await
    }
}

/// Turn a failed response into an error, using the OCM error body when present
pub(crate) fn api_error(status: u16, body: &str) -> OcmError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).unwrap_or_default();
    let reason = parsed.reason.unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("request failed with status {}", status)
        } else {
            body.trim().to_string()
        }
    });

    OcmError::Api {
        status,
        id: parsed.id,
        code: parsed.code,
        reason,
        operation_id: parsed.operation_id,
    }
}

#[async_trait]
impl OcmApi for Connection {
    async fn list_subscriptions(
        &self,
        search: &str,
        size: Option<u32>,
    ) -> Result<ListPage<Subscription>> {
        self.search(SUBSCRIPTIONS_PATH, search, size).await
    }

    async fn list_accounts(&self, search: &str, size: Option<u32>) -> Result<ListPage<Account>> {
        self.search(ACCOUNTS_PATH, search, size).await
    }

    async fn list_clusters(&self, search: &str, size: Option<u32>) -> Result<ListPage<Cluster>> {
        self.search(CLUSTERS_PATH, search, size).await
    }

    async fn get_cluster(&self, id: &str) -> Result<Cluster> {
        let url = self.endpoint(CLUSTERS_PATH, &[id])?;
        self.get_json(url, &[]).await
    }

    async fn get_provision_shard(&self, cluster_id: &str) -> Result<ProvisionShard> {
        let url = self.endpoint(CLUSTERS_PATH, &[cluster_id, "provision_shard"])?;
        self.get_json(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::tokens::fake_jwt;
    use crate::connection::ConnectionBuilder;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    /// Local gateway answering one connection per reply, in order
    ///
    /// Returns its base URL and the raw requests it received.
    async fn serve(replies: Vec<(&'static str, String)>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let _ = tx.send(read_request(&mut socket).await);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (base, rx)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    fn logged_in(base: &str) -> Connection {
        ConnectionBuilder::new()
            .url(base)
            .tokens(Some(fake_jwt(Utc::now().timestamp() + 3600)), None)
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let connection = ConnectionBuilder::new()
            .url("https://api.stage.openshift.com/")
            .tokens(Some("opaque".to_string()), None)
            .build()
            .unwrap();

        assert_eq!(connection.url(), "https://api.stage.openshift.com");
        assert_eq!(connection.environment(), Environment::Stage);

        let url = connection
            .endpoint(CLUSTERS_PATH, &["abc/def", "provision_shard"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.stage.openshift.com/api/clusters_mgmt/v1/clusters/abc%2Fdef/provision_shard"
        );
    }

    #[test]
    fn test_api_error_body() {
        let err = api_error(
            404,
            r#"{"kind":"Error","id":"404","href":"/api/clusters_mgmt/v1/errors/404","code":"CLUSTERS-MGMT-404","reason":"Cluster 'abc' not found","operation_id":"op-1"}"#,
        );
        match &err {
            OcmError::Api { status, code, reason, .. } => {
                assert_eq!(*status, 404);
                assert_eq!(code.as_deref(), Some("CLUSTERS-MGMT-404"));
                assert_eq!(reason, "Cluster 'abc' not found");
            }
            other => panic!("Expected API error, got {:?}", other),
        }
        assert!(err.to_string().ends_with("Cluster 'abc' not found"));

        match api_error(502, "") {
            OcmError::Api { reason, .. } => assert_eq!(reason, "request failed with status 502"),
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fresh_token_is_reused() {
        let token = fake_jwt(Utc::now().timestamp() + 3600);
        let connection = ConnectionBuilder::new()
            .tokens(Some(token.clone()), None)
            .build()
            .unwrap();

        assert_eq!(connection.access_token().await.unwrap(), token);
    }

    #[tokio::test]
    async fn test_expired_token_without_credentials() {
        let connection = ConnectionBuilder::new()
            .tokens(Some(fake_jwt(Utc::now().timestamp() - 3600)), None)
            .build()
            .unwrap();

        let err = connection.access_token().await.unwrap_err();
        assert!(matches!(err, OcmError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_refresh_grant_stores_rotated_token() {
        let (base, mut requests) = serve(vec![(
            "200 OK",
            json!({
                "access_token": "fresh-access",
                "refresh_token": "rotated-refresh",
                "token_type": "Bearer"
            })
            .to_string(),
        )])
        .await;

        let connection = ConnectionBuilder::new()
            .url(base.as_str())
            .tokens(
                Some(fake_jwt(Utc::now().timestamp() - 60)),
                Some("old-refresh".to_string()),
            )
            .token_url(Some(format!("{}/token", base)))
            .build()
            .unwrap();

        assert_eq!(connection.access_token().await.unwrap(), "fresh-access");

        let request = requests.recv().await.unwrap();
        assert!(request.starts_with("POST /token HTTP/1.1"));
        assert!(request.contains("grant_type=refresh_token"));
        assert!(request.contains("refresh_token=old-refresh"));
        assert!(request.contains("client_id=cloud-services"));

        {
            let tokens = connection.tokens.lock().await;
            assert_eq!(tokens.access.as_deref(), Some("fresh-access"));
            assert_eq!(tokens.refresh.as_deref(), Some("rotated-refresh"));
        }

        // The stub has no replies left, so this must not hit the network
        assert_eq!(connection.access_token().await.unwrap(), "fresh-access");
    }

    #[tokio::test]
    async fn test_token_endpoint_rejection() {
        let (base, _requests) = serve(vec![(
            "400 Bad Request",
            json!({
                "error": "invalid_grant",
                "error_description": "Offline user session not found"
            })
            .to_string(),
        )])
        .await;

        let connection = ConnectionBuilder::new()
            .url(base.as_str())
            .tokens(None, Some("stale".to_string()))
            .token_url(Some(format!("{}/token", base)))
            .build()
            .unwrap();

        let err = connection.access_token().await.unwrap_err();
        assert_eq!(err.to_string(), "Token error: Offline user session not found");
    }

    #[tokio::test]
    async fn test_failed_request_carries_error_body() {
        let (base, mut requests) = serve(vec![(
            "404 Not Found",
            json!({
                "kind": "Error",
                "id": "404",
                "code": "CLUSTERS-MGMT-404",
                "reason": "Cluster 'abc' not found",
                "operation_id": "op-1"
            })
            .to_string(),
        )])
        .await;

        let err = logged_in(&base).get_cluster("abc").await.unwrap_err();
        match err {
            OcmError::Api {
                status,
                code,
                reason,
                operation_id,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("CLUSTERS-MGMT-404"));
                assert_eq!(reason, "Cluster 'abc' not found");
                assert_eq!(operation_id.as_deref(), Some("op-1"));
            }
            other => panic!("Expected API error, got {:?}", other),
        }

        let request = requests.recv().await.unwrap();
        assert!(request.starts_with("GET /api/clusters_mgmt/v1/clusters/abc HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_list_clusters_request() {
        let (base, mut requests) = serve(vec![(
            "200 OK",
            json!({
                "kind": "ClusterList",
                "page": 1,
                "size": 1,
                "total": 1,
                "items": [{ "kind": "Cluster", "id": "abc", "name": "my-cluster" }]
            })
            .to_string(),
        )])
        .await;

        let page = logged_in(&base)
            .list_clusters("name = 'my-cluster'", Some(1))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "abc");
        assert_eq!(page.items[0].name.as_deref(), Some("my-cluster"));

        let request = requests.recv().await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /api/clusters_mgmt/v1/clusters?search="));
        assert!(request_line.contains("search=name+%3D+%27my-cluster%27"));
        assert!(request_line.contains("size=1"));
        assert!(request.to_lowercase().contains("authorization: bearer "));
    }
}
