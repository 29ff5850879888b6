// This file is part of the terraform-provider-azurerm project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Azure Resource Manager HTTP client.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;

mod error;
pub mod logic;
pub mod machinelearning;
pub mod mssql;
mod retry;

pub use error::{ApiError, CloudError, CloudErrorBody};
pub use retry::RetryPolicy;

use retry::parse_retry_after;

const USER_AGENT: &str = concat!("terraform-provider-azurerm/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Bearer token, never printed
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Successful response, decoded on demand since 202 responses may have no body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub url: Url,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode(&self.url, &self.body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    next_link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: Url,
    token: AccessToken,
    retry: RetryPolicy,
    subscription_id: Option<String>,
}

impl ArmClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::from_reqwest(config.endpoint.as_str(), err))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: AccessToken::new(config.access_token.clone()),
            retry: RetryPolicy::with_max_retries(config.max_retries),
            subscription_id: config.subscription_id.clone(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    /// Absolute URL of a resource ID, with its `api-version`
    pub fn url(&self, path: &str, api_version: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint.join(path.trim_start_matches('/'))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<T, ApiError> {
        let url = self.url(path, api_version)?;
        self.send(Method::GET, url, None).await?.json()
    }

    pub async fn put(
        &self,
        path: &str,
        api_version: &str,
        body: &serde_json::Value,
    ) -> Result<RawResponse, ApiError> {
        let url = self.url(path, api_version)?;
        self.send(Method::PUT, url, Some(body)).await
    }

    /// POST without payload
    pub async fn post(&self, path: &str, api_version: &str) -> Result<RawResponse, ApiError> {
        let url = self.url(path, api_version)?;
        self.send(Method::POST, url, None).await
    }

    /// GET a collection, following `nextLink` until exhausted
    pub async fn list_json<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(self.url(path, api_version)?);
        while let Some(url) = next.take() {
            let page: Page<T> = self.send(Method::GET, url, None).await?.json()?;
            items.extend(page.value);
            if let Some(link) = page.next_link.filter(|link| !link.is_empty()) {
                next = Some(Url::parse(&link)?);
            }
        }
        Ok(items)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, ApiError> {
        let mut attempt = 0;
        loop {
            debug!(%method, %url, attempt, "sending request");
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(self.token.secret());
            if let Some(body) = body {
                request = request.json(body);
            }

            let (err, retry_after) = match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|value| value.to_str().ok())
                        .and_then(parse_retry_after);
                    let text = response
                        .text()
                        .await
                        .map_err(|err| ApiError::from_reqwest(url.as_str(), err))?;

                    if (200..300).contains(&status) {
                        debug!(%method, %url, status, "request succeeded");
                        return Ok(RawResponse {
                            url,
                            status,
                            body: text,
                        });
                    }

                    let err = ApiError::from_response_body(url.as_str(), status, &text);
                    if !RetryPolicy::is_retryable_status(status) {
                        return Err(err);
                    }
                    (err, retry_after)
                }
                Err(err) => {
                    let err = ApiError::from_reqwest(url.as_str(), err);
                    if !err.is_dropped_connection() {
                        return Err(err);
                    }
                    (err, None)
                }
            };

            if attempt >= self.retry.max_retries {
                return Err(err);
            }
            let delay = self.retry.delay(attempt, retry_after);
            attempt += 1;
            warn!(
                %method,
                %url,
                attempt,
                max = self.retry.max_retries,
                ?delay,
                "retrying request: {err}"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn decode<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const API_VERSION: &str = "2020-01-01";
    const RESOURCE: &str = "/subscriptions/sub/resourceGroups/rg";

    fn client(endpoint: &str) -> ArmClient {
        ArmClient::new(&ClientConfig {
            subscription_id: Some("sub".to_owned()),
            access_token: "secret-token".to_owned(),
            endpoint: Url::parse(endpoint).unwrap(),
            max_retries: 5,
        })
        .unwrap()
    }

    #[test]
    fn resource_urls() {
        let client = client("https://management.azure.com/");
        let url = client
            .url(
                "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Sql/servers/s1",
                "2023-08-01-preview",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://management.azure.com/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Sql/servers/s1?api-version=2023-08-01-preview"
        );
    }

    #[test]
    fn endpoint_with_path_prefix() {
        let client = client("https://proxy.example.com/arm/");
        let url = client.url("/subscriptions/sub", "2020-01-01").unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example.com/arm/subscriptions/sub?api-version=2020-01-01"
        );
    }

    #[test]
    fn token_is_redacted() {
        let client = client("https://management.azure.com/");
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"), "{debug}");
        assert_eq!(client.subscription_id(), Some("sub"));
        assert_eq!(client.retry.max_retries, 5);
    }

    #[test]
    fn pages() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"value": [1, 2], "nextLink": "https://next"}"#).unwrap();
        assert_eq!(page.value.len(), 2);
        assert_eq!(page.next_link.as_deref(), Some("https://next"));

        let page: Page<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert_eq!(page.next_link, None);
    }

    #[test]
    fn accepted_without_body() {
        let response = RawResponse {
            url: Url::parse("https://management.azure.com/x").unwrap(),
            status: 202,
            body: "\n".to_owned(),
        };
        assert!(!response.has_body());
    }

    #[test]
    fn decode_errors_name_the_url() {
        let url = Url::parse("https://management.azure.com/x").unwrap();
        let err = decode::<serde_json::Value>(&url, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(err.to_string().contains("https://management.azure.com/x"));
    }

    fn fast_client(endpoint: &str, max_retries: u32) -> ArmClient {
        client(endpoint).with_retry_policy(RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        })
    }

    async fn requests(server: &MockServer) -> usize {
        server.received_requests().await.unwrap().len()
    }

    #[tokio::test]
    async fn retries_throttled_and_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .and(query_param("api-version", API_VERSION))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "rg"})))
            .mount(&server)
            .await;

        let value: serde_json::Value = fast_client(&server.uri(), 3)
            .get_json(RESOURCE, API_VERSION)
            .await
            .unwrap();
        assert_eq!(value, json!({"name": "rg"}));
        assert_eq!(requests(&server).await, 3);
    }

    #[tokio::test]
    async fn honours_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let start = Instant::now();
        fast_client(&server.uri(), 3)
            .get_json::<serde_json::Value>(RESOURCE, API_VERSION)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(requests(&server).await, 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = fast_client(&server.uri(), 2)
            .get_json::<serde_json::Value>(RESOURCE, API_VERSION)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(requests(&server).await, 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "ResourceGroupNotFound", "message": "Resource group 'rg' could not be found."}
            })))
            .mount(&server)
            .await;

        let err = fast_client(&server.uri(), 3)
            .get_json::<serde_json::Value>(RESOURCE, API_VERSION)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ResourceGroupNotFound"), "{err}");
        assert_eq!(requests(&server).await, 1);
    }

    #[tokio::test]
    async fn retries_refused_connections() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = client(&format!("http://127.0.0.1:{port}")).with_retry_policy(RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        });

        let start = Instant::now();
        let err = client
            .get_json::<serde_json::Value>(RESOURCE, API_VERSION)
            .await
            .unwrap_err();
        assert!(err.is_dropped_connection(), "{err:?}");
        // at least half of each backoff: 25ms then 50ms
        assert!(start.elapsed() >= Duration::from_millis(75));
    }

    #[tokio::test]
    async fn put_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(RESOURCE))
            .and(body_json(json!({"location": "westeurope"})))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let response = fast_client(&server.uri(), 0)
            .put(RESOURCE, API_VERSION, &json!({"location": "westeurope"}))
            .await
            .unwrap();
        assert_eq!(response.status, 202);
        assert!(!response.has_body());
    }

    #[tokio::test]
    async fn follows_next_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RESOURCE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [1, 2],
                "nextLink": format!("{}/page2?api-version={API_VERSION}&$skiptoken=a", server.uri()),
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page2"))
            .and(query_param("$skiptoken", "a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [3],
                "nextLink": "",
            })))
            .mount(&server)
            .await;

        let items: Vec<u32> = fast_client(&server.uri(), 0)
            .list_json(RESOURCE, API_VERSION)
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(requests(&server).await, 2);
    }
}
