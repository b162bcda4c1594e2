//! HTTP client and configuration.

use crate::error::{ApiError, BuildError};
use crate::library::Library;
use crate::reader::Reader;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Root of the hosted Readwise service. API version prefixes are added by
/// the [`Library`] (v2) and [`Reader`] (v3) handles.
pub(crate) const DEFAULT_BASE_URL: &str = "https://readwise.io";

/// Join a path to a base URL, passing absolute locators through verbatim.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

/// A Readwise API client.
///
/// The client is cloneable and can be shared across threads. It manages
/// connection pooling and attaches the account token to every request.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) default_headers: HeaderMap,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client with default settings.
    ///
    /// The token is the account token from <https://readwise.io/access_token>.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build or the token is not a valid
    /// header value. Use `Client::builder(token).build()` for fallible
    /// construction.
    pub fn new(token: impl Into<String>) -> Self {
        ClientBuilder::new(token)
            .build()
            .expect("Failed to build default HTTP client")
    }

    /// Create a client builder for customization.
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// Handle for the Readwise API (v2): books, highlights, tags.
    ///
    /// No network request is made until an operation is called.
    pub fn library(&self) -> Library {
        Library::new(self.clone())
    }

    /// Handle for the Readwise Reader API (v3): saved documents.
    ///
    /// No network request is made until an operation is called.
    pub fn reader(&self) -> Reader {
        Reader::new(self.clone())
    }

    /// Issue a GET request and buffer the response.
    ///
    /// Does not inspect the response status; callers decide what a
    /// non-success status means.
    pub(crate) async fn get_raw(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<ApiResponse, ApiError> {
        tracing::debug!(url, ?params, "GET");
        let mut req = self.inner.get(url).headers(self.default_headers.clone());
        if !params.is_empty() {
            req = req.query(params);
        }
        self.execute(req).await
    }

    /// Issue a POST request with a JSON body and buffer the response.
    pub(crate) async fn post_raw(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError> {
        tracing::debug!(url, "POST");
        let req = self
            .inner
            .post(url)
            .headers(self.default_headers.clone())
            .json(body);
        self.execute(req).await
    }

    /// Issue a DELETE request and buffer the response.
    pub(crate) async fn delete_raw(&self, url: &str) -> Result<ApiResponse, ApiError> {
        tracing::debug!(url, "DELETE");
        let req = self.inner.delete(url).headers(self.default_headers.clone());
        self.execute(req).await
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let resp = req.send().await?;

        // Extract metadata before consuming the body
        let status = resp.status();
        let headers = resp.headers().clone();
        let url = resp.url().to_string();
        let body = resp.bytes().await?;

        Ok(ApiResponse {
            status,
            headers,
            url,
            body,
        })
    }
}

/// A buffered HTTP response from the API.
///
/// The body is held in memory so it can be decoded more than once: the
/// pagination machinery reads the `next` field, while callers typically
/// decode `results` into their own types.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) url: String,
    pub(crate) body: Bytes,
}

impl ApiResponse {
    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL the response was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as text (lossy for invalid UTF-8).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-success response into the matching [`ApiError`].
    ///
    /// A 429 carries the parsed `Retry-After` header so callers can decide
    /// how long to wait; the client itself never sleeps on it.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            return Ok(self);
        }
        let status = self.status.as_u16();
        if status == 429 {
            return Err(ApiError::RateLimited {
                retry_after: self.retry_after(),
            });
        }
        Err(ApiError::from_status(status, &self.url))
    }

    fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}

/// Builder for configuring a Client.
#[must_use = "builders do nothing unless you call .build()"]
pub struct ClientBuilder {
    token: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the service root (default `https://readwise.io`).
    ///
    /// Mainly useful for pointing the client at a mock server in tests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header for all requests.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.user_agent = Some(value.into());
        self
    }

    /// Build the client.
    ///
    /// Returns an error if the token is not a valid header value or the
    /// underlying HTTP client fails to build (e.g., TLS configuration).
    pub fn build(self) -> Result<Client, BuildError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut token_value = HeaderValue::from_str(&format!("Token {}", self.token))
            .map_err(|_| BuildError::InvalidToken)?;
        token_value.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, token_value);

        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let inner = builder.build()?;

        Ok(Client {
            inner,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://readwise.io/api/v2", "/books/"),
            "https://readwise.io/api/v2/books/"
        );
        assert_eq!(
            join_url("https://readwise.io/api/v2/", "/books/"),
            "https://readwise.io/api/v2/books/"
        );
        // Absolute locators are not rebased
        assert_eq!(
            join_url("https://readwise.io/api/v2", "https://elsewhere.io/books/?page=2"),
            "https://elsewhere.io/books/?page=2"
        );
    }

    #[test]
    fn test_builder_defaults() {
        let client = Client::builder("test_token").build().unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            client.default_headers.get(ACCEPT).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_builder_rejects_invalid_token() {
        let result = Client::builder("bad\ntoken").build();
        assert!(matches!(result, Err(BuildError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_requests_carry_auth_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/books/"))
            .and(header("Authorization", "Token test_token"))
            .and(header("Accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"results": [], "next": null})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder("test_token")
            .base_url(server.uri())
            .build()
            .unwrap();

        let response = client
            .get_raw(&format!("{}/api/v2/books/", server.uri()), &[])
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_error_for_status_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/highlights/"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "30")
                    .set_body_json(serde_json::json!({"detail": "throttled"})),
            )
            .mount(&server)
            .await;

        let client = Client::builder("test_token")
            .base_url(server.uri())
            .build()
            .unwrap();

        let response = client
            .get_raw(&format!("{}/api/v2/highlights/", server.uri()), &[])
            .await
            .unwrap();
        match response.error_for_status() {
            Err(ApiError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }
}
