//! HTTP client with connection pooling and retry logic

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;
use xscan_config::NetworkConfig;
use xscan_errors::{Error, NetworkError};
use xscan_types::Credential;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub retry_count: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // 5 minutes for large scans
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
            user_agent: format!("xscan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            timeout: Duration::from_secs(network.timeout),
            connect_timeout: Duration::from_secs(network.connect_timeout),
            retry_count: network.retries,
            retry_delay: Duration::from_secs(network.retry_delay),
            ..Self::default()
        }
    }
}

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created due to invalid configuration
    /// or if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    /// Execute an authenticated GET request with retries
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retry attempts, including
    /// network timeouts, connection failures, or rate limiting.
    pub async fn get(&self, url: &Url, credential: Option<&Credential>) -> Result<Response, Error> {
        debug!(%url, "GET");
        self.retry_request(self.config.retry_count, || {
            authorize(self.client.get(url.clone()), credential)
        })
        .await
    }

    /// Execute an authenticated GET request exactly once
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rate-limits it.
    pub async fn get_once(
        &self,
        url: &Url,
        credential: Option<&Credential>,
    ) -> Result<Response, Error> {
        debug!(%url, "GET (no retry)");
        self.retry_request(0, || authorize(self.client.get(url.clone()), credential))
            .await
    }

    /// Execute an authenticated POST request with a JSON body and retries
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retry attempts, including
    /// network timeouts, connection failures, or rate limiting.
    pub async fn post_json<T>(
        &self,
        url: &Url,
        credential: Option<&Credential>,
        body: &T,
    ) -> Result<Response, Error>
    where
        T: Serialize + ?Sized,
    {
        debug!(%url, "POST");
        self.retry_request(self.config.retry_count, || {
            authorize(self.client.post(url.clone()), credential).json(body)
        })
        .await
    }

    /// Execute a request, retrying up to `retries` more times
    async fn retry_request<F>(&self, retries: u32, mut build: F) -> Result<Response, Error>
    where
        F: FnMut() -> RequestBuilder,
    {
        let mut last_error = None;

        for attempt in 0..=retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay * attempt).await;
            }

            match build().send().await {
                Ok(response) => {
                    // Check for rate limiting
                    if response.status() == StatusCode::TOO_MANY_REQUESTS {
                        if let Some(retry_after) = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                        {
                            return Err(NetworkError::RateLimited {
                                seconds: retry_after,
                            }
                            .into());
                        }
                    }

                    return Ok(response);
                }
                Err(e) => {
                    let retry = Self::should_retry(&e);
                    debug!(attempt, error = %e, retry, "request failed");
                    last_error = Some(e);

                    // Don't retry on certain errors
                    if !retry {
                        break;
                    }
                }
            }
        }

        // Convert the last error
        match last_error {
            Some(e) if e.is_timeout() => Err(NetworkError::Timeout {
                url: e
                    .url()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default(),
            }
            .into()),
            Some(e) if e.is_connect() => Err(NetworkError::ConnectionRefused(e.to_string()).into()),
            Some(e) => Err(NetworkError::RequestFailed(e.to_string()).into()),
            None => Err(NetworkError::RequestFailed("Unknown error".to_string()).into()),
        }
    }

    /// Determine if an error should be retried
    fn should_retry(error: &reqwest::Error) -> bool {
        // Retry on timeout, connection errors, and server errors
        error.is_timeout()
            || error.is_connect()
            || error.status().is_some_and(|s| s.is_server_error())
    }
}

fn authorize(builder: RequestBuilder, credential: Option<&Credential>) -> RequestBuilder {
    match credential {
        Some(Credential::Token { token }) => builder.bearer_auth(token),
        Some(Credential::Basic { user, password }) => builder.basic_auth(user, Some(password)),
        None => builder,
    }
}
