//! Transport client
//!
//! One explicitly constructed [`HttpClient`] carries the base URL, the fixed
//! timeout and the interceptor pipeline. Every call wrapper funnels through
//! [`HttpClient::send`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client as ReqwestClient, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::http::auth::{NoTokenStore, TokenStore};
use crate::http::interceptor::InterceptorPipeline;
use crate::http::notify::{Notifier, TracingNotifier};
use crate::http::request::{ContentType, MultipartPayload, RequestBody, RequestDescriptor};
use crate::http::wrappers;
use crate::{Error, Result};

/// Default server endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
/// Fixed per-request timeout, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 300 * 1000;

/// Transport configuration, fixed when the client is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base endpoint every path is resolved against
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the base URL parses and the timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| Error::Configuration {
            message: format!("Invalid base URL: {}", self.base_url),
            source: Some(anyhow::Error::new(e)),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "Unsupported base URL scheme: {}",
                url.scheme()
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::configuration("Request timeout cannot be zero"));
        }
        Ok(())
    }
}

/// Builder wiring the capabilities the interceptors need
pub struct HttpClientBuilder {
    config: ClientConfig,
    token_store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl HttpClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            token_store: Arc::new(NoTokenStore),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Source of the `Authorization` header
    pub fn token_store(mut self, token_store: Arc<dyn TokenStore>) -> Self {
        self.token_store = token_store;
        self
    }

    /// Surface for failure notifications
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        self.config.validate()?;

        let client = ReqwestClient::builder()
            .timeout(self.config.timeout())
            .build()
            .map_err(|e| Error::HttpRequest {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(HttpClient {
            client,
            config: self.config,
            pipeline: InterceptorPipeline::new(self.token_store, self.notifier),
        })
    }
}

/// Shared HTTP client; cheap to clone
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    config: ClientConfig,
    pipeline: InterceptorPipeline,
}

impl HttpClient {
    pub fn builder(config: ClientConfig) -> HttpClientBuilder {
        HttpClientBuilder::new(config)
    }

    /// Client with explicit capabilities
    pub fn new(
        config: ClientConfig,
        token_store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        Self::builder(config)
            .token_store(token_store)
            .notifier(notifier)
            .build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &InterceptorPipeline {
        &self.pipeline
    }

    /// Resolve a descriptor's path and query against the base URL
    ///
    /// Paths are appended to the base rather than RFC-joined, so a base with a
    /// path prefix keeps it. An empty path targets the base itself.
    pub fn resolve_url(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        let path = descriptor.path.trim_start_matches('/');
        let mut joined = if path.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
        };

        if let Some(query) = descriptor.query_string() {
            joined.push(if joined.contains('?') { '&' } else { '?' });
            joined.push_str(&query);
        }

        Url::parse(&joined).map_err(|e| Error::HttpRequest {
            message: format!("Failed to build URL for path: {}", descriptor.path),
            source: Some(Box::new(e)),
        })
    }

    /// Turn a descriptor into a reqwest request; no hooks run here
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Request> {
        let url = self.resolve_url(descriptor)?;
        let mut builder = self
            .client
            .request(descriptor.method.clone(), url)
            .headers(descriptor.headers.clone());

        builder = match &descriptor.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(text)) => builder.body(text.clone()),
            Some(RequestBody::Multipart(payload)) => builder.multipart(payload.to_form()?),
            None => builder,
        };

        // multipart bodies carry their own boundary-bearing content type
        let explicit = match (descriptor.content_type, &descriptor.body) {
            (ContentType::Multipart, Some(RequestBody::Multipart(_))) => None,
            (content_type, _) => content_type.header_value(),
        };
        if let Some(value) = explicit {
            builder = builder.header(reqwest::header::CONTENT_TYPE, value);
        }

        builder.build().map_err(|e| Error::HttpRequest {
            message: format!("Failed to build request: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Run a descriptor through the interceptors and the network
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn send(&self, mut descriptor: RequestDescriptor) -> Result<Response> {
        self.pipeline.pre_send(&mut descriptor)?;
        let request = self.build_request(&descriptor)?;

        let started = Instant::now();
        let outcome = self.client.execute(request).await;
        match &outcome {
            Ok(response) => tracing::debug!(
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "response received"
            ),
            Err(_) => tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "no response"
            ),
        }

        self.pipeline.post_receive(outcome).await
    }

    /// Send and decode the JSON body
    pub async fn send_json<R: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<R> {
        let response = self.send(descriptor).await?;
        let body = response.text().await.map_err(|e| Error::Transport {
            message: format!("Failed to read response body: {}", e),
            timeout: e.is_timeout(),
            source: Some(e),
        })?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::get(path, params)?).await
    }

    pub async fn post<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::post(path, params)?).await
    }

    pub async fn post_json<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::post_json(path, params)?).await
    }

    pub async fn post_sb<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::post_sb(path, params)?).await
    }

    pub async fn post_uncode<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::post_uncode(path, params)?).await
    }

    pub async fn up_file<R>(&self, path: &str, payload: Option<MultipartPayload>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.send_json(wrappers::up_file(path, payload)?).await
    }

    pub async fn put<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::put(path, params)?).await
    }

    pub async fn put_json<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::put_json(path, params)?).await
    }

    pub async fn delete<T, R>(&self, path: &str, params: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(wrappers::delete(path, params)?).await
    }
}
