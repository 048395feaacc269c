//! Client builder
//!
//! Construction-time options for [`ApiClient`]: the base URL every request
//! path is appended to, the transport (inject a shared `reqwest::Client` or
//! have one built from [`HttpConfig`]), the interceptor chain, and the
//! envelope family the client decodes responses into.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::client::ApiClient;
use crate::config::{HttpConfig, build_http_client};
use crate::envelope::{DefaultEnvelope, EnvelopeKind};
use crate::error::ClientError;
use crate::interceptor::{HttpInterceptor, RequestHook};

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder<K: EnvelopeKind = DefaultEnvelope> {
    http_client: Option<reqwest::Client>,
    http_config: HttpConfig,
    base_url: Option<String>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    _envelope: PhantomData<K>,
}

impl<K: EnvelopeKind> Default for ApiClientBuilder<K> {
    fn default() -> Self {
        Self {
            http_client: None,
            http_config: HttpConfig::default(),
            base_url: None,
            interceptors: Vec::new(),
            _envelope: PhantomData,
        }
    }
}

impl<K: EnvelopeKind> ApiClientBuilder<K> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix prepended to every request path. Required.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Inject a shared `reqwest::Client` instead of building one.
    ///
    /// Takes precedence over any [`HttpConfig`] settings on this builder.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Replace the whole HTTP configuration.
    pub fn http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Request timeout for the built transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    /// Connection timeout for the built transport.
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.http_config.connect_timeout = Some(connect_timeout);
        self
    }

    /// User agent for the built transport.
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.http_config.user_agent = Some(user_agent.into());
        self
    }

    /// Proxy URL for the built transport.
    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.http_config.proxy = Some(proxy.into());
        self
    }

    /// Default header applied to every request by the built transport.
    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.http_config.headers.insert(name.into(), value.into());
        self
    }

    /// Register an interceptor. Interceptors run in registration order.
    pub fn interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Register a request hook: a closure applied to every outgoing request
    /// builder before it is sent (header injection being the typical use).
    pub fn request_hook<F>(self, hook: F) -> Self
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync + 'static,
    {
        self.interceptor(Arc::new(RequestHook(hook)))
    }

    /// Switch the envelope family the client decodes responses into.
    pub fn envelope<K2: EnvelopeKind>(self) -> ApiClientBuilder<K2> {
        ApiClientBuilder {
            http_client: self.http_client,
            http_config: self.http_config,
            base_url: self.base_url,
            interceptors: self.interceptors,
            _envelope: PhantomData,
        }
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<ApiClient<K>, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".to_string()))?;
        let http_client = match self.http_client {
            Some(client) => client,
            None => build_http_client(&self.http_config)?,
        };
        Ok(ApiClient::from_parts(
            http_client,
            base_url,
            self.interceptors,
        ))
    }
}
