//! The request executor
//!
//! `ApiClient` is a thin wrapper over a shared `reqwest::Client`: it builds
//! request URLs from a base URL, serializes payloads to JSON, dispatches
//! GET/POST/PUT/DELETE calls and decodes the JSON envelope response into a
//! caller-supplied destination type. Every verb funnels into one
//! build/send/decode/unwrap routine; every step fails fast with a typed
//! error and nothing is retried.

use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::builder::ApiClientBuilder;
use crate::cancel::CancelHandle;
use crate::envelope::{DefaultEnvelope, Envelope, EnvelopeKind, PayloadError};
use crate::error::ClientError;
use crate::interceptor::{HttpInterceptor, HttpRequestContext};
use crate::params::Params;

/// A JSON-envelope API client.
///
/// Holds a shared `reqwest::Client` (externally owned or built once at
/// construction), a base URL, and an interceptor chain. The envelope family
/// `K` is the construction-time choice of which envelope shape responses
/// decode into; the default decodes
/// [`Resp`](crate::envelope::Resp).
///
/// Cloning is cheap and clones share the underlying connection pool. The
/// wrapper adds no synchronization of its own: `reqwest::Client` is safe
/// for concurrent use, so one `ApiClient` can serve many tasks.
pub struct ApiClient<K: EnvelopeKind = DefaultEnvelope> {
    http_client: reqwest::Client,
    base_url: String,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    _envelope: PhantomData<K>,
}

impl ApiClient {
    /// Create a client over an explicitly constructed `reqwest::Client`,
    /// decoding the default envelope.
    ///
    /// Use [`ApiClient::builder`] for interceptors, transport options or a
    /// custom envelope family.
    pub fn new<S: Into<String>>(http_client: reqwest::Client, base_url: S) -> Self {
        Self::from_parts(http_client, base_url.into(), Vec::new())
    }

    /// Returns a builder for constructing an `ApiClient`.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }
}

impl<K: EnvelopeKind> ApiClient<K> {
    pub(crate) fn from_parts(
        http_client: reqwest::Client,
        base_url: String,
        interceptors: Vec<Arc<dyn HttpInterceptor>>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            interceptors,
            _envelope: PhantomData,
        }
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path`, decoding the envelope's payload into `T`.
    ///
    /// `params` are URL-encoded into the query string and also serialized
    /// as the JSON request body, matching the wire behavior of the services
    /// this envelope convention comes from.
    pub async fn get<T>(&self, ctx: &CancelHandle, path: &str, params: &Params) -> Result<T, ClientError>
    where
        T: DeserializeOwned + PayloadError,
    {
        self.request(ctx, Method::GET, path, Some(params), params)
            .await
    }

    /// POST `payload` as a JSON body to `path`, decoding the envelope's
    /// payload into `T`.
    pub async fn post<P, T>(&self, ctx: &CancelHandle, path: &str, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + PayloadError,
    {
        self.request(ctx, Method::POST, path, None, payload).await
    }

    /// PUT `payload` as a JSON body to `path`, decoding the envelope's
    /// payload into `T`.
    pub async fn put<P, T>(&self, ctx: &CancelHandle, path: &str, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + PayloadError,
    {
        self.request(ctx, Method::PUT, path, None, payload).await
    }

    /// DELETE `path` with `payload` as a JSON body, decoding the envelope's
    /// payload into `T`.
    pub async fn delete<P, T>(&self, ctx: &CancelHandle, path: &str, payload: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + PayloadError,
    {
        self.request(ctx, Method::DELETE, path, None, payload).await
    }

    /// The unified request routine every verb funnels into. Exposed for
    /// call sites that need an explicit query string together with a body,
    /// or a method the verb helpers don't cover.
    pub async fn request<P, T>(
        &self,
        ctx: &CancelHandle,
        method: Method,
        path: &str,
        query: Option<&Params>,
        payload: &P,
    ) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + PayloadError,
    {
        if ctx.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        // 1. Serialize the payload
        let body = serde_json::to_value(payload).map_err(ClientError::Serialization)?;

        // 2. Build and validate the URL
        let url = self.build_url(path, query);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| ClientError::RequestConstruction(format!("invalid URL `{url}`: {e}")))?;
        tracing::debug!(target: "apiwrap::http", method = %method, url = %url, "request built");

        let request_ctx = HttpRequestContext {
            method: method.clone(),
            url: url.clone(),
        };

        // 3. Build the request and apply before-send interceptors
        let mut rb = self.http_client.request(method, parsed).json(&body);
        for interceptor in &self.interceptors {
            rb = interceptor.on_before_send(&request_ctx, rb, &body)?;
        }

        // 4. Send and read the full body, racing the caller's cancellation.
        // Dropping the in-flight future on any early exit releases the
        // response and its connection.
        let read = async {
            let resp = rb
                .send()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            for interceptor in &self.interceptors {
                interceptor.on_response(&request_ctx, &resp)?;
            }
            resp.text()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))
        };
        let text = tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(ClientError::Cancelled),
            result = read => result,
        };
        let text = match text {
            Ok(text) => text,
            Err(e) => return Err(self.notify_error(&request_ctx, e)),
        };

        // 5. Decode the envelope
        let target = std::any::type_name::<K::Envelope<T>>();
        let envelope: K::Envelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(self.notify_error(
                    &request_ctx,
                    ClientError::Decode {
                        url,
                        target,
                        reason: e.to_string(),
                        body: text,
                    },
                ));
            }
        };

        // 6. Extract the application error, then the payload
        if let Some(err) = envelope.err() {
            return Err(self.notify_error(&request_ctx, err));
        }
        match envelope.into_data() {
            Some(data) => Ok(data),
            None => Err(self.notify_error(
                &request_ctx,
                ClientError::Decode {
                    url,
                    target,
                    reason: "successful envelope carries no data payload".to_string(),
                    body: text,
                },
            )),
        }
    }

    /// Concatenate base URL and path, appending `?` and the encoded query
    /// string when non-empty params are supplied.
    fn build_url(&self, path: &str, query: Option<&Params>) -> String {
        match query {
            Some(params) if !params.is_empty() => {
                format!("{}{}?{}", self.base_url, path, params.to_query_string())
            }
            _ => format!("{}{}", self.base_url, path),
        }
    }

    fn notify_error(&self, ctx: &HttpRequestContext, error: ClientError) -> ClientError {
        for interceptor in &self.interceptors {
            interceptor.on_error(ctx, &error);
        }
        error
    }
}

impl<K: EnvelopeKind> Clone for ApiClient<K> {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            interceptors: self.interceptors.clone(),
            _envelope: PhantomData,
        }
    }
}

impl<K: EnvelopeKind> std::fmt::Debug for ApiClient<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
