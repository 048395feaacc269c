//! HTTP interceptor interfaces
//!
//! Interceptors are the customization point for cross-cutting request
//! concerns: they can observe and tweak request builders before send
//! (header injection being the typical case), observe responses, and be
//! notified of errors. The hooks are best-effort and should avoid expensive
//! work by default.

use crate::error::ClientError;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    /// HTTP method of the request
    pub method: reqwest::Method,
    /// Fully-built request URL, query string included
    pub url: String,
}

/// HTTP interceptor trait.
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Interceptors may add headers or
    /// modify attributes on the request builder. Return the (possibly
    /// modified) builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _body: &serde_json::Value,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        Ok(builder)
    }

    /// Called after a response is received, before its body is consumed.
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &reqwest::Response,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    /// Called when the call fails at or after the transport step.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &ClientError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _body: &serde_json::Value,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        tracing::debug!(target: "apiwrap::http", method = %ctx.method, url = %ctx.url, "sending request");
        Ok(builder)
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: &reqwest::Response,
    ) -> Result<(), ClientError> {
        tracing::debug!(target: "apiwrap::http", method = %ctx.method, url = %ctx.url, status = %response.status().as_u16(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &ClientError) {
        tracing::debug!(target: "apiwrap::http", method = %ctx.method, url = %ctx.url, err = %error, "request error");
    }
}

/// Adapter turning a plain request-mutating closure into an interceptor.
///
/// Registered through
/// [`ApiClientBuilder::request_hook`](crate::builder::ApiClientBuilder::request_hook).
pub(crate) struct RequestHook<F>(pub(crate) F);

impl<F> HttpInterceptor for RequestHook<F>
where
    F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync,
{
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _body: &serde_json::Value,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        Ok((self.0)(builder))
    }
}
