//! apiwrap
//!
//! A thin convenience wrapper around `reqwest` for APIs that wrap every
//! response in a `{"code": .., "message": .., "data": ..}` JSON envelope.
//! It builds request URLs, serializes payloads, dispatches
//! GET/POST/PUT/DELETE calls and decodes the envelope into a caller-supplied
//! destination type, turning `code != 0` into a typed application error.
//!
//! There is no retry, no backoff and no caching: every call is one request,
//! failing fast with a descriptive error. Cancellation is delegated to the
//! caller through a [`CancelHandle`] passed to each call.
//!
//! ```rust,no_run
//! use apiwrap::{ApiClient, CancelHandle, Params, PayloadError};
//!
//! #[derive(serde::Deserialize)]
//! struct Widget {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl PayloadError for Widget {}
//!
//! async fn example() -> Result<(), apiwrap::ClientError> {
//!     let client = ApiClient::builder()
//!         .base_url("https://api.example.com")
//!         .request_hook(|rb| rb.header("x-api-key", "secret"))
//!         .build()?;
//!
//!     let ctx = CancelHandle::new();
//!     let widget: Widget = client
//!         .get(&ctx, "/v1/widgets/1", &Params::new().with("expand", "all"))
//!         .await?;
//!     println!("{} = {}", widget.id, widget.name);
//!     Ok(())
//! }
//! ```
#![deny(unsafe_code)]

pub mod builder;
pub mod cancel;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod interceptor;
pub mod params;

pub use builder::ApiClientBuilder;
pub use cancel::CancelHandle;
pub use client::ApiClient;
pub use config::{HttpConfig, HttpConfigBuilder, build_http_client};
pub use envelope::{DefaultEnvelope, Envelope, EnvelopeKind, PayloadError, Resp};
pub use error::ClientError;
pub use interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
pub use params::{ParamValue, Params};

/// Re-export of the HTTP method type used by [`ApiClient::request`].
pub use reqwest::Method;

/// Convenience re-exports for the common case.
pub mod prelude {
    pub use crate::builder::ApiClientBuilder;
    pub use crate::cancel::CancelHandle;
    pub use crate::client::ApiClient;
    pub use crate::envelope::{Envelope, EnvelopeKind, PayloadError, Resp};
    pub use crate::error::ClientError;
    pub use crate::params::Params;
}
