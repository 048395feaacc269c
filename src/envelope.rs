//! Response envelopes
//!
//! Remote endpoints wrap their payloads in a JSON envelope carrying a status
//! code and message next to the actual data. This module defines the default
//! `{"code": .., "message": .., "data": ..}` shape and the traits that let a
//! client decode custom envelope shapes while still knowing how to extract a
//! generic application error from them.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Implemented by payload types that can carry their own application error.
///
/// The default implementation reports no error; payload types opt in with a
/// one-line impl and override [`payload_error`](Self::payload_error) when
/// their shape embeds an error field. A payload error takes precedence over
/// the envelope-level status code.
pub trait PayloadError {
    /// The error embedded in this payload, if any.
    fn payload_error(&self) -> Option<ClientError> {
        None
    }
}

impl PayloadError for () {}
impl PayloadError for bool {}
impl PayloadError for i32 {}
impl PayloadError for i64 {}
impl PayloadError for u32 {}
impl PayloadError for u64 {}
impl PayloadError for f64 {}
impl PayloadError for String {}
impl PayloadError for serde_json::Value {}
impl<T> PayloadError for Vec<T> {}
impl<K, V> PayloadError for std::collections::HashMap<K, V> {}

impl<T: PayloadError> PayloadError for Option<T> {
    fn payload_error(&self) -> Option<ClientError> {
        self.as_ref().and_then(PayloadError::payload_error)
    }
}

/// A decoded response envelope holding a `T` payload.
///
/// The two operations are the whole contract: report the application error
/// extracted from the decoded envelope state, and yield the payload.
pub trait Envelope<T>: DeserializeOwned {
    /// The application error carried by this envelope, if any.
    ///
    /// Checked after a successful decode: a payload-embedded error wins,
    /// otherwise a non-zero (or otherwise failing) envelope status becomes
    /// the error.
    fn err(&self) -> Option<ClientError>;

    /// Consume the envelope, yielding the payload if one was present.
    fn into_data(self) -> Option<T>;
}

/// An envelope *family*: the construction-time choice of which envelope
/// shape a client decodes every response into.
///
/// The generic associated type binds an arbitrary payload type into the
/// family's envelope shape, so one client handles every destination type.
/// Each call deserializes a fresh envelope value; concurrent calls never
/// share envelope state.
pub trait EnvelopeKind: Send + Sync + 'static {
    /// The envelope shape wrapping a `T` payload.
    type Envelope<T: DeserializeOwned + PayloadError>: Envelope<T>;
}

/// The built-in envelope family, decoding [`Resp`].
pub struct DefaultEnvelope;

impl EnvelopeKind for DefaultEnvelope {
    type Envelope<T: DeserializeOwned + PayloadError> = Resp<T>;
}

/// The default response envelope: `{"code": i32, "message": String,
/// "data": T}`.
///
/// `code == 0` means success; any other value is an application error with
/// `message` as the error text. `data` may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Resp<T> {
    /// Status code; zero on success
    pub code: i32,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// The wrapped payload
    #[serde(default)]
    pub data: Option<T>,
}

impl<T: DeserializeOwned + PayloadError> Envelope<T> for Resp<T> {
    fn err(&self) -> Option<ClientError> {
        if let Some(err) = self.data.payload_error() {
            return Some(err);
        }
        if self.code != 0 {
            return Some(ClientError::Api {
                code: self.code,
                message: self.message.clone(),
            });
        }
        None
    }

    fn into_data(self) -> Option<T> {
        self.data
    }
}
