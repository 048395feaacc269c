//! Query parameters
//!
//! `Params` is the loosely-keyed parameter map attached to requests. Values
//! are restricted to the shapes that URL-encode cleanly (strings and
//! integers); anything else is rejected up front instead of being silently
//! dropped during query-string construction.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ClientError;

/// A single query-parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A string value, encoded as-is
    String(String),
    /// An integer value, rendered in decimal
    Int(i64),
}

impl ParamValue {
    fn write_encoded(&self, out: &mut String) {
        match self {
            Self::String(s) => out.push_str(&urlencoding::encode(s)),
            Self::Int(i) => out.push_str(&i.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Int(i) => serializer.serialize_i64(*i),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Conversion from loose JSON values. Only strings and integers are
/// representable as query parameters; floats, booleans, nulls, arrays and
/// objects are an explicit error.
impl TryFrom<serde_json::Value> for ParamValue {
    type Error = ClientError;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, ClientError> {
        match value {
            serde_json::Value::String(s) => Ok(Self::String(s)),
            serde_json::Value::Number(n) => n.as_i64().map(Self::Int).ok_or_else(|| {
                ClientError::InvalidParameter(format!(
                    "unsupported numeric query value `{n}` (only integers can be URL-encoded)"
                ))
            }),
            other => Err(ClientError::InvalidParameter(format!(
                "unsupported query value `{other}` (only strings and integers can be URL-encoded)"
            ))),
        }
    }
}

/// An ordered map of query parameters.
///
/// Serializes to a flat JSON object, so the same value can double as a
/// request body. Keys encode in sorted order, which keeps generated URLs
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, chaining style.
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a parameter, replacing any previous value under the key.
    pub fn insert<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter by key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a URL-encoded query string (`a=x&b=5`), without the
    /// leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.0 {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&urlencoding::encode(key));
            out.push('=');
            value.write_encoded(&mut out);
        }
        out
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// Conversion from a loose JSON object. Non-object values and unsupported
/// member types are an explicit error.
impl TryFrom<serde_json::Value> for Params {
    type Error = ClientError;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, ClientError> {
        let serde_json::Value::Object(map) = value else {
            return Err(ClientError::InvalidParameter(format!(
                "query parameters must be a JSON object, got `{value}`"
            )));
        };
        let mut params = Self::new();
        for (key, value) in map {
            params.0.insert(key, ParamValue::try_from(value)?);
        }
        Ok(params)
    }
}
