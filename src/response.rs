//! Decoded response bodies and last-response debug information.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Result;

/// A JSON object returned by the API.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiObject(Map<String, Value>);

impl ApiObject {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Decode into a typed model, e.g. `obj.decode::<JobStatus>()`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }
}

impl Deref for ApiObject {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ApiObject> for Value {
    fn from(obj: ApiObject) -> Self {
        obj.into_value()
    }
}

/// Why a body did not decode to an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    Empty,
    NotAnObject(&'static str),
    Malformed(String),
}

/// Result of decoding a raw response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Object(ApiObject),
    Failure(DecodeFailure),
}

impl Decoded {
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Failure(DecodeFailure::Empty);
        }
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => Self::Object(ApiObject(map)),
            Ok(Value::Array(_)) => Self::Failure(DecodeFailure::NotAnObject("array")),
            Ok(Value::String(_)) => Self::Failure(DecodeFailure::NotAnObject("string")),
            Ok(Value::Number(_)) => Self::Failure(DecodeFailure::NotAnObject("number")),
            Ok(Value::Bool(_)) => Self::Failure(DecodeFailure::NotAnObject("boolean")),
            Ok(Value::Null) => Self::Failure(DecodeFailure::NotAnObject("null")),
            Err(e) => Self::Failure(DecodeFailure::Malformed(e.to_string())),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}

/// What the client saw on its most recent request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugInfo {
    /// `"{METHOD} {endpoint}"` of the last request sent.
    pub last_request: Option<String>,
    pub last_response_code: Option<u16>,
    pub last_response_headers: Vec<(String, String)>,
    /// Raw body of the last response with status >= 400.
    pub last_response_error: Option<String>,
}

impl DebugInfo {
    /// Header lookup, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.last_response_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
