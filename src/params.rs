//! Per-call request parameters and required-key validation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Result, ZendeskApiError};

/// A single parameter: plain JSON, or a local file to upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Json(Value),
    File(PathBuf),
}

macro_rules! json_param_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

json_param_from!(Value, String, &str, bool, i32, i64, u32, u64, f64);

/// Parameters supplied to one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a file reference.
    pub fn with_file(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.values.insert(key.into(), ParamValue::File(path.into()));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether every key in `required` is present.
    pub fn has_keys(&self, required: &[&str]) -> bool {
        required.iter().all(|key| self.contains_key(key))
    }

    /// Build params from any struct that serializes to a JSON object.
    pub fn from_serialize<S: Serialize>(value: &S) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(ZendeskApiError::InvalidParameter {
                method: "Params::from_serialize",
                param: "<root>".into(),
                reason: format!("expected an object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Render a parameter as one percent-encoded path segment. Numbers and
    /// strings are accepted; `/`, `?` and `#` in a string stay inside the
    /// segment.
    pub(crate) fn path_segment(&self, method: &'static str, key: &'static str) -> Result<String> {
        let invalid = |reason: String| ZendeskApiError::InvalidParameter {
            method,
            param: key.to_string(),
            reason,
        };
        match self.get(key) {
            Some(ParamValue::Json(Value::Number(n))) => Ok(n.to_string()),
            Some(ParamValue::Json(Value::String(s))) if !s.is_empty() => {
                Ok(urlencoding::encode(s).into_owned())
            }
            Some(ParamValue::Json(Value::String(_))) => Err(invalid("empty string".into())),
            Some(ParamValue::Json(other)) => Err(invalid(format!(
                "expected a number or string, got {}",
                json_kind(other)
            ))),
            Some(ParamValue::File(_)) => Err(invalid("a file cannot be used here".into())),
            None => Err(ZendeskApiError::MissingParameters {
                method,
                params: vec![key],
            }),
        }
    }

    /// Resolve a file parameter. A JSON string is taken as a path.
    pub(crate) fn file_path(&self, method: &'static str, key: &'static str) -> Result<PathBuf> {
        match self.get(key) {
            Some(ParamValue::File(path)) => Ok(path.clone()),
            Some(ParamValue::Json(Value::String(s))) if !s.is_empty() => Ok(PathBuf::from(s)),
            Some(ParamValue::Json(other)) => Err(ZendeskApiError::InvalidParameter {
                method,
                param: key.to_string(),
                reason: format!("expected a file path, got {}", json_kind(other)),
            }),
            None => Err(ZendeskApiError::MissingParameters {
                method,
                params: vec![key],
            }),
        }
    }

    /// JSON object body. File references serialize as their path.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    ParamValue::Json(v) => v.clone(),
                    ParamValue::File(path) => Value::String(path.display().to_string()),
                };
                (key.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            values: map
                .into_iter()
                .map(|(k, v)| (k, ParamValue::Json(v)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Fail with `MissingParameters` unless every key in `required` is present.
/// The error lists the whole required set, not just the absent keys.
pub fn require(method: &'static str, params: &Params, required: &[&'static str]) -> Result<()> {
    if params.has_keys(required) {
        return Ok(());
    }
    Err(ZendeskApiError::MissingParameters {
        method,
        params: required.to_vec(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
