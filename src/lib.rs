//! Zendesk apps API: Rust client for app and app-installation management.
//! Blocking reqwest transport + serde; one call maps to one HTTP request.
//!
//! ```no_run
//! use zendesk_api::{Auth, ClientConfig, HttpClient, Params};
//!
//! let config = ClientConfig::new("acme", Auth::token("agent@acme.com", "secret"));
//! let mut client = HttpClient::new(&config)?;
//! let upload = client.apps().upload(Params::new().with_file("file", "app.zip"))?;
//! println!("uploaded: {:?}", upload.get("id"));
//! # Ok::<(), zendesk_api::ZendeskApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod http;
pub mod params;
pub mod resources;
pub mod response;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpClient;
pub use config::{Auth, ClientConfig};
pub use http::{ApiRequest, Endpoint, RawResponse, RequestBody, ReqwestTransport, Transport};
pub use params::{ParamValue, Params};
pub use resources::{AppInstallations, Apps, ResourceKind};
pub use response::{ApiObject, DebugInfo, DecodeFailure, Decoded};
pub use types::*;

/// Error returned by Zendesk API calls.
#[derive(Debug, thiserror::Error)]
pub enum ZendeskApiError {
    /// Required keys were absent; raised before any request is sent.
    #[error("Missing parameters: '{}' must be supplied for {method}", .params.join("', '"))]
    MissingParameters {
        method: &'static str,
        params: Vec<&'static str>,
    },

    /// The response body was not an object, or the status was not the one
    /// the operation expects.
    #[error("Response to {method} is not valid. Call HttpClient::debug() for details")]
    ResponseError { method: &'static str },

    /// A parameter was present but had an unusable shape.
    #[error("Invalid parameter '{param}' for {method}: {reason}")]
    InvalidParameter {
        method: &'static str,
        param: String,
        reason: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ZendeskApiError {
    /// Operation name carried by contract errors, if any.
    pub fn method(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameters { method, .. }
            | Self::ResponseError { method }
            | Self::InvalidParameter { method, .. } => Some(*method),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZendeskApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message() {
        let err = ZendeskApiError::MissingParameters {
            method: "Apps::update",
            params: vec!["file", "id"],
        };
        assert_eq!(
            err.to_string(),
            "Missing parameters: 'file', 'id' must be supplied for Apps::update"
        );
        assert_eq!(err.method(), Some("Apps::update"));
    }

    #[test]
    fn test_response_error_message() {
        let err = ZendeskApiError::ResponseError {
            method: "Apps::upload",
        };
        assert_eq!(
            err.to_string(),
            "Response to Apps::upload is not valid. Call HttpClient::debug() for details"
        );
    }

    #[test]
    fn test_config_error_has_no_method() {
        let err = ZendeskApiError::Config("subdomain is empty".into());
        assert_eq!(err.method(), None);
        assert_eq!(err.to_string(), "configuration error: subdomain is empty");
    }
}
