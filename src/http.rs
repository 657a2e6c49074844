//! Endpoints, requests and the transport seam.
//!
//! [`Transport`] sends exactly one request and hands back the status, headers
//! and raw body. Status interpretation belongs to the resources, not here.
//! [`ReqwestTransport`] is the production implementation.

use std::fmt;
use std::path::PathBuf;

use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::{Method, Url};
use serde_json::Value;

use crate::config::{Auth, ClientConfig};
use crate::params::{ParamValue, Params};
use crate::Result;

/// Relative API path plus query pairs, e.g. `apps/installations.json?include=users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    query: Vec<(String, String)>,
}

impl Endpoint {
    /// Normalize a relative path: no leading slash.
    pub fn prepare(path: impl AsRef<str>) -> Self {
        Self {
            path: path.as_ref().trim_start_matches('/').to_string(),
            query: Vec::new(),
        }
    }

    /// Add `include=a,b` when a sideload list is given and non-empty.
    pub fn with_sideload(mut self, sideload: Option<&[String]>) -> Self {
        if let Some(items) = sideload.filter(|items| !items.is_empty()) {
            self.query.push(("include".into(), items.join(",")));
        }
        self
    }

    /// Forward `page`, `per_page` and `sort_order` from the call params.
    pub fn with_iterators(mut self, params: &Params) -> Self {
        for key in ["page", "per_page", "sort_order"] {
            let value = match params.get(key) {
                Some(ParamValue::Json(Value::Number(n))) => n.to_string(),
                Some(ParamValue::Json(Value::String(s))) if !s.is_empty() => s.clone(),
                _ => continue,
            };
            self.query.push((key.into(), value));
        }
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Resolve against the API base url.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base
            .join(&self.path)
            .map_err(|e| crate::ZendeskApiError::Config(format!("invalid endpoint {self}: {e}")))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

/// Request body variants the apps API uses.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    /// multipart/form-data with a single file field.
    Upload { field: &'static str, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: Endpoint, body: RequestBody) -> Self {
        Self {
            method,
            endpoint,
            body,
        }
    }

    pub fn get(endpoint: Endpoint) -> Self {
        Self::new(Method::GET, endpoint, RequestBody::None)
    }

    pub fn delete(endpoint: Endpoint) -> Self {
        Self::new(Method::DELETE, endpoint, RequestBody::None)
    }

    pub fn post(endpoint: Endpoint, body: RequestBody) -> Self {
        Self::new(Method::POST, endpoint, body)
    }

    pub fn put(endpoint: Endpoint, body: RequestBody) -> Self {
        Self::new(Method::PUT, endpoint, body)
    }
}

/// What came back on the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Sends one request. Network failures are errors; any HTTP status is not.
pub trait Transport {
    fn send(&mut self, request: &ApiRequest) -> Result<RawResponse>;
}

/// Blocking reqwest transport with account auth.
pub struct ReqwestTransport {
    client: Client,
    api_url: Url,
    auth: Auth,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("zendesk-api-rust/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url()?,
            auth: config.auth.clone(),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Password { username, password } => builder.basic_auth(username, Some(password)),
            Auth::Token { username, token } => {
                builder.basic_auth(format!("{username}/token"), Some(token))
            }
            Auth::OAuth { token } => builder.bearer_auth(token),
        }
    }

    fn build(&self, request: &ApiRequest) -> Result<RequestBuilder> {
        let url = request.endpoint.url(&self.api_url)?;
        let builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");
        let builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Upload { field, path } => {
                builder.multipart(Form::new().file(*field, path)?)
            }
        };
        Ok(self.authorize(builder))
    }
}

impl Transport for ReqwestTransport {
    fn send(&mut self, request: &ApiRequest) -> Result<RawResponse> {
        let resp = self.build(request)?.send()?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp.text()?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
